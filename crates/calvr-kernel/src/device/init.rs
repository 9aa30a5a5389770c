use calvr_config::ConfigTree;

/// Surface and device options.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when the surface offers one.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    /// Falls back to the first supported mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Reads `Display.vsync` (default on) and `Display.srgb` (default on).
    ///
    /// With vsync off the frame rate is unbounded, which lets the adaptive
    /// zone grid grow past the display refresh band.
    pub fn from_config(cfg: &ConfigTree) -> Self {
        let d = Self::default();
        let present_mode = if cfg.get_bool("Display.vsync", true) {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        Self {
            prefer_srgb: cfg.get_bool("Display.srgb", d.prefer_srgb),
            present_mode,
            ..d
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calvr_config::parse_str;

    #[test]
    fn display_keys_select_present_mode() {
        let cfg = parse_str("Display { vsync: off srgb: false }").unwrap();
        let init = GpuInit::from_config(&cfg);
        assert_eq!(init.present_mode, wgpu::PresentMode::AutoNoVsync);
        assert!(!init.prefer_srgb);

        let init = GpuInit::from_config(&parse_str("").unwrap());
        assert_eq!(init.present_mode, wgpu::PresentMode::AutoVsync);
        assert!(init.prefer_srgb);
    }
}
