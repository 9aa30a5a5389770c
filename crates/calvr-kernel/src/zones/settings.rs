use calvr_config::ConfigTree;

use crate::coords::ColorRgba;

use super::camera::StereoMode;
use super::contribution::ContributionFunction;
use super::grid::AdaptiveControl;

/// Zone grid and blending settings, read once at init.
#[derive(Debug, Clone, PartialEq)]
pub struct ZonesSettings {
    pub max_columns: usize,
    pub max_rows: usize,
    pub orientation_3d: bool,
    pub adaptive: AdaptiveControl,
    pub contribution: ContributionFunction,
    /// Fixed threshold in radians; `None` follows the users' gaze divergence.
    pub contribution_var: Option<f32>,
    pub coloring: bool,
}

impl Default for ZonesSettings {
    fn default() -> Self {
        Self {
            max_columns: 16,
            max_rows: 4,
            orientation_3d: true,
            adaptive: AdaptiveControl::default(),
            contribution: ContributionFunction::Cosine,
            contribution_var: None,
            coloring: false,
        }
    }
}

impl ZonesSettings {
    pub fn from_config(cfg: &ConfigTree) -> Self {
        let d = Self::default();

        let max_columns = read_max(cfg, "Zones.maxColumns", d.max_columns);
        let max_rows = read_max(cfg, "Zones.maxRows", d.max_rows);

        let contribution = match cfg.try_str("Zones.contribution") {
            None => d.contribution,
            Some(name) => ContributionFunction::parse(name).unwrap_or_else(|| {
                log::warn!("unknown Zones.contribution {name:?}; using {}", d.contribution.as_str());
                d.contribution
            }),
        };

        let contribution_var = cfg
            .try_float("Zones.contributionVar")
            .map(|v| v as f32)
            .filter(|v| {
                let ok = *v > 0.0 && v.is_finite();
                if !ok {
                    log::warn!("ignoring Zones.contributionVar {v}; threshold stays automatic");
                }
                ok
            });

        Self {
            max_columns,
            max_rows,
            orientation_3d: cfg.get_bool("Orientation3d", d.orientation_3d),
            adaptive: AdaptiveControl {
                enabled: cfg.get_bool("FrameRate.autoAdjust", d.adaptive.enabled),
                target: cfg.get_float("FrameRate.target", d.adaptive.target as f64) as f32,
                offset: cfg.get_float("FrameRate.offset", d.adaptive.offset as f64) as f32,
            },
            contribution,
            contribution_var,
            coloring: cfg.get_bool("Zones.coloring", d.coloring),
        }
    }
}

fn read_max(cfg: &ConfigTree, path: &str, default: usize) -> usize {
    let v = cfg.get_int(path, default as i64);
    if v < 1 {
        log::warn!("{path} = {v} is below 1; using 1");
        1
    } else {
        v as usize
    }
}

/// Stereo camera settings.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoSettings {
    pub mode: StereoMode,
    /// Interocular distance, tracking units.
    pub separation: f32,
    pub near: f32,
    pub far: f32,
    pub clear_color: ColorRgba,
}

impl Default for StereoSettings {
    fn default() -> Self {
        Self {
            mode: StereoMode::Interlaced,
            separation: 64.0,
            near: 10.0,
            far: 100_000.0,
            clear_color: ColorRgba::clear(),
        }
    }
}

impl StereoSettings {
    pub fn from_config(cfg: &ConfigTree) -> Self {
        let d = Self::default();

        let mode = match cfg.try_str("Stereo.mode") {
            None => d.mode,
            Some(name) => StereoMode::parse(name).unwrap_or_else(|| {
                log::warn!("unknown Stereo.mode {name:?}; using {}", d.mode.as_str());
                d.mode
            }),
        };

        let mut near = cfg.get_float("Stereo.near", d.near as f64) as f32;
        let mut far = cfg.get_float("Stereo.far", d.far as f64) as f32;
        if !(near > 0.0 && far > near) {
            log::warn!("invalid clip planes near={near} far={far}; using {} / {}", d.near, d.far);
            near = d.near;
            far = d.far;
        }

        Self {
            mode,
            separation: cfg.get_float("Stereo.separation", d.separation as f64) as f32,
            near,
            far,
            clear_color: cfg
                .try_color("Stereo.clearColor")
                .map(ColorRgba::from_rgba8)
                .unwrap_or(d.clear_color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calvr_config::parse_str;

    #[test]
    fn empty_config_gives_defaults() {
        let cfg = parse_str("").unwrap();
        assert_eq!(ZonesSettings::from_config(&cfg), ZonesSettings::default());
        assert_eq!(StereoSettings::from_config(&cfg), StereoSettings::default());
    }

    #[test]
    fn reads_every_zone_key() {
        let cfg = parse_str(
            "Zones { maxColumns: 8 maxRows: 2 contribution: gaussian contributionVar: 1.2 coloring: on }
             Orientation3d: false
             FrameRate { autoAdjust: false target: 30 offset: 2.5 }",
        )
        .unwrap();
        let s = ZonesSettings::from_config(&cfg);
        assert_eq!((s.max_columns, s.max_rows), (8, 2));
        assert_eq!(s.contribution, ContributionFunction::Gaussian);
        assert_eq!(s.contribution_var, Some(1.2));
        assert!(s.coloring);
        assert!(!s.orientation_3d);
        assert_eq!(s.adaptive, AdaptiveControl { enabled: false, target: 30.0, offset: 2.5 });
    }

    #[test]
    fn maxima_below_one_are_clamped() {
        let cfg = parse_str("Zones { maxColumns: 0 maxRows: -3 }").unwrap();
        let s = ZonesSettings::from_config(&cfg);
        assert_eq!((s.max_columns, s.max_rows), (1, 1));
    }

    #[test]
    fn bad_names_fall_back() {
        let cfg = parse_str("Zones { contribution: spline contributionVar: -1 } Stereo { mode: top }").unwrap();
        let z = ZonesSettings::from_config(&cfg);
        assert_eq!(z.contribution, ContributionFunction::Cosine);
        assert_eq!(z.contribution_var, None);
        assert_eq!(StereoSettings::from_config(&cfg).mode, StereoMode::Interlaced);
    }

    #[test]
    fn reads_stereo_keys() {
        let cfg = parse_str("Stereo { mode: right separation: 70 near: 5 far: 500 clearColor: #ff000080 }").unwrap();
        let s = StereoSettings::from_config(&cfg);
        assert_eq!(s.mode, StereoMode::RightEye);
        assert_eq!((s.separation, s.near, s.far), (70.0, 5.0, 500.0));
        assert_eq!(s.clear_color.r, 1.0);
        assert!((s.clear_color.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn inverted_clip_planes_are_rejected() {
        let cfg = parse_str("Stereo { near: 100 far: 10 }").unwrap();
        let s = StereoSettings::from_config(&cfg);
        assert_eq!((s.near, s.far), (10.0, 100_000.0));
    }
}
