use calvr_config::ConfigTree;
use glam::{Mat4, Quat, Vec3};

/// Pixel region of the window a screen renders into (bottom-left origin).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChannelRect {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl ChannelRect {
    pub const fn new(left: f32, bottom: f32, width: f32, height: f32) -> Self {
        Self { left, bottom, width, height }
    }
}

/// Placement and extent of one physical screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenInfo {
    /// Screen center in tracking space.
    pub xyz: Vec3,
    /// Heading (about +Z), pitch (about +X), roll (about +Y), in degrees.
    pub h: f32,
    pub p: f32,
    pub r: f32,
    /// Physical extent, same unit as tracking (millimeters by convention).
    pub width: f32,
    pub height: f32,
    pub channel: ChannelRect,
}

impl Default for ScreenInfo {
    fn default() -> Self {
        Self {
            xyz: Vec3::ZERO,
            h: 0.0,
            p: 0.0,
            r: 0.0,
            width: 1600.0,
            height: 900.0,
            channel: ChannelRect::new(0.0, 0.0, 1920.0, 1080.0),
        }
    }
}

impl ScreenInfo {
    /// Reads `Screen.*` and `Screen.Channel.*`; absent keys keep the defaults.
    pub fn from_config(cfg: &ConfigTree) -> Self {
        let d = Self::default();
        let f = |path: &str, default: f32| cfg.get_float(path, default as f64) as f32;

        let info = Self {
            xyz: Vec3::new(
                f("Screen.originX", d.xyz.x),
                f("Screen.originY", d.xyz.y),
                f("Screen.originZ", d.xyz.z),
            ),
            h: f("Screen.h", d.h),
            p: f("Screen.p", d.p),
            r: f("Screen.r", d.r),
            width: f("Screen.width", d.width),
            height: f("Screen.height", d.height),
            channel: ChannelRect::new(
                f("Screen.Channel.left", d.channel.left),
                f("Screen.Channel.bottom", d.channel.bottom),
                f("Screen.Channel.width", d.channel.width),
                f("Screen.Channel.height", d.channel.height),
            ),
        };

        if info.width <= 0.0 || info.height <= 0.0 {
            log::warn!(
                "screen has non-positive physical size {}x{}; zone frusta will be degenerate",
                info.width,
                info.height
            );
        }
        info
    }

    /// Orientation of the screen in tracking space. Roll is applied first,
    /// then pitch, then heading.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_z(self.h.to_radians())
            * Quat::from_rotation_x(self.p.to_radians())
            * Quat::from_rotation_y(self.r.to_radians())
    }

    pub fn inverse_rotation(&self) -> Quat {
        self.rotation().inverse()
    }

    /// Screen-local → tracking space.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation(), self.xyz)
    }

    /// Tracking space → screen-local: translate the screen to the origin, then
    /// undo its rotation.
    pub fn world_to_local(&self) -> Mat4 {
        Mat4::from_quat(self.inverse_rotation()) * Mat4::from_translation(-self.xyz)
    }

    pub fn to_screen_local(&self, point: Vec3) -> Vec3 {
        self.inverse_rotation() * (point - self.xyz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn identity_screen_maps_points_unchanged() {
        let s = ScreenInfo::default();
        let p = Vec3::new(1.0, -2.0, 3.0);
        assert!(close(s.to_screen_local(p), p));
        assert!(close(s.transform().transform_point3(p), p));
    }

    #[test]
    fn local_and_world_round_trip() {
        let s = ScreenInfo {
            xyz: Vec3::new(100.0, 1500.0, 0.0),
            h: 30.0,
            p: -10.0,
            r: 5.0,
            ..ScreenInfo::default()
        };
        let local = Vec3::new(-250.0, 0.0, 120.0);
        let world = s.transform().transform_point3(local);
        assert!(close(s.to_screen_local(world), local));
        assert!(close(s.world_to_local().transform_point3(world), local));
    }

    #[test]
    fn heading_turns_screen_about_up_axis() {
        let s = ScreenInfo { h: 90.0, ..ScreenInfo::default() };
        // Local +X (screen right) points along world +Y after a 90° heading.
        let right = s.transform().transform_vector3(Vec3::X);
        assert!(close(right, Vec3::Y));
        // Up stays up.
        assert!(close(s.transform().transform_vector3(Vec3::Z), Vec3::Z));
    }

    #[test]
    fn reads_config() {
        let cfg = calvr_config::parse_str(
            "Screen { width: 2000 height: 1000 originY: 1200 h: 45 Channel { width: 3840 height: 2160 } }",
        )
        .unwrap();
        let s = ScreenInfo::from_config(&cfg);
        assert_eq!(s.width, 2000.0);
        assert_eq!(s.height, 1000.0);
        assert_eq!(s.xyz, Vec3::new(0.0, 1200.0, 0.0));
        assert_eq!(s.h, 45.0);
        assert_eq!(s.channel, ChannelRect::new(0.0, 0.0, 3840.0, 2160.0));
    }
}
