use glam::{Mat4, Vec3};

/// Supplier of tracked head poses.
///
/// Head matrices map head-local space (eyes along ±X, gaze along +Y, +Z up)
/// into tracking space.
pub trait TrackingSource {
    fn num_heads(&self) -> usize;

    /// Pose of head `head`. Implementations return identity for unknown heads.
    fn head_matrix(&self, head: usize) -> Mat4;
}

/// Fixed set of head poses.
#[derive(Debug, Clone, Default)]
pub struct StaticTracking {
    pub heads: Vec<Mat4>,
}

impl StaticTracking {
    pub fn new(heads: Vec<Mat4>) -> Self {
        Self { heads }
    }

    /// A head at `position` looking along `forward` (+Z up).
    pub fn looking(position: Vec3, forward: Vec3) -> Mat4 {
        let y = forward.try_normalize().unwrap_or(Vec3::Y);
        let x = y.cross(Vec3::Z).try_normalize().unwrap_or(Vec3::X);
        let z = x.cross(y);
        Mat4::from_cols(x.extend(0.0), y.extend(0.0), z.extend(0.0), position.extend(1.0))
    }
}

impl TrackingSource for StaticTracking {
    fn num_heads(&self) -> usize {
        self.heads.len()
    }

    fn head_matrix(&self, head: usize) -> Mat4 {
        self.heads.get(head).copied().unwrap_or(Mat4::IDENTITY)
    }
}

/// Left eye of `head` in tracking space, half the separation to its left.
pub fn default_left_eye(source: &dyn TrackingSource, head: usize, separation: f32) -> Vec3 {
    source
        .head_matrix(head)
        .transform_point3(Vec3::new(-separation / 2.0, 0.0, 0.0))
}

pub fn default_right_eye(source: &dyn TrackingSource, head: usize, separation: f32) -> Vec3 {
    source
        .head_matrix(head)
        .transform_point3(Vec3::new(separation / 2.0, 0.0, 0.0))
}

/// Gaze direction of a head pose (not normalized).
pub fn head_forward(head: Mat4) -> Vec3 {
    head.transform_vector3(Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn eyes_straddle_head() {
        let t = StaticTracking::new(vec![Mat4::from_translation(Vec3::new(0.0, -1000.0, 0.0))]);
        assert!(close(default_left_eye(&t, 0, 64.0), Vec3::new(-32.0, -1000.0, 0.0)));
        assert!(close(default_right_eye(&t, 0, 64.0), Vec3::new(32.0, -1000.0, 0.0)));
    }

    #[test]
    fn looking_builds_orthonormal_pose() {
        let m = StaticTracking::looking(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(close(head_forward(m), Vec3::X));
        assert!(close(m.transform_vector3(Vec3::Z), Vec3::Z));
        // Eyes sit across the gaze: right eye is towards -Y when looking along +X.
        assert!(close(m.transform_vector3(Vec3::X), Vec3::new(0.0, -1.0, 0.0)));
        assert!(close(m.w_axis.truncate(), Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn unknown_head_is_identity() {
        let t = StaticTracking::default();
        assert_eq!(t.num_heads(), 0);
        assert_eq!(t.head_matrix(3), Mat4::IDENTITY);
    }
}
