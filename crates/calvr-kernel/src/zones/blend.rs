use glam::{Mat4, Vec3};

use crate::tracking::{default_left_eye, default_right_eye, head_forward, TrackingSource};

use super::contribution::{ContributionFunction, ContributionThreshold, ContributionWeights};
use super::geometry::Zone;

/// Left and right eye positions, tracking space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EyePair {
    pub left: Vec3,
    pub right: Vec3,
}

impl EyePair {
    pub const fn new(left: Vec3, right: Vec3) -> Self {
        Self { left, right }
    }

    fn of_head(tracking: &dyn TrackingSource, head: usize, separation: f32) -> Self {
        Self {
            left: default_left_eye(tracking, head, separation),
            right: default_right_eye(tracking, head, separation),
        }
    }
}

/// Eyes chosen for one zone and the user weights that produced them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BlendedEyes {
    pub eyes: EyePair,
    pub weights: ContributionWeights,
}

/// Per-zone eye placement from up to two tracked users.
#[derive(Debug, Clone)]
pub struct EyeBlender {
    pub function: ContributionFunction,
    pub threshold: ContributionThreshold,
    /// Use full 3D gaze instead of its projection onto the horizontal plane.
    pub orientation_3d: bool,
    pub separation: f32,
}

impl EyeBlender {
    pub fn new(function: ContributionFunction, threshold: ContributionThreshold, orientation_3d: bool, separation: f32) -> Self {
        Self { function, threshold, orientation_3d, separation }
    }

    /// Fills `out` with one entry per zone, in zone order.
    ///
    /// With `multiple_users` off every zone gets user 0's eyes unchanged.
    /// Otherwise each zone blends users 0 and 1 by how directly each one
    /// looks at the zone center.
    pub fn blend(
        &mut self,
        zones: &[Zone],
        tracking: &dyn TrackingSource,
        multiple_users: bool,
        out: &mut Vec<BlendedEyes>,
    ) {
        out.clear();

        let eyes0 = EyePair::of_head(tracking, 0, self.separation);
        if !multiple_users {
            out.extend(zones.iter().map(|_| BlendedEyes {
                eyes: eyes0,
                weights: ContributionWeights::single_user(),
            }));
            return;
        }

        let head0 = tracking.head_matrix(0);
        let head1 = tracking.head_matrix(1);
        let eyes1 = EyePair::of_head(tracking, 1, self.separation);
        let pos0 = head0.w_axis.truncate();
        let pos1 = head1.w_axis.truncate();

        let o0 = self.orientation(head0);
        let o1 = self.orientation(head1);
        let var = self.threshold.update(o0, o1);

        for zone in zones {
            let to0 = (zone.center - pos0).try_normalize().unwrap_or(o0);
            let to1 = (zone.center - pos1).try_normalize().unwrap_or(o1);
            let weights = self.function.weights(to0, o0, to1, o1, var);

            out.push(BlendedEyes {
                eyes: EyePair {
                    left: weights.blend(eyes0.left, eyes1.left),
                    right: weights.blend(eyes0.right, eyes1.right),
                },
                weights,
            });
        }
    }

    /// Unit gaze of a head pose. In 2D mode the vertical component is dropped;
    /// a head looking straight up or down keeps its 3D gaze.
    fn orientation(&self, head: Mat4) -> Vec3 {
        let forward = head_forward(head);
        let planar = if self.orientation_3d {
            forward
        } else {
            Vec3::new(forward.x, forward.y, 0.0)
        };
        planar
            .try_normalize()
            .or_else(|| forward.try_normalize())
            .unwrap_or(Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::PixelRect;
    use crate::tracking::StaticTracking;
    use crate::zones::geometry::ZoneBounds;

    fn zone(index: usize, center: Vec3) -> Zone {
        Zone {
            index,
            row: 0,
            column: index,
            center,
            bounds: ZoneBounds { left: 0.0, right: 0.0, bottom: 0.0, top: 0.0 },
            viewport: PixelRect::zero(),
        }
    }

    fn blender() -> EyeBlender {
        EyeBlender::new(ContributionFunction::Cosine, ContributionThreshold::default(), false, 64.0)
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    /// User 0 on the left looking at the left zone, user 1 on the right
    /// looking at the right zone.
    fn two_users() -> StaticTracking {
        StaticTracking::new(vec![
            StaticTracking::looking(Vec3::new(-500.0, -1000.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
            StaticTracking::looking(Vec3::new(500.0, -1000.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
        ])
    }

    #[test]
    fn single_user_uses_default_eyes_everywhere() {
        let tracking = two_users();
        let zones = [zone(0, Vec3::new(-500.0, 0.0, 0.0)), zone(1, Vec3::new(500.0, 0.0, 0.0))];
        let mut out = Vec::new();
        blender().blend(&zones, &tracking, false, &mut out);

        assert_eq!(out.len(), 2);
        for b in &out {
            assert!(close(b.eyes.left, Vec3::new(-532.0, -1000.0, 0.0)));
            assert!(close(b.eyes.right, Vec3::new(-468.0, -1000.0, 0.0)));
            assert_eq!(b.weights, ContributionWeights::single_user());
        }
    }

    #[test]
    fn each_zone_leans_to_the_user_facing_it() {
        let tracking = two_users();
        let zones = [zone(0, Vec3::new(-500.0, 0.0, 0.0)), zone(1, Vec3::new(500.0, 0.0, 0.0))];
        let mut out = Vec::new();
        blender().blend(&zones, &tracking, true, &mut out);

        assert!(out[0].weights.w0 > out[0].weights.w1);
        assert!(out[1].weights.w1 > out[1].weights.w0);
        // Symmetric layout gives mirrored weights.
        assert!((out[0].weights.w0 - out[1].weights.w1).abs() < 1e-5);
        for b in &out {
            assert!((b.weights.w0 + b.weights.w1 - 1.0).abs() < 1e-5);
            // Blended eyes keep the separation since both heads are parallel.
            assert!(((b.eyes.right - b.eyes.left).length() - 64.0).abs() < 1e-2);
        }
        assert!(out[0].eyes.left.x < 0.0);
        assert!(out[1].eyes.left.x > 0.0);
    }

    #[test]
    fn blended_eyes_are_weighted_mix() {
        let tracking = two_users();
        let zones = [zone(0, Vec3::new(-200.0, 0.0, 300.0))];
        let mut out = Vec::new();
        blender().blend(&zones, &tracking, true, &mut out);

        let w = out[0].weights;
        let expected = Vec3::new(-532.0, -1000.0, 0.0) * w.w0 + Vec3::new(468.0, -1000.0, 0.0) * w.w1;
        assert!(close(out[0].eyes.left, expected));
    }

    #[test]
    fn planar_mode_ignores_pitch() {
        let tracking = StaticTracking::new(vec![
            StaticTracking::looking(Vec3::new(0.0, -1000.0, 0.0), Vec3::new(0.0, 1.0, 1.0)),
            StaticTracking::looking(Vec3::new(0.0, -1000.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
        ]);
        let zones = [zone(0, Vec3::new(0.0, 0.0, 0.0))];

        let mut planar = blender();
        let mut out = Vec::new();
        planar.blend(&zones, &tracking, true, &mut out);
        assert!((out[0].weights.w0 - 0.5).abs() < 1e-5);

        let mut full = EyeBlender { orientation_3d: true, ..blender() };
        full.blend(&zones, &tracking, true, &mut out);
        assert!(out[0].weights.w0 < out[0].weights.w1);
    }

    #[test]
    fn looking_straight_up_keeps_a_usable_gaze() {
        let b = blender();
        let up = StaticTracking::looking(Vec3::ZERO, Vec3::Z);
        let o = b.orientation(up);
        assert!((o.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn auto_threshold_tracks_gaze_divergence() {
        let tracking = StaticTracking::new(vec![
            StaticTracking::looking(Vec3::new(-500.0, -1000.0, 0.0), Vec3::X),
            StaticTracking::looking(Vec3::new(500.0, -1000.0, 0.0), -Vec3::X),
        ]);
        let zones = [zone(0, Vec3::ZERO)];
        let mut b = blender();
        let mut out = Vec::new();
        b.blend(&zones, &tracking, true, &mut out);
        assert!((b.threshold.value - std::f32::consts::PI).abs() < 1e-3);

        b.threshold = ContributionThreshold { value: 1.0, auto: false };
        b.blend(&zones, &tracking, true, &mut out);
        assert_eq!(b.threshold.value, 1.0);
    }
}
