use glam::{Mat4, Vec3};

use calvr_kernel::screen::ScreenInfo;
use calvr_kernel::tracking::{StaticTracking, TrackingSource};

/// Two users pacing in front of the screen, each watching a point that
/// drifts across it.
#[derive(Debug, Clone)]
pub struct SimulatedUsers {
    to_world: Mat4,
    half_width: f32,
    half_height: f32,
    t: f64,
    heads: StaticTracking,
}

/// Distance of the users from the screen plane.
const STANDING_DISTANCE: f32 = 1500.0;
const EYE_HEIGHT: f32 = 100.0;

impl SimulatedUsers {
    pub fn new(screen: &ScreenInfo) -> Self {
        let mut sim = Self {
            to_world: screen.transform(),
            half_width: screen.width / 2.0,
            half_height: screen.height / 2.0,
            t: 0.0,
            heads: StaticTracking::new(vec![Mat4::IDENTITY; 2]),
        };
        sim.pose();
        sim
    }

    pub fn advance(&mut self, dt: f64) {
        self.t += dt;
        self.pose();
    }

    fn pose(&mut self) {
        let t = self.t as f32;
        let hw = self.half_width;
        let hh = self.half_height;

        // Screen-local: +X across, +Z up, viewers at -Y.
        let users = [
            (
                Vec3::new(-0.4 * hw + 0.15 * hw * (0.7 * t).sin(), -STANDING_DISTANCE, EYE_HEIGHT),
                Vec3::new(-0.6 * hw * (0.3 * t).cos(), 0.0, 0.3 * hh * (0.5 * t).sin()),
            ),
            (
                Vec3::new(0.4 * hw + 0.15 * hw * (0.5 * t).cos(), -STANDING_DISTANCE, EYE_HEIGHT),
                Vec3::new(0.6 * hw * (0.4 * t).sin(), 0.0, -0.3 * hh * (0.6 * t).cos()),
            ),
        ];

        for (head, (position, target)) in self.heads.heads.iter_mut().zip(users) {
            let local = StaticTracking::looking(position, target - position);
            *head = self.to_world * local;
        }
    }
}

impl TrackingSource for SimulatedUsers {
    fn num_heads(&self) -> usize {
        self.heads.num_heads()
    }

    fn head_matrix(&self, head: usize) -> Mat4 {
        self.heads.head_matrix(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calvr_kernel::tracking::head_forward;

    #[test]
    fn users_stand_in_front_and_face_the_screen() {
        let screen = ScreenInfo::default();
        let mut sim = SimulatedUsers::new(&screen);
        for _ in 0..50 {
            sim.advance(0.1);
            for head in 0..sim.num_heads() {
                let m = sim.head_matrix(head);
                let local = screen.to_screen_local(m.w_axis.truncate());
                assert!(local.y < 0.0);
                let gaze = screen.inverse_rotation() * head_forward(m);
                assert!(gaze.y > 0.0);
            }
        }
    }

    #[test]
    fn follows_a_turned_screen() {
        let screen = ScreenInfo { h: 90.0, xyz: Vec3::new(0.0, 500.0, 0.0), ..ScreenInfo::default() };
        let sim = SimulatedUsers::new(&screen);
        let local = screen.to_screen_local(sim.head_matrix(0).w_axis.truncate());
        assert!((local.y + STANDING_DISTANCE).abs() < 1e-2);
        assert!((local.z - EYE_HEIGHT).abs() < 1e-2);
    }
}
