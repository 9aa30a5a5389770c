use crate::coords::ColorRgba;
use crate::screen::ScreenInfo;
use crate::tracking::TrackingSource;

use super::blend::{BlendedEyes, EyeBlender};
use super::camera::{CameraBackend, CameraBank, CameraHandle, SharedCameraBank};
use super::contribution::{ContributionFunction, ContributionThreshold};
use super::geometry::{build_zones, Zone};
use super::grid::{ZoneGrid, ZoneGridPlanner};
use super::settings::{StereoSettings, ZonesSettings};

/// Multi-user, multi-zone stereo screen.
///
/// Call [`compute_view_proj`](Self::compute_view_proj) once per frame before
/// the render traversal reads the camera bank.
#[derive(Debug)]
pub struct ScreenMvZones {
    screen: ScreenInfo,
    planner: ZoneGridPlanner,
    blender: EyeBlender,
    bank: SharedCameraBank,

    zones: Vec<Zone>,
    eyes: Vec<BlendedEyes>,
    grid: ZoneGrid,

    multiple_users: bool,
    zone_coloring: bool,
    colored_last_frame: bool,
}

impl ScreenMvZones {
    /// Allocates one camera per possible zone and picks the starting grid:
    /// the full configured grid with two or more tracked heads, 1x1 otherwise.
    pub fn init(
        screen: ScreenInfo,
        zones: &ZonesSettings,
        stereo: &StereoSettings,
        tracking: &dyn TrackingSource,
        backend: &mut dyn CameraBackend,
    ) -> Self {
        let mut planner = ZoneGridPlanner::new(zones.max_rows, zones.max_columns, zones.adaptive);
        let bank = CameraBank::new(planner.max_rows() * planner.max_columns(), stereo, backend);

        let threshold = match zones.contribution_var {
            Some(value) => ContributionThreshold { value, auto: false },
            None => ContributionThreshold::default(),
        };
        let blender = EyeBlender::new(zones.contribution, threshold, zones.orientation_3d, stereo.separation);

        let multiple_users = tracking.num_heads() > 1;
        if multiple_users {
            planner.set_columns(planner.max_columns(), true);
            planner.set_rows(planner.max_rows(), true);
        }

        log::info!(
            "zones: max {}x{}, {} head(s), adaptive {}, contribution {}",
            planner.max_rows(),
            planner.max_columns(),
            tracking.num_heads(),
            zones.adaptive.enabled,
            zones.contribution.as_str()
        );

        Self {
            screen,
            planner,
            blender,
            bank: SharedCameraBank::new(bank),
            zones: Vec::new(),
            eyes: Vec::new(),
            grid: ZoneGrid { rows: 1, columns: 1, changed: false },
            multiple_users,
            zone_coloring: zones.coloring,
            colored_last_frame: false,
        }
    }

    /// Per-frame update: plan the grid, rebuild zones on change, blend eyes,
    /// then write viewports, colors and matrices into the camera bank.
    pub fn compute_view_proj(&mut self, frame_duration: f64, tracking: &dyn TrackingSource) -> ZoneGrid {
        let multiple_users = self.multiple_users && tracking.num_heads() >= 2;
        let grid = self.planner.plan(frame_duration, multiple_users);

        if grid.changed {
            build_zones(&grid, &self.screen, &mut self.zones);
        }

        // Only multi-user frames are tinted.
        let tint = self.zone_coloring && multiple_users;
        let restore_clear = self.colored_last_frame && !tint;
        self.colored_last_frame = tint;

        self.blender.blend(&self.zones, tracking, multiple_users, &mut self.eyes);

        {
            let mut bank = self.bank.lock();
            if grid.changed {
                bank.set_viewports(&self.zones);
            }
            if restore_clear {
                let base = bank.base_clear_color();
                bank.set_clear_color(base);
            }
            if tint {
                for (i, blended) in self.eyes.iter().enumerate() {
                    let w = blended.weights;
                    bank.set_slot_clear_color(i, ColorRgba::from_contributions(w.w0, w.w1));
                }
            }
            bank.update_views(&self.screen, &self.zones, &self.eyes);
        }

        log::trace!("zones {}x{} dt {:.4}", grid.rows, grid.columns, frame_duration);
        self.grid = grid;
        grid
    }

    // ── read access ───────────────────────────────────────────────────────

    pub fn camera_bank(&self) -> SharedCameraBank {
        self.bank.clone()
    }

    pub fn screen(&self) -> &ScreenInfo {
        &self.screen
    }

    /// Grid rendered by the last update.
    pub fn active_grid(&self) -> ZoneGrid {
        self.grid
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn eyes(&self) -> &[BlendedEyes] {
        &self.eyes
    }

    /// Index of the camera slot owning `handle`, if it belongs to this screen.
    pub fn find_slot(&self, handle: CameraHandle) -> Option<usize> {
        self.bank.lock().find_slot(handle)
    }

    // ── grid ──────────────────────────────────────────────────────────────

    pub fn set_zone_columns(&mut self, columns: usize) -> bool {
        self.planner.set_columns(columns, self.multiple_users)
    }

    pub fn set_zone_rows(&mut self, rows: usize) -> bool {
        self.planner.set_rows(rows, self.multiple_users)
    }

    pub fn zone_columns(&self) -> usize {
        self.planner.requested_columns()
    }

    pub fn zone_rows(&self) -> usize {
        self.planner.requested_rows()
    }

    pub fn max_zone_columns(&self) -> usize {
        self.planner.max_columns()
    }

    pub fn max_zone_rows(&self) -> usize {
        self.planner.max_rows()
    }

    pub fn set_auto_adjust(&mut self, enabled: bool) {
        self.planner.set_adaptive_enabled(enabled);
    }

    pub fn auto_adjust(&self) -> bool {
        self.planner.adaptive().enabled
    }

    pub fn set_auto_adjust_target(&mut self, target: f32) -> bool {
        self.planner.set_adaptive_target(target)
    }

    pub fn auto_adjust_target(&self) -> f32 {
        self.planner.adaptive().target
    }

    pub fn set_auto_adjust_offset(&mut self, offset: f32) -> bool {
        self.planner.set_adaptive_offset(offset)
    }

    pub fn auto_adjust_offset(&self) -> f32 {
        self.planner.adaptive().offset
    }

    // ── users and blending ────────────────────────────────────────────────

    pub fn set_multiple_users(&mut self, multiple_users: bool) {
        self.multiple_users = multiple_users;
    }

    pub fn multiple_users(&self) -> bool {
        self.multiple_users
    }

    pub fn set_zone_coloring(&mut self, coloring: bool) {
        self.zone_coloring = coloring;
    }

    pub fn zone_coloring(&self) -> bool {
        self.zone_coloring
    }

    pub fn set_contribution_function(&mut self, function: ContributionFunction) {
        self.blender.function = function;
    }

    /// Index into [`ContributionFunction::ALL`]; out-of-range is rejected.
    pub fn set_contribution_function_index(&mut self, index: usize) -> bool {
        match ContributionFunction::from_index(index) {
            Some(f) => {
                self.blender.function = f;
                true
            }
            None => {
                log::debug!("rejected contribution function index {index}");
                false
            }
        }
    }

    pub fn contribution_function(&self) -> ContributionFunction {
        self.blender.function
    }

    /// Threshold angle in radians. Does not change auto mode; in auto mode
    /// the next multi-user update overwrites it.
    pub fn set_contribution_var(&mut self, var: f32) -> bool {
        if !(var > 0.0 && var.is_finite()) {
            log::debug!("rejected contribution var {var}");
            return false;
        }
        self.blender.threshold.value = var;
        true
    }

    pub fn contribution_var(&self) -> f32 {
        self.blender.threshold.value
    }

    pub fn set_auto_contribution_var(&mut self, auto: bool) {
        self.blender.threshold.auto = auto;
    }

    pub fn auto_contribution_var(&self) -> bool {
        self.blender.threshold.auto
    }

    pub fn set_orientation_3d(&mut self, orientation_3d: bool) {
        self.blender.orientation_3d = orientation_3d;
    }

    pub fn orientation_3d(&self) -> bool {
        self.blender.orientation_3d
    }

    /// Base clear color of every slot; zone coloring restores it when turned off.
    pub fn set_clear_color(&mut self, color: ColorRgba) {
        self.bank.lock().set_clear_color(color);
    }

    pub fn clear_color(&self) -> ColorRgba {
        self.bank.lock().base_clear_color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::PixelRect;
    use crate::screen::ChannelRect;
    use crate::tracking::StaticTracking;
    use crate::zones::camera::{HeadlessCameras, RenderMasks};
    use crate::zones::grid::AdaptiveControl;
    use glam::Vec3;

    const FAST: f64 = 1.0 / 30.0;
    const STEADY: f64 = 1.0 / 20.0;

    fn screen() -> ScreenInfo {
        ScreenInfo {
            width: 1600.0,
            height: 900.0,
            channel: ChannelRect::new(0.0, 0.0, 1920.0, 1080.0),
            ..ScreenInfo::default()
        }
    }

    fn one_user() -> StaticTracking {
        StaticTracking::new(vec![StaticTracking::looking(Vec3::new(0.0, -1500.0, 0.0), Vec3::Y)])
    }

    fn two_users() -> StaticTracking {
        StaticTracking::new(vec![
            StaticTracking::looking(Vec3::new(-400.0, -1500.0, 0.0), Vec3::new(-0.2, 1.0, 0.0)),
            StaticTracking::looking(Vec3::new(400.0, -1500.0, 0.0), Vec3::new(0.3, 1.0, 0.0)),
        ])
    }

    fn fixed(max_rows: usize, max_columns: usize) -> ZonesSettings {
        ZonesSettings {
            max_rows,
            max_columns,
            adaptive: AdaptiveControl { enabled: false, ..AdaptiveControl::default() },
            ..ZonesSettings::default()
        }
    }

    fn screen_zones(settings: &ZonesSettings, tracking: &StaticTracking) -> ScreenMvZones {
        ScreenMvZones::init(
            screen(),
            settings,
            &StereoSettings::default(),
            tracking,
            &mut HeadlessCameras::new(),
        )
    }

    #[test]
    fn single_user_renders_one_zone() {
        let t = one_user();
        let mut s = screen_zones(&fixed(4, 16), &t);
        assert!(!s.multiple_users());
        assert!(!s.set_zone_columns(4));

        let grid = s.compute_view_proj(STEADY, &t);
        assert_eq!((grid.rows, grid.columns), (1, 1));
        assert!(grid.changed);

        let bank = s.camera_bank();
        let bank = bank.lock();
        assert_eq!(bank.capacity(), 64);
        assert_eq!(bank.active_slots().count(), 1);
        assert_eq!(bank.slots()[0].viewport(), PixelRect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn multi_user_starts_at_full_grid_when_fixed() {
        let t = two_users();
        let mut s = screen_zones(&fixed(2, 3), &t);
        assert_eq!((s.zone_rows(), s.zone_columns()), (2, 3));

        let grid = s.compute_view_proj(STEADY, &t);
        assert_eq!(grid.zone_count(), 6);
        assert_eq!(s.zones().len(), 6);
        assert_eq!(s.eyes().len(), 6);
        assert_eq!(s.camera_bank().lock().active_slots().count(), 6);

        let again = s.compute_view_proj(STEADY, &t);
        assert!(!again.changed);
    }

    #[test]
    fn fewer_than_two_heads_forces_one_zone_even_with_override() {
        let t = one_user();
        let mut s = screen_zones(&fixed(2, 3), &t);
        s.set_multiple_users(true);
        assert!(s.set_zone_columns(3));
        let grid = s.compute_view_proj(STEADY, &t);
        assert_eq!(grid.zone_count(), 1);
    }

    #[test]
    fn adaptive_grows_one_step_on_fast_frames() {
        let t = two_users();
        let mut s = screen_zones(&ZonesSettings { max_rows: 4, max_columns: 16, ..ZonesSettings::default() }, &t);
        let first = s.compute_view_proj(STEADY, &t);
        assert_eq!(first.zone_count(), 1);

        let next = s.compute_view_proj(FAST, &t);
        assert_eq!((next.rows, next.columns), (1, 2));
        assert!(next.changed);
        assert_eq!(s.camera_bank().lock().active_count(), 2);
    }

    #[test]
    fn shrinking_disables_trailing_slots() {
        let t = two_users();
        let mut s = screen_zones(&fixed(2, 4), &t);
        s.compute_view_proj(STEADY, &t);
        assert!(s.set_zone_columns(2));
        assert!(s.set_zone_rows(1));
        s.compute_view_proj(STEADY, &t);

        let bank = s.camera_bank();
        let bank = bank.lock();
        assert_eq!(bank.active_count(), 2);
        for slot in &bank.slots()[2..] {
            assert_eq!(slot.viewport(), PixelRect::zero());
            assert_eq!(slot.masks(), RenderMasks::DISABLED);
        }
    }

    #[test]
    fn coloring_tints_then_restores_on_next_update() {
        let t = two_users();
        let mut s = screen_zones(&fixed(1, 2), &t);
        let base = ColorRgba::new(0.1, 0.2, 0.3, 1.0);
        s.set_clear_color(base);

        s.set_zone_coloring(true);
        s.compute_view_proj(STEADY, &t);
        {
            let bank = s.camera_bank();
            let bank = bank.lock();
            for (slot, blended) in bank.slots().iter().zip(s.eyes()) {
                let w = blended.weights;
                assert_eq!(slot.clear_color(), ColorRgba::from_contributions(w.w0, w.w1));
            }
        }

        s.set_zone_coloring(false);
        s.compute_view_proj(STEADY, &t);
        let bank = s.camera_bank();
        assert!(bank.lock().slots().iter().all(|slot| slot.clear_color() == base));
    }

    #[test]
    fn coloring_in_single_user_mode_keeps_base_color() {
        let t = one_user();
        let mut s = screen_zones(&fixed(1, 1), &t);
        let base = s.clear_color();
        s.set_zone_coloring(true);
        s.compute_view_proj(STEADY, &t);
        assert_eq!(s.camera_bank().lock().slots()[0].clear_color(), base);
    }

    #[test]
    fn leaving_multi_user_mode_restores_tinted_slots() {
        let t = two_users();
        let mut s = screen_zones(&fixed(1, 2), &t);
        let base = ColorRgba::new(0.1, 0.2, 0.3, 1.0);
        s.set_clear_color(base);
        s.set_zone_coloring(true);
        s.compute_view_proj(STEADY, &t);
        assert_ne!(s.camera_bank().lock().slots()[0].clear_color(), base);

        s.set_multiple_users(false);
        s.compute_view_proj(STEADY, &t);
        assert_eq!(s.camera_bank().lock().slots()[0].clear_color(), base);
    }

    #[test]
    fn setters_validate_range() {
        let t = two_users();
        let mut s = screen_zones(&fixed(2, 4), &t);

        assert!(!s.set_zone_columns(0));
        assert!(!s.set_zone_columns(5));
        assert!(s.set_zone_columns(4));
        assert!(!s.set_zone_rows(3));

        assert!(!s.set_auto_adjust_target(0.0));
        assert!(s.set_auto_adjust_target(60.0));
        assert!(!s.set_auto_adjust_offset(-1.0));
        assert!(s.set_auto_adjust_offset(0.0));
        assert_eq!((s.auto_adjust_target(), s.auto_adjust_offset()), (60.0, 0.0));

        assert!(!s.set_contribution_function_index(3));
        assert!(s.set_contribution_function_index(0));
        assert_eq!(s.contribution_function(), ContributionFunction::Linear);

        assert!(!s.set_contribution_var(-0.5));
        assert!(!s.set_contribution_var(f32::NAN));
        assert!(s.set_contribution_var(1.0));
        assert!(s.auto_contribution_var());
    }

    #[test]
    fn manual_threshold_survives_updates() {
        let t = two_users();
        let mut s = screen_zones(&fixed(1, 2), &t);
        s.set_auto_contribution_var(false);
        s.set_contribution_var(0.8);
        s.compute_view_proj(STEADY, &t);
        assert_eq!(s.contribution_var(), 0.8);

        s.set_auto_contribution_var(true);
        s.compute_view_proj(STEADY, &t);
        assert!(s.contribution_var() >= std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn configured_threshold_starts_manual() {
        let t = two_users();
        let settings = ZonesSettings { contribution_var: Some(1.1), ..fixed(1, 2) };
        let s = screen_zones(&settings, &t);
        assert!(!s.auto_contribution_var());
        assert_eq!(s.contribution_var(), 1.1);
    }

    #[test]
    fn find_slot_matches_own_cameras_only() {
        let t = two_users();
        let s = screen_zones(&fixed(1, 2), &t);
        assert_eq!(s.find_slot(CameraHandle(1)), Some(1));
        assert_eq!(s.find_slot(CameraHandle(7)), None);
    }

    #[test]
    fn weights_always_sum_to_one() {
        let t = two_users();
        let mut s = screen_zones(&fixed(4, 16), &t);
        for f in ContributionFunction::ALL {
            s.set_contribution_function(f);
            s.compute_view_proj(STEADY, &t);
            for b in s.eyes() {
                assert!((b.weights.w0 + b.weights.w1 - 1.0).abs() < 1e-5);
                assert!(b.weights.w0.min(b.weights.w1) > 0.0);
            }
        }
    }
}
