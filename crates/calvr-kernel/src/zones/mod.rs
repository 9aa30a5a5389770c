//! Multi-user, multi-zone stereo screens.
//!
//! One physical screen is split into a grid of zones. Each zone gets its own
//! stereo camera whose eye positions blend the tracked users by how directly
//! each one looks at the zone. The grid adapts to frame rate.
//!
//! Per frame, in order:
//! 1. [`ZoneGridPlanner`] picks the grid shape
//! 2. [`build_zones`] places zone centers and viewports (only when the shape changed)
//! 3. [`EyeBlender`] picks per-zone eyes from [`ContributionFunction`] weights
//! 4. [`CameraBank`] writes frusta, views, viewports and masks into its slots
//!
//! [`ScreenMvZones`] drives the sequence and owns all of the above.

mod blend;
mod camera;
mod contribution;
mod controller;
mod geometry;
mod grid;
mod settings;

pub use blend::{BlendedEyes, EyeBlender, EyePair};
pub use camera::{
    screen_view, CameraBackend, CameraBank, CameraHandle, CameraSlot, EyeView, Frustum,
    HeadlessCameras, RenderMasks, SharedCameraBank, StereoMode, StereoUniform, CULL_MASK,
    CULL_MASK_LEFT, CULL_MASK_RIGHT,
};
pub use contribution::{
    angle_between, auto_threshold, gaussian_right_tail, ContributionFunction,
    ContributionThreshold, ContributionWeights, CONTRIBUTION_FLOOR,
};
pub use controller::ScreenMvZones;
pub use geometry::{build_zones, zone_bounds, zone_viewport, Zone, ZoneBounds};
pub use grid::{AdaptiveControl, ZoneGrid, ZoneGridPlanner};
pub use settings::{StereoSettings, ZonesSettings};
