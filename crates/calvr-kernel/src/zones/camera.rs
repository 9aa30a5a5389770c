use std::sync::{Arc, Mutex, MutexGuard};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use crate::coords::{ColorRgba, PixelRect};
use crate::screen::ScreenInfo;

use super::blend::{BlendedEyes, EyePair};
use super::geometry::{Zone, ZoneBounds};
use super::settings::StereoSettings;

// ── stereo mode ───────────────────────────────────────────────────────────

/// Which eyes a screen renders.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum StereoMode {
    /// Both eyes, interleaved by the display.
    #[default]
    Interlaced,
    LeftEye,
    RightEye,
}

impl StereoMode {
    #[inline]
    pub fn renders_left(self) -> bool {
        self != Self::RightEye
    }

    #[inline]
    pub fn renders_right(self) -> bool {
        self != Self::LeftEye
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interlaced => "interlaced",
            Self::LeftEye => "left",
            Self::RightEye => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "interlaced" | "both" => Some(Self::Interlaced),
            "left" => Some(Self::LeftEye),
            "right" => Some(Self::RightEye),
            _ => None,
        }
    }
}

// ── backend ───────────────────────────────────────────────────────────────

/// Opaque id of a renderer-side camera.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CameraHandle(pub u32);

/// Creates the renderer-side camera behind each slot.
pub trait CameraBackend {
    /// Returns `None` when the renderer cannot provide a camera for `slot`.
    fn create_camera(&mut self, slot: usize) -> Option<CameraHandle>;
}

/// Backend that hands out sequential handles without touching a renderer.
#[derive(Debug, Clone, Default)]
pub struct HeadlessCameras {
    next: u32,
    /// Slots that get no camera.
    pub missing: Vec<usize>,
}

impl HeadlessCameras {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CameraBackend for HeadlessCameras {
    fn create_camera(&mut self, slot: usize) -> Option<CameraHandle> {
        if self.missing.contains(&slot) {
            return None;
        }
        let handle = CameraHandle(self.next);
        self.next += 1;
        Some(handle)
    }
}

// ── per-eye state ─────────────────────────────────────────────────────────

/// Render traversal masks. All zero disables the camera.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RenderMasks {
    pub cull: u32,
    pub left: u32,
    pub right: u32,
}

pub const CULL_MASK: u32 = 0x1;
pub const CULL_MASK_LEFT: u32 = 0x2;
pub const CULL_MASK_RIGHT: u32 = 0x4;

impl RenderMasks {
    pub const ACTIVE: Self = Self { cull: CULL_MASK, left: CULL_MASK_LEFT, right: CULL_MASK_RIGHT };
    pub const DISABLED: Self = Self { cull: 0, left: 0, right: 0 };

    pub fn is_disabled(self) -> bool {
        self == Self::DISABLED
    }
}

/// Off-axis frustum at the near plane.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    /// Frustum from `eye` (screen-local) through the rectangle `bounds` on
    /// the screen plane. `None` when the eye is on or behind the screen.
    pub fn through(bounds: &ZoneBounds, eye: Vec3, near: f32, far: f32) -> Option<Self> {
        let screen_dist = -eye.y;
        if !(screen_dist > 0.0) || !eye.is_finite() {
            return None;
        }
        let scale = near / screen_dist;
        Some(Self {
            left: (bounds.left - eye.x) * scale,
            right: (bounds.right - eye.x) * scale,
            bottom: (bounds.bottom - eye.z) * scale,
            top: (bounds.top - eye.z) * scale,
            near,
            far,
        })
    }

    /// Right-handed projection with depth mapped to `[0, 1]`.
    pub fn projection(&self) -> Mat4 {
        let Self { left: l, right: r, bottom: b, top: t, near: n, far: f } = *self;
        Mat4::from_cols(
            Vec4::new(2.0 * n / (r - l), 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 * n / (t - b), 0.0, 0.0),
            Vec4::new((r + l) / (r - l), (t + b) / (t - b), f / (n - f), -1.0),
            Vec4::new(0.0, 0.0, n * f / (n - f), 0.0),
        )
    }
}

/// View and projection of one eye of one slot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EyeView {
    pub view: Mat4,
    pub projection: Mat4,
}

impl Default for EyeView {
    fn default() -> Self {
        Self { view: Mat4::IDENTITY, projection: Mat4::IDENTITY }
    }
}

impl EyeView {
    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// View matrix for an eye at `eye_local` (screen-local) looking along the
/// screen normal with screen-up as up.
pub fn screen_view(world_to_local: Mat4, eye_local: Vec3) -> Mat4 {
    Mat4::look_at_rh(Vec3::ZERO, Vec3::Y, Vec3::Z)
        * Mat4::from_translation(-eye_local)
        * world_to_local
}

// ── slot ──────────────────────────────────────────────────────────────────

/// GPU-side layout of one slot.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct StereoUniform {
    pub left_view_proj: [[f32; 4]; 4],
    pub right_view_proj: [[f32; 4]; 4],
    /// left, bottom, width, height in pixels.
    pub viewport: [f32; 4],
    pub clear_color: [f32; 4],
}

/// One pre-allocated camera of the bank.
#[derive(Debug, Clone)]
pub struct CameraSlot {
    index: usize,
    handle: Option<CameraHandle>,
    viewport: PixelRect,
    left: EyeView,
    right: EyeView,
    masks: RenderMasks,
    clear_color: ColorRgba,
}

impl CameraSlot {
    fn new(index: usize, handle: Option<CameraHandle>, clear_color: ColorRgba) -> Self {
        Self {
            index,
            handle,
            viewport: PixelRect::zero(),
            left: EyeView::default(),
            right: EyeView::default(),
            masks: RenderMasks::DISABLED,
            clear_color,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn handle(&self) -> Option<CameraHandle> {
        self.handle
    }

    pub fn viewport(&self) -> PixelRect {
        self.viewport
    }

    pub fn left(&self) -> &EyeView {
        &self.left
    }

    pub fn right(&self) -> &EyeView {
        &self.right
    }

    pub fn masks(&self) -> RenderMasks {
        self.masks
    }

    pub fn clear_color(&self) -> ColorRgba {
        self.clear_color
    }

    /// Enabled for rendering this frame.
    pub fn is_active(&self) -> bool {
        !self.masks.is_disabled()
    }

    pub fn uniform(&self) -> StereoUniform {
        let v = self.viewport;
        StereoUniform {
            left_view_proj: self.left.view_projection().to_cols_array_2d(),
            right_view_proj: self.right.view_projection().to_cols_array_2d(),
            viewport: [v.left as f32, v.bottom as f32, v.width as f32, v.height as f32],
            clear_color: self.clear_color.to_array(),
        }
    }

    fn disable(&mut self) {
        self.viewport = PixelRect::zero();
        self.masks = RenderMasks::DISABLED;
    }
}

// ── bank ──────────────────────────────────────────────────────────────────

/// Fixed pool of stereo cameras, one per possible zone.
///
/// Slots `0..active_count()` render the current grid; the rest stay
/// allocated but disabled.
#[derive(Debug, Clone)]
pub struct CameraBank {
    slots: Vec<CameraSlot>,
    active: usize,
    mode: StereoMode,
    near: f32,
    far: f32,
    clear_color: ColorRgba,
}

impl CameraBank {
    pub fn new(capacity: usize, stereo: &StereoSettings, backend: &mut dyn CameraBackend) -> Self {
        let slots: Vec<CameraSlot> = (0..capacity)
            .map(|i| {
                let handle = backend.create_camera(i);
                if handle.is_none() {
                    log::warn!("no renderer camera for zone slot {i}; slot will be skipped");
                }
                CameraSlot::new(i, handle, stereo.clear_color)
            })
            .collect();

        log::debug!("camera bank: {capacity} slots, stereo {}", stereo.mode.as_str());

        Self {
            slots,
            active: 0,
            mode: stereo.mode,
            near: stereo.near,
            far: stereo.far,
            clear_color: stereo.clear_color,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn stereo_mode(&self) -> StereoMode {
        self.mode
    }

    pub fn slots(&self) -> &[CameraSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&CameraSlot> {
        self.slots.get(index)
    }

    /// Slots rendering this frame, in zone order.
    pub fn active_slots(&self) -> impl Iterator<Item = &CameraSlot> {
        self.slots[..self.active].iter().filter(|s| s.is_active())
    }

    /// Index of the slot owning `handle`.
    pub fn find_slot(&self, handle: CameraHandle) -> Option<usize> {
        self.slots.iter().position(|s| s.handle == Some(handle))
    }

    /// The base clear color restored when zone coloring turns off.
    pub fn base_clear_color(&self) -> ColorRgba {
        self.clear_color
    }

    /// Sets the base clear color and applies it to every slot.
    pub fn set_clear_color(&mut self, color: ColorRgba) {
        self.clear_color = color;
        for slot in &mut self.slots {
            slot.clear_color = color;
        }
    }

    pub fn set_slot_clear_color(&mut self, index: usize, color: ColorRgba) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.clear_color = color;
        }
    }

    /// Assigns zone viewports to the leading slots and disables the rest.
    pub fn set_viewports(&mut self, zones: &[Zone]) {
        if zones.len() > self.slots.len() {
            log::error!(
                "{} zones exceed camera bank capacity {}; extra zones dropped",
                zones.len(),
                self.slots.len()
            );
        }
        self.active = zones.len().min(self.slots.len());

        for (slot, zone) in self.slots.iter_mut().zip(zones) {
            slot.viewport = zone.viewport;
        }
        for slot in &mut self.slots[self.active..] {
            slot.disable();
        }
    }

    /// Recomputes per-eye frusta and views for the active slots.
    ///
    /// `eyes` are in tracking space, one entry per zone. A slot without a
    /// renderer camera is skipped. A slot whose rendered eye sits on or
    /// behind the screen is disabled for the frame; its matrices are left as
    /// they were.
    pub fn update_views(&mut self, screen: &ScreenInfo, zones: &[Zone], eyes: &[BlendedEyes]) {
        let world_to_local = screen.world_to_local();
        let (mode, near, far) = (self.mode, self.near, self.far);

        for ((slot, zone), blended) in self.slots[..self.active].iter_mut().zip(zones).zip(eyes) {
            if slot.handle.is_none() {
                log::trace!("zone slot {} has no camera, skipped", slot.index);
                continue;
            }

            let local = EyePair::new(
                world_to_local.transform_point3(blended.eyes.left),
                world_to_local.transform_point3(blended.eyes.right),
            );

            let mut valid = true;
            if mode.renders_left() {
                valid &= update_eye(&mut slot.left, &zone.bounds, local.left, world_to_local, near, far, slot.index);
            }
            if mode.renders_right() {
                valid &= update_eye(&mut slot.right, &zone.bounds, local.right, world_to_local, near, far, slot.index);
            }
            slot.masks = if valid { RenderMasks::ACTIVE } else { RenderMasks::DISABLED };
        }
    }
}

fn update_eye(
    view: &mut EyeView,
    bounds: &ZoneBounds,
    eye_local: Vec3,
    world_to_local: Mat4,
    near: f32,
    far: f32,
    slot: usize,
) -> bool {
    match Frustum::through(bounds, eye_local, near, far) {
        Some(frustum) => {
            view.projection = frustum.projection();
            view.view = screen_view(world_to_local, eye_local);
            true
        }
        None => {
            log::debug!("eye {eye_local} not in front of screen for slot {slot}; slot skipped this frame");
            false
        }
    }
}

// ── shared access ─────────────────────────────────────────────────────────

/// Camera bank shared between the update path and render traversal.
///
/// The update path holds the lock only while writing slot state; readers
/// take the same lock before looking at slots.
#[derive(Debug, Clone)]
pub struct SharedCameraBank {
    inner: Arc<Mutex<CameraBank>>,
}

impl SharedCameraBank {
    pub fn new(bank: CameraBank) -> Self {
        Self { inner: Arc::new(Mutex::new(bank)) }
    }

    pub fn lock(&self) -> MutexGuard<'_, CameraBank> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // Slot state is rewritten every frame.
                log::warn!("camera bank lock was poisoned; recovering");
                let guard = poisoned.into_inner();
                self.inner.clear_poison();
                guard
            }
        }
    }

    /// Runs `f` over the active slots under the lock.
    pub fn with_active_slots<R>(&self, f: impl FnOnce(&mut dyn Iterator<Item = &CameraSlot>) -> R) -> R {
        let bank = self.lock();
        let mut slots = bank.active_slots();
        f(&mut slots)
    }
}
