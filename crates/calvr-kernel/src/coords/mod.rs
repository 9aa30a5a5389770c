//! Pixel and color types shared by the zone subsystem and the renderer.
//!
//! Pixel space follows the scene-graph convention used for camera viewports:
//! - integer pixels
//! - origin bottom-left
//! - +X right, +Y up
//!
//! The renderer converts to top-left surface coordinates at draw time.

mod color;
mod pixel_rect;

pub use color::ColorRgba;
pub use pixel_rect::PixelRect;
