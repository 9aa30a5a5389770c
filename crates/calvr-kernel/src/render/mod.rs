//! Zone visualization on the window surface.
//!
//! Convention:
//! - camera slot viewports are channel pixels, bottom-left origin
//! - instance data is surface pixels, top-left origin, +Y down
//! - the vertex shader converts to NDC with a surface-size uniform

mod ctx;
mod zone;

pub use ctx::{RenderCtx, RenderTarget};
pub use zone::{slot_to_surface, ZoneRenderer};
