//! Physical screen description.
//!
//! A screen is a flat rectangle placed in the tracking space, rendered through
//! one pixel channel of a window. Screen-local space:
//! - +X to the right across the screen
//! - +Z up the screen
//! - the screen plane is y = 0, viewers stand at negative y looking along +Y

mod info;

pub use info::{ChannelRect, ScreenInfo};
