//! Time subsystem.
//!
//! One `FrameClock` per render loop; `tick()` once per presented frame. The
//! resulting `FrameTime::dt` is the "last frame duration" the adaptive zone
//! planner consumes.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
