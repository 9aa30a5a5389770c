//! Head tracking interface.
//!
//! The kernel polls tracked head poses once per frame through
//! [`TrackingSource`]; it never holds on to them across frames.

mod source;

pub use source::{default_left_eye, default_right_eye, head_forward, StaticTracking, TrackingSource};
