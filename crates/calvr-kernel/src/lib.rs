//! CalVR kernel crate.
//!
//! Screen description, head tracking interface, and the multi-user zone
//! stereo subsystem, plus the platform + GPU runtime used to display it.

pub mod config;
pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod screen;
pub mod time;
pub mod tracking;
pub mod window;
pub mod zones;
