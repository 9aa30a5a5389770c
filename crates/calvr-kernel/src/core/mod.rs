//! Contract between the window runtime and applications.
//!
//! The runtime calls [`App::on_window_event`] for every window event and
//! [`App::on_frame`] once per redraw with a [`FrameCtx`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
