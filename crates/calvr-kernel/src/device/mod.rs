//! GPU device and window surface.
//!
//! One [`Gpu`] per window. It owns the wgpu device/queue and the configured
//! surface, hands out one [`GpuFrame`] per redraw, and maps surface failures to
//! a [`SurfaceErrorAction`] the runtime can act on.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
