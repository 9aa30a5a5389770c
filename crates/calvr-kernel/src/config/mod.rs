//! Kernel configuration.
//!
//! Gathers every typed settings struct the kernel reads from one
//! `ConfigTree`. Each struct parses its own keys; this module only loads files
//! and assembles the parts.

mod kernel;

pub use kernel::KernelConfig;
