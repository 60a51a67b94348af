#![forbid(unsafe_code)]

//! Machine bundles for emuterm.
//!
//! A bundle is a directory holding boot images plus a small description
//! (`machine.toml` or `machine.json`) naming them. [`MachineLoader`] turns
//! that description into the configuration file the emulator is started
//! with, and removes the file again when dropped.

pub mod description;
pub mod error;
pub mod loader;

pub use description::MachineDescription;
pub use error::MachineError;
pub use loader::MachineLoader;
