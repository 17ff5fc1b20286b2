//! Configuration types
//!
//! Compile-time display configuration. The firmware fills these from the
//! constants generated out of `display.toml` and validates them at boot.

pub mod types;

pub use types::*;
