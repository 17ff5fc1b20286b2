//! Board-agnostic core logic for the LED matrix chain firmware
//!
//! This crate contains the application logic that does not depend on
//! specific hardware implementations:
//!
//! - Configuration types and validation
//! - The matrix display trait implemented by chip drivers
//! - The display loop pairing a frame source with a display

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod pump;
pub mod traits;

pub use pump::{FramePump, PumpStats};
