//! Host-to-matrix frame transport
//!
//! This crate defines how the raw byte stream coming from the USB host is
//! turned into complete frames for a chain of `M` 8x8 LED modules.
//!
//! # Frame Layout
//!
//! A frame is exactly `M × 8` bytes with no header, delimiter or checksum:
//! ```text
//! ┌──────────────┬──────────────┬─────┬──────────────┐
//! │ MODULE 0     │ MODULE 1     │ ... │ MODULE M-1   │
//! │ row0..row7   │ row0..row7   │     │ row0..row7   │
//! │ 8B           │ 8B           │     │ 8B           │
//! └──────────────┴──────────────┴─────┴──────────────┘
//! ```
//!
//! Each byte is one row of 8 pixels, bit 7 being the leftmost column.
//! Framing is positional: the N-th byte of the stream lands at offset
//! `N mod (M × 8)`. A dropped or duplicated byte on the host side shifts
//! every following frame until the host restarts on a frame boundary.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod assembler;
pub mod frame;
pub mod framing;

pub use assembler::{FrameAssembler, Progress};
pub use frame::{Frame, FrameError, COLUMNS_PER_MODULE, ROWS_PER_MODULE};
pub use framing::{FrameSource, PositionalFramer};
