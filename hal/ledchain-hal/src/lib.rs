//! ledchain Hardware Abstraction Layer
//!
//! This crate defines the hardware-facing traits shared by the frame
//! transport and the chip-specific HALs (RP2040 today). Application code
//! written against these traits can be exercised on the host with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (ledchain-firmware)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ledchain-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │ ledchain-hal-   │
//!            │    rp2040       │
//!            └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`serial::ByteSource`] - Host-facing byte stream with bounded polling
//! - [`serial::PacketBuffer`] - Packet-to-byte queue for packet-based links
//! - [`spi::SpiConfig`] - Display bus configuration
//!
//! SPI transfers and the chain-select pin use the `embedded-hal` 1.0
//! traits directly.

#![no_std]
#![deny(unsafe_code)]

pub mod serial;
pub mod spi;

// Re-export key types at crate root for convenience
pub use serial::{ByteSource, PacketBuffer, PollInterval, ReadOutcome};
pub use spi::{Mode, Phase, Polarity, SpiConfig};
