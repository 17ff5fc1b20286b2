//! RP2040-specific HAL for the LED matrix chain firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `ledchain-hal` types:
//!
//! - USB CDC byte source for the host link (implements `ledchain_hal::ByteSource`)
//! - SPI configuration mapping onto `embassy-rp`

#![no_std]

pub mod spi;
pub mod usb_serial;

pub use usb_serial::{device_config, UsbSerialSource, USB_PACKET_SIZE};
