//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in ledchain-core:
//!
//! - LED matrix chains (MAX7219 daisy chain over SPI)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod display;
