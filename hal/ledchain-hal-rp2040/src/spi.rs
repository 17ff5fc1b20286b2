//! SPI configuration for RP2040
//!
//! Maps the portable [`SpiConfig`] onto `embassy-rp`'s SPI configuration.
//! The peripheral rounds the requested frequency down to the nearest
//! achievable divider of `clk_peri`.

use embassy_rp::spi;
use ledchain_hal::spi::{Phase, Polarity, SpiConfig};

/// SPI0 pins used for the display chain
///
/// Chip select is driven as a plain GPIO so it can frame a whole chain
/// transaction rather than a single word.
pub mod pins {
    /// SPI0 SCK
    pub const SCK: u8 = 18;
    /// SPI0 TX
    pub const MOSI: u8 = 19;
    /// Chain load/chip select (GPIO output)
    pub const CS: u8 = 17;
}

/// Convert a portable SPI configuration into the `embassy-rp` one
pub fn to_embassy_config(config: &SpiConfig) -> spi::Config {
    let mut out = spi::Config::default();
    out.frequency = config.frequency;
    out.polarity = match config.polarity {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    out.phase = match config.phase {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    out
}
