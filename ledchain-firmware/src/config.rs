//! Compiled-in display configuration
//!
//! The constants are generated by build.rs from display.toml, which has
//! already been validated; [`display_config`] is checked again at boot.

use ledchain_core::config::{ChainConfig, DisplayConfig, LinkConfig};
use ledchain_hal::{PollInterval, SpiConfig};

include!(concat!(env!("OUT_DIR"), "/display_config.rs"));

/// Assemble the runtime configuration from the generated constants
pub fn display_config() -> DisplayConfig {
    DisplayConfig {
        bus: SpiConfig::mode0(BUS_FREQUENCY_HZ),
        link: LinkConfig {
            poll_interval: PollInterval::from_micros(POLL_INTERVAL_US),
            boot_delay_ms: BOOT_DELAY_MS,
        },
        chain: ChainConfig {
            intensity: CHAIN_INTENSITY,
        },
    }
}
