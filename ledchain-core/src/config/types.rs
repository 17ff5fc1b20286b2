//! Configuration type definitions
//!
//! These types describe the display chain, the bus driving it and the host
//! link feeding it. All values are fixed at build time.

use ledchain_hal::{Mode, PollInterval, SpiConfig};

/// Fastest serial clock the MAX7219 accepts
pub const MAX_SPI_FREQUENCY_HZ: u32 = 10_000_000;

/// Default serial clock
pub const DEFAULT_SPI_FREQUENCY_HZ: u32 = 10_000_000;

/// Highest intensity register value
pub const MAX_INTENSITY: u8 = 0x0F;

/// Default intensity (duty cycle 17/32)
pub const DEFAULT_INTENSITY: u8 = 0x08;

/// Delay before the first frame so the USB host can enumerate the device
pub const DEFAULT_BOOT_DELAY_MS: u32 = 500;

/// Longest accepted boot delay
pub const MAX_BOOT_DELAY_MS: u32 = 10_000;

/// Longest accepted wait per byte poll
pub const MAX_POLL_INTERVAL_US: u32 = 100_000;

/// Longest supported module chain
pub const MAX_MODULES: usize = 16;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Bus frequency is zero
    ZeroBusFrequency,
    /// Bus frequency exceeds what the chips accept
    BusTooFast { frequency: u32 },
    /// The chips only latch data in SPI mode 0
    UnsupportedSpiMode(Mode),
    /// Intensity above 0x0F
    IntensityOutOfRange(u8),
    /// Poll interval would make the display loop unresponsive
    PollIntervalTooLong { micros: u32 },
    /// Boot delay above the supported maximum
    BootDelayTooLong { millis: u32 },
    /// Chain has no modules
    NoModules,
    /// Chain longer than supported
    TooManyModules(usize),
}

/// Module chain settings applied by the broadcast init sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChainConfig {
    /// Intensity register value (0-15)
    pub intensity: u8,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            intensity: DEFAULT_INTENSITY,
        }
    }
}

impl ChainConfig {
    /// Check the intensity range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.intensity > MAX_INTENSITY {
            return Err(ConfigError::IntensityOutOfRange(self.intensity));
        }
        Ok(())
    }
}

/// Host link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Wait bound for a single byte poll
    pub poll_interval: PollInterval,
    /// Delay after power-up before the display loop starts
    pub boot_delay_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            poll_interval: PollInterval::default(),
            boot_delay_ms: DEFAULT_BOOT_DELAY_MS,
        }
    }
}

impl LinkConfig {
    /// Check poll interval and boot delay bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        let micros = self.poll_interval.as_micros();
        if micros > MAX_POLL_INTERVAL_US {
            return Err(ConfigError::PollIntervalTooLong { micros });
        }
        if self.boot_delay_ms > MAX_BOOT_DELAY_MS {
            return Err(ConfigError::BootDelayTooLong {
                millis: self.boot_delay_ms,
            });
        }
        Ok(())
    }
}

/// Complete display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Display bus
    pub bus: SpiConfig,
    /// Host link
    pub link: LinkConfig,
    /// Chip settings
    pub chain: ChainConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            bus: SpiConfig::mode0(DEFAULT_SPI_FREQUENCY_HZ),
            link: LinkConfig::default(),
            chain: ChainConfig::default(),
        }
    }
}

impl DisplayConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_bus(&self.bus)?;
        self.link.validate()?;
        self.chain.validate()
    }
}

/// Check that the bus can drive the chips
pub fn validate_bus(bus: &SpiConfig) -> Result<(), ConfigError> {
    if bus.frequency == 0 {
        return Err(ConfigError::ZeroBusFrequency);
    }
    if bus.frequency > MAX_SPI_FREQUENCY_HZ {
        return Err(ConfigError::BusTooFast {
            frequency: bus.frequency,
        });
    }
    let mode = bus.mode();
    if mode != Mode::Mode0 {
        return Err(ConfigError::UnsupportedSpiMode(mode));
    }
    Ok(())
}

/// Check a chain length
pub fn validate_module_count(modules: usize) -> Result<(), ConfigError> {
    match modules {
        0 => Err(ConfigError::NoModules),
        n if n > MAX_MODULES => Err(ConfigError::TooManyModules(n)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledchain_hal::{Phase, Polarity};

    #[test]
    fn test_default_config_is_valid() {
        let config = DisplayConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.chain.intensity, 0x08);
        assert_eq!(config.link.boot_delay_ms, 500);
        assert_eq!(config.link.poll_interval.as_micros(), 1_000);
        assert_eq!(config.bus.frequency, 10_000_000);
    }

    #[test]
    fn test_bus_frequency_limits() {
        let mut config = DisplayConfig::default();

        config.bus.frequency = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroBusFrequency));

        config.bus.frequency = 10_000_001;
        assert_eq!(
            config.validate(),
            Err(ConfigError::BusTooFast {
                frequency: 10_000_001
            })
        );

        config.bus.frequency = 1_000_000;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_bus_mode_must_be_mode0() {
        let mut config = DisplayConfig::default();
        config.bus.polarity = Polarity::IdleHigh;
        config.bus.phase = Phase::CaptureOnSecondTransition;
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnsupportedSpiMode(Mode::Mode3))
        );
    }

    #[test]
    fn test_intensity_range() {
        let mut config = DisplayConfig::default();
        config.chain.intensity = MAX_INTENSITY;
        assert_eq!(config.validate(), Ok(()));

        config.chain.intensity = 0x10;
        assert_eq!(
            config.validate(),
            Err(ConfigError::IntensityOutOfRange(0x10))
        );
    }

    #[test]
    fn test_link_limits() {
        let mut config = DisplayConfig::default();

        config.link.poll_interval = PollInterval::from_micros(MAX_POLL_INTERVAL_US + 1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::PollIntervalTooLong { micros: 100_001 })
        );

        config.link.poll_interval = PollInterval::from_micros(0);
        assert_eq!(config.validate(), Ok(()));

        config.link.boot_delay_ms = MAX_BOOT_DELAY_MS + 1;
        assert_eq!(
            config.validate(),
            Err(ConfigError::BootDelayTooLong { millis: 10_001 })
        );
    }

    #[test]
    fn test_module_count() {
        assert_eq!(validate_module_count(0), Err(ConfigError::NoModules));
        assert_eq!(validate_module_count(1), Ok(()));
        assert_eq!(validate_module_count(4), Ok(()));
        assert_eq!(validate_module_count(MAX_MODULES), Ok(()));
        assert_eq!(
            validate_module_count(MAX_MODULES + 1),
            Err(ConfigError::TooManyModules(17))
        );
    }
}
