//! Build script for ledchain-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates display.toml at compile time
//! - Generates the configuration constants compiled into the firmware

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use ledchain_core::config::{
    validate_module_count, ChainConfig, DisplayConfig, LinkConfig, DEFAULT_BOOT_DELAY_MS,
    DEFAULT_INTENSITY, DEFAULT_SPI_FREQUENCY_HZ,
};
use ledchain_hal::{serial::DEFAULT_POLL_INTERVAL_US, PollInterval, SpiConfig};
use serde::Deserialize;

/// Layout of display.toml
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DisplayToml {
    chain: ChainSection,
    #[serde(default)]
    bus: BusSection,
    #[serde(default)]
    link: LinkSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChainSection {
    modules: usize,
    #[serde(default = "default_intensity")]
    intensity: u8,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BusSection {
    #[serde(default = "default_frequency")]
    frequency_hz: u32,
}

impl Default for BusSection {
    fn default() -> Self {
        Self {
            frequency_hz: default_frequency(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LinkSection {
    #[serde(default = "default_poll_interval")]
    poll_interval_us: u32,
    #[serde(default = "default_boot_delay")]
    boot_delay_ms: u32,
}

impl Default for LinkSection {
    fn default() -> Self {
        Self {
            poll_interval_us: default_poll_interval(),
            boot_delay_ms: default_boot_delay(),
        }
    }
}

fn default_intensity() -> u8 {
    DEFAULT_INTENSITY
}

fn default_frequency() -> u32 {
    DEFAULT_SPI_FREQUENCY_HZ
}

fn default_poll_interval() -> u32 {
    DEFAULT_POLL_INTERVAL_US
}

fn default_boot_delay() -> u32 {
    DEFAULT_BOOT_DELAY_MS
}

fn main() {
    setup_linker();
    let config = load_config();
    generate_constants(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read, parse and validate display.toml
fn load_config() -> DisplayToml {
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: display.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a display.toml configuration file.        ║\n\
            ║  Please create one in the ledchain-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read display.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: DisplayToml = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid display.toml                                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    validate_config(&config);

    println!("cargo:warning=display.toml validated successfully");
    config
}

/// Check display.toml against the limits the firmware enforces at boot
fn validate_config(config: &DisplayToml) {
    let mut errors = Vec::new();

    if let Err(e) = validate_module_count(config.chain.modules) {
        errors.push(format!("[chain] modules: {:?}", e));
    }
    if let Err(e) = to_display_config(config).validate() {
        errors.push(format!("{:?}", e));
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid display configuration                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

fn to_display_config(config: &DisplayToml) -> DisplayConfig {
    DisplayConfig {
        bus: SpiConfig::mode0(config.bus.frequency_hz),
        link: LinkConfig {
            poll_interval: PollInterval::from_micros(config.link.poll_interval_us),
            boot_delay_ms: config.link.boot_delay_ms,
        },
        chain: ChainConfig {
            intensity: config.chain.intensity,
        },
    }
}

/// Write the constants included by src/config.rs
fn generate_constants(config: &DisplayToml) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("display_config.rs")).unwrap();

    writeln!(f, "// Generated from display.toml by build.rs").unwrap();
    writeln!(f, "pub const CHAIN_MODULES: usize = {};", config.chain.modules).unwrap();
    writeln!(f, "pub const CHAIN_INTENSITY: u8 = {};", config.chain.intensity).unwrap();
    writeln!(f, "pub const BUS_FREQUENCY_HZ: u32 = {};", config.bus.frequency_hz).unwrap();
    writeln!(
        f,
        "pub const POLL_INTERVAL_US: u32 = {};",
        config.link.poll_interval_us
    )
    .unwrap();
    writeln!(f, "pub const BOOT_DELAY_MS: u32 = {};", config.link.boot_delay_ms).unwrap();
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
