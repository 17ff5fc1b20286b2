//! ledchain - LED Dot-Matrix Chain Firmware
//!
//! Main firmware binary for RP2040-based display controllers. The host
//! streams raw frames over USB CDC; each complete frame is painted onto a
//! daisy chain of MAX7219-driven 8x8 modules.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::USB;
use embassy_rp::spi::Spi;
use embassy_rp::usb::{Driver, InterruptHandler as UsbInterruptHandler};
use embassy_time::Timer;
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::Builder;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use ledchain_core::traits::MatrixDisplay;
use ledchain_core::FramePump;
use ledchain_drivers::display::Max7219Chain;
use ledchain_hal_rp2040::spi::{pins, to_embassy_config};
use ledchain_hal_rp2040::{device_config, UsbSerialSource, USB_PACKET_SIZE};
use ledchain_protocol::PositionalFramer;

use crate::config::CHAIN_MODULES;

mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => UsbInterruptHandler<USB>;
});

// USB descriptor and control buffers (must live forever)
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static CDC_STATE: StaticCell<State<'static>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ledchain firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let display_config = config::display_config();
    if let Err(e) = display_config.validate() {
        defmt::panic!("Invalid display configuration: {}", e);
    }
    info!(
        "Configuration: {} modules, intensity {}, SPI {} Hz",
        CHAIN_MODULES, display_config.chain.intensity, display_config.bus.frequency
    );

    // Setup USB CDC for the host link
    let driver = Driver::new(p.USB, Irqs);
    let mut builder = Builder::new(
        driver,
        device_config(),
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        &mut [],
        CONTROL_BUF.init([0; 64]),
    );
    let class = CdcAcmClass::new(
        &mut builder,
        CDC_STATE.init(State::new()),
        USB_PACKET_SIZE as u16,
    );
    let usb = builder.build();
    unwrap!(spawner.spawn(tasks::usb_task(usb)));
    info!("USB CDC initialized");

    // Give the host time to enumerate and open the port
    Timer::after_millis(u64::from(display_config.link.boot_delay_ms)).await;

    // Setup SPI0 for the display chain (transmit only)
    let spi = Spi::new_blocking_txonly(
        p.SPI0,
        p.PIN_18,
        p.PIN_19,
        to_embassy_config(&display_config.bus),
    );
    let cs = Output::new(p.PIN_17, Level::High);
    info!(
        "SPI0 initialized (SCK=GPIO{}, MOSI=GPIO{}, CS=GPIO{})",
        pins::SCK,
        pins::MOSI,
        pins::CS
    );

    let mut chain = match Max7219Chain::<_, _, CHAIN_MODULES>::new(spi, cs) {
        Ok(chain) => chain,
        Err(e) => defmt::panic!("Chain select setup failed: {}", e),
    };
    if let Err(e) = chain.initialize(&display_config.chain) {
        defmt::panic!("Chain init failed: {}", e);
    }
    if let Err(e) = chain.blank() {
        warn!("Chain blank failed: {}", e);
    }
    info!("MAX7219 chain initialized");

    let source = UsbSerialSource::new(class);
    let framer = PositionalFramer::new(source, display_config.link.poll_interval);
    unwrap!(spawner.spawn(tasks::display_task(FramePump::new(framer, chain))));

    info!("All tasks spawned, display running");
}
