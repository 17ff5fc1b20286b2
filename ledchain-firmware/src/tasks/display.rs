//! Display task
//!
//! Receives frames from the host and paints them onto the chain, forever.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};

use ledchain_core::FramePump;
use ledchain_drivers::display::Max7219Chain;
use ledchain_hal_rp2040::UsbSerialSource;
use ledchain_protocol::PositionalFramer;

use crate::config::CHAIN_MODULES;
use crate::tasks::UsbDriver;

/// Frame counter interval between statistics log lines
const STATS_LOG_INTERVAL: u32 = 100;

/// MAX7219 chain on SPI0 with a GPIO chain select
pub type Chain = Max7219Chain<Spi<'static, SPI0, Blocking>, Output<'static>, CHAIN_MODULES>;

/// Host frames over USB CDC
pub type HostFrames = PositionalFramer<UsbSerialSource<'static, UsbDriver>, CHAIN_MODULES>;

/// The display loop as run by [`display_task`]
pub type DisplayPump = FramePump<HostFrames, Chain, CHAIN_MODULES>;

/// Display task - renders every received frame once, in order
///
/// Render errors are logged and the loop moves on to the next frame.
#[embassy_executor::task]
pub async fn display_task(mut pump: DisplayPump) -> ! {
    info!("Display task started ({} modules)", CHAIN_MODULES);

    loop {
        match pump.pump().await {
            Ok(()) => {
                let stats = pump.stats();
                trace!("Frame {} rendered", stats.frames_received);

                if stats.frames_rendered % STATS_LOG_INTERVAL == 0 {
                    debug!("Display stats: {}", stats);
                }
            }
            Err(e) => {
                warn!("Frame render failed: {}", e);
            }
        }
    }
}
