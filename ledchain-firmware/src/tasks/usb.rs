//! USB device task
//!
//! Runs the embassy-usb device stack: enumeration, control requests and
//! reconnects. The CDC class endpoints are serviced by the display task.

use defmt::*;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::UsbDevice;

/// RP2040 USB driver
pub type UsbDriver = Driver<'static, USB>;

/// USB task - drives the device stack forever
#[embassy_executor::task]
pub async fn usb_task(mut usb: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB task started");
    usb.run().await
}
