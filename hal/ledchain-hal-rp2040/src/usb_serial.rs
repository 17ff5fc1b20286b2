//! USB CDC ACM host link
//!
//! The host opens the board as a serial port and streams frame bytes into
//! it. USB delivers those bytes in packets of up to 64 bytes; this module
//! buffers one packet and hands it out byte by byte through
//! [`ByteSource`].

use embassy_time::{with_timeout, Duration};
use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::driver::{Driver, EndpointError};
use ledchain_hal::{ByteSource, PacketBuffer, PollInterval, ReadOutcome};

/// Full-speed bulk endpoint packet size
pub const USB_PACKET_SIZE: usize = 64;

/// Raspberry Pi vendor ID
const USB_VID: u16 = 0x2e8a;
/// Pico SDK CDC stdio product ID, so host tools find the board by its usual identity
const USB_PID: u16 = 0x000a;

/// USB device descriptor settings for the display controller
pub fn device_config() -> embassy_usb::Config<'static> {
    let mut config = embassy_usb::Config::new(USB_VID, USB_PID);
    config.manufacturer = Some("ledchain");
    config.product = Some("LED matrix chain");
    config.serial_number = Some("0001");
    config.max_power = 100;
    config.max_packet_size_0 = USB_PACKET_SIZE as u8;
    config
}

/// Host byte stream over a CDC ACM class
pub struct UsbSerialSource<'d, D: Driver<'d>> {
    class: CdcAcmClass<'d, D>,
    packet: PacketBuffer<USB_PACKET_SIZE>,
}

impl<'d, D: Driver<'d>> UsbSerialSource<'d, D> {
    /// Wrap a CDC ACM class created on the device builder
    pub fn new(class: CdcAcmClass<'d, D>) -> Self {
        Self {
            class,
            packet: PacketBuffer::new(),
        }
    }

    /// Bytes received but not yet read
    pub fn pending(&self) -> usize {
        self.packet.pending()
    }

    /// True if the host has the port open (DTR asserted)
    pub fn host_connected(&self) -> bool {
        self.class.dtr()
    }
}

impl<'d, D: Driver<'d>> ByteSource for UsbSerialSource<'d, D> {
    async fn read_byte(&mut self, wait: PollInterval) -> ReadOutcome {
        if let Some(byte) = self.packet.pop() {
            return ReadOutcome::Byte(byte);
        }

        let Some(storage) = self.packet.storage_mut() else {
            return ReadOutcome::NoData;
        };
        let timeout = Duration::from_micros(u64::from(wait.as_micros()));

        match with_timeout(timeout, self.class.read_packet(storage)).await {
            Ok(Ok(received)) => {
                self.packet.commit(received);
                self.packet.pop().map_or(ReadOutcome::NoData, ReadOutcome::Byte)
            }
            Ok(Err(EndpointError::Disabled)) => {
                // Host detached or not yet configured
                let _ = with_timeout(timeout, self.class.wait_connection()).await;
                ReadOutcome::NoData
            }
            Ok(Err(EndpointError::BufferOverflow)) | Err(_) => ReadOutcome::NoData,
        }
    }
}
