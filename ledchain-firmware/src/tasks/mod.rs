//! Embassy async tasks
//!
//! The USB device stack and the display loop run as independent tasks;
//! the CDC class links them.

pub mod display;
pub mod usb;

pub use display::{display_task, DisplayPump};
pub use usb::{usb_task, UsbDriver};
