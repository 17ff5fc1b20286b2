//! Host byte stream abstractions
//!
//! The host pushes raw bytes with no framing and no flow control. A
//! [`ByteSource`] is polled one byte at a time with a bounded wait so the
//! caller never stalls indefinitely inside a single read.

/// Default bound on a single byte poll (1 ms)
pub const DEFAULT_POLL_INTERVAL_US: u32 = 1_000;

/// Upper bound on how long one poll may wait for a byte
///
/// A zero interval means "check once without waiting".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollInterval {
    micros: u32,
}

impl PollInterval {
    /// Create an interval from microseconds
    pub const fn from_micros(micros: u32) -> Self {
        Self { micros }
    }

    /// Create an interval from milliseconds (saturating)
    pub const fn from_millis(millis: u32) -> Self {
        Self {
            micros: millis.saturating_mul(1_000),
        }
    }

    /// Interval length in microseconds
    pub const fn as_micros(self) -> u32 {
        self.micros
    }

    /// True if the poll should not wait at all
    pub const fn is_immediate(self) -> bool {
        self.micros == 0
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self::from_micros(DEFAULT_POLL_INTERVAL_US)
    }
}

/// Result of a single byte poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadOutcome {
    /// One byte was received
    Byte(u8),
    /// Nothing arrived within the poll interval
    NoData,
}

impl ReadOutcome {
    /// The received byte, if any
    pub fn byte(self) -> Option<u8> {
        match self {
            ReadOutcome::Byte(b) => Some(b),
            ReadOutcome::NoData => None,
        }
    }
}

/// Host-facing byte stream
///
/// Reads never fail: a timeout, an idle line and a detached host are all
/// reported as [`ReadOutcome::NoData`]. Implementations must never drop or
/// invent a byte.
#[allow(async_fn_in_trait)]
pub trait ByteSource {
    /// Wait at most `wait` for the next byte from the host
    async fn read_byte(&mut self, wait: PollInterval) -> ReadOutcome;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    async fn read_byte(&mut self, wait: PollInterval) -> ReadOutcome {
        (**self).read_byte(wait).await
    }
}

/// Queue turning packet reads into byte reads
///
/// USB and DMA-backed links deliver data in packets; a [`ByteSource`] hands
/// it out one byte at a time. The buffer is only refilled once every byte
/// of the previous packet has been taken, so nothing is dropped.
#[derive(Debug, Clone)]
pub struct PacketBuffer<const N: usize> {
    data: [u8; N],
    head: usize,
    len: usize,
}

impl<const N: usize> Default for PacketBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PacketBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            data: [0; N],
            head: 0,
            len: 0,
        }
    }

    /// Take the next buffered byte
    pub fn pop(&mut self) -> Option<u8> {
        if self.head >= self.len {
            return None;
        }
        let byte = self.data.get(self.head).copied();
        self.head += 1;
        byte
    }

    /// Bytes still waiting to be taken
    pub fn pending(&self) -> usize {
        self.len - self.head
    }

    /// True if every buffered byte has been taken
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Storage for the next packet read, or `None` while bytes are pending
    pub fn storage_mut(&mut self) -> Option<&mut [u8; N]> {
        if !self.is_empty() {
            return None;
        }
        self.head = 0;
        self.len = 0;
        Some(&mut self.data)
    }

    /// Mark the first `received` bytes of the storage as valid
    pub fn commit(&mut self, received: usize) {
        self.head = 0;
        self.len = received.min(N);
    }
}
