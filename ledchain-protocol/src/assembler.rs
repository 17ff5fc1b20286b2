//! Positional frame assembly from the host byte stream.
//!
//! The assembler owns the single frame buffer. Bytes are written at the
//! current fill index; once `M × 8` bytes have been stored the frame is
//! complete, the index drops back to zero and the buffer is lent out
//! read-only until the next byte arrives.

use ledchain_hal::{ByteSource, PollInterval, ReadOutcome};

use crate::frame::Frame;

/// Result of feeding the assembler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    /// The source had no byte this poll; nothing changed
    Waiting,
    /// A byte was stored; `filled` bytes of the frame are now valid
    Filling { filled: usize },
    /// The last byte of a frame was stored
    Complete,
}

/// Fills one frame buffer byte by byte
#[derive(Debug, Clone)]
pub struct FrameAssembler<const M: usize> {
    frame: Frame<M>,
    filled: usize,
}

impl<const M: usize> Default for FrameAssembler<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const M: usize> FrameAssembler<M> {
    const NON_EMPTY_CHAIN: () = assert!(M > 0, "a module chain needs at least one module");

    /// Create an assembler with a zeroed frame
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY_CHAIN;
        Self {
            frame: Frame::new(),
            filled: 0,
        }
    }

    /// Bytes needed for one frame
    pub const fn capacity(&self) -> usize {
        Frame::<M>::LEN
    }

    /// Bytes stored for the frame in progress
    pub const fn filled(&self) -> usize {
        self.filled
    }

    /// The frame buffer
    ///
    /// Right after [`Progress::Complete`] this is the finished frame. While a
    /// frame is being filled, the leading `filled()` bytes are new and the
    /// rest still hold the previous frame.
    pub fn frame(&self) -> &Frame<M> {
        &self.frame
    }

    /// Store one byte at the current fill index
    pub fn push(&mut self, byte: u8) -> Progress {
        // filled < capacity is kept by the wrap below
        if let Some(slot) = self.frame.slot_mut(self.filled) {
            *slot = byte;
        }

        self.filled += 1;
        if self.filled == Frame::<M>::LEN {
            self.filled = 0;
            Progress::Complete
        } else {
            Progress::Filling {
                filled: self.filled,
            }
        }
    }

    /// Poll the source once and store the byte, if any
    pub async fn poll<S: ByteSource>(&mut self, source: &mut S, wait: PollInterval) -> Progress {
        match source.read_byte(wait).await {
            ReadOutcome::Byte(byte) => self.push(byte),
            ReadOutcome::NoData => Progress::Waiting,
        }
    }

    /// Poll until a full frame has been received
    ///
    /// Polls without data are retried forever; this is the only place the
    /// display loop blocks.
    pub async fn accumulate<S: ByteSource>(
        &mut self,
        source: &mut S,
        wait: PollInterval,
    ) -> &Frame<M> {
        loop {
            if self.poll(source, wait).await == Progress::Complete {
                return &self.frame;
            }
        }
    }
}
