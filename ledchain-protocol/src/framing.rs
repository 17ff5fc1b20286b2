//! Frame sources
//!
//! The display loop only asks for "the next frame". How frames are cut out of
//! the host stream lives behind [`FrameSource`], so a framing scheme with a
//! sync marker could replace [`PositionalFramer`] without touching rendering.

use ledchain_hal::{ByteSource, PollInterval};

use crate::assembler::FrameAssembler;
use crate::frame::Frame;

/// Producer of complete frames
#[allow(async_fn_in_trait)]
pub trait FrameSource<const M: usize> {
    /// Wait for the next complete frame
    ///
    /// The returned frame stays valid and unchanged until the next call.
    async fn next_frame(&mut self) -> &Frame<M>;
}

/// Delimiter-less framing: every `M × 8` bytes form one frame
pub struct PositionalFramer<S, const M: usize> {
    source: S,
    assembler: FrameAssembler<M>,
    wait: PollInterval,
}

impl<S: ByteSource, const M: usize> PositionalFramer<S, M> {
    /// Create a framer polling `source` with the given bound per byte
    pub fn new(source: S, wait: PollInterval) -> Self {
        Self {
            source,
            assembler: FrameAssembler::new(),
            wait,
        }
    }

    /// Bytes received towards the frame in progress
    pub fn filled(&self) -> usize {
        self.assembler.filled()
    }

    /// Poll interval used per byte
    pub fn poll_interval(&self) -> PollInterval {
        self.wait
    }

    /// Underlying byte source
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: ByteSource, const M: usize> FrameSource<M> for PositionalFramer<S, M> {
    async fn next_frame(&mut self) -> &Frame<M> {
        self.assembler.accumulate(&mut self.source, self.wait).await
    }
}
