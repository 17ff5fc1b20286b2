//! Matrix display trait for chained LED modules

use ledchain_protocol::Frame;

use crate::config::ChainConfig;

/// A chain of `M` 8x8 LED modules
///
/// Implementations own the display bus. [`initialize`](Self::initialize)
/// must run once before the first [`render`](Self::render).
pub trait MatrixDisplay<const M: usize> {
    /// Bus or pin error
    type Error;

    /// Bring every chip in the chain into normal operation
    ///
    /// Display test off, no BCD decode, all 8 rows scanned, fixed intensity.
    fn initialize(&mut self, config: &ChainConfig) -> Result<(), Self::Error>;

    /// Paint a complete frame onto the chain
    ///
    /// Rendering is a pure function of the frame: the same frame always
    /// produces the same bus traffic.
    fn render(&mut self, frame: &Frame<M>) -> Result<(), Self::Error>;

    /// Turn every pixel off
    fn blank(&mut self) -> Result<(), Self::Error> {
        self.render(&Frame::new())
    }
}
