//! Fixed-size frame buffer for a chain of 8x8 modules.
//!
//! Layout:
//! - `M` segments, one per module, in logical (host) order
//! - 8 bytes per segment, row 0 first
//! - bit 7 of a row byte is the leftmost pixel of that module

/// Rows per module (and bytes per segment)
pub const ROWS_PER_MODULE: usize = 8;

/// Pixel columns per module (bits per row byte)
pub const COLUMNS_PER_MODULE: usize = 8;

/// Errors from frame access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Byte offset or pixel coordinate is outside the frame
    OutOfRange,
    /// Input slice is not exactly one frame long
    LengthMismatch,
}

/// One complete frame for a chain of `M` modules
///
/// Always exactly `M × 8` bytes. A frame is allocated once and overwritten in
/// place for every new host frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<const M: usize> {
    segments: [[u8; ROWS_PER_MODULE]; M],
}

impl<const M: usize> Default for Frame<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const M: usize> Frame<M> {
    /// Number of chained modules
    pub const MODULES: usize = M;

    /// Frame length in bytes
    pub const LEN: usize = M * ROWS_PER_MODULE;

    /// Canvas width in pixels
    pub const WIDTH: usize = M * COLUMNS_PER_MODULE;

    /// Canvas height in pixels
    pub const HEIGHT: usize = ROWS_PER_MODULE;

    /// Create a zeroed (all pixels off) frame
    pub const fn new() -> Self {
        Self {
            segments: [[0; ROWS_PER_MODULE]; M],
        }
    }

    /// Build a frame from exactly `M × 8` bytes in stream order
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() != Self::LEN {
            return Err(FrameError::LengthMismatch);
        }

        let mut frame = Self::new();
        frame.as_bytes_mut().copy_from_slice(bytes);
        Ok(frame)
    }

    /// Raw frame bytes in stream order
    pub fn as_bytes(&self) -> &[u8] {
        self.segments.as_flattened()
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.segments.as_flattened_mut()
    }

    /// Mutable slot for a stream offset
    pub(crate) fn slot_mut(&mut self, offset: usize) -> Option<&mut u8> {
        self.as_bytes_mut().get_mut(offset)
    }

    /// The 8 row bytes of one module
    pub fn segment(&self, module: usize) -> Option<&[u8; ROWS_PER_MODULE]> {
        self.segments.get(module)
    }

    /// Row byte of one module
    pub fn row_byte(&self, module: usize, row: usize) -> Option<u8> {
        self.segment(module)?.get(row).copied()
    }

    /// Overwrite the byte at a stream offset
    pub fn set_byte(&mut self, offset: usize, byte: u8) -> Result<(), FrameError> {
        let slot = self.slot_mut(offset).ok_or(FrameError::OutOfRange)?;
        *slot = byte;
        Ok(())
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.as_bytes_mut().fill(0);
    }

    /// True if every pixel is off
    pub fn is_blank(&self) -> bool {
        self.as_bytes().iter().all(|&b| b == 0)
    }

    /// Read one pixel of the `(M × 8) × 8` canvas
    ///
    /// `x` runs left to right across the modules in logical order.
    pub fn pixel(&self, x: usize, y: usize) -> Result<bool, FrameError> {
        let (module, mask) = Self::locate(x, y)?;
        let row = self.row_byte(module, y).ok_or(FrameError::OutOfRange)?;
        Ok(row & mask != 0)
    }

    /// Set or clear one pixel of the canvas
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> Result<(), FrameError> {
        let (module, mask) = Self::locate(x, y)?;
        let row = self
            .segments
            .get_mut(module)
            .and_then(|segment| segment.get_mut(y))
            .ok_or(FrameError::OutOfRange)?;

        if on {
            *row |= mask;
        } else {
            *row &= !mask;
        }
        Ok(())
    }

    /// Module index and bit mask for a canvas coordinate
    fn locate(x: usize, y: usize) -> Result<(usize, u8), FrameError> {
        if x >= Self::WIDTH || y >= Self::HEIGHT {
            return Err(FrameError::OutOfRange);
        }
        let bit = COLUMNS_PER_MODULE - 1 - (x % COLUMNS_PER_MODULE);
        Ok((x / COLUMNS_PER_MODULE, 1u8 << bit))
    }

    /// Row bytes of every module in chain transmission order
    ///
    /// The module furthest from the controller holds logical segment 0, so
    /// its byte must be shifted in last: module `M-1` comes first and module
    /// `0` last. Returns `None` for a row outside `0..8`.
    pub fn row_for_transmission(&self, row: usize) -> Option<impl Iterator<Item = u8> + '_> {
        if row >= ROWS_PER_MODULE {
            return None;
        }
        Some(
            self.segments
                .iter()
                .rev()
                .filter_map(move |segment| segment.get(row).copied()),
        )
    }
}

#[cfg(feature = "defmt")]
impl<const M: usize> defmt::Format for Frame<M> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Frame<{}>[{=[u8]:x}]", M, self.as_bytes());
    }
}
