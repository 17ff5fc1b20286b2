//! Hardware abstraction traits
//!
//! These traits define the interface between the display loop
//! and chip-specific driver implementations.

pub mod display;

pub use display::MatrixDisplay;
