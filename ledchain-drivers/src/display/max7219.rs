//! MAX7219 LED matrix chain (SPI)
//!
//! The MAX7219 drives one 8x8 matrix. Chips are daisy-chained: DOUT of one
//! chip feeds DIN of the next, and every chip latches the last 16 bits it
//! holds on the rising edge of LOAD (chain select).
//!
//! # Wire Protocol
//!
//! Each chip takes a 16-bit word, MSB first:
//! - Register address (1 byte)
//! - Data (1 byte)
//!
//! Writing to a chain of `M` chips means shifting `M` words inside one
//! select window. The first word sent ends up in the chip furthest from the
//! controller, which displays logical module 0, so the words for a row are
//! sent in reverse module order.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use ledchain_core::config::{ChainConfig, MAX_INTENSITY};
use ledchain_core::traits::MatrixDisplay;
use ledchain_protocol::{Frame, ROWS_PER_MODULE};

/// MAX7219 register addresses
pub mod reg {
    /// No operation (pass-through in a chain)
    pub const NOOP: u8 = 0x00;
    /// Row 0 (digit 0); rows 1-7 follow consecutively
    pub const DIGIT0: u8 = 0x01;
    /// Row 7 (digit 7)
    pub const DIGIT7: u8 = 0x08;
    /// BCD decode mode per digit
    pub const DECODE_MODE: u8 = 0x09;
    /// Brightness (0x00-0x0F)
    pub const INTENSITY: u8 = 0x0A;
    /// Number of scanned digits minus one
    pub const SCAN_LIMIT: u8 = 0x0B;
    /// Shutdown / normal operation
    pub const SHUTDOWN: u8 = 0x0C;
    /// Display test (all LEDs on)
    pub const DISPLAY_TEST: u8 = 0x0F;
}

/// Display test register: normal operation
pub const DISPLAY_TEST_OFF: u8 = 0x00;

/// Shutdown register: normal operation
pub const SHUTDOWN_NORMAL: u8 = 0x01;

/// Scan limit register: all 8 rows
pub const SCAN_ALL_ROWS: u8 = 0x07;

/// Decode mode register: raw segment data for every row
pub const DECODE_NONE: u8 = 0x00;

/// Number of broadcast writes in the init sequence
pub const INIT_COMMAND_COUNT: usize = 5;

/// Register address for a row (0-7)
pub const fn row_register(row: u8) -> u8 {
    reg::DIGIT0 + row
}

/// Broadcast (register, data) pairs that bring a chain into normal operation
pub fn init_commands(config: &ChainConfig) -> [(u8, u8); INIT_COMMAND_COUNT] {
    [
        (reg::DISPLAY_TEST, DISPLAY_TEST_OFF),
        (reg::SHUTDOWN, SHUTDOWN_NORMAL),
        (reg::SCAN_LIMIT, SCAN_ALL_ROWS),
        (reg::DECODE_MODE, DECODE_NONE),
        (reg::INTENSITY, config.intensity),
    ]
}

/// MAX7219 chain errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Max7219Error<S, P> {
    /// SPI transfer failed
    Spi(S),
    /// Chain select pin failed
    Pin(P),
    /// Intensity above 0x0F
    InvalidIntensity(u8),
    /// Row outside 0-7
    InvalidRow(usize),
}

/// Chain of `M` MAX7219 chips sharing one SPI bus and one chain select line
pub struct Max7219Chain<SPI, CS, const M: usize> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS, const M: usize> Max7219Chain<SPI, CS, M>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Take ownership of the bus and select line
    ///
    /// The select line is driven high (idle) immediately.
    pub fn new(spi: SPI, mut cs: CS) -> Result<Self, Max7219Error<SPI::Error, CS::Error>> {
        cs.set_high().map_err(Max7219Error::Pin)?;
        Ok(Self { spi, cs })
    }

    /// Latch the same (register, data) pair into every chip
    pub fn broadcast(
        &mut self,
        register: u8,
        data: u8,
    ) -> Result<(), Max7219Error<SPI::Error, CS::Error>> {
        self.transaction(|spi| {
            for _ in 0..M {
                spi.write(&[register, data])?;
            }
            Ok(())
        })
    }

    /// Write one row of the frame to every chip
    pub fn write_row(
        &mut self,
        row: usize,
        frame: &Frame<M>,
    ) -> Result<(), Max7219Error<SPI::Error, CS::Error>> {
        let bytes = frame
            .row_for_transmission(row)
            .ok_or(Max7219Error::InvalidRow(row))?;
        // row < 8 is checked above
        let register = row_register(row as u8);

        self.transaction(|spi| {
            for data in bytes {
                spi.write(&[register, data])?;
            }
            Ok(())
        })
    }

    /// Release the bus and select line
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    /// Run `f` inside one select window
    ///
    /// Select is released even when a write fails; the first error wins.
    fn transaction<F>(&mut self, f: F) -> Result<(), Max7219Error<SPI::Error, CS::Error>>
    where
        F: FnOnce(&mut SPI) -> Result<(), SPI::Error>,
    {
        self.cs.set_low().map_err(Max7219Error::Pin)?;

        // Chips latch on the select edge, so the bus must be drained first
        let written = f(&mut self.spi).and_then(|()| self.spi.flush());
        let released = self.cs.set_high();

        written.map_err(Max7219Error::Spi)?;
        released.map_err(Max7219Error::Pin)
    }
}

impl<SPI, CS, const M: usize> MatrixDisplay<M> for Max7219Chain<SPI, CS, M>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    type Error = Max7219Error<SPI::Error, CS::Error>;

    fn initialize(&mut self, config: &ChainConfig) -> Result<(), Self::Error> {
        if config.intensity > MAX_INTENSITY {
            return Err(Max7219Error::InvalidIntensity(config.intensity));
        }

        for (register, data) in init_commands(config) {
            self.broadcast(register, data)?;
        }
        Ok(())
    }

    fn render(&mut self, frame: &Frame<M>) -> Result<(), Self::Error> {
        for row in 0..ROWS_PER_MODULE {
            self.write_row(row, frame)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorKind, ErrorType};
    use std::vec::Vec;

    /// Everything that happened on the bus, in order
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum BusEvent {
        Select,
        Deselect,
        Write(Vec<u8>),
        Flush,
    }

    type BusLog = RefCell<Vec<BusEvent>>;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct MockError;

    impl embedded_hal::spi::Error for MockError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// SPI bus logging writes; optionally fails after `fail_after` writes
    struct MockSpi<'a> {
        log: &'a BusLog,
        writes: usize,
        fail_after: Option<usize>,
    }

    impl<'a> MockSpi<'a> {
        fn new(log: &'a BusLog) -> Self {
            Self {
                log,
                writes: 0,
                fail_after: None,
            }
        }
    }

    impl ErrorType for MockSpi<'_> {
        type Error = MockError;
    }

    impl SpiBus for MockSpi<'_> {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), MockError> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), MockError> {
            if self.fail_after == Some(self.writes) {
                return Err(MockError);
            }
            self.writes += 1;
            self.log.borrow_mut().push(BusEvent::Write(words.to_vec()));
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], write: &[u8]) -> Result<(), MockError> {
            self.write(write)
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), MockError> {
            self.write(words)
        }

        fn flush(&mut self) -> Result<(), MockError> {
            self.log.borrow_mut().push(BusEvent::Flush);
            Ok(())
        }
    }

    /// Chain select pin logging edges
    struct MockPin<'a> {
        log: &'a BusLog,
    }

    impl embedded_hal::digital::ErrorType for MockPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for MockPin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.log.borrow_mut().push(BusEvent::Select);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.log.borrow_mut().push(BusEvent::Deselect);
            Ok(())
        }
    }

    fn chain<const M: usize>(log: &BusLog) -> Max7219Chain<MockSpi<'_>, MockPin<'_>, M> {
        let chain = Max7219Chain::new(MockSpi::new(log), MockPin { log }).unwrap();
        log.borrow_mut().clear();
        chain
    }

    /// Group logged writes into (register, data) pairs per select window
    ///
    /// Also checks that every window is flushed before it is closed.
    fn transactions(log: &BusLog) -> Vec<Vec<(u8, u8)>> {
        let mut result = Vec::new();
        let mut current: Option<Vec<(u8, u8)>> = None;
        let mut flushed = false;

        for event in log.borrow().iter() {
            match event {
                BusEvent::Select => {
                    assert!(current.is_none(), "nested select");
                    current = Some(Vec::new());
                    flushed = false;
                }
                BusEvent::Write(bytes) => {
                    let words = current.as_mut().expect("write outside select window");
                    assert!(!flushed, "write after flush");
                    for pair in bytes.chunks(2) {
                        words.push((pair[0], pair[1]));
                    }
                }
                BusEvent::Flush => flushed = true,
                BusEvent::Deselect => {
                    assert!(flushed, "deselect before flush");
                    result.push(current.take().expect("deselect without select"));
                }
            }
        }
        assert!(current.is_none(), "select window left open");
        result
    }

    #[test]
    fn test_new_idles_select_high() {
        let log = BusLog::default();
        let _chain: Max7219Chain<_, _, 4> =
            Max7219Chain::new(MockSpi::new(&log), MockPin { log: &log }).unwrap();
        assert_eq!(*log.borrow(), [BusEvent::Deselect]);
    }

    #[test]
    fn test_init_sequence_is_broadcast() {
        let log = BusLog::default();
        let mut chain = chain::<4>(&log);

        chain.initialize(&ChainConfig::default()).unwrap();

        let txs = transactions(&log);
        let expected = [
            (0x0F, 0x00), // display test off
            (0x0C, 0x01), // normal operation
            (0x0B, 0x07), // scan all 8 rows
            (0x09, 0x00), // no decode
            (0x0A, 0x08), // intensity
        ];
        assert_eq!(txs.len(), expected.len());
        for (tx, pair) in txs.iter().zip(expected) {
            assert_eq!(tx, &[pair; 4]);
        }
    }

    #[test]
    fn test_init_uses_configured_intensity() {
        let commands = init_commands(&ChainConfig { intensity: 0x0F });
        assert_eq!(commands[4], (reg::INTENSITY, 0x0F));
    }

    #[test]
    fn test_init_rejects_invalid_intensity() {
        let log = BusLog::default();
        let mut chain = chain::<2>(&log);

        let result = chain.initialize(&ChainConfig { intensity: 0x10 });
        assert_eq!(result, Err(Max7219Error::InvalidIntensity(0x10)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_rows_addressed_one_to_eight() {
        let log = BusLog::default();
        let mut chain = chain::<3>(&log);

        chain.render(&Frame::new()).unwrap();

        let txs = transactions(&log);
        assert_eq!(txs.len(), 8);
        let registers: Vec<u8> = txs.iter().map(|tx| tx[0].0).collect();
        assert_eq!(registers, [1, 2, 3, 4, 5, 6, 7, 8]);
        for (row, tx) in txs.iter().enumerate() {
            assert_eq!(tx.len(), 3);
            assert!(tx.iter().all(|&(register, _)| register == row as u8 + 1));
        }
    }

    #[test]
    fn test_module_order_is_reversed() {
        let log = BusLog::default();
        let mut chain = chain::<4>(&log);

        let mut frame = Frame::<4>::new();
        for module in 0..4 {
            frame.set_byte(module * ROWS_PER_MODULE, 0xA0 + module as u8).unwrap();
        }
        chain.render(&frame).unwrap();

        let txs = transactions(&log);
        let row0: Vec<u8> = txs[0].iter().map(|&(_, data)| data).collect();
        assert_eq!(row0, [0xA3, 0xA2, 0xA1, 0xA0]);
    }

    #[test]
    fn test_four_module_scenario() {
        let log = BusLog::default();
        let mut chain = chain::<4>(&log);

        let mut stream = [0u8; 32];
        stream[7] = 0xFF; // module 0, row 7
        stream[31] = 0x01; // module 3, row 7
        chain.render(&Frame::from_bytes(&stream).unwrap()).unwrap();

        let txs = transactions(&log);
        assert_eq!(txs.len(), 8);
        for (row, tx) in txs.iter().enumerate() {
            let register = row as u8 + 1;
            let data: Vec<u8> = tx
                .iter()
                .map(|&(r, d)| {
                    assert_eq!(r, register);
                    d
                })
                .collect();
            if register == 8 {
                assert_eq!(data, [0x01, 0x00, 0x00, 0xFF]);
            } else {
                assert_eq!(data, [0x00; 4]);
            }
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let log = BusLog::default();
        let mut chain = chain::<2>(&log);

        let bytes: Vec<u8> = (0..16).map(|i| i * 17).collect();
        let frame = Frame::<2>::from_bytes(&bytes).unwrap();

        chain.render(&frame).unwrap();
        let first = log.borrow().clone();
        log.borrow_mut().clear();

        chain.render(&frame).unwrap();
        assert_eq!(*log.borrow(), first);
    }

    #[test]
    fn test_blank_writes_zero_rows() {
        let log = BusLog::default();
        let mut chain = chain::<2>(&log);

        chain.blank().unwrap();

        let txs = transactions(&log);
        assert_eq!(txs.len(), 8);
        assert!(txs.iter().flatten().all(|&(_, data)| data == 0));
    }

    #[test]
    fn test_write_row_rejects_invalid_row() {
        let log = BusLog::default();
        let mut chain = chain::<2>(&log);

        let result = chain.write_row(8, &Frame::new());
        assert_eq!(result, Err(Max7219Error::InvalidRow(8)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_spi_failure_releases_select() {
        let log = BusLog::default();
        let mut chain = chain::<4>(&log);
        chain.spi.fail_after = Some(2);

        let result = chain.render(&Frame::new());
        assert_eq!(result, Err(Max7219Error::Spi(MockError)));

        // Two words went out, then select was released without a flush
        assert_eq!(
            *log.borrow(),
            [
                BusEvent::Select,
                BusEvent::Write(std::vec![1, 0]),
                BusEvent::Write(std::vec![1, 0]),
                BusEvent::Deselect,
            ]
        );
    }

    #[test]
    fn test_release_returns_parts() {
        let log = BusLog::default();
        let chain = chain::<1>(&log);
        let (spi, _cs) = chain.release();
        assert_eq!(spi.writes, 0);
    }
}
