//! Display loop
//!
//! Alternates between the two phases sharing the single frame buffer:
//! the source fills it, then the display drains it. Phases never overlap,
//! so every frame the source completes is rendered once, in order.

use ledchain_protocol::FrameSource;

use crate::traits::MatrixDisplay;

/// Display loop counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PumpStats {
    /// Frames handed over by the source
    pub frames_received: u32,
    /// Frames rendered without a bus error
    pub frames_rendered: u32,
    /// Frames whose render reported a bus error
    pub render_failures: u32,
}

/// Pairs a frame source with a matrix display
pub struct FramePump<S, D, const M: usize> {
    source: S,
    display: D,
    stats: PumpStats,
}

impl<S, D, const M: usize> FramePump<S, D, M>
where
    S: FrameSource<M>,
    D: MatrixDisplay<M>,
{
    /// Create a pump; the display must already be initialized
    pub fn new(source: S, display: D) -> Self {
        Self {
            source,
            display,
            stats: PumpStats::default(),
        }
    }

    /// Wait for the next frame and render it
    ///
    /// A render error is counted and returned. The frame is not retried; the
    /// next call continues with the next frame from the source.
    pub async fn pump(&mut self) -> Result<(), D::Error> {
        let frame = self.source.next_frame().await;
        self.stats.frames_received = self.stats.frames_received.wrapping_add(1);

        match self.display.render(frame) {
            Ok(()) => {
                self.stats.frames_rendered = self.stats.frames_rendered.wrapping_add(1);
                Ok(())
            }
            Err(e) => {
                self.stats.render_failures = self.stats.render_failures.wrapping_add(1);
                Err(e)
            }
        }
    }

    /// Loop counters
    pub fn stats(&self) -> PumpStats {
        self.stats
    }

    /// The display being driven
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Split the pump back into its parts
    pub fn into_parts(self) -> (S, D) {
        (self.source, self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainConfig;
    use embassy_futures::block_on;
    use ledchain_hal::{ByteSource, PollInterval, ReadOutcome};
    use ledchain_protocol::{Frame, PositionalFramer};
    use std::vec::Vec;

    /// Hands out prepared frames in order
    struct QueueSource {
        frames: Vec<Frame<2>>,
        next: usize,
        current: Frame<2>,
    }

    impl QueueSource {
        fn new(frames: Vec<Frame<2>>) -> Self {
            Self {
                frames,
                next: 0,
                current: Frame::new(),
            }
        }
    }

    impl FrameSource<2> for QueueSource {
        async fn next_frame(&mut self) -> &Frame<2> {
            self.current = self.frames[self.next].clone();
            self.next += 1;
            &self.current
        }
    }

    /// Records every rendered frame; optionally fails one render
    #[derive(Default)]
    struct RecordingDisplay {
        initialized: Option<ChainConfig>,
        rendered: Vec<Frame<2>>,
        fail_on: Option<usize>,
        calls: usize,
    }

    impl MatrixDisplay<2> for RecordingDisplay {
        type Error = ();

        fn initialize(&mut self, config: &ChainConfig) -> Result<(), ()> {
            self.initialized = Some(*config);
            Ok(())
        }

        fn render(&mut self, frame: &Frame<2>) -> Result<(), ()> {
            let call = self.calls;
            self.calls += 1;
            if self.fail_on == Some(call) {
                return Err(());
            }
            self.rendered.push(frame.clone());
            Ok(())
        }
    }

    fn frame_of(byte: u8) -> Frame<2> {
        Frame::from_bytes(&[byte; 16]).unwrap()
    }

    #[test]
    fn test_frames_rendered_once_in_order() {
        let frames = [frame_of(1), frame_of(2), frame_of(3)];
        let source = QueueSource::new(frames.to_vec());
        let mut pump = FramePump::new(source, RecordingDisplay::default());

        for _ in 0..3 {
            block_on(pump.pump()).unwrap();
        }

        let stats = pump.stats();
        assert_eq!(stats.frames_received, 3);
        assert_eq!(stats.frames_rendered, 3);
        assert_eq!(stats.render_failures, 0);

        let (_, display) = pump.into_parts();
        assert_eq!(display.rendered, frames);
    }

    #[test]
    fn test_render_failure_is_counted_and_loop_continues() {
        let frames = [frame_of(1), frame_of(2), frame_of(3)];
        let source = QueueSource::new(frames.to_vec());
        let display = RecordingDisplay {
            fail_on: Some(1),
            ..Default::default()
        };
        let mut pump = FramePump::new(source, display);

        assert_eq!(block_on(pump.pump()), Ok(()));
        assert_eq!(block_on(pump.pump()), Err(()));
        assert_eq!(block_on(pump.pump()), Ok(()));

        let stats = pump.stats();
        assert_eq!(stats.frames_received, 3);
        assert_eq!(stats.frames_rendered, 2);
        assert_eq!(stats.render_failures, 1);
        assert_eq!(pump.display().rendered, [frame_of(1), frame_of(3)]);
    }

    #[test]
    fn test_blank_renders_zero_frame() {
        let mut display = RecordingDisplay::default();
        display.initialize(&ChainConfig::default()).unwrap();
        display.blank().unwrap();

        assert_eq!(display.initialized, Some(ChainConfig::default()));
        assert_eq!(display.rendered.len(), 1);
        assert!(display.rendered[0].is_blank());
    }

    /// Streams bytes, then reports NoData forever
    struct StreamSource {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl ByteSource for StreamSource {
        async fn read_byte(&mut self, _wait: PollInterval) -> ReadOutcome {
            match self.bytes.get(self.pos) {
                Some(&b) => {
                    self.pos += 1;
                    ReadOutcome::Byte(b)
                }
                None => ReadOutcome::NoData,
            }
        }
    }

    #[test]
    fn test_pump_with_positional_framing() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&[0x0F; 16]);
        bytes.extend_from_slice(&[0xF0; 16]);
        let source = StreamSource { bytes, pos: 0 };
        let framer = PositionalFramer::<_, 2>::new(source, PollInterval::default());
        let mut pump = FramePump::new(framer, RecordingDisplay::default());

        block_on(pump.pump()).unwrap();
        block_on(pump.pump()).unwrap();

        assert_eq!(pump.display().rendered, [frame_of(0x0F), frame_of(0xF0)]);
    }
}
