//! Mock construction helpers

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Read};
use std::rc::Rc;
use tablet_ink::config::BufferConfig;
use tablet_ink::driver::MockDriver;
use tablet_ink::{IngestSession, Point, StrokeBuffer};

/// Every completed stroke the trigger was called with
pub type StrokeLog = Rc<RefCell<Vec<Vec<Point>>>>;

/// A trigger that copies each completed stroke into a shared log
pub fn recording_trigger() -> (StrokeLog, impl FnMut(&StrokeBuffer) + 'static) {
    let log: StrokeLog = Rc::default();
    let sink = Rc::clone(&log);
    let trigger = move |strokes: &StrokeBuffer| {
        let stroke = strokes.last_completed_stroke().unwrap_or_default();
        sink.borrow_mut().push(stroke.to_vec());
    };
    (log, trigger)
}

/// Session over an in-memory stream with a one-byte mock driver
pub fn create_mock_session(
    bytes: &[u8],
    buffer: &BufferConfig,
) -> (IngestSession<io::Cursor<Vec<u8>>>, StrokeLog) {
    let (log, trigger) = recording_trigger();
    let session = IngestSession::with_source(
        io::Cursor::new(bytes.to_vec()),
        Box::new(MockDriver::new(1)),
        trigger,
        buffer,
    )
    .expect("mock session should start");
    (session, log)
}

/// Step until the stream runs dry, returning the number of successful steps
pub fn drain<S: Read>(session: &mut IngestSession<S>) -> usize {
    let mut steps = 0;
    while session.step().is_ok() {
        steps += 1;
    }
    steps
}

/// Serves data in fixed chunk sizes, one chunk per read call
pub struct ChunkedReader {
    data: VecDeque<u8>,
    chunk: usize,
}

impl ChunkedReader {
    pub fn new(data: Vec<u8>, chunk: usize) -> Self {
        Self {
            data: data.into(),
            chunk: chunk.max(1),
        }
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len());
        for (slot, byte) in buf.iter_mut().zip(self.data.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}
