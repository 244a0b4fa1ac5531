//! Character-oriented input and fan-out output

use crate::error::{EngineError, Result};
use std::io::{BufRead, BufReader, Read, Write};
use tracing::debug;

/// Reads one code point at a time from a UTF-8 byte stream.
///
/// `Ok(None)` from [`CharReader::read_char`] marks the end of the stream.
pub struct CharReader<R: Read> {
    inner: BufReader<R>,
    offset: usize,
}

impl<R: Read> CharReader<R> {
    /// Wrap a byte reader
    pub fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(reader),
            offset: 0,
        }
    }

    /// Bytes consumed so far
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Next code point, or `None` at end of stream
    pub fn read_char(&mut self) -> Result<Option<char>> {
        let Some(first) = self.next_byte()? else {
            return Ok(None);
        };
        let width = match first {
            0x00..=0x7F => return Ok(Some(char::from(first))),
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(self.invalid(first)),
        };

        let mut bytes = [first, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            match self.next_byte()? {
                Some(byte) => *slot = byte,
                None => {
                    return Err(EngineError::Encoding(format!(
                        "truncated UTF-8 sequence at byte {}",
                        self.offset
                    )))
                }
            }
        }
        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(|| self.invalid(first))
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let buf = self.inner.fill_buf()?;
        let Some(&byte) = buf.first() else {
            return Ok(None);
        };
        self.inner.consume(1);
        self.offset += 1;
        Ok(Some(byte))
    }

    fn invalid(&self, first: u8) -> EngineError {
        EngineError::Encoding(format!(
            "invalid UTF-8 sequence starting with 0x{first:02X} near byte {}",
            self.offset
        ))
    }
}

impl<R: Read> Iterator for CharReader<R> {
    type Item = Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_char().transpose()
    }
}

/// Every sink connected to one output; all of them receive the same bytes
#[derive(Default)]
pub struct OutputSinks {
    sinks: Vec<Box<dyn Write + Send>>,
    closed: bool,
}

impl std::fmt::Debug for OutputSinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSinks")
            .field("sinks", &self.sinks.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl OutputSinks {
    /// No sinks yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect one more sink
    pub fn add<W: Write + Send + 'static>(&mut self, sink: W) {
        self.sinks.push(Box::new(sink));
    }

    /// Builder-style [`OutputSinks::add`]
    pub fn with<W: Write + Send + 'static>(mut self, sink: W) -> Self {
        self.add(sink);
        self
    }

    /// Number of connected sinks
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no sink is connected
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Write `text` to every sink
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        if self.closed {
            return Err(EngineError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "output already closed",
            )));
        }
        for sink in &mut self.sinks {
            sink.write_all(text.as_bytes())?;
        }
        Ok(())
    }

    /// Flush and release every sink; later writes fail
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let mut first_error = None;
        for mut sink in self.sinks.drain(..) {
            if let Err(err) = sink.flush() {
                first_error.get_or_insert(err);
            }
        }
        debug!("outputs closed");
        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Whether [`OutputSinks::close`] has run
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// In-memory sink whose contents stay readable after the sink is closed
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: std::sync::Arc<std::sync::Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut bytes = self
            .bytes
            .lock()
            .map_err(|_| std::io::Error::other("buffer lock poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
