//! Byte-based progress reporting for streamed inputs.

use std::io::Read;

/// How many bytes pass between callback invocations.
const REPORT_INTERVAL: u64 = 64 * 1024;

/// Wraps a reader and reports the cumulative byte count to a callback.
///
/// The callback fires at most once per `REPORT_INTERVAL` bytes, and once
/// more at end of stream, so a tight read loop does not spend its time
/// redrawing a progress bar.
pub struct ProgressReader<R: Read> {
    reader: R,
    callback: Box<dyn Fn(u64)>,
    bytes_read: u64,
    last_reported: u64,
}

impl<R: Read> ProgressReader<R> {
    pub fn new<F>(reader: R, callback: F) -> Self
    where
        F: Fn(u64) + 'static,
    {
        Self {
            reader,
            callback: Box::new(callback),
            bytes_read: 0,
            last_reported: 0,
        }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.reader.read(buf)?;
        self.bytes_read += n as u64;
        if n == 0 || self.bytes_read - self.last_reported >= REPORT_INTERVAL {
            self.last_reported = self.bytes_read;
            (self.callback)(self.bytes_read);
        }
        Ok(n)
    }
}
