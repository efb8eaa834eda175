//! The pull-one-byte read contract the streaming JSON decoder runs on.

use std::io;

/// Yields one byte per call.
///
/// `Ok(None)` signals end-of-input; `Err` is a source failure (for a
/// channel-backed source, a read timeout or disconnect surfaces here and
/// aborts the parse). The decoder calls this exactly once per consumed
/// input byte and never buffers ahead of its single-token lookahead.
pub trait ByteSource {
    fn next(&mut self) -> io::Result<Option<u8>>;
}

/// In-memory byte source over a borrowed slice.
pub struct SliceSource<'a> {
    data: &'a [u8],
    x: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, x: 0 }
    }
}

impl ByteSource for SliceSource<'_> {
    fn next(&mut self) -> io::Result<Option<u8>> {
        if self.x >= self.data.len() {
            return Ok(None);
        }
        let octet = self.data[self.x];
        self.x += 1;
        Ok(Some(octet))
    }
}

/// Byte source over any [`io::Read`] (file, socket, pipe).
///
/// Reads one byte per call, so parsing can run directly over a live
/// channel without buffering the whole input.
pub struct ReadSource<R: io::Read> {
    inner: R,
}

impl<R: io::Read> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: io::Read> ByteSource for ReadSource<R> {
    fn next(&mut self) -> io::Result<Option<u8>> {
        let mut octet = [0u8; 1];
        loop {
            match self.inner.read(&mut octet) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(octet[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
