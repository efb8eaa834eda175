//! The byte sink contract consumed by the encoders.

use std::io;

use crate::Writer;

/// Ordered byte output: raw byte runs plus little-endian fixed-width
/// writes.
///
/// Encoders are generic over this trait so they can write to an
/// in-memory [`Writer`] (infallible) or to a channel-backed sink that
/// can fail mid-stream. A failed encode may already have written bytes;
/// discarding that partial output is the caller's responsibility.
pub trait ByteSink {
    fn u8(&mut self, val: u8) -> io::Result<()>;

    fn buf(&mut self, buf: &[u8]) -> io::Result<()>;

    fn i8(&mut self, val: i8) -> io::Result<()> {
        self.u8(val as u8)
    }

    fn u16_le(&mut self, val: u16) -> io::Result<()> {
        self.buf(&val.to_le_bytes())
    }

    fn i16_le(&mut self, val: i16) -> io::Result<()> {
        self.u16_le(val as u16)
    }

    fn u32_le(&mut self, val: u32) -> io::Result<()> {
        self.buf(&val.to_le_bytes())
    }

    fn i32_le(&mut self, val: i32) -> io::Result<()> {
        self.u32_le(val as u32)
    }

    fn u64_le(&mut self, val: u64) -> io::Result<()> {
        self.buf(&val.to_le_bytes())
    }

    fn i64_le(&mut self, val: i64) -> io::Result<()> {
        self.u64_le(val as u64)
    }

    fn f64_le(&mut self, val: f64) -> io::Result<()> {
        self.u64_le(val.to_bits())
    }
}

impl ByteSink for Writer {
    fn u8(&mut self, val: u8) -> io::Result<()> {
        Writer::u8(self, val);
        Ok(())
    }

    fn buf(&mut self, buf: &[u8]) -> io::Result<()> {
        Writer::buf(self, buf);
        Ok(())
    }

    fn u16_le(&mut self, val: u16) -> io::Result<()> {
        Writer::u16_le(self, val);
        Ok(())
    }

    fn u32_le(&mut self, val: u32) -> io::Result<()> {
        Writer::u32_le(self, val);
        Ok(())
    }

    fn u64_le(&mut self, val: u64) -> io::Result<()> {
        Writer::u64_le(self, val);
        Ok(())
    }
}

impl ByteSink for Vec<u8> {
    fn u8(&mut self, val: u8) -> io::Result<()> {
        self.push(val);
        Ok(())
    }

    fn buf(&mut self, buf: &[u8]) -> io::Result<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn u8(&mut self, val: u8) -> io::Result<()> {
        (**self).u8(val)
    }

    fn buf(&mut self, buf: &[u8]) -> io::Result<()> {
        (**self).buf(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_little_endian() {
        let mut out: Vec<u8> = Vec::new();
        out.u8(0xff).unwrap();
        out.u16_le(0x0102).unwrap();
        out.i32_le(-2).unwrap();
        assert_eq!(out, [0xff, 0x02, 0x01, 0xfe, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn f64_is_raw_bit_pattern() {
        let mut out: Vec<u8> = Vec::new();
        out.f64_le(-0.5).unwrap();
        assert_eq!(out, (-0.5f64).to_le_bytes());
    }

    #[test]
    fn writer_and_vec_agree() {
        let mut writer = Writer::new();
        let mut vec: Vec<u8> = Vec::new();
        for sink in [&mut writer as &mut dyn ByteSink, &mut vec] {
            sink.u8(0x0e).unwrap();
            sink.i64_le(-1).unwrap();
            sink.buf(b"xyz").unwrap();
        }
        assert_eq!(writer.flush(), vec);
    }
}
