//! Byte-cursor reader and growth-buffer writer for fixed-layout packets.
//!
//! Every packet on the wire is a sequence of big-endian integers,
//! length-prefixed byte blocks, and NUL-terminated strings. [`FrameReader`]
//! walks a borrowed payload and fails with [`ProtocolError::Truncated`] the
//! moment a field would read past the end; [`FrameWriter`] appends to an
//! owned buffer and never fails.

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// FrameReader
// ---------------------------------------------------------------------------

/// A cursor over a received payload.
///
/// All reads advance the cursor. A failed read leaves the cursor where it
/// was, but the enclosing message is unrecoverable anyway — fixed layouts
/// have no resynchronization point.
#[derive(Debug)]
pub struct FrameReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FrameReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True if the cursor has consumed the whole payload.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        if self.remaining() < n {
            return Err(ProtocolError::Truncated {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16, ProtocolError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, ProtocolError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i16(&mut self) -> Result<i16, ProtocolError> {
        let b = self.take(2)?;
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads exactly `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, ProtocolError> {
        Ok(self.take(n)?.to_vec())
    }

    /// Reads bytes up to (and consuming) a NUL terminator.
    ///
    /// The returned bytes exclude the terminator. Fails with
    /// [`ProtocolError::UnterminatedString`] if the payload ends first.
    pub fn read_cstring(&mut self) -> Result<Vec<u8>, ProtocolError> {
        let rest = &self.data[self.pos..];
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(ProtocolError::UnterminatedString)?;
        let bytes = rest[..nul].to_vec();
        self.pos += nul + 1;
        Ok(bytes)
    }
}

// ---------------------------------------------------------------------------
// FrameWriter
// ---------------------------------------------------------------------------

/// An append-only output buffer for building packets.
#[derive(Debug, Default)]
pub struct FrameWriter {
    buf: Vec<u8>,
}

impl FrameWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a `u16` length or count field, refusing a value the field
    /// cannot represent instead of letting it wrap.
    pub fn write_len_u16(
        &mut self,
        what: &'static str,
        len: usize,
    ) -> Result<(), ProtocolError> {
        let value = u16::try_from(len).map_err(|_| {
            ProtocolError::FieldTooLong {
                what,
                len,
                max: u16::MAX as usize,
            }
        })?;
        self.write_u16(value);
        Ok(())
    }

    /// Writes a `u8` count field, refusing a value the field cannot
    /// represent instead of letting it wrap.
    pub fn write_len_u8(
        &mut self,
        what: &'static str,
        len: usize,
    ) -> Result<(), ProtocolError> {
        let value = u8::try_from(len).map_err(|_| {
            ProtocolError::FieldTooLong {
                what,
                len,
                max: u8::MAX as usize,
            }
        })?;
        self.write_u8(value);
        Ok(())
    }

    /// Writes the bytes followed by a NUL terminator.
    pub fn write_cstring(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        self.buf.push(0);
    }

    /// Consumes the writer, returning the built payload.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Borrows the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_integers_are_big_endian() {
        let data = [0x12, 0x34, 0x56, 0x78, 0xAB];
        let mut r = FrameReader::new(&data);
        assert_eq!(r.read_u16().unwrap(), 0x1234);
        assert_eq!(r.read_u16().unwrap(), 0x5678);
        assert_eq!(r.read_u8().unwrap(), 0xAB);
        assert!(r.is_empty());
    }

    #[test]
    fn test_reader_signed_values() {
        let mut w = FrameWriter::new();
        w.write_i16(-5);
        w.write_i32(-70_000);
        let data = w.into_vec();
        let mut r = FrameReader::new(&data);
        assert_eq!(r.read_i16().unwrap(), -5);
        assert_eq!(r.read_i32().unwrap(), -70_000);
    }

    #[test]
    fn test_reader_truncated_read_fails() {
        let data = [0x01, 0x02];
        let mut r = FrameReader::new(&data);
        let err = r.read_u32().unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Truncated {
                needed: 4,
                remaining: 2
            }
        ));
        // The cursor did not advance past the failed read.
        assert_eq!(r.remaining(), 2);
    }

    #[test]
    fn test_reader_bytes_then_empty() {
        let data = [1, 2, 3];
        let mut r = FrameReader::new(&data);
        assert_eq!(r.read_bytes(3).unwrap(), vec![1, 2, 3]);
        assert!(r.read_bytes(1).is_err());
    }

    #[test]
    fn test_reader_cstring() {
        let data = [b'h', b'i', 0, 0x42];
        let mut r = FrameReader::new(&data);
        assert_eq!(r.read_cstring().unwrap(), b"hi".to_vec());
        assert_eq!(r.read_u8().unwrap(), 0x42);
    }

    #[test]
    fn test_reader_cstring_unterminated_fails() {
        let data = [b'h', b'i'];
        let mut r = FrameReader::new(&data);
        assert!(matches!(
            r.read_cstring(),
            Err(ProtocolError::UnterminatedString)
        ));
    }

    #[test]
    fn test_writer_length_fields_refuse_wrapping() {
        let mut w = FrameWriter::new();
        w.write_len_u16("blob", 65_535).unwrap();
        assert!(matches!(
            w.write_len_u16("blob", 65_536),
            Err(ProtocolError::FieldTooLong {
                what: "blob",
                len: 65_536,
                max: 65_535,
            })
        ));
        w.write_len_u8("count", 255).unwrap();
        assert!(matches!(
            w.write_len_u8("count", 256),
            Err(ProtocolError::FieldTooLong { max: 255, .. })
        ));
        // Failed writes left no partial bytes behind.
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn test_writer_round_trip() {
        let mut w = FrameWriter::new();
        w.write_u32(0xDEAD_BEEF);
        w.write_u8(7);
        w.write_bool(true);
        w.write_u16(300);
        w.write_cstring(b"abc");
        let data = w.into_vec();

        let mut r = FrameReader::new(&data);
        assert_eq!(r.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(r.read_u8().unwrap(), 7);
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_u16().unwrap(), 300);
        assert_eq!(r.read_cstring().unwrap(), b"abc".to_vec());
        assert!(r.is_empty());
    }
}
