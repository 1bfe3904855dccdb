//! Memory-backed input stream.
//!
//! `MemoryStream` exposes a caller-owned byte buffer through the read, skip
//! and seek operations the JP2 and codestream readers need, without copying.

use crate::error::{HeaderError, ProbeError};

/// Direction a stream is opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamDirection {
    Input,
    Output,
}

/// A read-only cursor over a borrowed buffer of known length.
#[derive(Debug)]
pub struct MemoryStream<'a> {
    source: &'a [u8],
    position: usize,
}

impl<'a> MemoryStream<'a> {
    /// Binds `source` as the backing store of a new stream.
    ///
    /// An empty buffer has nothing to decode and an output stream cannot be
    /// backed by borrowed read-only memory; both are rejected here instead of
    /// failing later inside the codec.
    pub fn new(source: &'a [u8], direction: StreamDirection) -> Result<Self, ProbeError> {
        if direction != StreamDirection::Input {
            return Err(ProbeError::StreamInit("memory streams are read-only"));
        }
        if source.is_empty() {
            return Err(ProbeError::StreamInit("input buffer is empty"));
        }
        log::trace!("memory stream over {} bytes", source.len());
        Ok(Self {
            source,
            position: 0,
        })
    }

    pub fn len(&self) -> u64 {
        self.source.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn position(&self) -> u64 {
        self.position as u64
    }

    pub fn remaining(&self) -> u64 {
        (self.source.len() - self.position) as u64
    }

    pub fn remaining_data(&self) -> &'a [u8] {
        &self.source[self.position..]
    }

    /// Copies up to `buffer.len()` bytes and returns how many were copied.
    /// Returns 0 once the end of the data is reached.
    pub fn read(&mut self, buffer: &mut [u8]) -> usize {
        let available = self.source.len() - self.position;
        let n = buffer.len().min(available);
        buffer[..n].copy_from_slice(&self.source[self.position..self.position + n]);
        self.position += n;
        n
    }

    pub fn read_bytes(&mut self, count: u64) -> Result<&'a [u8], HeaderError> {
        if count > self.remaining() {
            return Err(HeaderError::UnexpectedEndOfStream);
        }
        let start = self.position;
        self.position += count as usize;
        Ok(&self.source[start..self.position])
    }

    /// Consumes `count` bytes and returns a stream over just those bytes.
    pub fn sub_stream(&mut self, count: u64) -> Result<MemoryStream<'a>, HeaderError> {
        let source = self.read_bytes(count)?;
        Ok(MemoryStream {
            source,
            position: 0,
        })
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], HeaderError> {
        let mut bytes = [0u8; N];
        if self.read(&mut bytes) != N {
            return Err(HeaderError::UnexpectedEndOfStream);
        }
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, HeaderError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, HeaderError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, HeaderError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, HeaderError> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    pub fn skip(&mut self, count: u64) -> Result<(), HeaderError> {
        self.read_bytes(count).map(|_| ())
    }

    pub fn seek(&mut self, position: u64) -> Result<(), HeaderError> {
        if position > self.len() {
            return Err(HeaderError::SeekOutOfRange(position));
        }
        self.position = position as usize;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_output() {
        assert!(matches!(
            MemoryStream::new(&[], StreamDirection::Input),
            Err(ProbeError::StreamInit(_))
        ));
        assert!(matches!(
            MemoryStream::new(&[1, 2, 3], StreamDirection::Output),
            Err(ProbeError::StreamInit(_))
        ));
    }

    #[test]
    fn test_big_endian_reads() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut stream = MemoryStream::new(&data, StreamDirection::Input).unwrap();
        assert_eq!(stream.read_u8().unwrap(), 0x12);
        assert_eq!(stream.read_u16().unwrap(), 0x3456);
        assert_eq!(stream.read_u32().unwrap(), 0x789ABCDE);
        assert_eq!(stream.read_u64().unwrap(), 0xF001020304050607);
        assert_eq!(stream.remaining(), 0);
        assert_eq!(stream.read_u8(), Err(HeaderError::UnexpectedEndOfStream));
    }

    #[test]
    fn test_short_read_at_end() {
        let data = [1, 2, 3];
        let mut stream = MemoryStream::new(&data, StreamDirection::Input).unwrap();
        let mut buffer = [0u8; 8];
        assert_eq!(stream.read(&mut buffer), 3);
        assert_eq!(&buffer[..3], &data);
        assert_eq!(stream.read(&mut buffer), 0);
    }

    #[test]
    fn test_skip_and_seek() {
        let data = [0u8, 1, 2, 3, 4, 5];
        let mut stream = MemoryStream::new(&data, StreamDirection::Input).unwrap();
        stream.skip(4).unwrap();
        assert_eq!(stream.position(), 4);
        assert_eq!(stream.skip(3), Err(HeaderError::UnexpectedEndOfStream));
        assert_eq!(stream.position(), 4);

        stream.seek(1).unwrap();
        assert_eq!(stream.read_u8().unwrap(), 1);
        stream.seek(6).unwrap();
        assert_eq!(stream.remaining(), 0);
        assert_eq!(stream.seek(7), Err(HeaderError::SeekOutOfRange(7)));
    }

    #[test]
    fn test_read_bytes_borrows_source() {
        let data = [9u8, 8, 7, 6];
        let mut stream = MemoryStream::new(&data, StreamDirection::Input).unwrap();
        let bytes = stream.read_bytes(2).unwrap();
        assert_eq!(bytes.as_ptr(), data.as_ptr());
        assert_eq!(stream.remaining_data(), &[7, 6]);
    }
}
