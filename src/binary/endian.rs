use crate::{Error, ErrorKind};
use std::io::{self, Read, Write};

/// Byte order of multi-byte numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// The byte order of the running platform
    #[cfg(target_endian = "little")]
    pub const NATIVE: Endianness = Endianness::Little;

    /// The byte order of the running platform
    #[cfg(target_endian = "big")]
    pub const NATIVE: Endianness = Endianness::Big;

    /// Reorder native bytes into this byte order (or back, the operation is
    /// its own inverse)
    #[inline]
    fn arrange<const N: usize>(self, mut data: [u8; N]) -> [u8; N] {
        if self != Endianness::NATIVE {
            data.reverse();
        }
        data
    }
}

macro_rules! read_number {
    ($(#[$meta:meta])* $name:ident, $ty:ty) => {
        $(#[$meta])*
        #[inline]
        pub fn $name(&mut self) -> Result<$ty, Error> {
            let data = self.read_array()?;
            Ok(<$ty>::from_ne_bytes(self.endianness.arrange(data)))
        }
    };
}

macro_rules! write_number {
    ($(#[$meta:meta])* $name:ident, $ty:ty) => {
        $(#[$meta])*
        #[inline]
        pub fn $name(&mut self, data: $ty) -> Result<(), Error> {
            let bytes = self.endianness.arrange(data.to_ne_bytes());
            self.write_bytes(&bytes)
        }
    };
}

/// Reads fixed width numbers in a configured byte order from a [Read]
///
/// ```
/// use fsgsave::binary::{EndianReader, Endianness};
///
/// let data = [0x00, 0x00, 0x01, 0x00, 0x01];
/// let mut reader = EndianReader::new(&data[..], Endianness::Big);
/// assert_eq!(reader.read_u32().unwrap(), 0x100);
/// assert!(reader.read_bool().unwrap());
/// assert_eq!(reader.position(), 5);
/// assert!(reader.read_bool().is_err());
/// ```
#[derive(Debug)]
pub struct EndianReader<R> {
    reader: R,
    endianness: Endianness,
    position: usize,
}

impl<R> EndianReader<R>
where
    R: Read,
{
    pub fn new(reader: R, endianness: Endianness) -> Self {
        EndianReader {
            reader,
            endianness,
            position: 0,
        }
    }

    /// The configured byte order
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Number of bytes consumed so far
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Consume the reader and return the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Fill the buffer completely or fail with [`ErrorKind::Eof`] at the
    /// offset where the read started
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        match self.reader.read_exact(buf) {
            Ok(()) => {
                self.position += buf.len();
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Error::new(ErrorKind::Eof {
                offset: self.position,
            })),
            Err(e) => Err(e.into()),
        }
    }

    /// Consume the rest of the stream, returning how many bytes were skipped
    pub fn skip_to_end(&mut self) -> Result<usize, Error> {
        let skipped = io::copy(&mut self.reader, &mut io::sink())? as usize;
        self.position += skipped;
        Ok(skipped)
    }

    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut data = [0u8; N];
        self.read_exact(&mut data)?;
        Ok(data)
    }

    /// A single byte where anything other than zero is true
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        let [data] = self.read_array::<1>()?;
        Ok(data != 0)
    }

    read_number!(read_u16, u16);
    read_number!(read_i16, i16);
    read_number!(read_u32, u32);
    read_number!(read_i32, i32);
    read_number!(read_u64, u64);
    read_number!(read_i64, i64);
    read_number!(
        /// The bit pattern is preserved as is, including NaN payloads
        read_f32,
        f32
    );
}

/// Writes fixed width numbers in a configured byte order to a [Write]
///
/// ```
/// use fsgsave::binary::{EndianWriter, Endianness};
///
/// let mut out = Vec::new();
/// let mut writer = EndianWriter::new(&mut out, Endianness::Big);
/// writer.write_i32(0x0100).unwrap();
/// writer.write_bool(true).unwrap();
/// assert_eq!(writer.position(), 5);
/// assert_eq!(out, vec![0x00, 0x00, 0x01, 0x00, 0x01]);
/// ```
#[derive(Debug)]
pub struct EndianWriter<W> {
    writer: W,
    endianness: Endianness,
    position: usize,
}

impl<W> EndianWriter<W>
where
    W: Write,
{
    pub fn new(writer: W, endianness: Endianness) -> Self {
        EndianWriter {
            writer,
            endianness,
            position: 0,
        }
    }

    /// The configured byte order
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Number of bytes written so far
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get inner writer, keeping ownership
    pub fn inner(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consumes this writer, returning the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> Result<(), Error> {
        self.writer.write_all(data)?;
        self.position += data.len();
        Ok(())
    }

    /// Append `len` zero bytes
    pub fn write_zeros(&mut self, mut len: usize) -> Result<(), Error> {
        const ZEROS: [u8; 4096] = [0u8; 4096];
        while len > 0 {
            let chunk = len.min(ZEROS.len());
            self.write_bytes(&ZEROS[..chunk])?;
            len -= chunk;
        }
        Ok(())
    }

    #[inline]
    pub fn write_bool(&mut self, data: bool) -> Result<(), Error> {
        self.write_bytes(&[u8::from(data)])
    }

    write_number!(write_u16, u16);
    write_number!(write_i16, i16);
    write_number!(write_u32, u32);
    write_number!(write_i32, i32);
    write_number!(write_u64, u64);
    write_number!(write_i64, i64);
    write_number!(
        /// The bit pattern is written as is, including NaN payloads
        write_f32,
        f32
    );

    pub fn flush(&mut self) -> Result<(), Error> {
        self.writer.flush().map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn round_trip_f32(bits: u32, endianness: Endianness) -> u32 {
        let mut out = Vec::new();
        let mut writer = EndianWriter::new(&mut out, endianness);
        writer.write_f32(f32::from_bits(bits)).unwrap();
        let mut reader = EndianReader::new(out.as_slice(), endianness);
        reader.read_f32().unwrap().to_bits()
    }

    #[test]
    fn big_endian_layout() {
        let mut out = Vec::new();
        let mut writer = EndianWriter::new(&mut out, Endianness::Big);
        writer.write_u32(0x0102_0304).unwrap();
        writer.write_u16(0x0506).unwrap();
        writer.write_u64(0x0708_090a_0b0c_0d0e).unwrap();
        assert_eq!(
            out,
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14]
        );
    }

    #[test]
    fn little_endian_layout() {
        let mut out = Vec::new();
        let mut writer = EndianWriter::new(&mut out, Endianness::Little);
        writer.write_i32(-2).unwrap();
        assert_eq!(out, vec![0xfe, 0xff, 0xff, 0xff]);

        let mut reader = EndianReader::new(out.as_slice(), Endianness::Little);
        assert_eq!(reader.read_i32().unwrap(), -2);
    }

    #[test]
    fn mismatched_order_reverses() {
        let data = [0x00, 0x00, 0x00, 0x01];
        let mut reader = EndianReader::new(&data[..], Endianness::Little);
        assert_eq!(reader.read_u32().unwrap(), 0x0100_0000);
    }

    #[test]
    fn nan_payloads_survive() {
        let quiet_payload = 0x7fc0_1234;
        let signaling = 0x7f80_0001;
        let denormal = 0x0000_0001;
        for endianness in [Endianness::Big, Endianness::Little] {
            for bits in [quiet_payload, signaling, denormal, 0x8000_0000] {
                assert_eq!(round_trip_f32(bits, endianness), bits);
            }
        }
    }

    #[test]
    fn short_read_reports_offset() {
        let data = [0x00, 0x00, 0x00, 0x01, 0xff];
        let mut reader = EndianReader::new(&data[..], Endianness::Big);
        reader.read_u32().unwrap();
        let err = reader.read_u32().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Eof { offset: 4 }));
    }

    #[test]
    fn skip_to_end_counts_remainder() {
        let data = [0u8; 9000];
        let mut reader = EndianReader::new(&data[..], Endianness::Big);
        reader.read_u32().unwrap();
        assert_eq!(reader.skip_to_end().unwrap(), 8996);
        assert_eq!(reader.position(), 9000);
        assert_eq!(reader.skip_to_end().unwrap(), 0);
    }

    #[test]
    fn write_zeros_spans_chunks() {
        let mut out = Vec::new();
        let mut writer = EndianWriter::new(&mut out, Endianness::Big);
        writer.write_zeros(10_000).unwrap();
        assert_eq!(writer.position(), 10_000);
        assert_eq!(out.len(), 10_000);
        assert!(out.iter().all(|&x| x == 0));
    }

    #[quickcheck]
    fn f32_bits_round_trip(bits: u32, big: bool) -> bool {
        let endianness = if big { Endianness::Big } else { Endianness::Little };
        round_trip_f32(bits, endianness) == bits
    }

    #[quickcheck]
    fn integers_round_trip(a: i64, b: u64, c: i16, big: bool) -> bool {
        let endianness = if big { Endianness::Big } else { Endianness::Little };
        let mut out = Vec::new();
        let mut writer = EndianWriter::new(&mut out, endianness);
        writer.write_i64(a).unwrap();
        writer.write_u64(b).unwrap();
        writer.write_i16(c).unwrap();
        let mut reader = EndianReader::new(out.as_slice(), endianness);
        reader.read_i64().unwrap() == a
            && reader.read_u64().unwrap() == b
            && reader.read_i16().unwrap() == c
            && reader.position() == 18
    }
}
