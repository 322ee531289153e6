//! Types for reading and writing the `!FSGSAVE` binary format
//!
//! All numbers are big-endian by default:
//!
//! ```text
//! "!FSGSAVE" 0x00000100 version:i32 name:[u8; 32] session_count:i32
//!   "SESS" id:u32 instance_id:u32 item_count:i32 array_count:i32
//!     id:u32 kind:i32 value            (per item)
//!     id:u32 0x0C contained:i32 count:i32 values...  (per array)
//! ```

mod de;
mod endian;
mod ser;

pub use self::endian::{EndianReader, EndianWriter, Endianness};

use crate::{Error, SaveSection};
use std::io::{Read, Write};

/// Leading bytes of every binary save
pub const SECTION_MAGIC: &[u8; 8] = b"!FSGSAVE";

/// Leading bytes of every session block
pub const SESSION_MAGIC: &[u8; 4] = b"SESS";

/// Constant written after the section magic
pub(crate) const SECTION_MARKER: i32 = 0x0100;

/// Bytes reserved for the section name
pub const NAME_LEN: usize = 0x20;

/// Serializes and deserializes a [`SaveSection`] in the binary format
///
/// ```
/// use fsgsave::{binary::BinaryCodec, SaveSection, Session};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let save = SaveSection::new("Tests", vec![Session::new(1, 2)]);
/// let codec = BinaryCodec::new();
///
/// let mut out = Vec::new();
/// codec.serialize(&mut out, &save)?;
/// assert_eq!(&out[..8], b"!FSGSAVE");
///
/// let actual = codec.deserialize(out.as_slice())?;
/// assert_eq!(actual, save);
/// assert_eq!(actual.length, Some(out.len() as i64));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryCodec {
    endianness: Endianness,
}

impl BinaryCodec {
    /// The codec for save files as the game writes them (big-endian)
    pub fn new() -> Self {
        BinaryCodec::builder().build()
    }

    /// Customize the codec
    pub fn builder() -> BinaryCodecBuilder {
        BinaryCodecBuilder::default()
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Write the section. If the section has a target length larger than
    /// the encoded data, the output is zero padded up to that length.
    pub fn serialize<W>(&self, writer: W, save: &SaveSection) -> Result<(), Error>
    where
        W: Write,
    {
        let mut writer = EndianWriter::new(writer, self.endianness);
        ser::write_section(&mut writer, save)?;
        writer.flush()
    }

    /// Read a section and drain the rest of the reader. The resulting length
    /// is the total number of bytes read, trailing padding included.
    pub fn deserialize<R>(&self, reader: R) -> Result<SaveSection, Error>
    where
        R: Read,
    {
        let mut reader = EndianReader::new(reader, self.endianness);
        de::read_section(&mut reader)
    }
}

impl Default for BinaryCodec {
    fn default() -> Self {
        BinaryCodec::new()
    }
}

/// Construct a customized [`BinaryCodec`]
#[derive(Debug, Clone)]
pub struct BinaryCodecBuilder {
    endianness: Endianness,
}

impl BinaryCodecBuilder {
    /// Byte order of every number in the format.
    ///
    /// The default is big-endian
    pub fn endianness(&mut self, endianness: Endianness) -> &mut BinaryCodecBuilder {
        self.endianness = endianness;
        self
    }

    pub fn build(&self) -> BinaryCodec {
        BinaryCodec {
            endianness: self.endianness,
        }
    }
}

impl Default for BinaryCodecBuilder {
    fn default() -> Self {
        BinaryCodecBuilder {
            endianness: Endianness::Big,
        }
    }
}
