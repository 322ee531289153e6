use crate::binary::{BinaryCodec, SECTION_MAGIC};
use crate::xml::XmlCodec;
use crate::{Error, SaveSection};
use std::io::{Read, Write};

/// A codec that maps a [`SaveSection`] to and from a byte stream
///
/// The stream is only borrowed for the duration of the call.
pub trait SaveCodec {
    /// Encode the section into the writer
    fn serialize(&self, writer: &mut dyn Write, save: &SaveSection) -> Result<(), Error>;

    /// Decode a section from the reader
    fn deserialize(&self, reader: &mut dyn Read) -> Result<SaveSection, Error>;
}

impl SaveCodec for BinaryCodec {
    fn serialize(&self, writer: &mut dyn Write, save: &SaveSection) -> Result<(), Error> {
        BinaryCodec::serialize(self, writer, save)
    }

    fn deserialize(&self, reader: &mut dyn Read) -> Result<SaveSection, Error> {
        BinaryCodec::deserialize(self, reader)
    }
}

impl SaveCodec for XmlCodec {
    fn serialize(&self, writer: &mut dyn Write, save: &SaveSection) -> Result<(), Error> {
        XmlCodec::serialize(self, writer, save)
    }

    fn deserialize(&self, reader: &mut dyn Read) -> Result<SaveSection, Error> {
        XmlCodec::deserialize(self, reader)
    }
}

/// The encoding of a save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `!FSGSAVE` binary
    Binary,

    /// xml document
    Xml,
}

impl Format {
    /// Sniff the format from the start of a file.
    ///
    /// ```
    /// use fsgsave::Format;
    ///
    /// assert_eq!(Format::detect(b"!FSGSAVE\x00\x00\x01\x00"), Some(Format::Binary));
    /// assert_eq!(Format::detect(b"\xef\xbb\xbf\n  <?xml version=\"1.0\"?>"), Some(Format::Xml));
    /// assert_eq!(Format::detect(b"<SaveSection Name=\"a\"/>"), Some(Format::Xml));
    /// assert_eq!(Format::detect(b"PK\x03\x04"), None);
    /// ```
    pub fn detect(data: &[u8]) -> Option<Format> {
        if data.starts_with(SECTION_MAGIC) {
            return Some(Format::Binary);
        }

        let data = data.strip_prefix(b"\xef\xbb\xbf").unwrap_or(data);
        let start = data.iter().position(|x| !x.is_ascii_whitespace())?;
        let data = &data[start..];
        if data.starts_with(b"<?xml") || data.starts_with(b"<SaveSection") {
            Some(Format::Xml)
        } else {
            None
        }
    }

    /// The default codec for this format
    pub fn codec(&self) -> Box<dyn SaveCodec> {
        match self {
            Format::Binary => Box::new(BinaryCodec::new()),
            Format::Xml => Box::new(XmlCodec::new()),
        }
    }

    /// The format a save is converted into
    pub fn opposite(&self) -> Format {
        match self {
            Format::Binary => Format::Xml,
            Format::Xml => Format::Binary,
        }
    }

    /// Conventional file extension (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Binary => "sav",
            Format::Xml => "xml",
        }
    }
}
