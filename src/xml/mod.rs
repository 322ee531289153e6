//! Types for reading and writing the xml representation of a save
//!
//! ```text
//! <SaveSection Name Version SessionCount>
//!   <Session ID InstanceID InstanceName Name ItemCount ArrayCount>
//!     <Property ID Type Name>text</Property>
//!     <Property ID Type Name ContainedType Count><Value>text</Value>...</Property>
//!   </Session>
//! </SaveSection>
//! ```
//!
//! The count attributes are written from the data and, when reading, bound
//! how many child elements are consumed. The first `ItemCount` properties of
//! a session are read as items and the next `ArrayCount` as arrays.

mod de;
mod ser;

use crate::{Error, SaveSection};
use std::io::{BufReader, Read, Write};

pub(crate) mod element {
    pub const SECTION: &str = "SaveSection";
    pub const SESSION: &str = "Session";
    pub const PROPERTY: &str = "Property";
    pub const VALUE: &str = "Value";
}

pub(crate) mod attribute {
    pub const ID: &str = "ID";
    pub const NAME: &str = "Name";
    pub const INSTANCE_ID: &str = "InstanceID";
    pub const INSTANCE_NAME: &str = "InstanceName";
    pub const VERSION: &str = "Version";
    pub const COUNT: &str = "Count";
    pub const SESSION_COUNT: &str = "SessionCount";
    pub const ITEM_COUNT: &str = "ItemCount";
    pub const ARRAY_COUNT: &str = "ArrayCount";
    pub const TYPE: &str = "Type";
    pub const CONTAINED_TYPE: &str = "ContainedType";
}

/// Serializes and deserializes a [`SaveSection`] as xml
///
/// ```
/// use fsgsave::{xml::XmlCodec, ItemProperty, SaveSection, Session, Value};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let session = Session::with_properties(1, 2, vec![ItemProperty::new(3, Value::Int(-5))], vec![]);
/// let save = SaveSection::new("Tests", vec![session]);
///
/// let mut out = Vec::new();
/// XmlCodec::builder().indent_factor(0).declaration(false).build().serialize(&mut out, &save)?;
/// assert_eq!(
///     std::str::from_utf8(&out)?,
///     concat!(
///         r#"<SaveSection Name="Tests" Version="1" SessionCount="1">"#,
///         r#"<Session ID="1" InstanceID="2" InstanceName="" Name="" ItemCount="1" ArrayCount="0">"#,
///         r#"<Property ID="3" Type="Int" Name="">-5</Property>"#,
///         r#"</Session></SaveSection>"#,
///     )
/// );
///
/// let actual = XmlCodec::new().deserialize(out.as_slice())?;
/// assert_eq!(actual, save);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlCodec {
    indent_char: u8,
    indent_factor: usize,
    declaration: bool,
}

impl XmlCodec {
    /// Indented output with an xml declaration
    pub fn new() -> Self {
        XmlCodec::builder().build()
    }

    /// Customize the codec
    pub fn builder() -> XmlCodecBuilder {
        XmlCodecBuilder::default()
    }

    /// Write the section as an xml document. The section's length is not
    /// applicable to xml and is ignored.
    pub fn serialize<W>(&self, writer: W, save: &SaveSection) -> Result<(), Error>
    where
        W: Write,
    {
        let writer = if self.indent_factor == 0 {
            quick_xml::Writer::new(writer)
        } else {
            quick_xml::Writer::new_with_indent(writer, self.indent_char, self.indent_factor)
        };

        let mut ser = ser::XmlSerializer::new(writer);
        ser.write_document(save, self.declaration)?;
        ser.into_inner().flush()?;
        Ok(())
    }

    /// Read the first `<SaveSection>` of the document. The resulting length
    /// is left unset.
    pub fn deserialize<R>(&self, reader: R) -> Result<SaveSection, Error>
    where
        R: Read,
    {
        let mut de = de::XmlDeserializer::new(BufReader::new(reader));
        de.read_document()
    }
}

impl Default for XmlCodec {
    fn default() -> Self {
        XmlCodec::new()
    }
}

/// Construct a customized [`XmlCodec`]
#[derive(Debug, Clone)]
pub struct XmlCodecBuilder {
    indent_char: u8,
    indent_factor: usize,
    declaration: bool,
}

impl XmlCodecBuilder {
    /// The character to indent lines with.
    ///
    /// The default is a space.
    pub fn indent_char(&mut self, indent_char: u8) -> &mut XmlCodecBuilder {
        self.indent_char = indent_char;
        self
    }

    /// The number of indents per increased depth. Zero writes everything on
    /// a single line.
    ///
    /// The default is 2
    pub fn indent_factor(&mut self, indent_factor: usize) -> &mut XmlCodecBuilder {
        self.indent_factor = indent_factor;
        self
    }

    /// Whether to lead with `<?xml version="1.0" encoding="utf-8"?>`
    ///
    /// The default is true
    pub fn declaration(&mut self, declaration: bool) -> &mut XmlCodecBuilder {
        self.declaration = declaration;
        self
    }

    pub fn build(&self) -> XmlCodec {
        XmlCodec {
            indent_char: self.indent_char,
            indent_factor: self.indent_factor,
            declaration: self.declaration,
        }
    }
}

impl Default for XmlCodecBuilder {
    fn default() -> Self {
        XmlCodecBuilder {
            indent_char: b' ',
            indent_factor: 2,
            declaration: true,
        }
    }
}
