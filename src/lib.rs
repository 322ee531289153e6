/*!

A lossless transcoder for `!FSGSAVE` save files, converting the binary format
into an editable XML document and back again.

## Features

- ✔ Lossless: every value survives a conversion to XML and back, and a decoded binary
  save re-encodes byte for byte
- ✔ Strict: malformed input is rejected with the offset of the problem
- ✔ Streaming: codecs read from any [`Read`](std::io::Read) and write to any [`Write`](std::io::Write)
- ✔ Safe: counts in the input never drive allocations past what the data backs

## Quick Start

A save is a [`SaveSection`] made up of [`Session`]s, each holding typed items
and homogeneous arrays.

```rust
use fsgsave::{ArrayProperty, BinaryCodec, ItemProperty, PropertyType, SaveSection, Session, Value, XmlCodec};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let session = Session::with_properties(
    1,
    2,
    vec![ItemProperty::new(3, Value::Uint(10)).named("gold")],
    vec![ArrayProperty::from_values(4, PropertyType::Bool, vec![Value::Bool(true)])?],
);
let save = SaveSection::new("Tests", vec![session]);

let mut binary = Vec::new();
BinaryCodec::new().serialize(&mut binary, &save)?;

let decoded = BinaryCodec::new().deserialize(binary.as_slice())?;
assert_eq!(decoded.length, Some(binary.len() as i64));

let mut xml = Vec::new();
XmlCodec::new().serialize(&mut xml, &decoded)?;

let mut roundtrip = XmlCodec::new().deserialize(xml.as_slice())?;
roundtrip.length = decoded.length;

let mut out = Vec::new();
BinaryCodec::new().serialize(&mut out, &roundtrip)?;
assert_eq!(out, binary);
# Ok(())
# }
```

## Length

Binary saves are commonly zero padded to a fixed size. Decoding a binary save
reads through the padding and records the full input length in
[`SaveSection::length`], and encoding zero pads the output up to `length` when
it exceeds the encoded size, so a decoded save re-encodes to the same bytes.
The XML format has no notion of padding so the length is left unset when
decoding XML and must be restored by the caller for a byte exact round trip.

## Format detection

When the format of an input is unknown, [`Format::detect`] sniffs the start
of the data and [`Format::codec`] returns a matching [`SaveCodec`].

```rust
use fsgsave::Format;

let data = b"<?xml version=\"1.0\" encoding=\"utf-8\"?><SaveSection/>";
let format = Format::detect(data).unwrap();
assert_eq!(format, Format::Xml);

let save = format.codec().deserialize(&mut &data[..]).unwrap();
assert_eq!(save.session_count(), 0);
```
*/

pub mod binary;
mod codec;
mod errors;
mod scalar;
mod tree;
pub(crate) mod util;
mod value;
pub mod xml;

pub use self::binary::BinaryCodec;
pub use self::codec::{Format, SaveCodec};
pub use self::errors::*;
pub use self::scalar::ScalarError;
pub use self::tree::*;
pub use self::value::*;
pub use self::xml::XmlCodec;
