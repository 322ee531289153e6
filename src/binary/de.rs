use super::{EndianReader, NAME_LEN, SECTION_MAGIC, SESSION_MAGIC};
use crate::errors::UnsupportedKind;
use crate::{ArrayProperty, Error, ItemProperty, PropertyType, SaveSection, Session, Value};
use std::io::Read;
use tracing::{debug, trace};

/// Upper bound on capacity reserved up front from a count in the input.
/// Larger counts still decode, the vectors just grow as data arrives.
const MAX_PREALLOCATION: usize = 1024;

pub(crate) fn read_section<R: Read>(reader: &mut EndianReader<R>) -> Result<SaveSection, Error> {
    expect_magic(reader, SECTION_MAGIC)?;
    let _marker = reader.read_i32()?;

    let version = reader.read_i32()?;
    let name = read_name(reader)?;
    let session_count = read_count(reader, "session")?;

    let mut sessions = Vec::with_capacity(session_count.min(MAX_PREALLOCATION));
    for _ in 0..session_count {
        sessions.push(read_session(reader)?);
    }

    // trailing padding is part of the save and re-emitted on encode
    let structure = reader.position();
    let padding = reader.skip_to_end()?;

    let mut section = SaveSection::with_version(name, sessions, version);
    section.length = Some(reader.position() as i64);

    debug!(
        name = %section.name,
        sessions = section.sessions.len(),
        bytes = structure,
        padding,
        "read binary save section"
    );
    Ok(section)
}

fn expect_magic<R: Read, const N: usize>(
    reader: &mut EndianReader<R>,
    expected: &[u8; N],
) -> Result<(), Error> {
    let offset = reader.position();
    let found = reader.read_array::<N>()?;
    if &found != expected {
        return Err(Error::invalid_format_at(
            format!(
                "expected magic {:?} but found {:?}",
                String::from_utf8_lossy(expected),
                String::from_utf8_lossy(&found)
            ),
            offset,
        ));
    }

    Ok(())
}

/// ASCII decode of the fixed name buffer with trailing NULs removed. Bytes
/// outside of ASCII decode as `?`.
fn read_name<R: Read>(reader: &mut EndianReader<R>) -> Result<String, Error> {
    let data = reader.read_array::<NAME_LEN>()?;
    let name: String = data
        .iter()
        .map(|&x| if x.is_ascii() { char::from(x) } else { '?' })
        .collect();
    Ok(name.trim_end_matches('\0').to_string())
}

fn read_count<R: Read>(reader: &mut EndianReader<R>, what: &str) -> Result<usize, Error> {
    let offset = reader.position();
    let count = reader.read_i32()?;
    usize::try_from(count)
        .map_err(|_| Error::invalid_format_at(format!("negative {} count: {}", what, count), offset))
}

fn read_kind<R: Read>(reader: &mut EndianReader<R>) -> Result<PropertyType, Error> {
    let code = reader.read_i32()?;
    PropertyType::from_code(code).ok_or_else(|| Error::unsupported_kind(UnsupportedKind::Code(code)))
}

fn read_session<R: Read>(reader: &mut EndianReader<R>) -> Result<Session, Error> {
    let offset = reader.position();
    expect_magic(reader, SESSION_MAGIC)?;

    let id = reader.read_u32()?;
    let instance_id = reader.read_u32()?;
    let item_count = read_count(reader, "item")?;
    let array_count = read_count(reader, "array")?;

    trace!(id, instance_id, item_count, array_count, offset, "reading session");

    let mut items = Vec::with_capacity(item_count.min(MAX_PREALLOCATION));
    for _ in 0..item_count {
        items.push(read_item(reader)?);
    }

    let mut arrays = Vec::with_capacity(array_count.min(MAX_PREALLOCATION));
    for _ in 0..array_count {
        arrays.push(read_array(reader)?);
    }

    Ok(Session::with_properties(id, instance_id, items, arrays))
}

fn read_item<R: Read>(reader: &mut EndianReader<R>) -> Result<ItemProperty, Error> {
    let id = reader.read_u32()?;
    let offset = reader.position();
    let kind = read_kind(reader)?;
    if !kind.is_value() {
        return Err(Error::invalid_format_at(
            format!("item {} has the collection type", id),
            offset,
        ));
    }

    let value = read_value(reader, kind)?;
    Ok(ItemProperty::new(id, value))
}

fn read_array<R: Read>(reader: &mut EndianReader<R>) -> Result<ArrayProperty, Error> {
    let id = reader.read_u32()?;
    let offset = reader.position();
    let kind = reader.read_i32()?;
    if kind != PropertyType::Collection.code() {
        return Err(Error::invalid_format_at(
            format!("array {} has a non-collection type tag: 0x{:02x}", id, kind),
            offset,
        ));
    }

    let contained_offset = reader.position();
    let contained_type = read_kind(reader)?;
    let mut array = ArrayProperty::new(id, contained_type)
        .map_err(|e| Error::invalid_format_at(e.to_string(), contained_offset))?;

    let count = read_count(reader, "array value")?;
    for _ in 0..count {
        array.push(read_value(reader, contained_type)?)?;
    }

    Ok(array)
}

fn read_value<R: Read>(reader: &mut EndianReader<R>, kind: PropertyType) -> Result<Value, Error> {
    match kind {
        PropertyType::Bool => reader.read_bool().map(Value::Bool),
        PropertyType::Int => reader.read_i32().map(Value::Int),
        PropertyType::Uint => reader.read_u32().map(Value::Uint),
        PropertyType::Uint64 => reader.read_u64().map(Value::Uint64),
        PropertyType::Float => reader.read_f32().map(Value::Float),
        PropertyType::Collection => Err(kind.unsupported()),
    }
}
