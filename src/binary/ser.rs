use super::{EndianWriter, NAME_LEN, SECTION_MAGIC, SECTION_MARKER, SESSION_MAGIC};
use crate::{ArrayProperty, Error, ItemProperty, Property, PropertyType, SaveSection, Session, Value};
use std::io::Write;
use tracing::{debug, trace};

pub(crate) fn write_section<W: Write>(
    writer: &mut EndianWriter<W>,
    section: &SaveSection,
) -> Result<(), Error> {
    writer.write_bytes(SECTION_MAGIC)?;
    writer.write_i32(SECTION_MARKER)?;
    writer.write_i32(section.version)?;
    writer.write_bytes(&name_buffer(&section.name))?;
    writer.write_i32(count(section.sessions.len(), "session")?)?;

    for session in &section.sessions {
        write_session(writer, session)?;
    }

    let natural = writer.position();
    if let Some(target) = section.length {
        let target = usize::try_from(target).unwrap_or(0);
        if target > natural {
            writer.write_zeros(target - natural)?;
        }
    }

    debug!(
        name = %section.name,
        sessions = section.sessions.len(),
        bytes = natural,
        padded = writer.position(),
        "wrote binary save section"
    );
    Ok(())
}

/// ASCII encode into the fixed buffer. Anything outside of ASCII becomes `?`
/// and names longer than the buffer are cut short.
fn name_buffer(name: &str) -> [u8; NAME_LEN] {
    let mut result = [0u8; NAME_LEN];
    for (dst, c) in result.iter_mut().zip(name.chars()) {
        *dst = if c.is_ascii() { c as u8 } else { b'?' };
    }
    result
}

fn count(len: usize, what: &str) -> Result<i32, Error> {
    i32::try_from(len).map_err(|_| Error::invalid_format(format!("too many {}s: {}", what, len)))
}

fn write_session<W: Write>(writer: &mut EndianWriter<W>, session: &Session) -> Result<(), Error> {
    trace!(
        id = session.id,
        instance_id = session.instance_id,
        offset = writer.position(),
        "writing session"
    );

    writer.write_bytes(SESSION_MAGIC)?;
    writer.write_u32(session.id)?;
    writer.write_u32(session.instance_id)?;
    writer.write_i32(count(session.items.len(), "item")?)?;
    writer.write_i32(count(session.arrays.len(), "array")?)?;

    for item in &session.items {
        write_item(writer, item)?;
    }

    for array in &session.arrays {
        write_array(writer, array)?;
    }

    Ok(())
}

fn write_item<W: Write>(writer: &mut EndianWriter<W>, item: &ItemProperty) -> Result<(), Error> {
    writer.write_u32(item.id())?;
    writer.write_i32(item.kind().code())?;
    write_value(writer, item.value())
}

fn write_array<W: Write>(writer: &mut EndianWriter<W>, array: &ArrayProperty) -> Result<(), Error> {
    writer.write_u32(array.id())?;
    writer.write_i32(PropertyType::Collection.code())?;
    writer.write_i32(array.contained_type().code())?;
    writer.write_i32(count(array.len(), "array value")?)?;

    for value in array.values() {
        write_value(writer, value)?;
    }

    Ok(())
}

fn write_value<W: Write>(writer: &mut EndianWriter<W>, value: &Value) -> Result<(), Error> {
    match *value {
        Value::Bool(x) => writer.write_bool(x),
        Value::Int(x) => writer.write_i32(x),
        Value::Uint(x) => writer.write_u32(x),
        Value::Uint64(x) => writer.write_u64(x),
        Value::Float(x) => writer.write_f32(x),
    }
}
