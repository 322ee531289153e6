use super::{attribute, element};
use crate::{scalar, ArrayProperty, Error, ItemProperty, PropertyType, SaveSection, Session, Value};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;
use tracing::{debug, trace};

/// Upper bound on capacity reserved up front from a count attribute
const MAX_PREALLOCATION: usize = 1024;

enum Child {
    /// A child element and whether it was self closing
    Element(BytesStart<'static>, bool),

    /// The parent element was closed
    End,

    /// The document ended while the parent was still open
    Eof,
}

pub(crate) struct XmlDeserializer<B: BufRead> {
    reader: Reader<B>,
    buf: Vec<u8>,
}

impl<B> XmlDeserializer<B>
where
    B: BufRead,
{
    pub(crate) fn new(inner: B) -> Self {
        let mut reader = Reader::from_reader(inner);
        reader.config_mut().trim_text(true);
        XmlDeserializer {
            reader,
            buf: Vec::new(),
        }
    }

    pub(crate) fn read_document(&mut self) -> Result<SaveSection, Error> {
        loop {
            match self.next_child()? {
                Child::Element(start, empty) if start.name().as_ref() == element::SECTION.as_bytes() => {
                    let section = self.read_section(&start, empty)?;
                    debug!(
                        name = %section.name,
                        sessions = section.sessions.len(),
                        "read xml save section"
                    );
                    return Ok(section);
                }

                // descend into unrelated elements looking for the section
                Child::Element(..) | Child::End => {}
                Child::Eof => {
                    return Err(Error::invalid_format(format!(
                        "no <{}> element found",
                        element::SECTION
                    )))
                }
            }
        }
    }

    fn position(&self) -> usize {
        self.reader.buffer_position() as usize
    }

    fn next_event(&mut self) -> Result<Event<'static>, Error> {
        self.buf.clear();
        let event = self.reader.read_event_into(&mut self.buf)?;
        Ok(event.into_owned())
    }

    fn next_child(&mut self) -> Result<Child, Error> {
        loop {
            match self.next_event()? {
                Event::Start(e) => return Ok(Child::Element(e, false)),
                Event::Empty(e) => return Ok(Child::Element(e, true)),
                Event::End(_) => return Ok(Child::End),
                Event::Eof => return Ok(Child::Eof),
                _ => {}
            }
        }
    }

    fn skip(&mut self, start: &BytesStart, empty: bool) -> Result<(), Error> {
        if !empty {
            self.reader.read_to_end_into(start.name(), &mut self.buf)?;
        }
        Ok(())
    }

    /// Consume everything up to and including the end of the current element
    fn finish(&mut self, name: &str) -> Result<(), Error> {
        loop {
            match self.next_child()? {
                Child::Element(start, empty) => self.skip(&start, empty)?,
                Child::End => return Ok(()),
                Child::Eof => return Err(self.truncated(name)),
            }
        }
    }

    fn truncated(&self, name: &str) -> Error {
        Error::invalid_format_at(
            format!("<{}> ended before all of its declared children", name),
            self.position(),
        )
    }

    fn read_section(&mut self, start: &BytesStart, empty: bool) -> Result<SaveSection, Error> {
        let name = string_attribute(start, attribute::NAME)?;
        let version = attribute_value(start, attribute::VERSION)?
            .and_then(|x| scalar::to_i32(&x).ok())
            .unwrap_or(SaveSection::DEFAULT_VERSION);
        let session_count = count_attribute(start, attribute::SESSION_COUNT)?;

        let mut sessions = Vec::with_capacity(session_count.min(MAX_PREALLOCATION));
        if empty {
            if session_count != 0 {
                return Err(self.truncated(element::SECTION));
            }
            return Ok(SaveSection::with_version(name, sessions, version));
        }

        while sessions.len() < session_count {
            match self.next_child()? {
                Child::Element(e, empty) if e.name().as_ref() == element::SESSION.as_bytes() => {
                    sessions.push(self.read_session(&e, empty)?);
                }
                Child::Element(e, empty) => self.skip(&e, empty)?,
                Child::End | Child::Eof => return Err(self.truncated(element::SECTION)),
            }
        }

        self.finish(element::SECTION)?;
        Ok(SaveSection::with_version(name, sessions, version))
    }

    fn read_session(&mut self, start: &BytesStart, empty: bool) -> Result<Session, Error> {
        let mut session = Session::new(
            id_attribute(start, attribute::ID)?,
            id_attribute(start, attribute::INSTANCE_ID)?,
        );
        session.name = Some(string_attribute(start, attribute::NAME)?);
        session.instance_name = Some(string_attribute(start, attribute::INSTANCE_NAME)?);

        let item_count = count_attribute(start, attribute::ITEM_COUNT)?;
        let array_count = count_attribute(start, attribute::ARRAY_COUNT)?;
        trace!(
            id = session.id,
            instance_id = session.instance_id,
            item_count,
            array_count,
            "reading session"
        );

        if empty {
            if item_count != 0 || array_count != 0 {
                return Err(self.truncated(element::SESSION));
            }
            return Ok(session);
        }

        session.items.reserve(item_count.min(MAX_PREALLOCATION));
        session.arrays.reserve(array_count.min(MAX_PREALLOCATION));
        while session.items.len() < item_count || session.arrays.len() < array_count {
            match self.next_child()? {
                Child::Element(e, empty) if e.name().as_ref() == element::PROPERTY.as_bytes() => {
                    if session.items.len() < item_count {
                        let item = self.read_item(&e, empty)?;
                        session.items.push(item);
                    } else {
                        let array = self.read_array(&e, empty)?;
                        session.arrays.push(array);
                    }
                }
                Child::Element(e, empty) => self.skip(&e, empty)?,
                Child::End | Child::Eof => return Err(self.truncated(element::SESSION)),
            }
        }

        self.finish(element::SESSION)?;
        Ok(session)
    }

    fn read_item(&mut self, start: &BytesStart, empty: bool) -> Result<ItemProperty, Error> {
        let id = id_attribute(start, attribute::ID)?;
        let name = string_attribute(start, attribute::NAME)?;
        let kind = self.kind_attribute(start, attribute::TYPE)?;
        if !kind.is_value() {
            return Err(Error::invalid_format_at(
                format!("item {} has the collection type", id),
                self.position(),
            ));
        }

        let value = self.read_value(element::PROPERTY, kind, empty)?;
        Ok(ItemProperty::new(id, value).named(name))
    }

    fn read_array(&mut self, start: &BytesStart, empty: bool) -> Result<ArrayProperty, Error> {
        let id = id_attribute(start, attribute::ID)?;
        let name = string_attribute(start, attribute::NAME)?;
        let kind = self.kind_attribute(start, attribute::TYPE)?;
        if kind != PropertyType::Collection {
            return Err(Error::invalid_format_at(
                format!("array {} has a non-collection type: {}", id, kind),
                self.position(),
            ));
        }

        let contained_type = self.kind_attribute(start, attribute::CONTAINED_TYPE)?;
        let mut array = ArrayProperty::new(id, contained_type)
            .map_err(|e| Error::invalid_format_at(e.to_string(), self.position()))?
            .named(name);
        let count = count_attribute(start, attribute::COUNT)?;

        if empty {
            if count != 0 {
                return Err(self.truncated(element::PROPERTY));
            }
            return Ok(array);
        }

        while array.len() < count {
            match self.next_child()? {
                Child::Element(e, empty) if e.name().as_ref() == element::VALUE.as_bytes() => {
                    let value = self.read_value(element::VALUE, contained_type, empty)?;
                    array.push(value)?;
                }
                Child::Element(e, empty) => self.skip(&e, empty)?,
                Child::End | Child::Eof => return Err(self.truncated(element::PROPERTY)),
            }
        }

        self.finish(element::PROPERTY)?;
        Ok(array)
    }

    /// Read the text content of the current element through its end tag
    fn read_value(
        &mut self,
        name: &'static str,
        kind: PropertyType,
        empty: bool,
    ) -> Result<Value, Error> {
        if empty {
            return Err(Error::missing_value(name));
        }

        let mut text = String::new();
        loop {
            match self.next_event()? {
                Event::Text(e) => text.push_str(&e.unescape().map_err(quick_xml::Error::from)?),
                Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
                Event::Start(e) => self.skip(&e, false)?,
                Event::End(_) => break,
                Event::Eof => return Err(self.truncated(name)),
                _ => {}
            }
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(Error::missing_value(name));
        }

        kind.parse(text)?.ok_or_else(|| {
            Error::invalid_format_at(
                format!("<{}> text {:?} is not a valid {}", name, text, kind),
                self.position(),
            )
        })
    }

    fn kind_attribute(&self, start: &BytesStart, key: &str) -> Result<PropertyType, Error> {
        let text = attribute_value(start, key)?.unwrap_or_default();
        text.parse::<PropertyType>().map_err(|_| {
            Error::invalid_format_at(
                format!("invalid {} attribute: {:?}", key, text),
                self.position(),
            )
        })
    }
}

fn attribute_value(start: &BytesStart, key: &str) -> Result<Option<String>, Error> {
    match start.try_get_attribute(key)? {
        Some(attr) => {
            let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

fn string_attribute(start: &BytesStart, key: &str) -> Result<String, Error> {
    Ok(attribute_value(start, key)?.unwrap_or_default())
}

fn id_attribute(start: &BytesStart, key: &str) -> Result<u32, Error> {
    Ok(attribute_value(start, key)?
        .and_then(|x| scalar::to_u32(&x).ok())
        .unwrap_or(0))
}

fn count_attribute(start: &BytesStart, key: &str) -> Result<usize, Error> {
    Ok(attribute_value(start, key)?
        .and_then(|x| scalar::to_u32(&x).ok())
        .map_or(0, |x| x as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, Property};
    use rstest::*;

    fn read(data: &str) -> Result<SaveSection, Error> {
        XmlDeserializer::new(data.as_bytes()).read_document()
    }

    #[test]
    fn compact_document() {
        let data = r#"<?xml version="1.0" encoding="utf-8"?>
<!-- exported -->
<SaveSection Name="Tests" Version="4" SessionCount="1">
  <Session ID="1" InstanceID="2" InstanceName="inst" ItemCount="1" ArrayCount="1">
    <Property ID="3" Type="Uint64" Name="big">18446744073709551615</Property>
    <Property ID="4" Type="Collection" ContainedType="Bool" Count="2">
      <Value>True</Value>
      <Value><![CDATA[false]]></Value>
    </Property>
  </Session>
</SaveSection>"#;

        let section = read(data).unwrap();
        assert_eq!(section.name, "Tests");
        assert_eq!(section.version, 4);
        assert_eq!(section.length, None);

        let session = &section.sessions[0];
        assert_eq!(session.instance_name.as_deref(), Some("inst"));
        assert_eq!(session.name.as_deref(), Some(""));
        assert_eq!(session.items[0].name(), Some("big"));
        assert_eq!(session.items[0].value(), &Value::Uint64(u64::MAX));
        assert_eq!(session.arrays[0].name(), Some(""));
        assert_eq!(
            session.arrays[0].values(),
            &[Value::Bool(true), Value::Bool(false)]
        );
    }

    #[test]
    fn attribute_defaults() {
        let section = read(r#"<SaveSection SessionCount="1"><Session/></SaveSection>"#).unwrap();
        assert_eq!(section.name, "");
        assert_eq!(section.version, 1);
        assert_eq!(section.sessions[0].id, 0);
        assert_eq!(section.sessions[0].instance_id, 0);
    }

    #[test]
    fn routing_is_positional() {
        // the first property is read as an item regardless of its attributes
        let data = r#"<SaveSection SessionCount="1">
  <Session ItemCount="1" ArrayCount="1">
    <Property ID="3" Type="Int">5</Property>
    <Property ID="4" Type="Collection" ContainedType="Int" Count="0"/>
  </Session>
</SaveSection>"#;
        let section = read(data).unwrap();
        assert_eq!(section.sessions[0].items.len(), 1);
        assert_eq!(section.sessions[0].arrays.len(), 1);

        let swapped = r#"<SaveSection SessionCount="1">
  <Session ItemCount="1" ArrayCount="1">
    <Property ID="4" Type="Collection" ContainedType="Int" Count="0"/>
    <Property ID="3" Type="Int">5</Property>
  </Session>
</SaveSection>"#;
        let err = read(swapped).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
    }

    #[test]
    fn undercount_skips_trailing_children() {
        let data = r#"<SaveSection SessionCount="1">
  <Session ItemCount="1" ArrayCount="0">
    <Property ID="3" Type="Int">5</Property>
    <Property ID="5" Type="Int">6</Property>
    <Unknown><Property ID="7" Type="Int">7</Property></Unknown>
  </Session>
  <Session ID="9"/>
</SaveSection>"#;
        let section = read(data).unwrap();
        assert_eq!(section.sessions.len(), 1);
        assert_eq!(section.sessions[0].items.len(), 1);
        assert_eq!(section.sessions[0].items[0].id(), 3);
    }

    #[rstest]
    #[case(r#"<SaveSection SessionCount="2"><Session/></SaveSection>"#)]
    #[case(r#"<SaveSection SessionCount="1"/>"#)]
    #[case(r#"<SaveSection SessionCount="1"><Session ItemCount="2"><Property Type="Int">1</Property></Session></SaveSection>"#)]
    #[case(r#"<SaveSection SessionCount="1"><Session ArrayCount="1"><Property Type="Collection" ContainedType="Int" Count="2"><Value>1</Value></Property></Session></SaveSection>"#)]
    #[case(r#"<SaveSection SessionCount="1"><Session ItemCount="1">"#)]
    fn overcount_is_invalid(#[case] data: &str) {
        let err = read(data).unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::InvalidFormat { .. }),
            "unexpected error: {}",
            err
        );
    }

    #[rstest]
    #[case(r#"<Property Type="Int"></Property>"#, "Property")]
    #[case(r#"<Property Type="Int"/>"#, "Property")]
    #[case(r#"<Property Type="Int">   </Property>"#, "Property")]
    fn missing_item_value(#[case] property: &str, #[case] element: &str) {
        let data = format!(
            r#"<SaveSection SessionCount="1"><Session ItemCount="1">{}</Session></SaveSection>"#,
            property
        );
        let err = read(&data).unwrap_err();
        match err.kind() {
            ErrorKind::MissingValue { element: actual } => assert_eq!(*actual, element),
            _ => panic!("unexpected error: {}", err),
        }
    }

    #[test]
    fn missing_array_value() {
        let data = r#"<SaveSection SessionCount="1"><Session ArrayCount="1"><Property Type="Collection" ContainedType="Int" Count="1"><Value/></Property></Session></SaveSection>"#;
        let err = read(data).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::MissingValue { element: "Value" }
        ));
    }

    #[rstest]
    #[case(r#"<Property Type="Int">abc</Property>"#)]
    #[case(r#"<Property Type="Uint">-1</Property>"#)]
    #[case(r#"<Property Type="Bool">yes</Property>"#)]
    #[case(r#"<Property Type="Widget">1</Property>"#)]
    #[case(r#"<Property>1</Property>"#)]
    #[case(r#"<Property Type="Collection" ContainedType="Int" Count="0"/>"#)]
    fn invalid_items(#[case] property: &str) {
        let data = format!(
            r#"<SaveSection SessionCount="1"><Session ItemCount="1">{}</Session></SaveSection>"#,
            property
        );
        let err = read(&data).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
    }

    #[rstest]
    #[case(r#"<Property Type="Int" ContainedType="Int" Count="0"/>"#)]
    #[case(r#"<Property Type="Collection" ContainedType="Collection" Count="0"/>"#)]
    #[case(r#"<Property Type="Collection" Count="0"/>"#)]
    fn invalid_arrays(#[case] property: &str) {
        let data = format!(
            r#"<SaveSection SessionCount="1"><Session ArrayCount="1">{}</Session></SaveSection>"#,
            property
        );
        let err = read(&data).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
    }

    #[test]
    fn no_section() {
        let err = read(r#"<?xml version="1.0"?><Other/>"#).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));

        let err = read("").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
    }

    #[test]
    fn nested_section() {
        let section = read(r#"<Wrapper><SaveSection Name="inner"/></Wrapper>"#).unwrap();
        assert_eq!(section.name, "inner");
    }

    #[test]
    fn escaped_text_and_names() {
        let data = r#"<SaveSection Name="a&amp;b" SessionCount="1"><Session ItemCount="1"><Property Type="Float" Name="&lt;x&gt;">1,000.5</Property></Session></SaveSection>"#;
        let section = read(data).unwrap();
        assert_eq!(section.name, "a&b");
        assert_eq!(section.sessions[0].items[0].name(), Some("<x>"));
        assert_eq!(section.sessions[0].items[0].value(), &Value::Float(1000.5));
    }
}
