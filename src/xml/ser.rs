use super::{attribute, element};
use crate::{ArrayProperty, Error, ItemProperty, Property, PropertyType, SaveSection, Session};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;
use tracing::{debug, trace};

pub(crate) struct XmlSerializer<W: Write> {
    writer: Writer<W>,
}

impl<W> XmlSerializer<W>
where
    W: Write,
{
    pub(crate) fn new(writer: Writer<W>) -> Self {
        XmlSerializer { writer }
    }

    pub(crate) fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    pub(crate) fn write_document(
        &mut self,
        section: &SaveSection,
        declaration: bool,
    ) -> Result<(), Error> {
        if declaration {
            let decl = BytesDecl::new("1.0", Some("utf-8"), None);
            self.writer.write_event(Event::Decl(decl))?;
        }

        self.write_section(section)?;
        debug!(
            name = %section.name,
            sessions = section.sessions.len(),
            "wrote xml save section"
        );
        Ok(())
    }

    fn write_section(&mut self, section: &SaveSection) -> Result<(), Error> {
        let version = section.version.to_string();
        let session_count = section.session_count().to_string();
        let start = BytesStart::new(element::SECTION).with_attributes([
            (attribute::NAME, section.name.as_str()),
            (attribute::VERSION, version.as_str()),
            (attribute::SESSION_COUNT, session_count.as_str()),
        ]);

        self.write_container(start, section.sessions.is_empty(), |ser| {
            section
                .sessions
                .iter()
                .try_for_each(|session| ser.write_session(session))
        })
    }

    fn write_session(&mut self, session: &Session) -> Result<(), Error> {
        trace!(id = session.id, instance_id = session.instance_id, "writing session");

        let id = session.id.to_string();
        let instance_id = session.instance_id.to_string();
        let item_count = session.item_count().to_string();
        let array_count = session.array_count().to_string();
        let start = BytesStart::new(element::SESSION).with_attributes([
            (attribute::ID, id.as_str()),
            (attribute::INSTANCE_ID, instance_id.as_str()),
            (
                attribute::INSTANCE_NAME,
                session.instance_name.as_deref().unwrap_or_default(),
            ),
            (attribute::NAME, session.name.as_deref().unwrap_or_default()),
            (attribute::ITEM_COUNT, item_count.as_str()),
            (attribute::ARRAY_COUNT, array_count.as_str()),
        ]);

        let is_empty = session.items.is_empty() && session.arrays.is_empty();
        self.write_container(start, is_empty, |ser| {
            for item in &session.items {
                ser.write_item(item)?;
            }

            for array in &session.arrays {
                ser.write_array(array)?;
            }

            Ok(())
        })
    }

    fn write_item(&mut self, item: &ItemProperty) -> Result<(), Error> {
        let id = item.id().to_string();
        let start = BytesStart::new(element::PROPERTY).with_attributes([
            (attribute::ID, id.as_str()),
            (attribute::TYPE, item.kind().name()),
            (attribute::NAME, item.name().unwrap_or_default()),
        ]);

        let text = item.kind().format(item.value())?;
        self.write_text_element(start, &text)
    }

    fn write_array(&mut self, array: &ArrayProperty) -> Result<(), Error> {
        let id = array.id().to_string();
        let count = array.len().to_string();
        let start = BytesStart::new(element::PROPERTY).with_attributes([
            (attribute::ID, id.as_str()),
            (attribute::TYPE, PropertyType::Collection.name()),
            (attribute::NAME, array.name().unwrap_or_default()),
            (attribute::CONTAINED_TYPE, array.contained_type().name()),
            (attribute::COUNT, count.as_str()),
        ]);

        let contained = array.contained_type();
        self.write_container(start, array.is_empty(), |ser| {
            for value in array.values() {
                let text = contained.format(value)?;
                ser.write_text_element(BytesStart::new(element::VALUE), &text)?;
            }
            Ok(())
        })
    }

    /// Childless containers are written as a self closing tag
    fn write_container<F>(&mut self, start: BytesStart, is_empty: bool, body: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Error>,
    {
        if is_empty {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        let end = start.to_end().into_owned();
        self.writer.write_event(Event::Start(start))?;
        body(self)?;
        self.writer.write_event(Event::End(end))?;
        Ok(())
    }

    fn write_text_element(&mut self, start: BytesStart, text: &str) -> Result<(), Error> {
        let end: BytesEnd<'static> = start.to_end().into_owned();
        self.writer.write_event(Event::Start(start))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer.write_event(Event::End(end))?;
        Ok(())
    }
}
