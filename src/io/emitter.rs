//! Structural writer for control-file sections.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::Result;

/// A field name paired with its already formatted value.
pub type Field = (&'static str, String);

/// Sink for one section at a time.
///
/// Implementations write fields exactly in the order given, without
/// reordering, deduplication or any value formatting of their own.
pub trait SectionEmitter {
    /// Appends the section `title` holding `fields`.
    fn emit(&mut self, title: &str, fields: &[Field]) -> Result<()>;
}

/// XML emitter: one element per section, one child element per field.
///
/// The root element is opened by [`XmlSectionWriter::start`] and closed by
/// [`XmlSectionWriter::finish`], which hands back the underlying writer
/// without closing it.
pub struct XmlSectionWriter<W: Write> {
    writer: Writer<W>,
    root: &'static str,
}

impl<W: Write> XmlSectionWriter<W> {
    /// Opens `root` on `inner`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the start tag fails.
    pub fn start(inner: W, root: &'static str) -> Result<Self> {
        let mut writer = Writer::new_with_indent(inner, b' ', 2);
        writer.write_event(Event::Start(BytesStart::new(root)))?;
        Ok(Self { writer, root })
    }

    /// Closes the root element and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the end tag fails.
    pub fn finish(mut self) -> Result<W> {
        self.writer
            .write_event(Event::End(BytesEnd::new(self.root)))?;
        let mut inner = self.writer.into_inner();
        inner.write_all(b"\n")?;
        Ok(inner)
    }
}

impl<W: Write> SectionEmitter for XmlSectionWriter<W> {
    fn emit(&mut self, title: &str, fields: &[Field]) -> Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new(title)))?;
        for (name, value) in fields {
            self.writer
                .write_event(Event::Start(BytesStart::new(*name)))?;
            self.writer
                .write_event(Event::Text(BytesText::new(value)))?;
            self.writer.write_event(Event::End(BytesEnd::new(*name)))?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(title)))?;
        Ok(())
    }
}
