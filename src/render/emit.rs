//! SVG writing helpers for quick-xml.
//!
//! Provides:
//! - `AttrList`: attribute builder that owns formatted values
//! - `SvgEmitter`: element/text writing helpers

use std::io::Write;

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::RenderError;

/// Formats a coordinate with at most two decimals and no trailing zeros.
pub fn coord(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_string(),
        _ => text.to_string(),
    }
}

/// A list of attributes with owned values.
///
/// Owns every formatted value until the element is written, which sidesteps
/// the borrow of `ElementWriter::with_attribute`.
#[derive(Debug, Default)]
pub struct AttrList {
    attrs: Vec<(&'static str, String)>,
}

impl AttrList {
    pub fn new() -> Self {
        Self { attrs: Vec::new() }
    }

    pub fn add(&mut self, key: &'static str, value: impl AsRef<str>) -> &mut Self {
        self.attrs.push((key, value.as_ref().to_string()));
        self
    }

    /// Add a coordinate or length attribute.
    pub fn add_f64(&mut self, key: &'static str, value: f64) -> &mut Self {
        self.attrs.push((key, coord(value)));
        self
    }

    pub fn add_u32(&mut self, key: &'static str, value: u32) -> &mut Self {
        self.attrs.push((key, value.to_string()));
        self
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    fn start<'a>(&self, name: &'a str) -> BytesStart<'a> {
        let mut start = BytesStart::new(name);
        for (key, value) in &self.attrs {
            start.push_attribute((*key, value.as_str()));
        }
        start
    }
}

/// Wraps a quick-xml writer with the few element shapes an SVG needs.
pub struct SvgEmitter<'a, W: Write> {
    writer: &'a mut Writer<W>,
}

impl<'a, W: Write> SvgEmitter<'a, W> {
    pub fn new(writer: &'a mut Writer<W>) -> Self {
        Self { writer }
    }

    pub fn xml_decl(&mut self) -> Result<(), RenderError> {
        let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
        self.writer.write_event(Event::Decl(decl))?;
        Ok(())
    }

    /// `<name attr="value">`
    pub fn open(&mut self, name: &str, attrs: &AttrList) -> Result<(), RenderError> {
        self.writer.write_event(Event::Start(attrs.start(name)))?;
        Ok(())
    }

    /// `</name>`
    pub fn close(&mut self, name: &str) -> Result<(), RenderError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// `<name attr="value"/>`
    pub fn empty(&mut self, name: &str, attrs: &AttrList) -> Result<(), RenderError> {
        self.writer.write_event(Event::Empty(attrs.start(name)))?;
        Ok(())
    }

    /// `<name attr="value">text</name>`
    ///
    /// Only markup characters are escaped so quotes in titles stay readable.
    pub fn text(&mut self, name: &str, attrs: &AttrList, text: &str) -> Result<(), RenderError> {
        self.open(name, attrs)?;
        let escaped = partial_escape(text);
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(escaped)))?;
        self.close(name)
    }
}
