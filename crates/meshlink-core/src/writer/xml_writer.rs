//! Low-level XML emission, mirroring `parser::xml_parser`'s DOM layer in
//! reverse: a thin builder over `quick_xml::Writer` rather than a second
//! tree, since the writer already has the associativity graph to walk.

use crate::error::{MeshLinkError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(inner: W, indent_char: u8, indent_size: usize) -> Self {
        Self { writer: Writer::new_with_indent(inner, indent_char, indent_size) }
    }

    pub fn write_declaration(&mut self) -> Result<()> {
        let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
        self.writer.write_event(Event::Decl(decl)).map_err(|e| MeshLinkError::ParseError(e.to_string()))
    }

    pub fn write_comment(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_event(Event::Comment(quick_xml::events::BytesText::new(text)))
            .map_err(|e| MeshLinkError::ParseError(e.to_string()))
    }

    pub fn start_element(&mut self, name: &str) -> ElementBuilder<'_, W> {
        ElementBuilder { writer: self, name: name.to_string(), attributes: Vec::new() }
    }

    pub fn end_element(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name))).map_err(|e| MeshLinkError::ParseError(e.to_string()))
    }

    pub fn write_text(&mut self, text: &str) -> Result<()> {
        self.writer.write_event(Event::Text(BytesText::new(text))).map_err(|e| MeshLinkError::ParseError(e.to_string()))
    }
}

pub struct ElementBuilder<'a, W: Write> {
    writer: &'a mut XmlWriter<W>,
    name: String,
    attributes: Vec<(String, String)>,
}

impl<'a, W: Write> ElementBuilder<'a, W> {
    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    pub fn optional_attr(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(v) = value {
            self.attributes.push((key.to_string(), v.to_string()));
        }
        self
    }

    pub fn write_empty(self) -> Result<()> {
        let mut elem = BytesStart::new(&self.name);
        for (k, v) in &self.attributes {
            elem.push_attribute((k.as_str(), v.as_str()));
        }
        self.writer.writer.write_event(Event::Empty(elem)).map_err(|e| MeshLinkError::ParseError(e.to_string()))
    }

    pub fn write_start(self) -> Result<()> {
        let mut elem = BytesStart::new(&self.name);
        for (k, v) in &self.attributes {
            elem.push_attribute((k.as_str(), v.as_str()));
        }
        self.writer.writer.write_event(Event::Start(elem)).map_err(|e| MeshLinkError::ParseError(e.to_string()))
    }

    /// Writes a start tag followed immediately by text content and the
    /// matching end tag, for leaf elements like `Attribute`/`ParamVertex`
    /// whose whole value is their text body.
    pub fn write_text(self, text: &str) -> Result<()> {
        let name = self.name.clone();
        self.write_start()?;
        self.writer.write_text(text)?;
        self.writer.end_element(&name)
    }
}

/// Formats an `f64` with 15 significant digits, per §4.9's ParamVertex
/// content rule.
pub fn format_f64_15(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let digits = 15usize.saturating_sub((v.abs().log10().floor() as i64 + 1).max(0) as usize);
    let s = format!("{v:.digits$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
