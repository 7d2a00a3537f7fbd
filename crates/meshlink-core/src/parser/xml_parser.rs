//! DOM-style XML layer (§4.8): builds a small in-memory tree from a
//! `quick_xml` SAX stream so the model parser can visit root-level
//! elements in the fixed pass order the format requires, independent of
//! their physical order in the document.

use crate::error::{MeshLinkError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::HashMap;
use std::io::BufRead;

/// One element: its tag, attributes, accumulated text content, and child
/// elements in document order.
#[derive(Debug, Clone, Default)]
pub struct XmlNode {
    pub tag: String,
    pub attrs: HashMap<String, String>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn new(tag: String, attrs: HashMap<String, String>) -> Self {
        XmlNode { tag, attrs, text: String::new(), children: Vec::new() }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn require_attr(&self, name: &str) -> Result<&str> {
        self.attr(name)
            .ok_or_else(|| MeshLinkError::ParseError(format!("<{}> missing required attribute '{name}'", self.tag)))
    }

    pub fn attr_f64(&self, name: &str) -> Result<Option<f64>> {
        match self.attr(name) {
            Some(s) => lexical_core::parse::<f64>(s.as_bytes())
                .map(Some)
                .map_err(|_| MeshLinkError::ParseError(format!("<{}> attribute '{name}' is not a valid number: '{s}'", self.tag))),
            None => Ok(None),
        }
    }

    pub fn require_attr_f64(&self, name: &str) -> Result<f64> {
        self.attr_f64(name)?
            .ok_or_else(|| MeshLinkError::ParseError(format!("<{}> missing required attribute '{name}'", self.tag)))
    }

    pub fn attr_i64(&self, name: &str) -> Result<Option<i64>> {
        match self.attr(name) {
            Some(s) => lexical_core::parse::<i64>(s.as_bytes())
                .map(Some)
                .map_err(|_| MeshLinkError::ParseError(format!("<{}> attribute '{name}' is not a valid integer: '{s}'", self.tag))),
            None => Ok(None),
        }
    }

    pub fn require_attr_i64(&self, name: &str) -> Result<i64> {
        self.attr_i64(name)?
            .ok_or_else(|| MeshLinkError::ParseError(format!("<{}> missing required attribute '{name}'", self.tag)))
    }

    /// Children whose tag equals `tag`, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    pub fn first_child_named(&self, tag: &str) -> Option<&XmlNode> {
        self.children_named(tag).next()
    }
}

fn node_attrs(e: &BytesStart) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| MeshLinkError::ParseError(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map(|c| c.into_owned())
            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
        attrs.insert(key, value);
    }
    Ok(attrs)
}

/// Reads the entire document into a single `XmlNode` tree rooted at the
/// document element. Text and CDATA content is concatenated in document
/// order; nested elements do not interrupt the parent's accumulated text
/// (mixed content is not expected in this format, but is tolerated).
pub fn parse_document<R: BufRead>(reader: R) -> Result<XmlNode> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let event = xml_reader.read_event_into(&mut buf).map_err(|e| MeshLinkError::ParseError(e.to_string()))?;
        match event {
            Event::Start(e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                stack.push(XmlNode::new(tag, node_attrs(&e)?));
            }
            Event::Empty(e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let node = XmlNode::new(tag, node_attrs(&e)?);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| MeshLinkError::ParseError("unbalanced XML: stray closing tag".into()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
            }
            Event::Text(e) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Event::CData(e) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(e.into_inner().as_ref()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    root.ok_or_else(|| MeshLinkError::ParseError("document has no root element".into()))
}
