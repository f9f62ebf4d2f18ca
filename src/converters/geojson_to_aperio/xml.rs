//! Minimal element tree with ImageScope-compatible pretty printing
//!
//! ImageScope reads annotation files produced by its own writer, which
//! stores inter-element whitespace the way a DOM does: as the `text` before
//! an element's first child and the `tail` after each element. The tree keeps
//! those two slots explicitly so [`indent`] can lay out whitespace before
//! serialization, and [`write_document`] emits them verbatim.

use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use super::errors::ConversionError;

const INDENT: &str = "  ";

/// XML element with attributes only (no character data besides whitespace)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: &'static str,
    /// Attributes in document order
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<Element>,
    /// Whitespace between the start tag and the first child
    pub text: Option<String>,
    /// Whitespace after the end tag
    pub tail: Option<String>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
            tail: None,
        }
    }

    /// Builder-style attribute append
    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }

    /// Builder-style child append
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Attribute value by name
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn newline_indent(depth: usize) -> String {
    format!("\n{}", INDENT.repeat(depth))
}

/// Lay out whitespace for the whole tree, two spaces per level
pub fn indent(root: &mut Element) {
    indent_at(root, 0);
}

fn indent_at(element: &mut Element, depth: usize) {
    let own = newline_indent(depth);

    if element.children.is_empty() {
        // The root's tail stays unset so a lone root has nothing after it
        if depth > 0 {
            element.tail = Some(own);
        }
        return;
    }

    element.text = Some(newline_indent(depth + 1));
    for child in element.children.iter_mut() {
        indent_at(child, depth + 1);
    }
    // Pull the closing tag back to this element's column
    if let Some(last) = element.children.last_mut() {
        last.tail = Some(own.clone());
    }
    element.tail = Some(own);
}

/// Serialize the tree (no XML declaration, UTF-8)
pub fn write_document(root: &Element) -> Result<String, ConversionError> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, root).map_err(|e| ConversionError::Xml(e.to_string()))?;

    String::from_utf8(writer.into_inner()).map_err(|e| ConversionError::Xml(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), quick_xml::Error> {
    let start = BytesStart::new(element.name)
        .with_attributes(element.attributes.iter().map(|(k, v)| escaped_attribute(*k, v)));

    if element.children.is_empty() && element.text.is_none() {
        writer.write_event(Event::Empty(spaced_empty_tag(&start, element.name.len())))?;
    } else {
        writer.write_event(Event::Start(start))?;
        if let Some(text) = &element.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &element.children {
            write_element(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(element.name)))?;
    }

    if let Some(tail) = &element.tail {
        writer.write_event(Event::Text(BytesText::new(tail)))?;
    }

    Ok(())
}

/// Escape markup plus tab, newline and carriage return, which a reader would
/// otherwise normalize to spaces
fn escaped_attribute<'a>(key: &'a str, value: &str) -> Attribute<'a> {
    let escaped = escape(value)
        .replace('\t', "&#09;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;");

    Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escaped.into_bytes()),
    }
}

/// ImageScope writes empty elements as `<Vertex X="1" Y="2" Z="0" />`
fn spaced_empty_tag(start: &BytesStart<'_>, name_len: usize) -> BytesStart<'static> {
    // Content is already escaped, so re-wrapping it is lossless
    let mut content = String::from_utf8_lossy(start).into_owned();
    content.push(' ');
    BytesStart::from_content(content, name_len)
}
