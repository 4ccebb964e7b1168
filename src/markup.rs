//! Markup tree and text rendering
//!
//! Serialization first builds a [`MarkupNode`] tree, then renders it to
//! text with `quick_xml`'s writer. Rendering is controlled by
//! [`MarkupConfig`].

use std::io::Cursor;

use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options for rendering a markup tree as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Indentation width for pretty printing; `None` renders compactly
    pub indent: Option<usize>,
    /// Whether to emit an `<?xml ...?>` declaration
    pub xml_declaration: bool,
    /// Whether empty elements render as `<x/>` instead of `<x></x>`
    pub self_closing: bool,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            indent: None,
            xml_declaration: false,
            self_closing: true,
        }
    }
}

impl MarkupConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty print with `width` spaces per level
    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    /// Set whether to emit an XML declaration
    pub fn with_xml_declaration(mut self, declaration: bool) -> Self {
        self.xml_declaration = declaration;
        self
    }

    /// Set whether empty elements are self-closing
    pub fn with_self_closing(mut self, self_closing: bool) -> Self {
        self.self_closing = self_closing;
        self
    }
}

/// Element node of a markup tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupNode {
    tag: String,
    attributes: IndexMap<String, String>,
    text: Option<String>,
    children: Vec<MarkupNode>,
}

impl MarkupNode {
    /// Create an empty node
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Get the tag
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get the attributes in insertion order
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Get an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Get the text content
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get the child nodes
    pub fn children(&self) -> &[MarkupNode] {
        &self.children
    }

    /// Set an attribute, replacing any previous value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Set text content
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Add a child node
    pub fn push_child(&mut self, child: MarkupNode) {
        self.children.push(child);
    }

    /// Find child nodes by tag
    pub fn find_children(&self, tag: &str) -> Vec<&MarkupNode> {
        self.children.iter().filter(|c| c.tag == tag).collect()
    }

    /// Render the tree rooted at this node as text
    pub fn render(&self, config: &MarkupConfig) -> Result<String> {
        let cursor = Cursor::new(Vec::new());
        let mut writer = match config.indent {
            Some(width) => Writer::new_with_indent(cursor, b' ', width),
            None => Writer::new(cursor),
        };

        if config.xml_declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(xml_error)?;
        }
        write_node(&mut writer, self, config)?;

        String::from_utf8(writer.into_inner().into_inner())
            .map_err(|e| Error::Xml(format!("rendered markup is not UTF-8: {}", e)))
    }
}

fn xml_error(err: quick_xml::Error) -> Error {
    Error::Xml(err.to_string())
}

fn write_node(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    node: &MarkupNode,
    config: &MarkupConfig,
) -> Result<()> {
    let mut start = BytesStart::new(node.tag.as_str());
    for (name, value) in &node.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    let is_empty = node.children.is_empty() && node.text.as_deref().map_or(true, str::is_empty);
    if is_empty && config.self_closing {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    if let Some(text) = node.text.as_deref().filter(|t| !t.is_empty()) {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_error)?;
    }
    for child in &node.children {
        write_node(writer, child, config)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(node.tag.as_str())))
        .map_err(xml_error)
}
