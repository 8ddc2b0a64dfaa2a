//! XML parse and write support for configuration documents.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use thiserror::Error;

use crate::node::ConfNode;

/// Errors that can occur while parsing XML into a [`ConfNode`] tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input XML could not be decoded or tokenized.
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Input bytes were not valid UTF-8 for tag/attribute/text extraction.
    #[error("invalid UTF-8 while parsing XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Failed to decode text entity or bytes.
    #[error("failed to decode XML text: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    /// Failed to read input file.
    #[error("failed to read XML file: {0}")]
    Io(#[from] std::io::Error),
    /// Structural issue in XML document.
    #[error("malformed XML: {0}")]
    Malformed(String),
}

/// Errors that can occur while serializing a [`ConfNode`] tree.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize XML bytes.
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Failed to write output file.
    #[error("failed to write XML file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse XML bytes into a [`ConfNode`] tree.
pub fn parse(xml: &[u8]) -> Result<ConfNode, ParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<ConfNode> = Vec::new();
    let mut root: Option<ConfNode> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let node = open_element(&e, &reader)?;
                stack.push(node);
            }
            Event::Empty(e) => {
                let node = open_element(&e, &reader)?;
                attach(node, &mut stack, &mut root)?;
            }
            Event::Text(e) => {
                let text = e.unescape()?.into_owned();
                append_text(&mut stack, text);
            }
            Event::CData(e) => {
                let text = std::str::from_utf8(e.as_ref())?.to_string();
                append_text(&mut stack, text);
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| {
                    ParseError::Malformed("closing tag without open tag".to_string())
                })?;
                attach(node, &mut stack, &mut root)?;
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ParseError::Malformed(
            "unclosed element(s) at end of document".to_string(),
        ));
    }

    root.ok_or_else(|| ParseError::Malformed("no root element found".to_string()))
}

/// Parse an XML file into a [`ConfNode`] tree.
pub fn parse_file(path: &Path) -> Result<ConfNode, ParseError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}

/// Serialize a [`ConfNode`] tree into indented XML bytes.
pub fn write(node: &ConfNode) -> Result<Vec<u8>, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_node(&mut writer, node)?;
    Ok(writer.into_inner())
}

/// Serialize a [`ConfNode`] tree and write it to `path`.
pub fn write_file(node: &ConfNode, path: &Path) -> Result<(), WriteError> {
    let bytes = write(node)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn open_element(
    e: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> Result<ConfNode, ParseError> {
    let tag = qname_to_string(e.name())?;
    let mut node = ConfNode::new(tag);
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = qname_to_string(attr.key)?;
        let value = attr
            .decode_and_unescape_value(reader.decoder())?
            .into_owned();
        node.attributes.insert(key, value);
    }
    Ok(node)
}

fn attach(
    node: ConfNode,
    stack: &mut [ConfNode],
    root: &mut Option<ConfNode>,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    if root.is_none() {
        *root = Some(node);
        Ok(())
    } else {
        Err(ParseError::Malformed(
            "multiple top-level elements found".to_string(),
        ))
    }
}

fn append_text(stack: &mut [ConfNode], text: String) {
    let Some(current) = stack.last_mut() else {
        return;
    };
    if text.trim().is_empty() {
        return;
    }
    match &mut current.text {
        Some(existing) => existing.push_str(&text),
        None => current.text = Some(text),
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &ConfNode) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(node.tag.as_str());
    for (key, value) in &node.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if node.children.is_empty() && node.text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = &node.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &node.children {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(node.tag.as_str())))?;
    Ok(())
}

fn qname_to_string(name: QName<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(name.as_ref())?.to_string())
}
