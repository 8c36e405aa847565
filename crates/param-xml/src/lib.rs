//! Encode and decode parameter trees as XML using quick-xml.
//!
//! Wire shape: attributes carry scalars, nested elements carry named
//! sub-trees, direct character data carries a node's text payload.

use std::borrow::Cow;

use param_tree::ParameterTree;
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("invalid XML name: '{0}'")]
    InvalidName(String),
    #[error("xml write: {0}")]
    Write(String),
}

impl CodecError {
    fn malformed<S: Into<String>>(msg: S) -> Self {
        CodecError::MalformedDocument(msg.into())
    }
}

/// Serialize `tree` as a document whose root element is named `root_tag`.
///
/// Output is compact and deterministic (keys in order, no declaration).
pub fn encode(tree: &ParameterTree, root_tag: &str) -> Result<String, CodecError> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, root_tag, tree)?;
    String::from_utf8(writer.into_inner())
        .map_err(|err| CodecError::Write(format!("invalid UTF-8: {err}")))
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    tree: &ParameterTree,
) -> Result<(), CodecError> {
    check_name(tag)?;
    let mut start = BytesStart::new(tag);
    for (key, value) in tree.attributes() {
        check_name(key)?;
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Owned(escape_attribute(value).into_bytes()),
        });
    }

    let mut children = tree.children().peekable();
    if tree.text().is_none() && children.peek().is_none() {
        return write(writer, Event::Empty(start));
    }

    write(writer, Event::Start(start))?;
    match tree.text() {
        // An empty CDATA section keeps "empty text" apart from "no text".
        Some("") => write(writer, Event::CData(BytesCData::new("")))?,
        Some(text) => write(writer, Event::Text(BytesText::from_escaped(escape_text(text))))?,
        None => {}
    }
    for (child_tag, child) in children {
        write_element(writer, child_tag, child)?;
    }
    write(writer, Event::End(BytesEnd::new(tag)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), CodecError> {
    writer
        .write_event(event)
        .map_err(|err| CodecError::Write(err.to_string()))
}

fn escape_attribute(value: &str) -> String {
    // Other parsers normalize raw whitespace in attribute values.
    escape(value)
        .replace('\t', "&#9;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
}

fn escape_text(value: &str) -> String {
    escape(value).replace('\r', "&#13;")
}

fn check_name(name: &str) -> Result<(), CodecError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            is_name_start(first) && chars.all(|c| is_name_start(c) || is_name_char(c))
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CodecError::InvalidName(name.to_string()))
    }
}

fn is_name_start(c: char) -> bool {
    c == '_' || c == ':' || c.is_alphabetic()
}

fn is_name_char(c: char) -> bool {
    c == '-' || c == '.' || c == '\u{B7}' || c.is_alphanumeric()
}

/// Element under construction while its content is being read.
struct Frame {
    tag: String,
    tree: ParameterTree,
    text: Option<String>,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, CodecError> {
        let tag = utf8(start.name().as_ref(), "element name")?;
        let mut tree = ParameterTree::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|err| CodecError::malformed(format!("<{tag}>: {err}")))?;
            let key = utf8(attr.key.as_ref(), "attribute name")?;
            let value = attr
                .unescape_value()
                .map_err(|err| CodecError::malformed(format!("<{tag} {key}>: {err}")))?;
            tree.set_attribute(key, value.into_owned());
        }
        Ok(Self {
            tag,
            tree,
            text: None,
        })
    }

    fn close(mut self) -> (String, ParameterTree) {
        if let Some(text) = self.text {
            self.tree.set_text(text);
        }
        (self.tag, self.tree)
    }
}

fn utf8(bytes: &[u8], what: &str) -> Result<String, CodecError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|err| CodecError::malformed(format!("{what} is not UTF-8: {err}")))
}

fn is_xml_whitespace(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

/// Parse a document into its root tag and tree.
///
/// Decoding is atomic: on any error no partial tree is returned.
pub fn decode(document: &str) -> Result<(String, ParameterTree), CodecError> {
    let document = document.strip_prefix('\u{FEFF}').unwrap_or(document);
    let mut reader = Reader::from_str(document);
    reader.trim_text(false);
    reader.check_end_names(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, ParameterTree)> = None;

    loop {
        let event = reader.read_event().map_err(|err| {
            CodecError::malformed(format!(
                "at byte {}: {err}",
                reader.buffer_position()
            ))
        })?;
        match event {
            Event::Start(e) => stack.push(Frame::open(&e)?),
            Event::Empty(e) => attach(&mut stack, &mut root, Frame::open(&e)?.close())?,
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| CodecError::malformed("unmatched closing tag"))?;
                attach(&mut stack, &mut root, frame.close())?;
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|err| CodecError::malformed(err.to_string()))?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let text = std::str::from_utf8(&e)
                    .map_err(|err| CodecError::malformed(format!("CDATA is not UTF-8: {err}")))?;
                match stack.last_mut() {
                    Some(frame) => frame.text.get_or_insert_with(String::new).push_str(text),
                    None => return Err(CodecError::malformed("CDATA outside the root element")),
                }
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(CodecError::malformed(format!(
            "element <{}> is not closed",
            open.tag
        )));
    }
    let (tag, tree) = root.ok_or_else(|| CodecError::malformed("no root element"))?;
    trace!(root = %tag, "decoded parameter tree");
    Ok((tag, tree))
}

fn push_text(stack: &mut [Frame], text: &str) -> Result<(), CodecError> {
    match stack.last_mut() {
        Some(frame) => {
            frame.text.get_or_insert_with(String::new).push_str(text);
            Ok(())
        }
        None if is_xml_whitespace(text) => Ok(()),
        None => Err(CodecError::malformed("text outside the root element")),
    }
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, ParameterTree)>,
    (tag, tree): (String, ParameterTree),
) -> Result<(), CodecError> {
    match stack.last_mut() {
        Some(parent) => {
            if parent.tree.has_child(&tag) {
                return Err(CodecError::malformed(format!(
                    "element <{}> has more than one child <{tag}>",
                    parent.tag
                )));
            }
            parent.tree.set_child(tag, tree);
            Ok(())
        }
        None if root.is_some() => Err(CodecError::malformed(format!(
            "second root element <{tag}>"
        ))),
        None => {
            *root = Some((tag, tree));
            Ok(())
        }
    }
}

/// Decode and require a specific root tag.
pub fn decode_expecting(document: &str, root_tag: &str) -> Result<ParameterTree, CodecError> {
    let (tag, tree) = decode(document)?;
    if tag != root_tag {
        return Err(CodecError::malformed(format!(
            "expected root element <{root_tag}>, found <{tag}>"
        )));
    }
    Ok(tree)
}

/// `true` if `document` decodes into a parameter tree.
pub fn is_well_formed(document: &str) -> bool {
    decode(document).is_ok()
}
