//! xml::reader
//!
//! Parse a written metadata document back into a [`Node`] tree.
//!
//! Shape is inferred from the markup: a `name` attribute makes a named
//! node, element children make a record, a self-closed element is an empty
//! record, and anything else is a scalar holding its text. Whitespace
//! between child elements is indentation and is dropped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Node, XmlError, NAME_ATTR};

/// An element whose end tag has not been seen yet.
struct OpenElement {
    tag: String,
    name: Option<String>,
    text: String,
    children: Vec<Node>,
}

impl OpenElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let tag = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| XmlError::Malformed(format!("element name is not UTF-8: {}", e)))?
            .to_string();

        let name = match start
            .try_get_attribute(NAME_ATTR)
            .map_err(|e| XmlError::Malformed(format!("bad attribute on <{}>: {}", tag, e)))?
        {
            Some(attr) => Some(
                attr.unescape_value()
                    .map_err(|e| XmlError::Malformed(e.to_string()))?
                    .into_owned(),
            ),
            None => None,
        };

        Ok(Self {
            tag,
            name,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// Close an element that had a separate end tag.
    fn close(self) -> Result<Node, XmlError> {
        if self.children.is_empty() {
            return Ok(match self.name {
                Some(name) => Node::NamedScalar {
                    tag: self.tag,
                    name,
                    text: self.text,
                },
                None => Node::Scalar {
                    tag: self.tag,
                    text: self.text,
                },
            });
        }

        if !self.text.trim().is_empty() {
            return Err(XmlError::Malformed(format!(
                "<{}> mixes text and child elements",
                self.tag
            )));
        }
        Ok(self.into_record())
    }

    fn into_record(self) -> Node {
        match self.name {
            Some(name) => Node::NamedRecord {
                tag: self.tag,
                name,
                children: self.children,
            },
            None => Node::Record {
                tag: self.tag,
                children: self.children,
            },
        }
    }
}

/// Parse an XML document into its root node.
///
/// # Errors
///
/// - [`XmlError::Read`] for syntactically invalid XML
/// - [`XmlError::Malformed`] for a missing or repeated root, unclosed
///   elements, or mixed content
pub fn parse_document(xml: &str) -> Result<Node, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let event = reader.read_event().map_err(|e| XmlError::Read {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(XmlError::Malformed("multiple root elements".to_string()));
                }
                stack.push(OpenElement::from_start(&start)?);
            }
            Event::Empty(start) => {
                let node = OpenElement::from_start(&start)?.into_record();
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let open = stack
                    .pop()
                    .ok_or_else(|| XmlError::Malformed("unexpected end tag".to_string()))?;
                let node = open.close()?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| XmlError::Malformed(e.to_string()))?;
                match stack.last_mut() {
                    Some(open) => open.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(XmlError::Malformed(
                            "text outside the root element".to_string(),
                        ))
                    }
                }
            }
            Event::CData(data) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Malformed(format!("unclosed element <{}>", open.tag)));
    }
    root.ok_or_else(|| XmlError::Malformed("no root element".to_string()))
}

fn attach(stack: &mut [OpenElement], root: &mut Option<Node>, node: Node) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(XmlError::Malformed("multiple root elements".to_string())),
    }
    Ok(())
}
