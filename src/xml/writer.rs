//! xml::writer
//!
//! Pretty-printed XML output.
//!
//! The document opens with an XML declaration and indents one tab per
//! level. Scalar text stays on the element's line; records without
//! children are self-closed.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::core::types::MetaMap;

use super::{to_node, Node, XmlError, METADATA_ROOT, NAME_ATTR};

/// Render a node tree as a pretty-printed XML document.
pub fn to_pretty_xml(root: &Node) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_node(&mut writer, root)?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| XmlError::Write(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

/// Serialize `metadata` under a `metadata` root and write it to `path`.
///
/// An existing file is overwritten. The write is not atomic.
pub fn write_metadata_file(path: &Path, metadata: &MetaMap) -> Result<(), XmlError> {
    let xml = to_pretty_xml(&to_node(METADATA_ROOT, metadata))?;

    fs::write(path, xml).map_err(|e| XmlError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), "wrote metadata file");
    Ok(())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), XmlError> {
    let mut start = BytesStart::new(node.tag());
    if let Some(name) = node.name() {
        start.push_attribute((NAME_ATTR, name));
    }

    match node {
        Node::Scalar { text, .. } | Node::NamedScalar { text, .. } => {
            emit(writer, Event::Start(start))?;
            // Always emit the text event, even when empty, so the end tag
            // stays on the same line.
            emit(writer, Event::Text(BytesText::new(text)))?;
            emit(writer, Event::End(BytesEnd::new(node.tag())))
        }
        Node::Record { children, .. } | Node::NamedRecord { children, .. } => {
            if children.is_empty() {
                return emit(writer, Event::Empty(start));
            }
            emit(writer, Event::Start(start))?;
            for child in children {
                write_node(writer, child)?;
            }
            emit(writer, Event::End(BytesEnd::new(node.tag())))
        }
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Write(e.to_string()))
}
