//! xml
//!
//! Conversion of metadata mappings into an XML element tree, and back.
//!
//! # Node Kinds
//!
//! A [`Node`] is one of four shapes:
//!
//! - `Scalar`: `<hostname>builder-01</hostname>`
//! - `Record`: `<distro>...children...</distro>`
//! - `NamedScalar`: `<variable name="MACHINE">qemux86</variable>`
//! - `NamedRecord`: `<layer name="meta">...children...</layer>`
//!
//! # Naming Rules
//!
//! Generic entries are named after their key. Entries directly below a
//! `layers` element become `layer` elements and entries directly below a
//! `config` element become `variable` elements, both carrying the key in a
//! `name` attribute. See [`Category`].
//!
//! # Example
//!
//! ```
//! use testmeta::core::types::MetaMap;
//! use testmeta::xml::{to_node, to_pretty_xml};
//!
//! let mut config = MetaMap::new();
//! config.insert("MACHINE", "qemux86");
//!
//! let xml = to_pretty_xml(&to_node("config", &config)).unwrap();
//! assert!(xml.contains(r#"<variable name="MACHINE">qemux86</variable>"#));
//! ```

mod reader;
mod writer;

pub use reader::parse_document;
pub use writer::{to_pretty_xml, write_metadata_file};

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::{MetaMap, MetaValue};

/// Root element name of a metadata document.
pub const METADATA_ROOT: &str = "metadata";

/// Attribute carrying the key of `layer` and `variable` elements.
pub const NAME_ATTR: &str = "name";

/// Errors from XML encoding, decoding, and file output.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("failed to encode XML: {0}")]
    Write(String),

    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid XML at byte {position}: {message}")]
    Read { position: u64, message: String },

    #[error("malformed metadata document: {0}")]
    Malformed(String),
}

/// An element in the serialized tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element named after its key, holding text.
    Scalar { tag: String, text: String },
    /// Element named after its key, holding child elements.
    Record { tag: String, children: Vec<Node> },
    /// Fixed-name element with a `name` attribute, holding text.
    NamedScalar {
        tag: String,
        name: String,
        text: String,
    },
    /// Fixed-name element with a `name` attribute, holding child elements.
    NamedRecord {
        tag: String,
        name: String,
        children: Vec<Node>,
    },
}

impl Node {
    /// The element name.
    pub fn tag(&self) -> &str {
        match self {
            Node::Scalar { tag, .. }
            | Node::Record { tag, .. }
            | Node::NamedScalar { tag, .. }
            | Node::NamedRecord { tag, .. } => tag.as_str(),
        }
    }

    /// The `name` attribute, for named nodes.
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::NamedScalar { name, .. } | Node::NamedRecord { name, .. } => Some(name.as_str()),
            Node::Scalar { .. } | Node::Record { .. } => None,
        }
    }

    /// The text content, for scalar nodes.
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Scalar { text, .. } | Node::NamedScalar { text, .. } => Some(text.as_str()),
            Node::Record { .. } | Node::NamedRecord { .. } => None,
        }
    }

    /// Child elements; empty for scalar nodes.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Record { children, .. } | Node::NamedRecord { children, .. } => children.as_slice(),
            Node::Scalar { .. } | Node::NamedScalar { .. } => &[],
        }
    }

    /// First child element with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.children().iter().find(|c| c.tag() == tag)
    }

    /// First child element with the given tag and `name` attribute.
    pub fn named_child(&self, tag: &str, name: &str) -> Option<&Node> {
        self.children()
            .iter()
            .find(|c| c.tag() == tag && c.name() == Some(name))
    }
}

/// How the entries of a mapping are turned into child elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Entries become elements named after their keys.
    Plain,
    /// Entries become `layer` elements with a `name` attribute.
    Layers,
    /// Scalar entries become `variable` elements with a `name` attribute.
    Config,
}

impl Category {
    /// Category of the mapping stored under `tag`.
    pub fn of(tag: &str) -> Self {
        match tag {
            "layers" => Category::Layers,
            "config" => Category::Config,
            _ => Category::Plain,
        }
    }

    /// Build the child element for one entry of a mapping in this category.
    pub fn entry(self, key: &str, value: &MetaValue) -> Node {
        match (self, value) {
            (Category::Layers, MetaValue::Map(map)) => Node::NamedRecord {
                tag: "layer".to_string(),
                name: key.to_string(),
                children: children_of("layer", map),
            },
            (Category::Layers, MetaValue::Scalar(text)) => Node::NamedScalar {
                tag: "layer".to_string(),
                name: key.to_string(),
                text: text.clone(),
            },
            (_, MetaValue::Map(map)) => to_node(key, map),
            (Category::Config, MetaValue::Scalar(text)) => Node::NamedScalar {
                tag: "variable".to_string(),
                name: key.to_string(),
                text: text.clone(),
            },
            (Category::Plain, MetaValue::Scalar(text)) => Node::Scalar {
                tag: key.to_string(),
                text: text.clone(),
            },
        }
    }
}

/// Serialize a mapping as an element named `tag`.
pub fn to_node(tag: &str, map: &MetaMap) -> Node {
    Node::Record {
        tag: tag.to_string(),
        children: children_of(tag, map),
    }
}

fn children_of(tag: &str, map: &MetaMap) -> Vec<Node> {
    let category = Category::of(tag);
    map.iter()
        .map(|(key, value)| category.entry(key, value))
        .collect()
}
