//! Config document abstraction layer.
//!
//! `ConfigDocument`, `ConfigSection`, and `ParseNode` wrap the `kdl` crate
//! types so the rest of the config module never touches KDL directly.

use super::ConfigError;

/// Parsed KDL document paired with its source text.
pub(super) struct ConfigDocument {
    doc: kdl::KdlDocument,
    source: String,
}

/// Single KDL node with source context for line-number reporting.
pub(super) struct ParseNode<'a> {
    node: &'a kdl::KdlNode,
    source: &'a str,
}

/// A scalar entry value, reduced to the kinds the config understands.
#[derive(Debug, PartialEq)]
pub(super) enum EntryValue<'a> {
    String(&'a str),
    Integer(i128),
    Other,
}

impl ConfigDocument {
    /// Parse a KDL source string into a document.
    pub(super) fn parse(source: &str) -> Result<Self, ConfigError> {
        let doc: kdl::KdlDocument = source
            .parse()
            .map_err(|e: kdl::KdlError| ConfigError::ParseError(e.to_string()))?;
        Ok(Self {
            doc,
            source: source.to_string(),
        })
    }

    /// Load and parse a KDL config file.
    pub(super) fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::ReadError(e)
            }
        })?;
        Self::parse(&content)
    }

    /// The top level of the document as a section.
    pub(super) fn root(&self) -> ConfigSection<'_> {
        ConfigSection {
            doc: &self.doc,
            source: &self.source,
        }
    }
}

/// Borrowed view into a KDL document or a node's children block.
pub(super) struct ConfigSection<'a> {
    doc: &'a kdl::KdlDocument,
    source: &'a str,
}

impl<'a> ConfigSection<'a> {
    /// Iterate over all child nodes.
    pub(super) fn nodes(&self) -> Vec<ParseNode<'a>> {
        self.doc
            .nodes()
            .iter()
            .map(|node| ParseNode {
                node,
                source: self.source,
            })
            .collect()
    }
}

impl<'a> ParseNode<'a> {
    /// The node's identifier (e.g. `"timeout"`, `"lint"`).
    pub(super) fn name(&self) -> &str {
        self.node.name().value()
    }

    /// All entry values of this node, in order.
    pub(super) fn values(&self) -> Vec<EntryValue<'a>> {
        self.node
            .entries()
            .iter()
            .map(|e| {
                let value = e.value();
                if let Some(s) = value.as_string() {
                    EntryValue::String(s)
                } else if let Some(i) = value.as_integer() {
                    EntryValue::Integer(i)
                } else {
                    EntryValue::Other
                }
            })
            .collect()
    }

    /// Get the children block as a borrowed `ConfigSection` (preserving source).
    pub(super) fn children(&self) -> Option<ConfigSection<'a>> {
        self.node.children().map(|doc| ConfigSection {
            doc,
            source: self.source,
        })
    }

    /// 1-based line number of this node in the original source.
    pub(super) fn line(&self) -> usize {
        let offset = self.node.span().offset();
        self.source[..offset.min(self.source.len())]
            .bytes()
            .filter(|&b| b == b'\n')
            .count()
            + 1
    }
}
