#![forbid(unsafe_code)]

//! Line-tagged document tree
//!
//! A [`Node`] is an immutable scalar, sequence, or mapping carrying the
//! source line where its value starts. Mapping entries additionally carry the
//! line of their key, independent of the line of the value it maps to.
//!
//! Nodes are handed to wflint by an external structured-text parser (or built
//! directly in tests) through the constructors on [`Node`] and [`Key`]; once
//! built they are never mutated, so sharing a tree across threads is safe.

use std::fmt;

/// A typed scalar value
///
/// Integer and float are distinct kinds and are never unified: a condition
/// comparing an integer field to a float literal is false even at equal
/// numeric magnitude.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => write!(f, "{}", s),
        }
    }
}

/// A mapping key with its own source line
///
/// Lookups compare on `text` only; the line exists for diagnostics.
#[derive(Debug, Clone)]
pub struct Key {
    text: String,
    line: u32,
}

impl Key {
    pub fn new(text: impl Into<String>, line: u32) -> Self {
        Key {
            text: text.into(),
            line,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Source line of this key occurrence (1-indexed)
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// The shape of a node: scalar, ordered sequence, or ordered mapping
///
/// Mapping entries preserve declaration order and have unique keys.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(Vec<(Key, Node)>),
}

/// An immutable node of a parsed document, tagged with its source line
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    line: u32,
    kind: NodeKind,
}

impl Node {
    /// Creates a scalar node
    pub fn scalar(line: u32, value: Scalar) -> Self {
        Node {
            line,
            kind: NodeKind::Scalar(value),
        }
    }

    /// Creates a string scalar node
    pub fn str(line: u32, value: impl Into<String>) -> Self {
        Node::scalar(line, Scalar::Str(value.into()))
    }

    /// Creates a null scalar node
    pub fn null(line: u32) -> Self {
        Node::scalar(line, Scalar::Null)
    }

    /// Creates a sequence node
    pub fn sequence(line: u32, items: Vec<Node>) -> Self {
        Node {
            line,
            kind: NodeKind::Sequence(items),
        }
    }

    /// Creates a mapping node from ordered (key, value) entries
    pub fn mapping(line: u32, entries: Vec<(Key, Node)>) -> Self {
        Node {
            line,
            kind: NodeKind::Mapping(entries),
        }
    }

    /// Source line where this node's value starts (1-indexed)
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Decomposes the node into its line and kind, consuming it
    ///
    /// Used by the normalizer to rebuild trees without cloning subtrees.
    pub fn into_parts(self) -> (u32, NodeKind) {
        (self.line, self.kind)
    }

    /// Looks up a mapping entry by key text
    ///
    /// Returns None when this node is not a mapping or the key is absent.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match &self.kind {
            NodeKind::Mapping(entries) => entries
                .iter()
                .find(|(k, _)| k.text() == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Looks up a sequence element by position
    ///
    /// Returns None when this node is not a sequence or the index is
    /// out of range.
    pub fn index(&self, i: usize) -> Option<&Node> {
        match &self.kind {
            NodeKind::Sequence(items) => items.get(i),
            _ => None,
        }
    }

    /// Iterates the (key, value) entries of a mapping, in declaration order
    ///
    /// Empty for non-mappings.
    pub fn entries(&self) -> impl Iterator<Item = (&Key, &Node)> {
        let entries: &[(Key, Node)] = match &self.kind {
            NodeKind::Mapping(entries) => entries,
            _ => &[],
        };
        entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterates the keys of a mapping, in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries().map(|(k, _)| k)
    }

    /// Iterates the elements of a sequence, in order
    ///
    /// Empty for non-sequences.
    pub fn items(&self) -> impl Iterator<Item = &Node> {
        let items: &[Node] = match &self.kind {
            NodeKind::Sequence(items) => items,
            _ => &[],
        };
        items.iter()
    }

    /// Number of mapping entries or sequence elements; 0 for scalars
    pub fn len(&self) -> usize {
        match &self.kind {
            NodeKind::Scalar(_) => 0,
            NodeKind::Sequence(items) => items.len(),
            NodeKind::Mapping(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, NodeKind::Sequence(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(Scalar::Null))
    }

    /// The string value of a string scalar, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match &self.kind {
            NodeKind::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match &self.kind {
            NodeKind::Scalar(Scalar::Float(x)) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &self.kind {
            NodeKind::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}
