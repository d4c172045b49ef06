//! Document tree boundary.
//!
//! The UI layer never owns the editable document. It only needs to look at the nodes between a
//! selection point and the editing host, so this module defines:
//!
//! - [`DomTree`]: the provider trait a host document implements (node access, parent lookup and
//!   the editing-host boundary test)
//! - [`Document`]: a small arena tree implementing [`DomTree`], used by headless hosts and tests
//! - [`SelectionRange`]: the part of a selection the UI cares about
//! - [`AncestorChain`]: the sentinel-prefixed, nearest-first node list handed to predicates
//! - [`Ancestors`]: the entries above the one a predicate is looking at

use crate::error::DomError;
use std::collections::BTreeMap;

/// Opaque identifier for a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Get the underlying index.
    pub fn get(self) -> usize {
        self.0
    }
}

/// Element data (tag name plus attributes).
///
/// Tag names are stored lowercased. `id` and `class` are ordinary attributes; [`Element::id`] and
/// [`Element::classes`] are views over them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
}

impl Element {
    /// Create an element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
        }
    }

    /// Set the `id` attribute.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attribute("id", id)
    }

    /// Append a class to the `class` attribute.
    pub fn with_class(mut self, class: impl AsRef<str>) -> Self {
        let class = class.as_ref();
        match self.attributes.get_mut("class") {
            Some(existing) if !existing.is_empty() => {
                existing.push(' ');
                existing.push_str(class);
            }
            _ => {
                self.attributes.insert("class".to_string(), class.to_string());
            }
        }
        self
    }

    /// Set an attribute, replacing any previous value.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Lowercased tag name.
    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    /// Value of the `id` attribute, if any.
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Returns `true` if the `class` attribute contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// All attributes, ordered by name.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element node.
    Element(Element),
    /// A text node.
    Text(String),
}

/// A node in a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    editing_host: bool,
}

impl Node {
    /// Node payload.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Element data, or `None` for text nodes.
    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    /// Text content, or `None` for element nodes.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    /// Parent node id.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child node ids in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns `true` if this node is the root of an editable region.
    pub fn is_editing_host(&self) -> bool {
        self.editing_host
    }
}

/// Read access to a host document, as needed for ancestor walks.
pub trait DomTree {
    /// Look up a node.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Parent of `id`, or `None` for a root or detached node.
    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    /// Returns `true` if `id` is an editing host (the walk boundary).
    fn is_editing_host(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(Node::is_editing_host)
    }
}

/// A minimal arena-backed document tree.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the document has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a parentless element.
    pub fn create_root(&mut self, element: Element) -> NodeId {
        self.push(NodeKind::Element(element), None)
    }

    /// Append an element as the last child of `parent`.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        element: Element,
    ) -> Result<NodeId, DomError> {
        self.append(parent, NodeKind::Element(element))
    }

    /// Append a text node as the last child of `parent`.
    pub fn append_text(
        &mut self,
        parent: NodeId,
        text: impl Into<String>,
    ) -> Result<NodeId, DomError> {
        self.append(parent, NodeKind::Text(text.into()))
    }

    /// Mark (or unmark) a node as an editing host.
    pub fn set_editing_host(&mut self, id: NodeId, editing_host: bool) -> Result<(), DomError> {
        let node = self
            .nodes
            .get_mut(id.0)
            .ok_or(DomError::NodeNotFound(id))?;
        node.editing_host = editing_host;
        Ok(())
    }

    fn append(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, DomError> {
        if parent.0 >= self.nodes.len() {
            return Err(DomError::NodeNotFound(parent));
        }
        let id = self.push(kind, Some(parent));
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
            editing_host: false,
        });
        id
    }
}

impl DomTree for Document {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }
}

/// The start/end points of a document selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    /// Node containing the selection start.
    pub start_container: NodeId,
    /// Offset within `start_container`.
    pub start_offset: usize,
    /// Node containing the selection end.
    pub end_container: NodeId,
    /// Offset within `end_container`.
    pub end_offset: usize,
}

impl SelectionRange {
    /// Create a range spanning two points.
    pub fn new(
        start_container: NodeId,
        start_offset: usize,
        end_container: NodeId,
        end_offset: usize,
    ) -> Self {
        Self {
            start_container,
            start_offset,
            end_container,
            end_offset,
        }
    }

    /// Create a caret (empty range) at `offset` within `node`.
    pub fn collapsed(node: NodeId, offset: usize) -> Self {
        Self::new(node, offset, node, offset)
    }

    /// Returns `true` if start and end coincide.
    pub fn is_collapsed(&self) -> bool {
        self.start_container == self.end_container && self.start_offset == self.end_offset
    }
}

/// Nodes from a selection point up to (not including) the editing host.
///
/// The first entry is always `None`: the "no context" sentinel, which lets a predicate decide
/// what happens when no real node qualifies. Real nodes follow nearest-first.
#[derive(Debug, Clone)]
pub struct AncestorChain<'a> {
    entries: Vec<Option<&'a Node>>,
}

impl<'a> AncestorChain<'a> {
    /// A chain holding only the sentinel.
    pub fn empty() -> Self {
        Self {
            entries: vec![None],
        }
    }

    /// Build a chain from nodes given nearest-first.
    pub fn from_nodes(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let mut chain = Self::empty();
        chain.entries.extend(nodes.into_iter().map(Some));
        chain
    }

    /// Walk from `start` towards the root, stopping before the editing host.
    ///
    /// A node without a parent (or an id the tree does not know) also ends the walk.
    pub fn walk<D: DomTree + ?Sized>(dom: &'a D, start: NodeId) -> Self {
        let mut chain = Self::empty();
        let mut current = Some(start);
        while let Some(id) = current {
            if dom.is_editing_host(id) {
                break;
            }
            let Some(node) = dom.node(id) else {
                break;
            };
            chain.entries.push(Some(node));
            current = dom.parent(id);
        }
        chain
    }

    /// All entries, sentinel first.
    pub fn entries(&self) -> &[Option<&'a Node>] {
        &self.entries
    }

    /// Real nodes only, nearest-first.
    pub fn nodes(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.entries.iter().filter_map(|e| *e)
    }

    /// Every entry paired with the entries farther from the selection point.
    ///
    /// The sentinel gets no ancestors.
    pub fn contexts(&self) -> impl Iterator<Item = (Option<&'a Node>, Ancestors<'_>)> + '_ {
        self.entries.iter().enumerate().map(move |(i, entry)| {
            let ancestors = match entry {
                Some(_) => Ancestors::new(&self.entries[i + 1..]),
                None => Ancestors::default(),
            };
            (*entry, ancestors)
        })
    }

    /// Number of real nodes (the sentinel is not counted).
    pub fn len(&self) -> usize {
        self.entries.len() - 1
    }

    /// Returns `true` if the chain holds only the sentinel.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AncestorChain<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

/// The part of an [`AncestorChain`] above the entry being evaluated, nearest-first.
///
/// Only reaches up to the editing host, like the chain itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ancestors<'a> {
    entries: &'a [Option<&'a Node>],
}

impl<'a> Ancestors<'a> {
    /// Wrap chain entries; `None` entries are skipped.
    pub fn new(entries: &'a [Option<&'a Node>]) -> Self {
        Self { entries }
    }

    /// The nearest ancestor and the ones above it.
    pub fn split_first(&self) -> Option<(&'a Node, Ancestors<'a>)> {
        let mut entries = self.entries;
        while let Some((first, rest)) = entries.split_first() {
            if let Some(node) = *first {
                return Some((node, Ancestors { entries: rest }));
            }
            entries = rest;
        }
        None
    }

    /// The nearest ancestor.
    pub fn parent(&self) -> Option<&'a Node> {
        self.split_first().map(|(node, _)| node)
    }

    /// Ancestors nearest-first.
    pub fn iter(&self) -> impl Iterator<Item = &'a Node> + 'a {
        self.entries.iter().filter_map(|e| *e)
    }

    /// Returns `true` if there is no ancestor.
    pub fn is_empty(&self) -> bool {
        self.parent().is_none()
    }
}
