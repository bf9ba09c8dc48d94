//! Element tree for the Marmot layout engine.
//!
//! This crate provides the arena-based element tree the style and layout
//! passes consume. It follows the shape of the
//! [DOM Living Standard](https://dom.spec.whatwg.org/) but only models what
//! the cascade needs from a node: tag name, id, class list, inline style
//! declarations, text content, and ordered children.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, providing O(1) access and traversal without borrow checker
//! issues.

use std::collections::{HashMap, HashSet};

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the element tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// NodeId provides O(1) access to any node in the tree without borrowing
/// issues, and is the key type for the style and layout maps the engine
/// produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    /// The synthetic root of every tree.
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    /// "Text nodes are known as text."
    Text(String),
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name..."
///
/// NOTE: We only store `tag_name` (local name) and `attrs`. Namespaces and
/// custom elements are out of scope for a layout engine input tree.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data from a tag name with no attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: AttributesMap::new(),
        }
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&String> {
        self.attrs.get("id")
    }

    /// Returns the set of class names from the class attribute.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens."
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        match self.attrs.get("class") {
            Some(classlist) => classlist.split_whitespace().collect(),
            None => HashSet::new(),
        }
    }

    /// Returns an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Returns the raw inline style declarations, if any.
    ///
    /// [§ 3.2.6 The style attribute](https://html.spec.whatwg.org/multipage/dom.html#the-style-attribute)
    /// "The style attribute must match the syntax of declaration-list."
    #[must_use]
    pub fn inline_style(&self) -> Option<&str> {
        self.attr("style")
    }
}

/// Arena-based element tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree."
///
/// All nodes live in a contiguous vector, using indices for relationships.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by NodeId.
    /// The Document node is always at index 0 (NodeId::ROOT).
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a new tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
        };
        DomTree {
            nodes: vec![document],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the element data for a node, if it is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Element(data)) => Some(data),
            _ => None,
        }
    }

    /// Get the text for a node, if it is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Concatenated text of the node's direct text children.
    ///
    /// Used by layout to estimate intrinsic content sizes. Descendant
    /// elements contribute through their own boxes, not through this.
    #[must_use]
    pub fn own_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            if let Some(text) = self.as_text(child) {
                out.push_str(text);
            }
        }
        out
    }

    /// Iterate over the ancestors of a node, nearest first.
    ///
    /// [§ 4.2.6 Ancestor](https://dom.spec.whatwg.org/#concept-tree-ancestor)
    /// "An object A is called an ancestor of an object B if and only if
    /// B is a descendant of A."
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str) -> NodeType {
        NodeType::Element(ElementData::new(tag))
    }

    #[test]
    fn test_append_and_traverse() {
        let mut tree = DomTree::new();
        let body = tree.alloc(element("body"));
        let div = tree.alloc(element("div"));
        tree.append_child(NodeId::ROOT, body);
        tree.append_child(body, div);

        assert_eq!(tree.parent(div), Some(body));
        assert_eq!(tree.children(body), &[div]);
        assert_eq!(tree.as_element(div).unwrap().tag_name, "div");
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let mut tree = DomTree::new();
        let body = tree.alloc(element("body"));
        let section = tree.alloc(element("section"));
        let p = tree.alloc(element("p"));
        tree.append_child(NodeId::ROOT, body);
        tree.append_child(body, section);
        tree.append_child(section, p);

        let chain: Vec<NodeId> = tree.ancestors(p).collect();
        assert_eq!(chain, vec![section, body, NodeId::ROOT]);
    }

    #[test]
    fn test_classes_split_on_whitespace() {
        let mut data = ElementData::new("div");
        let _ = data
            .attrs
            .insert("class".to_string(), "card  primary".to_string());
        let classes = data.classes();
        assert!(classes.contains("card"));
        assert!(classes.contains("primary"));
        assert_eq!(classes.len(), 2);
    }

    #[test]
    fn test_own_text_skips_element_children() {
        let mut tree = DomTree::new();
        let p = tree.alloc(element("p"));
        let text = tree.alloc(NodeType::Text("hello ".to_string()));
        let span = tree.alloc(element("span"));
        let inner = tree.alloc(NodeType::Text("world".to_string()));
        tree.append_child(NodeId::ROOT, p);
        tree.append_child(p, text);
        tree.append_child(p, span);
        tree.append_child(span, inner);

        assert_eq!(tree.own_text(p), "hello ");
    }
}
