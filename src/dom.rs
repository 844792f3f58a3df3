//! A small owned element tree.
//!
//! Parsed documents, the shadow root, and the host's light-DOM children are
//! all plain [`Node`] trees. Transforms are written as predicate-and-mutate
//! walks over this type instead of against a class hierarchy.

mod parse;
mod serialize;

pub use parse::{parse_html, MAX_TREE_DEPTH};

/// Namespace URI for HTML elements.
///
/// HTML elements store an empty namespace; only foreign content (SVG, MathML)
/// records its namespace explicitly.
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// A node with its owned children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// What kind of node this is, with its payload.
    pub node_type: NodeType,
    /// Children in document order.
    pub children: Vec<Node>,
}

/// Node payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// Root of a parsed document or of a shadow root.
    Document,
    /// An element.
    Element {
        /// Local name, lowercase for parsed HTML.
        tag_name: String,
        /// Namespace URI; empty for HTML elements.
        namespace: String,
        /// Attributes in source order.
        attributes: Vec<(String, String)>,
    },
    /// Character data.
    Text {
        /// Unescaped text.
        content: String,
    },
    /// A comment.
    Comment {
        /// Comment body without delimiters.
        content: String,
    },
}

impl Node {
    /// Creates an empty document node.
    pub fn document() -> Self {
        Self {
            node_type: NodeType::Document,
            children: Vec::new(),
        }
    }

    /// Allocates a fresh HTML element with no attributes or children.
    pub fn element(tag_name: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Element {
                tag_name: tag_name.into(),
                namespace: String::new(),
                attributes: Vec::new(),
            },
            children: Vec::new(),
        }
    }

    /// Creates a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Text {
                content: content.into(),
            },
            children: Vec::new(),
        }
    }

    /// Creates a comment node.
    pub fn comment(content: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Comment {
                content: content.into(),
            },
            children: Vec::new(),
        }
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder form of appending a child.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Local name of an element; `None` for other nodes.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.node_type {
            NodeType::Element { tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    /// Namespace of an element. Empty for HTML elements.
    pub fn namespace(&self) -> Option<&str> {
        match &self.node_type {
            NodeType::Element { namespace, .. } => Some(namespace),
            _ => None,
        }
    }

    /// Returns true for element nodes.
    pub fn is_element(&self) -> bool {
        matches!(self.node_type, NodeType::Element { .. })
    }

    /// Returns true for text nodes.
    pub fn is_text(&self) -> bool {
        matches!(self.node_type, NodeType::Text { .. })
    }

    /// Returns true for an HTML-namespace element with the given local name.
    pub fn is_html_element(&self, name: &str) -> bool {
        match &self.node_type {
            NodeType::Element {
                tag_name,
                namespace,
                ..
            } => {
                (namespace.is_empty() || namespace == HTML_NAMESPACE)
                    && tag_name.eq_ignore_ascii_case(name)
            }
            _ => false,
        }
    }

    /// Borrows an attribute value. Names match ASCII case-insensitively.
    pub fn get_attribute_ref(&self, name: &str) -> Option<&str> {
        match &self.node_type {
            NodeType::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Owned form of [`get_attribute_ref`](Self::get_attribute_ref).
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.get_attribute_ref(name).map(|v| v.to_string())
    }

    /// Returns true if the attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute_ref(name).is_some()
    }

    /// Sets an attribute, replacing any existing value in place.
    ///
    /// Has no effect on non-element nodes.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        if let NodeType::Element { attributes, .. } = &mut self.node_type {
            let value = value.into();
            match attributes
                .iter_mut()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
            {
                Some((_, existing)) => *existing = value,
                None => attributes.push((name.to_ascii_lowercase(), value)),
            }
        }
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        match &mut self.node_type {
            NodeType::Element { attributes, .. } => {
                let pos = attributes
                    .iter()
                    .position(|(k, _)| k.eq_ignore_ascii_case(name))?;
                Some(attributes.remove(pos).1)
            }
            _ => None,
        }
    }

    /// Attributes in insertion order. Empty for non-elements.
    pub fn attributes_iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        let attrs: &[(String, String)] = match &self.node_type {
            NodeType::Element { attributes, .. } => attributes,
            _ => &[],
        };
        attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.walk_tree(&mut |node| {
            if let NodeType::Text { content } = &node.node_type {
                out.push_str(content);
            }
        });
        out
    }

    /// Pre-order traversal including `self`.
    pub fn walk_tree<F>(&self, f: &mut F)
    where
        F: FnMut(&Node),
    {
        f(self);
        for child in &self.children {
            child.walk_tree(f);
        }
    }

    /// Mutable pre-order traversal including `self`.
    pub fn walk_tree_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Node),
    {
        f(self);
        for child in &mut self.children {
            child.walk_tree_mut(f);
        }
    }

    /// First node in document order (including `self`) matching `pred`.
    pub fn find<P>(&self, pred: &P) -> Option<&Node>
    where
        P: Fn(&Node) -> bool,
    {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(pred))
    }

    /// Mutable form of [`find`](Self::find).
    pub fn find_mut<P>(&mut self, pred: &P) -> Option<&mut Node>
    where
        P: Fn(&Node) -> bool,
    {
        if pred(self) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(pred))
    }

    /// Every node in document order (including `self`) matching `pred`.
    pub fn find_all<P>(&self, pred: &P) -> Vec<&Node>
    where
        P: Fn(&Node) -> bool,
    {
        let mut found = Vec::new();
        self.collect_matching(pred, &mut found);
        found
    }

    fn collect_matching<'a, P>(&'a self, pred: &P, found: &mut Vec<&'a Node>)
    where
        P: Fn(&Node) -> bool,
    {
        if pred(self) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_matching(pred, found);
        }
    }

    /// First element whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<&Node> {
        self.find(&|node: &Node| node.is_element() && node.get_attribute_ref("id") == Some(id))
    }

    /// Mutable form of [`get_element_by_id`](Self::get_element_by_id).
    pub fn get_element_by_id_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.find_mut(&|node: &Node| node.is_element() && node.get_attribute_ref("id") == Some(id))
    }

    /// Detaches every descendant matching `pred`, together with its subtree.
    ///
    /// Matching nodes are not descended into. Returns the number of nodes
    /// removed.
    pub fn remove_descendants<P>(&mut self, pred: &mut P) -> usize
    where
        P: FnMut(&Node) -> bool,
    {
        let mut removed = 0;
        self.children.retain(|child| {
            let matched = pred(child);
            if matched {
                removed += 1;
            }
            !matched
        });
        for child in &mut self.children {
            removed += child.remove_descendants(pred);
        }
        removed
    }

    /// The `<body>` element of a parsed document.
    pub fn body(&self) -> Option<&Node> {
        self.find(&|node: &Node| node.is_html_element("body"))
    }

    /// Mutable form of [`body`](Self::body).
    pub fn body_mut(&mut self) -> Option<&mut Node> {
        self.find_mut(&|node: &Node| node.is_html_element("body"))
    }

    /// Serializes this node's children as HTML.
    pub fn inner_html(&self) -> String {
        serialize::inner_html(self)
    }

    /// Serializes this node, including its own tags, as HTML.
    pub fn outer_html(&self) -> String {
        serialize::outer_html(self)
    }
}
