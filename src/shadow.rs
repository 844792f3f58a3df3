//! The isolation boundary owned by a [`ContentView`](crate::ContentView).
//!
//! A shadow root is a separately owned subtree. Host styles and ids never mix
//! with it, and content only enters it through [`ShadowRoot::splice`], which
//! takes a [`Sanitized`] document.

use crate::dom::Node;
use crate::error::{MarkupViolation, MarkupViolationKind};
use crate::images;
use crate::Sanitized;

/// Id of the image toggle checkbox.
pub const CONTROL_ID: &str = "toggle-images";

/// Name of the content-projection slot.
pub const CONTENT_SLOT: &str = "content";

const TEMPLATE_CSS: &str =
    r#"slot[name="content"] { display: none; } .control-panel { margin-bottom: 10px; }"#;

/// The rendered subtree of one view: its fixed template plus every
/// spliced content container and transplanted style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowRoot {
    fragment: Node,
}

impl ShadowRoot {
    /// Builds a shadow root seeded with the fixed template: the template
    /// style, the control panel, then the content slot.
    pub fn new() -> Self {
        let control = Node::element("div")
            .with_attribute("class", "control-panel")
            .with_child(
                Node::element("label")
                    .with_child(
                        Node::element("input")
                            .with_attribute("type", "checkbox")
                            .with_attribute("id", CONTROL_ID),
                    )
                    .with_child(Node::text(" Show Images")),
            );

        let fragment = Node::document()
            .with_child(Node::element("style").with_child(Node::text(TEMPLATE_CSS)))
            .with_child(control)
            .with_child(Node::element("slot").with_attribute("name", CONTENT_SLOT));

        Self { fragment }
    }

    /// Top-level nodes, in insertion order.
    pub fn children(&self) -> &[Node] {
        &self.fragment.children
    }

    /// Serializes the whole shadow root.
    pub fn inner_html(&self) -> String {
        self.fragment.inner_html()
    }

    /// First element in the shadow root with the given `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<&Node> {
        self.fragment.get_element_by_id(id)
    }

    /// Every image in the shadow root, in document order.
    pub fn images(&self) -> Vec<&Node> {
        self.fragment.find_all(&images::is_image)
    }

    /// The `#toggle-images` checkbox.
    pub fn control(&self) -> Result<&Node, MarkupViolation> {
        self.fragment
            .get_element_by_id(CONTROL_ID)
            .filter(|node| node.is_html_element("input"))
            .ok_or(MarkupViolation::new(MarkupViolationKind::MissingControl))
    }

    pub(crate) fn control_mut(&mut self) -> Result<&mut Node, MarkupViolation> {
        self.fragment
            .find_mut(&|node: &Node| {
                node.is_html_element("input") && node.get_attribute_ref("id") == Some(CONTROL_ID)
            })
            .ok_or(MarkupViolation::new(MarkupViolationKind::MissingControl))
    }

    /// The `content` projection slot.
    pub fn content_slot(&self) -> Result<&Node, MarkupViolation> {
        self.fragment
            .find(&|node: &Node| {
                node.is_html_element("slot") && node.get_attribute_ref("name") == Some(CONTENT_SLOT)
            })
            .ok_or(MarkupViolation::new(MarkupViolationKind::MissingSlot))
    }

    /// Appends a fresh `<style>` element holding `css_text`.
    pub(crate) fn append_style(&mut self, css_text: String) {
        self.fragment
            .children
            .push(Node::element("style").with_child(Node::text(css_text)));
    }

    /// Wraps the document's body children in a new `<div>` and appends it.
    ///
    /// Strictly additive: earlier content stays in place. Returns the number
    /// of nodes moved into the container.
    pub(crate) fn splice(&mut self, content: Sanitized<Node>) -> usize {
        let mut doc = content.into_inner();
        let children = doc
            .body_mut()
            .map(|body| std::mem::take(&mut body.children))
            .unwrap_or_default();
        let moved = children.len();

        let mut container = Node::element("div");
        container.children = children;
        self.fragment.children.push(container);
        moved
    }

    pub(crate) fn block_images(&mut self) -> usize {
        images::block_images(&mut self.fragment)
    }

    pub(crate) fn unblock_images(&mut self) -> usize {
        images::unblock_images(&mut self.fragment)
    }

    #[cfg(test)]
    pub(crate) fn fragment_mut(&mut self) -> &mut Node {
        &mut self.fragment
    }
}

impl Default for ShadowRoot {
    fn default() -> Self {
        Self::new()
    }
}
