use std::collections::HashMap;

use crate::dom::{self, Node};
use crate::error::{DefinitionError, Result};
use crate::options::ViewOptions;
use crate::view::ContentView;

/// Hyphenated names the HTML standard reserves for SVG and MathML.
const RESERVED_NAMES: [&str; 8] = [
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// Maps custom element names to view definitions.
///
/// The host page chooses the tag name; the registry validates it, creates
/// views for it, and upgrades matching elements found in page markup.
///
/// # Examples
///
/// ```
/// use content_view::{ElementRegistry, ViewOptions};
///
/// let mut registry = ElementRegistry::new();
/// registry.define("mail-body", ViewOptions::default()).unwrap();
///
/// let views = registry
///     .upgrade(r#"<mail-body block-images><div slot="content">&lt;p&gt;hi&lt;/p&gt;</div></mail-body>"#)
///     .unwrap();
///
/// assert_eq!(views.len(), 1);
/// assert!(views[0].is_connected());
/// assert_eq!(views[0].checkbox_checked().unwrap(), false);
/// ```
#[derive(Debug, Default)]
pub struct ElementRegistry {
    definitions: HashMap<String, ViewOptions>,
}

impl ElementRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` as a content view element.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidName`] if `name` is not a valid
    /// custom element name and [`DefinitionError::AlreadyDefined`] if it was
    /// registered before.
    pub fn define(&mut self, name: &str, options: ViewOptions) -> Result<()> {
        if !is_valid_custom_element_name(name) {
            return Err(DefinitionError::InvalidName {
                name: name.to_string(),
            }
            .into());
        }
        if self.definitions.contains_key(name) {
            return Err(DefinitionError::AlreadyDefined {
                name: name.to_string(),
            }
            .into());
        }

        tracing::debug!(element = name, "custom element defined");
        self.definitions.insert(name.to_string(), options);
        Ok(())
    }

    /// Returns true if `name` has been defined.
    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Options stored with the definition of `name`.
    pub fn options_for(&self, name: &str) -> Option<&ViewOptions> {
        self.definitions.get(name)
    }

    /// Creates a disconnected view for a defined name.
    pub fn create(&self, name: &str) -> Result<ContentView> {
        let options = self
            .definitions
            .get(name)
            .ok_or_else(|| DefinitionError::Undefined {
                name: name.to_string(),
            })?;
        Ok(ContentView::for_element(name, options.clone()))
    }

    /// Parses host page markup and upgrades every element with a defined
    /// name, in document order.
    ///
    /// Each view receives the element's attributes first, so an initial
    /// `block-images` runs its handler, then copies of its children, and is
    /// connected last so already-slotted content renders once.
    ///
    /// # Errors
    ///
    /// Fails if the page cannot be parsed or a view cannot be connected.
    pub fn upgrade(&self, page_html: &str) -> Result<Vec<ContentView>> {
        let page = dom::parse_html(page_html)?;

        let hosts = page.find_all(&|node: &Node| {
            node.tag_name()
                .is_some_and(|tag| node.is_html_element(tag) && self.is_defined(tag))
        });
        tracing::debug!(count = hosts.len(), "upgrading defined elements");

        hosts
            .into_iter()
            .map(|host| self.upgrade_element(host))
            .collect()
    }

    fn upgrade_element(&self, host: &Node) -> Result<ContentView> {
        let mut view = self.create(host.tag_name().unwrap_or_default())?;
        for (name, value) in host.attributes_iter() {
            view.set_attribute(name, value);
        }
        for child in &host.children {
            view.append_child(child.clone());
        }
        view.connect()?;
        Ok(view)
    }
}

/// Checks the HTML "valid custom element name" production.
pub fn is_valid_custom_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_lower = chars.next().is_some_and(|c| c.is_ascii_lowercase());

    starts_lower
        && name.contains('-')
        && chars.all(is_name_char)
        && !RESERVED_NAMES.contains(&name)
}

fn is_name_char(c: char) -> bool {
    matches!(c,
        '-' | '.' | '0'..='9' | '_' | 'a'..='z'
        | '\u{B7}'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{203F}'..='\u{2040}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}
