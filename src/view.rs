use std::sync::atomic::{AtomicU64, Ordering};

use crate::dom::{self, Node};
use crate::error::{ParseError, ParseErrorKind, Result};
use crate::logging::ViewLog;
use crate::options::ViewOptions;
use crate::sanitizer::{CleanUpPass, CleanUpReport, Sanitizer};
use crate::shadow::{ShadowRoot, CONTENT_SLOT};
use crate::style;
use crate::trail::{EventTrail, Outcome, ViewEvent, ViewEventKind};
use crate::Untrusted;

/// Observed host attribute; its presence means images are blocked.
pub const BLOCK_IMAGES_ATTR: &str = "block-images";

/// Tag name used when a view is created outside a registry.
pub const DEFAULT_TAG_NAME: &str = "content-view";

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// What one successful run of the ingestion pipeline did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// What the clean-up pass changed
    pub cleanup: CleanUpReport,
    /// `<style>` elements appended to the shadow root
    pub styles_injected: usize,
    /// Body nodes moved into the new content container
    pub nodes_spliced: usize,
}

/// A widget that renders untrusted HTML inside its own shadow root.
///
/// The view owns a host element (attributes plus light-DOM children) and a
/// [`ShadowRoot`] built once at construction. Host-side events are modelled
/// as method calls that run to completion before returning.
///
/// Blocked mode is the presence of the `block-images` host attribute. After
/// every handler completes, the `#toggle-images` checkbox is checked exactly
/// when images are not blocked.
///
/// # Examples
///
/// ```
/// use content_view::ContentView;
///
/// let mut view = ContentView::new();
/// view.connect().unwrap();
///
/// view.set_content(r#"<p>Hi</p><img src="http://example.com/a.jpg">"#);
/// assert_eq!(view.shadow_root().images()[0].get_attribute_ref("src"), Some("https://example.com/a.jpg"));
///
/// view.toggle_checkbox().unwrap();
/// assert!(view.images_blocked());
/// assert_eq!(view.shadow_root().images()[0].get_attribute_ref("src"), Some(""));
/// ```
#[derive(Debug)]
pub struct ContentView {
    id: String,
    options: ViewOptions,
    host: Node,
    shadow: ShadowRoot,
    connected: bool,
    control_wired: bool,
    slot_observed: bool,
    trail: EventTrail,
}

impl ContentView {
    /// Creates a disconnected view with default options.
    pub fn new() -> Self {
        Self::with_options(ViewOptions::default())
    }

    /// Creates a disconnected view with `options`.
    pub fn with_options(options: ViewOptions) -> Self {
        Self::for_element(DEFAULT_TAG_NAME, options)
    }

    /// Creates a view whose host element carries `tag_name`.
    pub(crate) fn for_element(tag_name: &str, options: ViewOptions) -> Self {
        let id = format!("view-{}", NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(view_id = %id, tag = tag_name, "view constructed");
        let trail = EventTrail::with_capacity(options.trail_capacity());
        Self {
            id,
            options,
            host: Node::element(tag_name),
            shadow: ShadowRoot::new(),
            connected: false,
            control_wired: false,
            slot_observed: false,
            trail,
        }
    }

    /// Process-unique id used in logs and the event trail.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a logger that tags records with this view's id.
    pub fn log(&self) -> ViewLog<'_> {
        ViewLog::new(&self.id)
    }

    /// Options the view was created with.
    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Tag name of the host element.
    pub fn tag_name(&self) -> &str {
        self.host.tag_name().unwrap_or(DEFAULT_TAG_NAME)
    }

    /// The rendered output.
    pub fn shadow_root(&self) -> &ShadowRoot {
        &self.shadow
    }

    /// Lifecycle events recorded so far, bounded by the trail capacity.
    pub fn trail(&self) -> &EventTrail {
        &self.trail
    }

    /// Returns true once [`connect`](Self::connect) has succeeded.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    // --- host attributes ---

    /// Reads a host attribute.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.host.get_attribute_ref(&name.to_ascii_lowercase())
    }

    /// Returns true if the host carries the attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.host.has_attribute(&name.to_ascii_lowercase())
    }

    /// Sets a host attribute. Changing an observed attribute runs its handler
    /// before this returns.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        let old = self.host.get_attribute(&name);
        if old.as_deref() == Some(value.as_str()) {
            return;
        }
        self.host.set_attribute(&name, value.clone());
        self.attribute_changed(&name, old.as_deref(), Some(&value));
    }

    /// Removes a host attribute, returning its previous value. Removing an
    /// absent attribute is a no-op.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        let old = self.host.remove_attribute(&name)?;
        self.attribute_changed(&name, Some(&old), None);
        Some(old)
    }

    /// Reflects blocked mode onto the `block-images` attribute.
    pub fn set_block_images(&mut self, blocked: bool) {
        if blocked {
            self.set_attribute(BLOCK_IMAGES_ATTR, "");
        } else {
            self.remove_attribute(BLOCK_IMAGES_ATTR);
        }
    }

    /// Returns true while the host carries `block-images`.
    pub fn images_blocked(&self) -> bool {
        self.host.has_attribute(BLOCK_IMAGES_ATTR)
    }

    fn attribute_changed(&mut self, name: &str, old: Option<&str>, new: Option<&str>) {
        if name != BLOCK_IMAGES_ATTR {
            return;
        }
        self.log().debug(format_args!(
            "{} changed: {} -> {}",
            name,
            old.is_some(),
            new.is_some()
        ));
        self.trail.record(
            ViewEvent::new(&self.id, ViewEventKind::AttributeChanged, Outcome::Success)
                .with_detail(name),
        );
        self.apply_blocked_mode(new.is_some());
    }

    fn apply_blocked_mode(&mut self, blocked: bool) {
        let (count, kind) = if blocked {
            (self.shadow.block_images(), ViewEventKind::ImagesBlocked)
        } else {
            (self.shadow.unblock_images(), ViewEventKind::ImagesUnblocked)
        };

        if let Err(e) = self
            .shadow
            .control_mut()
            .map(|control| reflect_checked(control, !blocked))
        {
            self.log().error(format_args!("{}", e));
        }

        self.log().info(format_args!(
            "images {}: {} affected",
            if blocked { "blocked" } else { "unblocked" },
            count
        ));
        self.trail.record(
            ViewEvent::new(&self.id, kind, Outcome::Success).with_detail(format!("{} images", count)),
        );
    }

    // --- lifecycle ---

    /// Attaches the view: wires the checkbox, starts observing the content
    /// slot and renders any content already assigned to it.
    ///
    /// Later calls do nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Markup`](crate::Error::Markup) if the shadow root has
    /// lost its checkbox or content slot.
    pub fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Ok(());
        }

        let checked = !self.images_blocked();
        reflect_checked(self.shadow.control_mut()?, checked);
        self.control_wired = true;

        self.shadow.content_slot()?;
        self.slot_observed = true;

        self.connected = true;
        self.log()
            .debug(format_args!("connected, images blocked: {}", !checked));
        self.trail
            .record(ViewEvent::new(&self.id, ViewEventKind::Connected, Outcome::Success));

        self.slot_changed();
        Ok(())
    }

    // --- user control ---

    /// Whether the `#toggle-images` checkbox is checked.
    pub fn checkbox_checked(&self) -> Result<bool> {
        Ok(self.shadow.control()?.has_attribute("checked"))
    }

    /// Sets the checkbox as a user click would, then dispatches its change
    /// event. Setting the current state dispatches nothing.
    ///
    /// Once connected, checking removes `block-images` and unchecking sets
    /// it. Before that the listener is not wired and only the box changes.
    pub fn set_checkbox_checked(&mut self, checked: bool) -> Result<()> {
        let control = self.shadow.control_mut()?;
        if control.has_attribute("checked") == checked {
            return Ok(());
        }
        reflect_checked(control, checked);

        if self.control_wired {
            if checked {
                self.remove_attribute(BLOCK_IMAGES_ATTR);
            } else {
                self.set_attribute(BLOCK_IMAGES_ATTR, "");
            }
        }
        Ok(())
    }

    /// Flips the checkbox, as a user click would.
    pub fn toggle_checkbox(&mut self) -> Result<()> {
        let checked = self.checkbox_checked()?;
        self.set_checkbox_checked(!checked)
    }

    // --- light DOM ---

    /// Every light-DOM child, slotted or not.
    pub fn light_children(&self) -> &[Node] {
        &self.host.children
    }

    /// Light-DOM children projected into the `content` slot.
    pub fn assigned_nodes(&self) -> Vec<&Node> {
        self.host.children.iter().filter(|n| is_slotted(n)).collect()
    }

    /// Appends a light-DOM child. A child carrying `slot="content"` changes
    /// the slot's assignment and, once connected, re-renders.
    pub fn append_child(&mut self, child: Node) {
        let slotted = is_slotted(&child);
        self.host.children.push(child);
        if slotted {
            self.slot_changed();
        }
    }

    /// Replaces every child assigned to the `content` slot with `child`.
    pub fn replace_slotted_content(&mut self, child: Node) {
        self.host.children.retain(|n| !is_slotted(n));
        self.host.children.push(child);
        self.slot_changed();
    }

    fn slot_changed(&mut self) {
        if !self.slot_observed {
            return;
        }
        let Some(text) = self.assigned_nodes().first().map(|n| n.text_content()) else {
            self.log().debug(format_args!("slot change with no assigned content"));
            return;
        };
        self.process_html_string(&text);
    }

    // --- ingestion ---

    /// Renders `html` directly, bypassing the slot.
    pub fn set_content(&mut self, html: &str) -> Option<IngestReport> {
        self.process_html_string(html)
    }

    /// Parses, cleans and renders one raw HTML string.
    ///
    /// Failures never propagate: they are logged, recorded in the trail, and
    /// leave the current render untouched. Returns `None` in that case.
    pub fn process_html_string(&mut self, html: &str) -> Option<IngestReport> {
        let raw = Untrusted::new(html.to_string());
        match self.try_ingest(raw) {
            Ok(report) => {
                self.log().info(format_args!(
                    "ingested {} bytes: {} scripts, {} pixels removed, {} sources upgraded, {} styles",
                    html.len(),
                    report.cleanup.scripts_removed,
                    report.cleanup.pixels_removed,
                    report.cleanup.sources_upgraded,
                    report.styles_injected
                ));
                self.trail.record(
                    ViewEvent::new(&self.id, ViewEventKind::ContentIngested, Outcome::Success)
                        .with_detail(format!("{} bytes", html.len())),
                );
                Some(report)
            }
            Err(e) => {
                self.log().error(format_args!("ingestion failed: {}", e));
                self.trail.record(
                    ViewEvent::new(&self.id, ViewEventKind::ContentIngested, Outcome::Failed)
                        .with_detail(e.to_string()),
                );
                None
            }
        }
    }

    fn try_ingest(&mut self, raw: Untrusted<String>) -> Result<IngestReport> {
        let len = raw.peek().len();
        if len > self.options.max_input_len() {
            return Err(ParseError::new(
                ParseErrorKind::TooLarge,
                format!("input is {} bytes, limit is {}", len, self.options.max_input_len()),
            )
            .into());
        }

        let doc = raw.try_map(|html| dom::parse_html(&html))?;
        let (mut clean, cleanup) = CleanUpPass::new(self.images_blocked()).sanitize(doc);
        self.log().debug(format_args!("clean-up pass: {:?}", cleanup));

        let sheets = style::extract_styles(clean.inner_mut(), self.options.host_selector());
        let styles_injected = sheets.len();
        for sheet in sheets {
            self.shadow.append_style(sheet.to_css_text());
        }

        let nodes_spliced = self.shadow.splice(clean);
        Ok(IngestReport {
            cleanup,
            styles_injected,
            nodes_spliced,
        })
    }

    #[cfg(test)]
    pub(crate) fn shadow_mut(&mut self) -> &mut ShadowRoot {
        &mut self.shadow
    }
}

impl Default for ContentView {
    fn default() -> Self {
        Self::new()
    }
}

fn is_slotted(node: &Node) -> bool {
    node.is_element() && node.get_attribute_ref("slot") == Some(CONTENT_SLOT)
}

fn reflect_checked(control: &mut Node, checked: bool) {
    if checked {
        control.set_attribute("checked", "");
    } else {
        control.remove_attribute("checked");
    }
}
