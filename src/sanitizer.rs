use crate::dom::Node;
use crate::images::{self, BLOCKED_SRC_ATTR};
use crate::{Sanitized, Untrusted};

/// Trait for turning untrusted content into sanitized content.
///
/// # Invariants
///
/// Implementations MUST:
/// - apply every one of their transforms before wrapping the result
/// - only call `Sanitized::new_unchecked` on the transformed value
///
/// The associated `Report` lets a pass describe what it changed without
/// exposing the content itself.
pub trait Sanitizer<T> {
    /// Summary of what the pass changed.
    type Report;

    /// Cleans `input`, returning it as sanitized along with a report.
    fn sanitize(&self, input: Untrusted<T>) -> (Sanitized<T>, Self::Report);
}

/// Counts of what a [`CleanUpPass`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanUpReport {
    /// `<script>` elements removed, in any namespace
    pub scripts_removed: usize,
    /// 1x1 GIF images removed
    pub pixels_removed: usize,
    /// Image sources rewritten from `http://` to `https://`
    pub sources_upgraded: usize,
    /// Author-supplied side-channel attributes stripped
    pub stashes_stripped: usize,
    /// Images blocked because the view was in blocked mode
    pub images_blocked: usize,
}

/// The clean-up pass run on every freshly parsed document.
///
/// In order:
/// 1. remove every script element;
/// 2. remove 1x1 GIF tracking pixels;
/// 3. upgrade `http://` image sources to `https://`;
/// 4. strip any `blocked_src` the content brought with it, then, in blocked
///    mode, block every remaining image exactly as the view's blocking
///    operation does.
///
/// # Examples
///
/// ```
/// use content_view::{dom, CleanUpPass, Sanitizer, Untrusted};
///
/// let doc = dom::parse_html(r#"<script>x()</script><img src="http://a/b.png">"#).unwrap();
/// let (clean, report) = CleanUpPass::new(false).sanitize(Untrusted::new(doc));
///
/// assert_eq!(report.scripts_removed, 1);
/// assert_eq!(clean.as_ref().body().unwrap().inner_html(), r#"<img src="https://a/b.png">"#);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CleanUpPass {
    block_images: bool,
}

impl CleanUpPass {
    /// Creates a pass; `block_images` mirrors the view's blocked mode.
    pub fn new(block_images: bool) -> Self {
        Self { block_images }
    }
}

impl Sanitizer<Node> for CleanUpPass {
    type Report = CleanUpReport;

    fn sanitize(&self, input: Untrusted<Node>) -> (Sanitized<Node>, CleanUpReport) {
        let mut doc = input.into_inner();
        let mut report = CleanUpReport {
            scripts_removed: doc.remove_descendants(&mut is_script),
            pixels_removed: doc.remove_descendants(&mut images::is_tracking_pixel),
            ..CleanUpReport::default()
        };

        doc.walk_tree_mut(&mut |node| {
            if !images::is_image(node) {
                return;
            }
            if images::upgrade_insecure_source(node) {
                report.sources_upgraded += 1;
            }
            if node.remove_attribute(BLOCKED_SRC_ATTR).is_some() {
                report.stashes_stripped += 1;
            }
        });

        if self.block_images {
            report.images_blocked = images::block_images(&mut doc);
        }

        (Sanitized::new_unchecked(doc), report)
    }
}

/// Script elements in any namespace; SVG `<script>` executes too.
fn is_script(node: &Node) -> bool {
    node.tag_name()
        .is_some_and(|tag| tag.eq_ignore_ascii_case("script"))
}
