//! Isolated rendering of untrusted HTML with image-safety controls.
//!
//! A [`ContentView`] parses host-supplied markup, cleans it, and renders it
//! into its own [`ShadowRoot`]:
//! - **Script stripping**: every `<script>` element is removed before render
//! - **Tracking-pixel removal**: 1x1 GIF images are dropped
//! - **HTTPS upgrade**: `http://` image sources are rewritten to `https://`
//! - **Image blocking**: a user-toggled mode that hides every image source
//!
//! # Core Types
//!
//! - [`ContentView`]: the widget, its host attributes and lifecycle
//! - [`Untrusted<T>`]: raw markup and documents not yet cleaned
//! - [`Sanitized<T>`]: documents that went through a [`Sanitizer`]
//! - [`ElementRegistry`]: custom element definitions and page upgrades
//!
//! # Examples
//!
//! ```
//! use content_view::ContentView;
//!
//! let mut view = ContentView::new();
//! view.connect().expect("template intact");
//!
//! view.set_content(concat!(
//!     "<style>body { font-family: serif; }</style>",
//!     "<p>Hello World</p>",
//!     r#"<img src="http://example.com/image.jpg" width="100" height="100">"#,
//!     r#"<img src="http://example.com/pixel.gif" width="1" height="1">"#,
//!     "<script>track()</script>",
//! ));
//!
//! let html = view.shadow_root().inner_html();
//! assert!(html.contains("<style>:host { font-family: serif; }</style>"));
//! assert!(html.contains(r#"<img src="https://example.com/image.jpg" width="100" height="100">"#));
//! assert!(!html.contains("pixel.gif"));
//! assert!(!html.contains("track()"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dom;
mod error;
pub mod images;
mod logging;
mod options;
mod registry;
mod sanitized;
mod sanitizer;
mod shadow;
pub mod style;
pub mod trail;
mod untrusted;
mod view;

#[cfg(test)]
mod test_utils;

pub use error::{
    DefinitionError, Error, MarkupViolation, MarkupViolationKind, ParseError, ParseErrorKind,
    Result,
};
pub use logging::ViewLog;
pub use options::{ViewOptions, DEFAULT_HOST_SELECTOR, DEFAULT_MAX_INPUT_LEN};
pub use registry::{is_valid_custom_element_name, ElementRegistry};
pub use sanitized::Sanitized;
pub use sanitizer::{CleanUpPass, CleanUpReport, Sanitizer};
pub use shadow::{ShadowRoot, CONTENT_SLOT, CONTROL_ID};
pub use trail::DEFAULT_TRAIL_CAPACITY;
pub use untrusted::Untrusted;
pub use view::{ContentView, IngestReport, BLOCK_IMAGES_ATTR, DEFAULT_TAG_NAME};
