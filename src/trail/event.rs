use std::fmt;

/// Which lifecycle step an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEventKind {
    /// The view was attached and wired to its control and slot
    Connected,
    /// An observed host attribute changed
    AttributeChanged,
    /// A raw content string went through the ingestion pipeline
    ContentIngested,
    /// Rendered images were blocked
    ImagesBlocked,
    /// Rendered images were restored
    ImagesUnblocked,
}

impl fmt::Display for ViewEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewEventKind::Connected => write!(f, "connected"),
            ViewEventKind::AttributeChanged => write!(f, "attribute_changed"),
            ViewEventKind::ContentIngested => write!(f, "content_ingested"),
            ViewEventKind::ImagesBlocked => write!(f, "images_blocked"),
            ViewEventKind::ImagesUnblocked => write!(f, "images_unblocked"),
        }
    }
}

/// Whether a recorded step succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The step completed
    Success,
    /// The step failed and was recovered from; nothing was rendered
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Failed => write!(f, "failed"),
        }
    }
}

/// One recorded lifecycle step.
///
/// # Example
///
/// ```
/// use content_view::trail::{Outcome, ViewEvent, ViewEventKind};
///
/// let event = ViewEvent::new("view-1", ViewEventKind::ImagesBlocked, Outcome::Success)
///     .with_detail("2 images");
///
/// assert_eq!(event.to_string(), "ViewEvent[kind=images_blocked, outcome=success, view_id=view-1, detail=2 images]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEvent {
    view_id: String,
    kind: ViewEventKind,
    outcome: Outcome,
    /// Counts or attribute names; MUST NOT contain markup
    detail: Option<String>,
}

impl ViewEvent {
    /// Creates an event without detail.
    pub fn new(view_id: impl Into<String>, kind: ViewEventKind, outcome: Outcome) -> Self {
        Self {
            view_id: view_id.into(),
            kind,
            outcome,
            detail: None,
        }
    }

    /// Attaches a detail string. It must not contain markup.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Id of the view that recorded the event.
    pub fn view_id(&self) -> &str {
        &self.view_id
    }

    /// Which step the event describes.
    pub fn kind(&self) -> ViewEventKind {
        self.kind
    }

    /// How the step ended.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Counts or attribute names attached to the event.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl fmt::Display for ViewEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ViewEvent[kind={}, outcome={}, view_id={}",
            self.kind, self.outcome, self.view_id
        )?;
        if let Some(detail) = &self.detail {
            write!(f, ", detail={}", detail)?;
        }
        write!(f, "]")
    }
}
