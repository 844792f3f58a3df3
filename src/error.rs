use std::fmt;

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, wiring, or feeding a content view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Raw content could not be turned into a document.
    Parse(ParseError),
    /// The view's own fixed markup is missing a required node.
    Markup(MarkupViolation),
    /// A custom element definition was rejected or not found.
    Definition(DefinitionError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{}", e),
            Error::Markup(e) => write!(f, "{}", e),
            Error::Definition(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<MarkupViolation> for Error {
    fn from(e: MarkupViolation) -> Self {
        Error::Markup(e)
    }
}

impl From<DefinitionError> for Error {
    fn from(e: DefinitionError) -> Self {
        Error::Definition(e)
    }
}

/// Error returned when raw markup cannot be parsed.
///
/// The message never contains the rejected markup itself, only its size or
/// the parser's complaint.
///
/// # Examples
///
/// ```
/// use content_view::{ParseError, ParseErrorKind};
///
/// let error = ParseError::new(ParseErrorKind::TooLarge, "input is 4096 bytes");
/// assert_eq!(error.kind(), ParseErrorKind::TooLarge);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    message: String,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse failed ({}): {}", self.kind, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Kind of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The HTML parser reported a failure while reading the input.
    InvalidHtml,
    /// The input exceeds the configured maximum length.
    TooLarge,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHtml => write!(f, "invalid html"),
            Self::TooLarge => write!(f, "input too large"),
        }
    }
}

/// The view's shadow root no longer holds a node it was built with.
///
/// This is a construction bug, not an input condition, so it is surfaced to
/// the caller instead of being logged and swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupViolation {
    /// Which node could not be located
    pub kind: MarkupViolationKind,
}

impl MarkupViolation {
    /// Creates a new violation.
    pub fn new(kind: MarkupViolationKind) -> Self {
        Self { kind }
    }
}

impl fmt::Display for MarkupViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shadow root markup invariant violated: {}", self.kind)
    }
}

impl std::error::Error for MarkupViolation {}

/// Which fixed node was missing from the shadow root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupViolationKind {
    /// The `#toggle-images` checkbox is missing
    MissingControl,
    /// The `content` projection slot is missing
    MissingSlot,
}

impl fmt::Display for MarkupViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingControl => write!(f, "missing #toggle-images checkbox"),
            Self::MissingSlot => write!(f, "missing content slot"),
        }
    }
}

/// Error returned by [`ElementRegistry`](crate::ElementRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// The name is not a valid custom element name
    InvalidName {
        /// The rejected name
        name: String,
    },
    /// The name has already been defined
    AlreadyDefined {
        /// The duplicate name
        name: String,
    },
    /// No definition exists for the name
    Undefined {
        /// The unknown name
        name: String,
    },
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName { name } => {
                write!(f, "'{}' is not a valid custom element name", name)
            }
            Self::AlreadyDefined { name } => write!(f, "'{}' has already been defined", name),
            Self::Undefined { name } => write!(f, "no definition for '{}'", name),
        }
    }
}

impl std::error::Error for DefinitionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_names_kind() {
        let error = ParseError::new(ParseErrorKind::InvalidHtml, "unexpected end of stream");

        let output = format!("{}", error);
        assert!(output.contains("parse failed"));
        assert!(output.contains("invalid html"));
        assert!(output.contains("unexpected end of stream"));
    }

    #[test]
    fn errors_convert_into_crate_error() {
        let error: Error = ParseError::new(ParseErrorKind::TooLarge, "too big").into();
        assert!(matches!(error, Error::Parse(_)));

        let error: Error = MarkupViolation::new(MarkupViolationKind::MissingSlot).into();
        assert_eq!(
            error.to_string(),
            "shadow root markup invariant violated: missing content slot"
        );

        let error: Error = DefinitionError::Undefined {
            name: "mail-view".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "no definition for 'mail-view'");
    }
}
