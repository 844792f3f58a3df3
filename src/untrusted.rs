use std::fmt;

/// A wrapper for content supplied by the host page that has not been cleaned.
///
/// Raw markup and the documents parsed from it are `Untrusted` until the
/// clean-up pass has run over them. Nothing outside this crate can read the
/// wrapped value back out, so untrusted content cannot reach the shadow root
/// without going through a [`Sanitizer`](crate::Sanitizer).
///
/// # Examples
///
/// ```
/// use content_view::Untrusted;
///
/// let markup = Untrusted::new("<script>steal()</script><p>hi</p>".to_string());
///
/// // Debug output only reveals the wrapper, never the markup itself
/// assert_eq!(format!("{:?}", markup), "Untrusted { .. }");
/// ```
#[derive(Clone)]
pub struct Untrusted<T> {
    // Must stay private; a public field would let raw markup skip the clean-up pass.
    inner: T,
}

impl<T> Untrusted<T> {
    /// Wraps a value from an untrusted source.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Borrows the value for crate-internal inspection (length checks, parsing).
    pub(crate) fn peek(&self) -> &T {
        &self.inner
    }

    /// Extracts the inner value for sanitization.
    ///
    /// Only sanitizer implementations should call this, and only to hand the
    /// result straight to [`Sanitized::new_unchecked`](crate::Sanitized) after
    /// cleaning it.
    pub(crate) fn into_inner(self) -> T {
        self.inner
    }

    /// Transforms the wrapped value without releasing it.
    ///
    /// Parsing raw markup into a document keeps the result untrusted.
    pub(crate) fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Untrusted<U>, E> {
        f(self.inner).map(Untrusted::new)
    }
}

// Do NOT add Deref, AsRef, Borrow, From<T> or Into<T>: each one would let
// untrusted markup flow into the shadow root unsanitized.

impl<T> fmt::Debug for Untrusted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Untrusted").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_markup() {
        let markup = Untrusted::new("<img src=http://tracker/x.gif>".to_string());
        let debug_output = format!("{:?}", markup);

        assert!(debug_output.contains("Untrusted"));
        assert!(!debug_output.contains("tracker"));
    }

    #[test]
    fn try_map_keeps_value_wrapped() {
        let markup = Untrusted::new("42".to_string());

        let parsed: Untrusted<u32> = markup
            .try_map(|s| s.parse::<u32>())
            .expect("parses");
        assert_eq!(*parsed.peek(), 42);

        let failed = Untrusted::new("x".to_string()).try_map(|s| s.parse::<u32>());
        assert!(failed.is_err());
    }

    #[test]
    fn cannot_be_used_as_inner_type() {
        let markup = Untrusted::new("<p>x</p>".to_string());

        #[allow(dead_code)]
        fn takes_string(_s: String) {}

        // Does not compile if uncommented:
        // takes_string(markup);

        let _ = markup;
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Debug formatting never leaks any part of the wrapped markup.
            #[test]
            fn proptest_debug_never_leaks(body in "[a-z]{12,40}") {
                let markup = Untrusted::new(format!("<p>{}</p>", body));
                let debug_output = format!("{:?}", markup);
                prop_assert!(!debug_output.contains(&body));
            }
        }
    }
}
