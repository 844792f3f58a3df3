/// Content that has been through the clean-up pass.
///
/// `Sanitized<T>` is proof that a parsed document had its scripts stripped,
/// tracking pixels removed and image sources upgraded. The shadow root only
/// splices `Sanitized` documents.
///
/// # Construction
///
/// There is no public constructor and no `From<T>` implementation. Only the
/// crate's [`Sanitizer`](crate::Sanitizer) implementations create values, via
/// the crate-internal `new_unchecked`.
///
/// ```compile_fail
/// use content_view::Sanitized;
///
/// let forged = Sanitized::new("<script></script>".to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized<T> {
    inner: T,
}

impl<T> Sanitized<T> {
    /// Wraps a value without checking it.
    ///
    /// Callers must have run every clean-up step on `value` first.
    pub(crate) fn new_unchecked(value: T) -> Self {
        Self { inner: value }
    }

    /// Mutable access for later pipeline stages that only remove content.
    pub(crate) fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consumes the wrapper and returns the cleaned value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsRef<T> for Sanitized<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}
