use crate::trail::DEFAULT_TRAIL_CAPACITY;

/// Default upper bound on raw markup size, in bytes.
pub const DEFAULT_MAX_INPUT_LEN: usize = 1024 * 1024;

/// Selector that replaces document-root keywords in transplanted styles.
pub const DEFAULT_HOST_SELECTOR: &str = ":host";

/// Per-view configuration.
///
/// # Examples
///
/// ```
/// use content_view::ViewOptions;
///
/// let options = ViewOptions::new().with_max_input_len(64 * 1024);
/// assert_eq!(options.max_input_len(), 64 * 1024);
/// assert_eq!(options.host_selector(), ":host");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    max_input_len: usize,
    host_selector: String,
    trail_capacity: usize,
}

impl ViewOptions {
    /// Creates options with the default limits.
    pub fn new() -> Self {
        Self {
            max_input_len: DEFAULT_MAX_INPUT_LEN,
            host_selector: DEFAULT_HOST_SELECTOR.to_string(),
            trail_capacity: DEFAULT_TRAIL_CAPACITY,
        }
    }

    /// Sets the largest raw markup accepted by the ingestion pipeline.
    ///
    /// # Panics
    ///
    /// Panics if `max_input_len` is 0.
    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        assert!(max_input_len > 0, "max_input_len must be greater than 0");
        self.max_input_len = max_input_len;
        self
    }

    /// Sets the selector that `body` and `html` are rewritten to.
    pub fn with_host_selector(mut self, selector: impl Into<String>) -> Self {
        self.host_selector = selector.into();
        self
    }

    /// Sets how many events the view's trail keeps. 0 disables recording.
    pub fn with_trail_capacity(mut self, trail_capacity: usize) -> Self {
        self.trail_capacity = trail_capacity;
        self
    }

    /// Largest raw markup accepted, in bytes.
    pub fn max_input_len(&self) -> usize {
        self.max_input_len
    }

    /// Selector that `body` and `html` are rewritten to.
    pub fn host_selector(&self) -> &str {
        &self.host_selector
    }

    /// Events the view's trail keeps before evicting the oldest.
    pub fn trail_capacity(&self) -> usize {
        self.trail_capacity
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ViewOptions::default();
        assert_eq!(options.max_input_len(), DEFAULT_MAX_INPUT_LEN);
        assert_eq!(options.host_selector(), ":host");
        assert_eq!(options.trail_capacity(), DEFAULT_TRAIL_CAPACITY);
    }

    #[test]
    fn builders_override() {
        let options = ViewOptions::new()
            .with_max_input_len(10)
            .with_host_selector(":host(.mail)")
            .with_trail_capacity(0);

        assert_eq!(options.max_input_len(), 10);
        assert_eq!(options.host_selector(), ":host(.mail)");
        assert_eq!(options.trail_capacity(), 0);
    }

    #[test]
    #[should_panic(expected = "max_input_len must be greater than 0")]
    fn zero_limit_panics() {
        let _ = ViewOptions::new().with_max_input_len(0);
    }
}
