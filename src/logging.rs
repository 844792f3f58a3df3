use std::fmt;

/// A view-scoped logging handle.
///
/// Every record carries the owning view's id so interleaved output from
/// several views on one page can be told apart. Callers log sizes and counts,
/// never raw markup.
#[derive(Debug, Clone, Copy)]
pub struct ViewLog<'a> {
    view_id: &'a str,
}

impl<'a> ViewLog<'a> {
    pub(crate) fn new(view_id: &'a str) -> Self {
        Self { view_id }
    }

    /// Returns the view id attached to every record.
    pub fn view_id(&self) -> &str {
        self.view_id
    }

    /// Logs an info-level message.
    ///
    /// ```no_run
    /// # use content_view::ContentView;
    /// let view = ContentView::new();
    /// view.log().info(format_args!("rendered {} images", 3));
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(view_id = %self.view_id, "{}", args);
    }

    /// Logs a warn-level message.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(view_id = %self.view_id, "{}", args);
    }

    /// Logs an error-level message.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(view_id = %self.view_id, "{}", args);
    }

    /// Logs a debug-level message.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(view_id = %self.view_id, "{}", args);
    }
}
