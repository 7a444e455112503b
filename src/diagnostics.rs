//! Warning aggregation and diagnostic summaries.

/// Aggregates warnings for a command run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Collected warning messages.
    warnings: Vec<String>,
    /// Whether warnings are echoed to stderr as they arrive.
    echo: bool,
}

impl Diagnostics {
    /// Create a collector that prints warnings as they are recorded.
    pub(crate) fn new() -> Self {
        Self {
            warnings: Vec::new(),
            echo: true,
        }
    }

    /// Create a collector that records warnings without printing them.
    #[cfg(test)]
    pub(crate) fn silent() -> Self {
        Self::default()
    }

    /// Record a warning and print it immediately.
    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.echo {
            eprintln!("Warning: {message}");
        }
        self.warnings.push(message);
    }

    /// Print a non-warning continuation line.
    pub(crate) fn note(&self, message: impl Into<String>) {
        if self.echo {
            eprintln!("{}", message.into());
        }
    }

    /// Warnings recorded so far.
    #[cfg(test)]
    pub(crate) fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Print a warning summary when warnings were emitted.
    pub(crate) fn print_warning_summary(&self) {
        if self.warnings.is_empty() {
            return;
        }

        eprintln!("Completed with {} warning(s).", self.warnings.len());
    }
}
