//! Side-channel diagnostics for degraded renderings.
//!
//! Diagnostics never reach the generated program. Each one is also emitted
//! as a `tracing` debug event when it is recorded.

use std::fmt;

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Name of the element whose rendering degraded.
    pub element: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.element, self.message)
    }
}

/// Ordered diagnostic sink scoped to the element being rendered.
#[derive(Debug, Default)]
pub struct Diagnostics {
    context: String,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute subsequent diagnostics to `element`.
    pub fn enter(&mut self, element: &str) {
        self.context = element.to_string();
    }

    pub fn report(&mut self, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            element: self.context.clone(),
            message: message.into(),
        };
        debug!(element = %diagnostic.element, message = %diagnostic.message, "degraded rendering");
        self.entries.push(diagnostic);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
