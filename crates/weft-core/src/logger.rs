//! Diagnostics collection.
//!
//! Roles, directives and transforms report through a [`Logger`], which
//! collects [`Diagnostic`]s for the caller and mirrors them to `tracing` at
//! matching levels. Delivery is synchronous; there is no buffering beyond
//! the collected list handed back after the parse.

use std::cell::RefCell;

use serde::Serialize;
use weft_ast::Position;

/// Severity of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

/// A single diagnostic message.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Category of the message (e.g. `"propagate-targets"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Name of the extension the message originated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

/// Optional context attached to a log call.
#[derive(Clone, Debug, Default)]
pub struct LogProps {
    pub position: Option<Position>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub extension: Option<String>,
}

impl LogProps {
    #[must_use]
    pub fn at(position: Option<Position>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Collects diagnostics during a single parse.
///
/// Log methods take `&self` so a logger can be shared down the resolution
/// recursion alongside mutable tree access; collection is interior.
#[derive(Debug, Default)]
pub struct Logger {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug(&self, message: impl Into<String>, props: LogProps) -> Diagnostic {
        self.log(Level::Debug, message.into(), props)
    }

    pub fn info(&self, message: impl Into<String>, props: LogProps) -> Diagnostic {
        self.log(Level::Info, message.into(), props)
    }

    pub fn warning(&self, message: impl Into<String>, props: LogProps) -> Diagnostic {
        self.log(Level::Warning, message.into(), props)
    }

    pub fn error(&self, message: impl Into<String>, props: LogProps) -> Diagnostic {
        self.log(Level::Error, message.into(), props)
    }

    /// All diagnostics collected so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Consume the logger and return the collected diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }

    fn log(&self, level: Level, message: String, props: LogProps) -> Diagnostic {
        let diagnostic = Diagnostic {
            message,
            level,
            position: props.position,
            category: props.category,
            subcategory: props.subcategory,
            extension: props.extension,
        };
        match level {
            Level::Debug => tracing::debug!("{}", diagnostic.message),
            Level::Info => tracing::info!("{}", diagnostic.message),
            Level::Warning => tracing::warn!("{}", diagnostic.message),
            Level::Error => tracing::error!("{}", diagnostic.message),
        }
        self.diagnostics.borrow_mut().push(diagnostic.clone());
        diagnostic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let logger = Logger::new();
        logger.warning("first", LogProps::default());
        logger.error("second", LogProps::default().category("x"));
        let diagnostics = logger.into_diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].level, Level::Warning);
        assert_eq!(diagnostics[1].message, "second");
        assert_eq!(diagnostics[1].category.as_deref(), Some("x"));
    }

    #[test]
    fn test_returns_the_logged_diagnostic() {
        let logger = Logger::new();
        let diagnostic = logger.info("hello", LogProps::default());
        assert_eq!(diagnostic.level, Level::Info);
        assert_eq!(diagnostic.message, "hello");
    }
}
