//! Diagnostics for flightplan.
//!
//! Diagnostics are structured messages emitted while compiling a manifest.
//! Unlike errors they are never fatal: a job referencing an unknown release
//! is reported here and skipped, and the transform keeps going.
//!
//! Principles:
//! - deterministic: no timestamps, no machine-specific data
//! - structured: codes + fields for tooling and filtering
//! - transport-free: the core only collects; callers decide how to emit

use std::collections::BTreeMap;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagLevel {
    Info,
    Warning,
}

impl DiagLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagLevel::Info => "info",
            DiagLevel::Warning => "warning",
        }
    }
}

/// A structured diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagLevel,
    pub code: String,
    pub message: String,
    pub fields: BTreeMap<String, String>,
}

impl Diagnostic {
    pub fn new(level: DiagLevel, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            code: code.into(),
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        matches!(self.level, DiagLevel::Warning)
    }
}

/// A diagnostics collection, filled in while a transform runs.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, d: Diagnostic) {
        self.items.push(d);
    }

    /// Push an info diagnostic.
    pub fn info(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.items.push(Diagnostic::new(DiagLevel::Info, code, message));
    }

    /// Push a warning diagnostic.
    pub fn warning(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.items
            .push(Diagnostic::new(DiagLevel::Warning, code, message));
    }

    pub fn has_warnings(&self) -> bool {
        self.items.iter().any(|d| d.is_warning())
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }
}

/// Standard diagnostic codes.
/// Keep this list stable to avoid breaking downstream tooling.
pub mod codes {
    /// A role declares no jobs; parameter resolution skips it.
    pub const ROLE_WITHOUT_JOBS: &str = "resolve.role_without_jobs";
    /// A job references a release absent from the property catalog.
    pub const UNKNOWN_RELEASE: &str = "resolve.unknown_release";
    /// A job name is absent under its release in the property catalog.
    pub const UNKNOWN_JOB: &str = "resolve.unknown_job";
}
