//! flightplan-core
//!
//! Compiles a hierarchical role manifest (roles, jobs, configuration
//! variables, templates, authentication policy) into the flat declarative
//! definition a cloud workload platform consumes, plus a secondary
//! instance-definition merge.
//!
//! Design principles:
//! - deterministic: same inputs -> byte-identical output, no clocks, no I/O
//! - fail loudly: structural inconsistencies abort the whole transform
//! - explicit seams: template scanning and the property catalog are
//!   injected read-only dependencies
//!
//! All file loading, argument parsing, and logging live in the CLI crate.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod diagnostics;
pub mod errors;
pub mod model;
pub mod template;
pub mod transform;

pub use catalog::PropertyCatalog;
pub use diagnostics::{DiagLevel, Diagnostic, Diagnostics};
pub use errors::{FlightplanError, FlightplanResult};
pub use template::{MustacheScanner, TemplateScanner};
pub use transform::{TransformOptions, TransformOutcome, Transformer};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
