//! Error types for flightplan-core.
//!
//! Errors are structured, explicit, and stable. Every error here is fatal to
//! the transform that raised it: the compiler either returns a complete
//! definition or one of these, never a partial document.

use std::fmt::{self, Display};

/// Result type used throughout flightplan-core.
pub type FlightplanResult<T> = Result<T, FlightplanError>;

/// Top-level error type for flightplan-core.
#[derive(Debug)]
pub enum FlightplanError {
    /// Two roles declare the same shared volume tag with different sizes.
    VolumeSizeConflict {
        tag: String,
        size: u64,
        previous: u64,
    },

    /// A port declares a range for external but a differing internal.
    PortRangeMismatch {
        port: String,
    },

    /// An external port exceeds the platform's upper bound.
    PortOutOfRange {
        port: u32,
        component: String,
        limit: u32,
    },

    /// A component's service-port count exceeds the platform limit.
    TooManyPorts {
        count: usize,
        component: String,
        limit: usize,
    },

    /// Structurally invalid manifest data.
    InvalidManifest {
        message: String,
    },

    /// Serialization or deserialization failure.
    Serialization {
        message: String,
    },
}

impl FlightplanError {
    /// Construct a shared-volume size conflict error.
    pub fn volume_size_conflict(tag: impl Into<String>, size: u64, previous: u64) -> Self {
        Self::VolumeSizeConflict {
            tag: tag.into(),
            size,
            previous,
        }
    }

    /// Construct a port range mismatch error.
    pub fn port_range_mismatch(port: impl Into<String>) -> Self {
        Self::PortRangeMismatch { port: port.into() }
    }

    /// Construct a port out-of-range error.
    pub fn port_out_of_range(port: u32, component: impl Into<String>, limit: u32) -> Self {
        Self::PortOutOfRange {
            port,
            component: component.into(),
            limit,
        }
    }

    /// Construct a too-many-ports error.
    pub fn too_many_ports(count: usize, component: impl Into<String>, limit: usize) -> Self {
        Self::TooManyPorts {
            count,
            component: component.into(),
            limit,
        }
    }

    /// Construct an invalid manifest error.
    pub fn invalid_manifest<M: Into<String>>(message: M) -> Self {
        Self::InvalidManifest {
            message: message.into(),
        }
    }

    /// Construct a serialization error.
    pub fn serialization<M: Into<String>>(message: M) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

impl Display for FlightplanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VolumeSizeConflict {
                tag,
                size,
                previous,
            } => {
                write!(
                    f,
                    "size mismatch for shared volume \"{tag}\": {size}, previously {previous}"
                )
            }
            Self::PortRangeMismatch { port } => {
                write!(
                    f,
                    "port range forwarding {port}: must have the same external / internal ranges"
                )
            }
            Self::PortOutOfRange {
                port,
                component,
                limit,
            } => {
                write!(
                    f,
                    "cannot export port {port} (in {component}), above the limit of {limit}"
                )
            }
            Self::TooManyPorts {
                count,
                component,
                limit,
            } => {
                write!(
                    f,
                    "too many ports to forward ({count}) in {component}, limited to {limit}"
                )
            }
            Self::InvalidManifest { message } => {
                write!(f, "invalid manifest: {message}")
            }
            Self::Serialization { message } => {
                write!(f, "serialization error: {message}")
            }
        }
    }
}

impl std::error::Error for FlightplanError {}
