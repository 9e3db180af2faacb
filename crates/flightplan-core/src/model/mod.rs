//! Data models for flightplan.
//!
//! `manifest` is the read-only input side; `definition` is the output
//! document assembled by the transform.

pub mod definition;
pub mod manifest;
