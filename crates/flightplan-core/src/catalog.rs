//! External property catalog.
//!
//! The catalog maps release name → job name → declared property short-names
//! (without the `properties.` prefix). It is collected outside the compiler
//! and injected whole as a read-only dependency; the compiler only ever
//! performs lookups against it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Release → job → declared property names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyCatalog(BTreeMap<String, BTreeMap<String, Vec<String>>>);

impl PropertyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the properties a job declares.
    pub fn insert(
        &mut self,
        release: impl Into<String>,
        job: impl Into<String>,
        properties: Vec<String>,
    ) {
        self.0
            .entry(release.into())
            .or_default()
            .insert(job.into(), properties);
    }

    pub fn has_release(&self, release: &str) -> bool {
        self.0.contains_key(release)
    }

    /// The property short-names declared by a job, if the release and job
    /// are both known.
    pub fn job_properties(&self, release: &str, job: &str) -> Option<&[String]> {
        self.0
            .get(release)
            .and_then(|jobs| jobs.get(job))
            .map(|props| props.as_slice())
    }
}
