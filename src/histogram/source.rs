//! histogram::source — named-histogram lookup seam.
//!
//! [`HistogramSource`] is the only way the fit pipeline obtains input. Real
//! runs read a file store ([`crate::histogram::json_store::JsonHistogramFile`]);
//! tests and embedding callers hand over synthetic histograms through
//! [`InMemoryHistogramSource`].
use crate::histogram::{
    errors::{HistError, HistResult},
    hist2d::Histogram2D,
};
use std::collections::HashMap;

/// A store of named two-dimensional histograms.
///
/// Implementations return `HistError::MissingHistogram` for unknown names
/// and must not mutate the store on lookup.
pub trait HistogramSource {
    fn histogram(&self, name: &str) -> HistResult<Histogram2D>;

    /// Names currently available, sorted.
    fn names(&self) -> Vec<String>;
}

/// In-memory histogram store keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryHistogramSource {
    histograms: HashMap<String, Histogram2D>,
}

impl InMemoryHistogramSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a histogram, returning the store for chaining.
    pub fn with(mut self, name: impl Into<String>, hist: Histogram2D) -> Self {
        self.insert(name, hist);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, hist: Histogram2D) {
        self.histograms.insert(name.into(), hist);
    }
}

impl HistogramSource for InMemoryHistogramSource {
    fn histogram(&self, name: &str) -> HistResult<Histogram2D> {
        self.histograms
            .get(name)
            .cloned()
            .ok_or_else(|| HistError::MissingHistogram { name: name.to_string() })
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.histograms.keys().cloned().collect();
        names.sort();
        names
    }
}
