//! histogram::json_store — JSON file backend for [`HistogramSource`].
//!
//! Purpose
//! -------
//! Read named 2D histograms from a single JSON document so the fit binary
//! has a concrete, dependency-light input store.
//!
//! Format
//! ------
//! A top-level object mapping histogram names to records:
//!
//! ```json
//! {
//!   "hdata": { "contents": [[1, 2], [3, 4]], "x_edges": [0, 1, 2], "y_edges": [0, 1, 2] },
//!   "hbkg":  { "contents": [[1, 1], [1, 1]], "x_edges": [0, 1, 2], "y_edges": [0, 1, 2] }
//! }
//! ```
//!
//! `contents[i][j]` is the bin spanning `x_edges[i..=i+1]` and
//! `y_edges[j..=j+1]`. JSON `null` entries are read as `NaN` so malformed bins
//! survive loading and are excluded later by the dataset builder.
//!
//! Conventions
//! -----------
//! - The whole file is decoded once at [`JsonHistogramFile::open`]; lookups
//!   validate and convert the requested record only.
//! - [`JsonHistogramFile::write`] is the inverse used by tooling and tests.
use crate::histogram::{
    errors::{HistError, HistResult},
    hist2d::Histogram2D,
    source::HistogramSource,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};

/// On-disk record for one histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramRecord {
    pub contents: Vec<Vec<Option<f64>>>,
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
}

impl HistogramRecord {
    /// Validate the record and convert it into a [`Histogram2D`].
    pub fn to_histogram(&self) -> HistResult<Histogram2D> {
        let rows: Vec<Vec<f64>> = self
            .contents
            .iter()
            .map(|row| row.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
            .collect();
        Histogram2D::from_rows(&rows, self.x_edges.clone(), self.y_edges.clone())
    }

    /// Encode a histogram; non-finite contents become `null`.
    pub fn from_histogram(hist: &Histogram2D) -> Self {
        let contents = hist
            .contents()
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|&v| v.is_finite().then_some(v)).collect())
            .collect();
        Self {
            contents,
            x_edges: hist.x_edges().to_vec(),
            y_edges: hist.y_edges().to_vec(),
        }
    }
}

/// Histogram store backed by one JSON file.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonHistogramFile {
    records: BTreeMap<String, HistogramRecord>,
}

impl JsonHistogramFile {
    /// Read and decode the store at `path`.
    ///
    /// Errors
    /// ------
    /// - `HistError::Io` if the file cannot be read.
    /// - `HistError::Parse` if the document is not a name → record map.
    pub fn open(path: impl AsRef<Path>) -> HistResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| HistError::Io { path: path.display().to_string(), text: e.to_string() })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> HistResult<Self> {
        let records: BTreeMap<String, HistogramRecord> = serde_json::from_str(text)?;
        Ok(Self { records })
    }

    /// Write `histograms` as a JSON store at `path`.
    pub fn write<'a, I>(path: impl AsRef<Path>, histograms: I) -> HistResult<()>
    where
        I: IntoIterator<Item = (&'a str, &'a Histogram2D)>,
    {
        let path = path.as_ref();
        let records: BTreeMap<String, HistogramRecord> = histograms
            .into_iter()
            .map(|(name, hist)| (name.to_string(), HistogramRecord::from_histogram(hist)))
            .collect();
        let text = serde_json::to_string_pretty(&records)?;
        fs::write(path, text)
            .map_err(|e| HistError::Io { path: path.display().to_string(), text: e.to_string() })
    }
}

impl HistogramSource for JsonHistogramFile {
    fn histogram(&self, name: &str) -> HistResult<Histogram2D> {
        self.records
            .get(name)
            .ok_or_else(|| HistError::MissingHistogram { name: name.to_string() })?
            .to_histogram()
    }

    fn names(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    // Purpose
    // -------
    // A store written to disk reads back the same histograms, with
    // non-finite bins preserved as NaN.
    //
    // Given
    // -----
    // - A 2×2 histogram with one NaN bin written via `JsonHistogramFile::write`.
    //
    // Expect
    // ------
    // - Edges and finite contents match; the NaN bin reads back as NaN.
    fn write_then_open_preserves_contents_and_nan_bins() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inputs.json");
        let contents = array![[1.0, f64::NAN], [3.0, 4.0]];
        let h = Histogram2D::new(contents, array![0.0, 1.0, 2.0], array![0.0, 2.0, 4.0]).unwrap();

        // Act
        JsonHistogramFile::write(&path, [("hdata", &h)]).unwrap();
        let store = JsonHistogramFile::open(&path).unwrap();
        let back = store.histogram("hdata").unwrap();

        // Assert
        assert_eq!(back.x_edges(), h.x_edges());
        assert_eq!(back.y_edges(), h.y_edges());
        assert_eq!(back.contents()[[0, 0]], 1.0);
        assert!(back.contents()[[0, 1]].is_nan());
        assert_eq!(back.contents()[[1, 1]], 4.0);
    }

    #[test]
    // Purpose
    // -------
    // Unknown names and malformed documents are input errors.
    fn lookup_and_parse_errors_are_reported() {
        let store = JsonHistogramFile::from_json_str(
            r#"{"hbkg": {"contents": [[1.0]], "x_edges": [0.0, 1.0], "y_edges": [0.0, 1.0]}}"#,
        )
        .unwrap();
        assert!(matches!(store.histogram("hdata"), Err(HistError::MissingHistogram { .. })));
        assert_eq!(store.histogram("hbkg").unwrap().contents(), &Array2::<f64>::ones((1, 1)));

        assert!(matches!(
            JsonHistogramFile::from_json_str("[1, 2, 3]"),
            Err(HistError::Parse { .. })
        ));
        assert!(matches!(
            JsonHistogramFile::open("/definitely/not/here.json"),
            Err(HistError::Io { .. })
        ));
    }
}
