//! Error types for mounting charts and loading data or configuration.

use std::path::PathBuf;

/// Errors surfaced by chart operations.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// The host has no container with this identifier.
    #[error("container `{0}` not found")]
    MissingContainer(String),
    /// Data or configuration could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// A frame could not be encoded as an image.
    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Errors produced while parsing data or configuration sources.
///
/// A failed load leaves the chart exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Reading the source failed.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// JSON source is malformed.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// XML source is malformed.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// A CSV line is malformed.
    #[error("malformed CSV on line {line}: {message}")]
    Csv {
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },
    /// A required element is absent.
    #[error("missing `{0}`")]
    MissingField(&'static str),
    /// A field holds a value of the wrong type.
    #[error("invalid value `{value}` for `{field}`")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Offending raw value.
        value: String,
    },
    /// The source format could not be determined.
    #[error("unknown data format `{0}`")]
    UnknownFormat(String),
}

impl LoadError {
    pub(crate) fn invalid(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for LoadError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(err.into())
    }
}
