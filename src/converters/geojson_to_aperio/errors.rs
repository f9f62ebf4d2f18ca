//! Error types for GeoJSON → Aperio conversion
//!
//! I/O failures keep the offending path so the caller can report it; malformed
//! input keeps the index of the feature that could not be read.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level conversion error type
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Input file does not exist
    #[error("input file not found: {}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Input file exists but could not be read (permissions, is a directory, ...)
    #[error("failed to read input file {}: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Output location could not be created or replaced
    #[error("failed to write output file {}: {source}", path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Output path names the input file itself
    #[error("output file {} is the input file", path.display())]
    OutputIsInput { path: PathBuf },

    /// GeoJSON is structurally unusable
    #[error("malformed input: {0}")]
    MalformedInput(#[from] MalformedInputError),

    /// XML serialization failed
    #[error("xml write error: {0}")]
    Xml(String),

    /// Settings file could not be loaded
    #[error("invalid settings: {0}")]
    Config(String),
}

/// GeoJSON structure problems that prevent conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedInputError {
    /// Not valid JSON at all
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Top-level value is an array, string, number, ...
    #[error("top-level JSON value is not an object")]
    NotAnObject,

    /// No `features` key, or it is not an array
    #[error("missing `features` array")]
    MissingFeatures,

    /// An accepted feature lacks a required field
    #[error("feature {feature_index}: missing `{field}`")]
    MissingField {
        feature_index: usize,
        field: &'static str,
    },

    /// Coordinates of an accepted feature cannot be read as an outer ring
    #[error("feature {feature_index}: invalid coordinates ({reason})")]
    InvalidCoordinates { feature_index: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, ConversionError>;
