use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the trackgen kernel.
#[derive(Debug, Error)]
pub enum TrackgenError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors raised while loading and validating the two input documents.
///
/// These are the only fail-fast errors in the pipeline: a malformed shape or
/// profile document aborts the run before any geometry is computed.
/// Degenerate geometry (missing crossings, parallel segments) is never an
/// error; it surfaces as `None` and the dependent part is omitted.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid {document} document: {what}")]
    Invalid {
        document: &'static str,
        what: String,
    },
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("centerline needs at least 2 samples, got {0}")]
    TooFewSamples(usize),

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors surfaced from the host adapter while materializing one shape.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("host rejected shape export to {filename}: {reason}")]
    Host { filename: String, reason: String },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience type alias for results using [`TrackgenError`].
pub type Result<T> = std::result::Result<T, TrackgenError>;
