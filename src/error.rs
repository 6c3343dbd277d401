use std::path::PathBuf;
use thiserror::Error;

/// The main error type for coco2yolo operations.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Failed to {action} {path}: {source}")]
    FileOp {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse COCO JSON from {path}: {source}")]
    CocoJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize report: {0}")]
    ReportWrite(#[source] serde_json::Error),

    #[error("{failed} of {total} split(s) failed")]
    SplitsFailed { failed: usize, total: usize },

    #[error("No split was converted ({skipped} skipped)")]
    NothingConverted { skipped: usize },
}

impl ConvertError {
    /// Wraps an IO error with the operation and path it happened on.
    pub(crate) fn file_op(
        action: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ConvertError::FileOp {
            action,
            path,
            source,
        }
    }
}
