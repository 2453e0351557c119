/// Failure of a full-file content read.
///
/// None of these are fatal to the diff view: the engine falls back to the patch-only sequence.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("file not found: {path}")]
    NotFound { path: String },

    #[error("file is not valid UTF-8 text: {path}")]
    NotText { path: String },

    #[error("path escapes the source root: {path}")]
    InvalidPath { path: String },

    #[error("content source not supported: {0}")]
    Unsupported(String),

    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
