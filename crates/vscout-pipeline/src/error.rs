use thiserror::Error;
use vscout_core::ConfigError;
use vscout_db::DbError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A results file that cannot be read or parsed. Fatal for that file
    /// only; multi-file runs continue with the next file.
    #[error("unreadable results file {path}: {reason}")]
    InputFormat { path: String, reason: String },

    #[error("failed to write {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage error: {0}")]
    Storage(#[from] DbError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<sqlx::Error> for PipelineError {
    fn from(err: sqlx::Error) -> Self {
        PipelineError::Storage(DbError::Sqlx(err))
    }
}

impl PipelineError {
    /// Whether a multi-file run may skip past this error.
    #[must_use]
    pub fn is_per_file(&self) -> bool {
        matches!(self, PipelineError::InputFormat { .. })
    }
}
