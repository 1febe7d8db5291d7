use thiserror::Error;

/// Configuration failures. All of these are fatal and surface before any
/// result processing begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read scout config at {path}: {source}")]
    ConfigFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scout config: {0}")]
    ConfigFileParse(#[from] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),

    #[error("template \"{template}\" references unknown placeholder {{{placeholder}}}")]
    UnknownPlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("template \"{template}\" is malformed: {reason}")]
    MalformedTemplate { template: String, reason: String },
}

/// A venue draft that cannot be turned into a registry record.
///
/// Recovered locally: the draft is skipped and counted as rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("venue draft has no name")]
    MissingName,
    #[error("venue capacity must be positive")]
    ZeroCapacity,
}
