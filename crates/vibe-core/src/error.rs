use thiserror::Error;

#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("duplicate badge id in catalog: {0}")]
    DuplicateBadge(String),

    #[error("badge '{id}' has a zero threshold")]
    InvalidThreshold { id: String },

    #[error("unknown badge id: {0}")]
    UnknownBadge(String),

    #[error("invalid handle '{0}': lowercase alphanumeric with '-' or '_', max 32 chars")]
    InvalidHandle(String),

    #[error("invalid metric update for '{handle}': {reason}")]
    InvalidMetricUpdate { handle: String, reason: String },

    #[error("unrecognized legacy data layout: expected user_badges, streaks, or per-handle badge lists")]
    UnrecognizedLegacyFormat,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BadgeError>;
