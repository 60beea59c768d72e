use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("team not found: {0}")]
    TeamNotFound(String),

    #[error("crisis not found: {0}")]
    CrisisNotFound(String),

    #[error("crisis already defined: {0}")]
    DuplicateCrisis(String),

    #[error("news entry already defined: {0}")]
    DuplicateNewsEntry(String),

    #[error("timeline has no months")]
    EmptyTimeline,

    #[error("news entry '{entry}' triggers unknown crisis '{crisis}'")]
    UnknownTrigger { entry: String, crisis: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
