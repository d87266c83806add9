use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("scenario field `{field}`: {reason}")]
    Scenario { field: String, reason: String },

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("scenario parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl SimError {
    /// Load-time configuration error naming the offending field
    pub fn scenario(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Scenario {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
