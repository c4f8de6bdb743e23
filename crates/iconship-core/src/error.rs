use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid version type '{value}' (expected one of: {expected})")]
    InvalidVersionType {
        value: String,
        expected: &'static str,
    },

    #[error("invalid version '{version}'")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
