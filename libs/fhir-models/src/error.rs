use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("expected resourceType '{expected}', found '{found}'")]
    UnexpectedResourceType {
        expected: &'static str,
        found: String,
    },

    #[error("resource has no resourceType")]
    MissingResourceType,

    #[error("invalid resource JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
