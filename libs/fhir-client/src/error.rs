use crate::search::SearchParam;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no value to search '{param}' with")]
    EmptySearchValue { param: SearchParam },

    #[error("response has no JSON body")]
    MissingBody,

    #[error(transparent)]
    Model(#[from] zunder_models::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
