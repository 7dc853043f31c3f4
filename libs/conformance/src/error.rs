use serde::{Deserialize, Serialize};
use thiserror::Error;
use zunder_client::ClientError;

/// Why a case failed, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The baseline record lacks what the case needs; not a server fault.
    SetupDefect,
    /// Non-success status or malformed response envelope.
    Protocol,
    /// The response is well formed but holds the wrong data.
    DataMismatch,
}

/// Outcome of a case that did not pass. Never escapes the case that raised it.
#[derive(Debug, Error)]
pub enum CaseFailure {
    #[error("{0}")]
    Setup(String),

    #[error("{0}")]
    Protocol(String),

    #[error("{0}")]
    Mismatch(String),

    #[error("request failed: {0}")]
    Transport(#[source] ClientError),
}

impl CaseFailure {
    /// `None` for transport errors, which are reported as errors rather
    /// than conformance failures.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            CaseFailure::Setup(_) => Some(FailureKind::SetupDefect),
            CaseFailure::Protocol(_) => Some(FailureKind::Protocol),
            CaseFailure::Mismatch(_) => Some(FailureKind::DataMismatch),
            CaseFailure::Transport(_) => None,
        }
    }
}

impl From<ClientError> for CaseFailure {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::EmptySearchValue { param } => {
                CaseFailure::Setup(format!("No {param} for patient"))
            }
            ClientError::MissingBody | ClientError::Model(_) => {
                CaseFailure::Protocol(format!("Invalid response body: {err}"))
            }
            other => CaseFailure::Transport(other),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown conformance case '{0}'")]
pub struct UnknownCase(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use zunder_client::SearchParam;

    #[test]
    fn empty_search_value_is_a_setup_defect() {
        let failure = CaseFailure::from(ClientError::EmptySearchValue {
            param: SearchParam::Identifier,
        });
        assert_eq!(failure.kind(), Some(FailureKind::SetupDefect));
        assert_eq!(failure.to_string(), "No identifier for patient");
    }

    #[test]
    fn undecodable_body_is_a_protocol_failure() {
        let failure = CaseFailure::from(ClientError::MissingBody);
        assert_eq!(failure.kind(), Some(FailureKind::Protocol));
    }
}
