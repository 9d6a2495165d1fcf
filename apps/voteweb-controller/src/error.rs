use crate::aead::{DecryptionError, PlaintextDecodeError};
use crate::classify::BallotValidationError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a verification attempt failed.
///
/// Variants carry context, not text meant for the voter; see
/// [`crate::present::user_message`] for that.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unrecognized control type: {0:?}")]
    Configuration(String),

    #[error("malformed control elements: {0}")]
    ControlElements(#[from] ControlElementsError),

    #[error("domain {domain:?} is not an election site")]
    DomainValidation { domain: String },

    #[error("decryption failed: {0}")]
    Decryption(#[from] DecryptionError),

    #[error("decrypted ballot paper is unreadable: {0}")]
    PlaintextDecode(#[from] PlaintextDecodeError),

    #[error("ballot will be counted as void: {0}")]
    BallotValidation(#[from] BallotValidationError),

    #[error("malformed server response: {0}")]
    MalformedResponse(MalformedResponse),

    #[error("server unreachable: {0}")]
    Transport(#[source] voteweb_server_client::Error),

    #[error("server error: status_code={status_code:?} {message}")]
    Server {
        status_code: reqwest::StatusCode,
        message: String,
    },

    #[error("encrypted ballot {actual:?} does not match the expected {expected:?}")]
    PresenceMismatch {
        expected: String,
        actual: Option<String>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ControlElementsError {
    #[error("{0}")]
    Syntax(#[from] serde_json::Error),

    #[error("missing field {0:?}")]
    MissingField(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum MalformedResponse {
    #[error("unparseable body (status_code={status_code:?})")]
    Unparseable {
        status_code: reqwest::StatusCode,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("no vote label")]
    MissingVoteLabel,

    #[error("neither candidates nor questions")]
    MissingReference,
}

impl From<voteweb_server_client::Error> for Error {
    fn from(error: voteweb_server_client::Error) -> Self {
        use voteweb_server_client::Error as ClientError;

        match error {
            ClientError::Server {
                status_code,
                message,
            } => Self::Server {
                status_code,
                message,
            },
            ClientError::MalformedResponse {
                status_code,
                source,
            } => Self::MalformedResponse(MalformedResponse::Unparseable {
                status_code,
                source,
            }),
            error @ (ClientError::Reqwest(_) | ClientError::Timeout(_) | ClientError::Url(_)) => {
                Self::Transport(error)
            }
        }
    }
}

impl Error {
    /// Whether the attempt ran to completion and found something wrong with
    /// the ballot, as opposed to being unable to check it at all.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Self::Decryption(_)
                | Self::PlaintextDecode(_)
                | Self::BallotValidation(_)
                | Self::PresenceMismatch { .. }
        )
    }
}
