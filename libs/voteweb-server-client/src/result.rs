use std::time::Duration;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("server error: status_code={status_code:?} {message}")]
    Server {
        status_code: reqwest::StatusCode,
        message: String,
    },

    #[error("malformed response: status_code={status_code:?}")]
    MalformedResponse {
        status_code: reqwest::StatusCode,
        #[source]
        source: Option<serde_json::Error>,
    },
}
