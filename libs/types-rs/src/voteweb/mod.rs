use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

mod api;
mod ballot;

pub use api::{
    ErrorResponse, IntegrityRequest, IntegrityResponse, PresenceRequest, PresenceResponse,
    VoteHeader,
};
pub use ballot::{
    Candidate, Question, RawBallotRecord, ReferenceMetadata, BLANK_SENTINEL_KEY,
    BLANK_SENTINEL_VALUE, POLLING_STATION_ID_KEY, USER_CATEGORY_ID_KEY,
};

/// Every election site lives under this domain.
pub const DOMAIN_SUFFIX: &str = "voteweb.fr";

/// The bundle of values a voter receives when casting a vote and pastes back
/// in to check it.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ControlElements {
    /// Domain of the election site, e.g. `vote.voteweb.fr`.
    #[serde(rename = "d")]
    pub domain: String,

    /// Opaque token identifying the ballot and its polling station.
    #[serde(rename = "p")]
    pub polling_station_token: String,

    /// Hex-encoded ciphertext with the 128-bit GCM tag appended.
    #[serde(rename = "c", skip_serializing_if = "Option::is_none")]
    pub cipher_text_with_tag: Option<String>,

    /// Hex-encoded AES key.
    #[serde(rename = "k", skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Hex-encoded GCM nonce.
    #[serde(rename = "i", skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,

    /// The encrypted ballot value the server is expected to echo back.
    #[serde(rename = "b", skip_serializing_if = "Option::is_none")]
    pub ballot_hash: Option<String>,

    #[serde(rename = "f", skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl ControlElements {
    /// Whether the domain belongs to an election site. Only a bare host name
    /// qualifies: anything that would put a path, query, fragment, userinfo
    /// or port into the request URL is rejected.
    pub fn has_election_domain(&self) -> bool {
        let is_bare_host = !self.domain.is_empty()
            && !self.domain.contains(|c: char| {
                matches!(c, '/' | '\\' | '?' | '#' | '@' | ':' | '%') || c.is_whitespace()
            });
        is_bare_host && self.domain.ends_with(DOMAIN_SUFFIX)
    }
}

impl FromStr for ControlElements {
    type Err = serde_json::Error;

    fn from_str(pasted: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(pasted.trim())
    }
}

impl std::fmt::Debug for ControlElements {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redacted(value: &Option<String>) -> &'static str {
            match value {
                Some(_) => "<redacted>",
                None => "<none>",
            }
        }

        f.debug_struct("ControlElements")
            .field("domain", &self.domain)
            .field("polling_station_token", &self.polling_station_token)
            .field("cipher_text_with_tag", &redacted(&self.cipher_text_with_tag))
            .field("key", &redacted(&self.key))
            .field("iv", &redacted(&self.iv))
            .field("ballot_hash", &self.ballot_hash)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Which check the voter asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlType {
    /// Decrypt the locally held ballot and show it.
    Integrity,

    /// Compare the server's encrypted ballot against the expected value.
    Presence,
}

impl ControlType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Integrity => "integrity",
            Self::Presence => "presence",
        }
    }
}

impl Display for ControlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integrity" => Ok(Self::Integrity),
            "presence" => Ok(Self::Presence),
            _ => Err(format!("unknown control type: {s:?}")),
        }
    }
}
