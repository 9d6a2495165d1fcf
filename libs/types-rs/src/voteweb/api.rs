use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Candidate, Question, ReferenceMetadata};

/// Body of `POST /ballot-papers/control-integrity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityRequest {
    #[serde(rename = "p")]
    pub polling_station_token: String,
}

/// Body of `POST /ballot-papers/control-presence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRequest {
    #[serde(rename = "p")]
    pub polling_station_token: String,

    #[serde(rename = "f", default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

/// Describes the vote a ballot belongs to. Shown above every result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteHeader {
    #[serde(default)]
    pub vote_label: Option<String>,
    #[serde(default)]
    pub vote_sub_label: Option<String>,
    #[serde(default)]
    pub election_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ballot_title: Option<String>,
}

impl VoteHeader {
    /// The server signals that it found nothing by leaving out the vote label.
    pub fn has_vote_label(&self) -> bool {
        self.vote_label
            .as_deref()
            .is_some_and(|vote_label| !vote_label.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityResponse {
    #[serde(flatten)]
    pub header: VoteHeader,
    #[serde(default)]
    pub candidates: Option<HashMap<String, Candidate>>,
    #[serde(default)]
    pub questions: Option<HashMap<String, Question>>,
    #[serde(default)]
    pub questions_approval_label: Option<String>,
    #[serde(default)]
    pub questions_refusal_label: Option<String>,
}

impl IntegrityResponse {
    /// Splits the response into its header and the reference metadata the
    /// ballot paper must be checked against. Candidates take precedence over
    /// questions; `None` means the response carried neither.
    pub fn into_parts(self) -> (VoteHeader, Option<ReferenceMetadata>) {
        let reference = match (self.candidates, self.questions) {
            (Some(candidates), _) => Some(ReferenceMetadata::Candidates(candidates)),
            (None, Some(questions)) => Some(ReferenceMetadata::Questions {
                questions,
                approval_label: self.questions_approval_label,
                refusal_label: self.questions_refusal_label,
            }),
            (None, None) => None,
        };
        (self.header, reference)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceResponse {
    #[serde(flatten)]
    pub header: VoteHeader,

    /// The encrypted ballot stored in the ballot box.
    #[serde(rename = "b", default)]
    pub encrypted_ballot: Option<String>,
}

/// Body the server sends along with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
