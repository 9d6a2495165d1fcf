use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key added to every ballot paper; not one of the voter's choices.
pub const USER_CATEGORY_ID_KEY: &str = "userCategoryId";

/// Metadata key added to every ballot paper; not one of the voter's choices.
pub const POLLING_STATION_ID_KEY: &str = "pollingStationId";

/// A ballot paper holding `{"0": "blank"}` was deliberately cast blank.
pub const BLANK_SENTINEL_KEY: &str = "0";
pub const BLANK_SENTINEL_VALUE: &str = "blank";

/// A decrypted ballot paper: item id to selection value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawBallotRecord(Map<String, Value>);

impl RawBallotRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, item_id: &str) -> Option<&Value> {
        self.0.get(item_id)
    }

    /// Iterates over `(item id, value)` pairs in the order browsers enumerate
    /// object keys: array-index ids ascending, then every other id in
    /// plaintext order. Voters are used to seeing their ballot in this order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        let (mut indices, others): (Vec<_>, Vec<_>) = self
            .0
            .iter()
            .partition(|(item_id, _)| array_index(item_id).is_some());
        indices.sort_by_key(|(item_id, _)| array_index(item_id));
        indices.into_iter().chain(others)
    }

    /// Removes the metadata keys, keeping the remaining items in order.
    pub fn strip_metadata(self) -> Self {
        self.0
            .into_iter()
            .filter(|(key, _)| key != USER_CATEGORY_ID_KEY && key != POLLING_STATION_ID_KEY)
            .collect()
    }

    pub fn is_blank_sentinel(&self) -> bool {
        self.get(BLANK_SENTINEL_KEY).and_then(Value::as_str) == Some(BLANK_SENTINEL_VALUE)
    }
}

impl FromIterator<(String, Value)> for RawBallotRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The numeric value of a canonical array index: a decimal integer below
/// 2^32 - 1 without sign or leading zeros.
fn array_index(key: &str) -> Option<u32> {
    let index = key.parse::<u32>().ok()?;
    (index != u32::MAX && index.to_string() == key).then_some(index)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ballot_paper_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub position: serde_json::Number,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ballot_paper_title: Option<String>,
}

/// What a ballot paper's item ids refer to. An election has either
/// candidates or questions, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceMetadata {
    Candidates(HashMap<String, Candidate>),
    Questions {
        questions: HashMap<String, Question>,
        approval_label: Option<String>,
        refusal_label: Option<String>,
    },
}

impl ReferenceMetadata {
    /// Whether `item_id` names a candidate or question of this election.
    pub fn contains(&self, item_id: &str) -> bool {
        match self {
            Self::Candidates(candidates) => candidates.contains_key(item_id),
            Self::Questions { questions, .. } => questions.contains_key(item_id),
        }
    }

    pub fn ballot_paper_title(&self, item_id: &str) -> Option<&str> {
        match self {
            Self::Candidates(candidates) => candidates.get(item_id)?.ballot_paper_title.as_deref(),
            Self::Questions { questions, .. } => {
                questions.get(item_id)?.ballot_paper_title.as_deref()
            }
        }
    }
}
