//! Interpreting a decrypted ballot paper against the election's candidates
//! or questions.

use serde::Serialize;
use serde_json::Value;
use types_rs::voteweb::{RawBallotRecord, ReferenceMetadata};

/// What the item ids of a ballot paper refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BallotMode {
    Candidate,
    Question,
}

impl BallotMode {
    pub fn of(reference: &ReferenceMetadata) -> Self {
        match reference {
            ReferenceMetadata::Candidates(_) => Self::Candidate,
            ReferenceMetadata::Questions { .. } => Self::Question,
        }
    }
}

/// One item of a ballot paper and the value the voter gave it.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub item_id: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedBallot {
    pub is_blank: bool,
    pub mode: BallotMode,

    /// In the order [`RawBallotRecord::iter`] yields them. Empty for a blank
    /// ballot.
    pub selections: Vec<Selection>,
}

/// Conditions under which a ballot will be counted as void.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BallotValidationError {
    #[error("empty ballot")]
    Empty,

    #[error("invalid ballot: item {item_id:?} is not part of this election")]
    UnknownItem { item_id: String },
}

/// Classifies a ballot paper as blank or as a list of selections. A ballot
/// paper naming any item the election does not have is invalid as a whole.
pub fn classify(
    raw: RawBallotRecord,
    reference: &ReferenceMetadata,
) -> Result<ClassifiedBallot, BallotValidationError> {
    let mode = BallotMode::of(reference);
    let record = raw.strip_metadata();

    if record.is_empty() {
        return Err(BallotValidationError::Empty);
    }

    if record.is_blank_sentinel() {
        return Ok(ClassifiedBallot {
            is_blank: true,
            mode,
            selections: Vec::new(),
        });
    }

    let selections = record
        .iter()
        .map(|(item_id, value)| {
            if reference.contains(item_id) {
                Ok(Selection {
                    item_id: item_id.clone(),
                    value: value.clone(),
                })
            } else {
                Err(BallotValidationError::UnknownItem {
                    item_id: item_id.clone(),
                })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ClassifiedBallot {
        is_blank: false,
        mode,
        selections,
    })
}
