//! Turning a classified ballot into something a voter can read.
//!
//! The display model is plain data: a title and one line per item, each with
//! the state a presentation layer should draw next to it.

use serde::Serialize;
use serde_json::{Number, Value};
use types_rs::voteweb::{Candidate, Question, ReferenceMetadata};

use crate::classify::{BallotValidationError, ClassifiedBallot, Selection};

pub const DEFAULT_TITLE: &str = "Bulletin";
pub const BLANK_LABEL: &str = "Blanc";
pub const ABSTENTION_LABEL: &str = "Abstention";
pub const INVALID_LABEL: &str = "Nul";
pub const DEFAULT_APPROVAL_LABEL: &str = "Oui";
pub const DEFAULT_REFUSAL_LABEL: &str = "Non";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    pub title: String,
    pub lines: Vec<DisplayLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLine {
    pub text: String,
    #[serde(flatten)]
    pub state: LineState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum LineState {
    /// The single line of a blank ballot.
    Neutral,

    /// A candidate the voter kept.
    Checked,

    /// A candidate the voter struck out.
    Unchecked,

    /// The voter's answer to a question.
    Answer { answer: Answer, label: String },
}

impl LineState {
    /// Whether the line's text should be drawn crossed out.
    pub fn is_struck_through(&self) -> bool {
        matches!(self, Self::Unchecked)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Answer {
    Approval,
    Refusal,
    Abstention,
    Blank,
    Invalid,
}

impl Answer {
    pub fn from_value(value: &Value) -> Self {
        match value.as_str() {
            Some("yes") => Self::Approval,
            Some("no") => Self::Refusal,
            Some("abstention") => Self::Abstention,
            Some("blank") => Self::Blank,
            _ => Self::Invalid,
        }
    }
}

/// Builds the display model of a classified ballot.
pub fn render(
    classified: &ClassifiedBallot,
    reference: &ReferenceMetadata,
) -> Result<DisplayModel, BallotValidationError> {
    if classified.is_blank {
        return Ok(DisplayModel {
            title: DEFAULT_TITLE.to_owned(),
            lines: vec![DisplayLine {
                text: BLANK_LABEL.to_owned(),
                state: LineState::Neutral,
            }],
        });
    }

    // The whole ballot takes the title of its first item.
    let title = classified
        .selections
        .first()
        .and_then(|selection| reference.ballot_paper_title(&selection.item_id))
        .unwrap_or(DEFAULT_TITLE)
        .to_owned();

    let lines = classified
        .selections
        .iter()
        .map(|selection| match reference {
            ReferenceMetadata::Candidates(candidates) => Ok(render_candidate(
                selection,
                lookup(candidates.get(&selection.item_id), selection)?,
            )),
            ReferenceMetadata::Questions {
                questions,
                approval_label,
                refusal_label,
            } => Ok(render_question(
                selection,
                lookup(questions.get(&selection.item_id), selection)?,
                approval_label.as_deref().unwrap_or(DEFAULT_APPROVAL_LABEL),
                refusal_label.as_deref().unwrap_or(DEFAULT_REFUSAL_LABEL),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DisplayModel { title, lines })
}

fn lookup<'a, T>(
    item: Option<&'a T>,
    selection: &Selection,
) -> Result<&'a T, BallotValidationError> {
    item.ok_or_else(|| BallotValidationError::UnknownItem {
        item_id: selection.item_id.clone(),
    })
}

fn render_candidate(selection: &Selection, candidate: &Candidate) -> DisplayLine {
    let checked = selection.value.as_f64() == Some(1.0);
    DisplayLine {
        text: format!("{} {}", candidate.first_name, candidate.last_name),
        state: if checked {
            LineState::Checked
        } else {
            LineState::Unchecked
        },
    }
}

fn render_question(
    selection: &Selection,
    question: &Question,
    approval_label: &str,
    refusal_label: &str,
) -> DisplayLine {
    let answer = Answer::from_value(&selection.value);
    let label = match answer {
        Answer::Approval => approval_label,
        Answer::Refusal => refusal_label,
        Answer::Abstention => ABSTENTION_LABEL,
        Answer::Blank => BLANK_LABEL,
        Answer::Invalid => INVALID_LABEL,
    };
    DisplayLine {
        text: format!("{} - {}", display_position(&question.position), question.label),
        state: LineState::Answer {
            answer,
            label: label.to_owned(),
        },
    }
}

/// Formats a question position as a browser would: integral values never
/// carry a fractional part.
fn display_position(position: &Number) -> String {
    match position.as_f64() {
        Some(value) if position.is_f64() && value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", value as i64)
        }
        _ => position.to_string(),
    }
}
