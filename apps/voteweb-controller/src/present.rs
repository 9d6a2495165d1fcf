//! Showing the result of a verification to the voter.
//!
//! All text meant for voters lives here, in French, as the election sites
//! display it.

use std::io::Write;

use serde_json::json;
use types_rs::voteweb::VoteHeader;

use crate::classify::BallotValidationError;
use crate::controller::{Outcome, Presenter};
use crate::error::{Error, MalformedResponse};
use crate::render::{DisplayModel, LineState};

pub const INTEGRITY_SUCCESS: &str =
    "Les éléments de contrôle donnés correspondent au bulletin ci-dessous.";
pub const PRESENCE_SUCCESS: &str =
    "Votre bulletin est bien présent dans l’urne et n’a pas été modifié.";
pub const PRESENCE_CARD_TITLE: &str = "Valeur du bulletin chiffré dans l’urne";

/// The message shown to the voter when verification fails.
pub fn user_message(error: &Error) -> String {
    match error {
        Error::Configuration(_) => "Erreur de configuration du formulaire.".to_owned(),
        Error::ControlElements(_) => "Les éléments de contrôle fournis sont mal formatés. \
             Assurez-vous de les avoir collés sans modification."
            .to_owned(),
        Error::DomainValidation { .. } => "Domaine incorrect".to_owned(),
        Error::Decryption(_) => "Échec du déchiffrement. \
             Assurez-vous d’avoir collé les éléments de contrôle sans modification."
            .to_owned(),
        Error::BallotValidation(BallotValidationError::Empty) => {
            "Le bulletin est vide et sera comptabilisé comme un nul.".to_owned()
        }
        Error::PlaintextDecode(_) | Error::BallotValidation(BallotValidationError::UnknownItem { .. }) => {
            "Le bulletin est invalide et sera comptabilisé comme un nul.".to_owned()
        }
        Error::MalformedResponse(MalformedResponse::Unparseable { status_code, .. }) => format!(
            "Erreur. La réponse du serveur est incorrecte. Statut {}",
            status_code.as_u16()
        ),
        Error::MalformedResponse(
            MalformedResponse::MissingVoteLabel | MalformedResponse::MissingReference,
        ) => "Les données retournées par le serveur sont incorrectes. \
             Si le problème persiste, contactez le support technique."
            .to_owned(),
        Error::Transport(_) => "Impossible de joindre le serveur.".to_owned(),
        Error::Server { message, .. } => message.clone(),
        Error::PresenceMismatch { .. } => {
            "Le bulletin chiffré fourni ne correspond pas à l’empreinte associée. \
             Assurez-vous d’avoir collé les éléments de contrôle sans modification. \
             Si le problème persiste, contactez le support technique."
                .to_owned()
        }
    }
}

/// A short machine-readable name for the kind of failure.
pub fn error_kind(error: &Error) -> &'static str {
    match error {
        Error::Configuration(_) => "configuration",
        Error::ControlElements(_) => "controlElements",
        Error::DomainValidation { .. } => "domainValidation",
        Error::Decryption(_) => "decryption",
        Error::PlaintextDecode(_) => "plaintextDecode",
        Error::BallotValidation(_) => "ballotValidation",
        Error::MalformedResponse(_) => "malformedResponse",
        Error::Transport(_) => "transport",
        Error::Server { .. } => "server",
        Error::PresenceMismatch { .. } => "presenceMismatch",
    }
}

/// The two header lines shown above every result: the vote, then the
/// election and ballot.
pub fn header_lines(header: &VoteHeader) -> [String; 2] {
    let vote = [&header.vote_label, &header.vote_sub_label]
        .into_iter()
        .flatten()
        .filter(|label| !label.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    let election = header.election_label.as_deref().unwrap_or_default();
    let election = match header.ballot_title.as_deref() {
        Some(ballot_title) if !ballot_title.is_empty() => {
            format!("{election} - {ballot_title}")
        }
        _ => election.to_owned(),
    };

    [vote, election]
}

fn ballot_lines(ballot: &DisplayModel) -> Vec<String> {
    let mut lines = vec![ballot.title.clone()];
    lines.extend(ballot.lines.iter().map(|line| match &line.state {
        LineState::Neutral => format!("    {}", line.text),
        LineState::Checked => format!("[x] {}", line.text),
        LineState::Unchecked => format!("[ ] {} (rayé)", line.text),
        LineState::Answer { label, .. } => format!("    {} : {label}", line.text),
    }));
    lines
}

/// Writes the result as text for a terminal.
#[derive(Debug)]
pub struct TerminalPresenter<W> {
    out: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_lines(&mut self, lines: &[String]) {
        for line in lines {
            if let Err(error) = writeln!(self.out, "{line}") {
                tracing::error!(%error, "failed to write verification result");
                return;
            }
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn succeeded(&mut self, outcome: &Outcome) {
        let mut lines = Vec::new();
        match outcome {
            Outcome::Integrity { header, ballot } => {
                lines.extend(header_lines(header));
                lines.push(String::new());
                lines.push(INTEGRITY_SUCCESS.to_owned());
                lines.push(String::new());
                lines.extend(ballot_lines(ballot));
            }
            Outcome::Presence {
                header,
                encrypted_ballot,
            } => {
                lines.extend(header_lines(header));
                lines.push(String::new());
                lines.push(PRESENCE_SUCCESS.to_owned());
                lines.push(String::new());
                lines.push(PRESENCE_CARD_TITLE.to_owned());
                lines.push(encrypted_ballot.clone());
            }
        }
        self.write_lines(&lines);
    }

    fn failed(&mut self, error: &Error) {
        self.write_lines(&[user_message(error)]);
    }
}

/// Writes the result as a single JSON document.
#[derive(Debug)]
pub struct JsonPresenter<W> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, document: &serde_json::Value) {
        let result = serde_json::to_writer(&mut self.out, document)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(self.out));
        if let Err(error) = result {
            tracing::error!(%error, "failed to write verification result");
        }
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn succeeded(&mut self, outcome: &Outcome) {
        self.write(&json!({
            "status": "succeeded",
            "outcome": outcome,
        }));
    }

    fn failed(&mut self, error: &Error) {
        self.write(&json!({
            "status": "failed",
            "error": {
                "kind": error_kind(error),
                "message": user_message(error),
                "detail": error.to_string(),
            },
        }));
    }
}
