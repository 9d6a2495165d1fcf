//! The two verification protocols.
//!
//! Integrity control fetches the election's candidates or questions, decrypts
//! the ballot paper held in the control elements and renders it for the voter
//! to compare with what they meant to cast. Presence control asks the server
//! for the encrypted ballot stored in the ballot box and compares it with the
//! value the voter was given when voting.
//!
//! Each call to [`Controller::verify`] is a self-contained attempt that moves
//! from [`ControlState::Idle`] through [`ControlState::Requesting`] to either
//! [`ControlState::Succeeded`] or [`ControlState::Failed`]. Nothing is kept
//! between attempts.

use std::{fmt::Debug, time::Duration};

use reqwest::Url;
use serde::Serialize;
use types_rs::voteweb::{
    ControlElements, ControlType, IntegrityRequest, PresenceRequest, PresenceResponse, VoteHeader,
    DOMAIN_SUFFIX,
};
use voteweb_server_client::{Client, ControlServer};

use crate::aead::{self, PlaintextPolicy};
use crate::classify::classify;
use crate::error::{ControlElementsError, Error, MalformedResponse, Result};
use crate::render::{render, DisplayModel};

/// Control elements needed to decrypt and display a ballot.
#[derive(Clone, PartialEq, Eq)]
pub struct IntegrityElements {
    pub polling_station_token: String,
    pub cipher_text_with_tag: String,
    pub key: String,
    pub iv: String,
}

impl Debug for IntegrityElements {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrityElements")
            .field("polling_station_token", &self.polling_station_token)
            .finish_non_exhaustive()
    }
}

/// Control elements needed to check a ballot is in the ballot box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceElements {
    pub polling_station_token: String,
    pub ballot_hash: String,
    pub extra: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationMode {
    Integrity(IntegrityElements),
    Presence(PresenceElements),
}

impl VerificationMode {
    /// Picks the fields `control_type` needs out of the pasted bundle.
    pub fn new(
        control_type: ControlType,
        elements: ControlElements,
    ) -> Result<Self, ControlElementsError> {
        fn required(
            field: &'static str,
            value: Option<String>,
        ) -> Result<String, ControlElementsError> {
            value.ok_or(ControlElementsError::MissingField(field))
        }

        Ok(match control_type {
            ControlType::Integrity => Self::Integrity(IntegrityElements {
                polling_station_token: elements.polling_station_token,
                cipher_text_with_tag: required("c", elements.cipher_text_with_tag)?,
                key: required("k", elements.key)?,
                iv: required("i", elements.iv)?,
            }),
            ControlType::Presence => Self::Presence(PresenceElements {
                polling_station_token: elements.polling_station_token,
                ballot_hash: required("b", elements.ballot_hash)?,
                extra: elements.extra,
            }),
        })
    }

    pub fn control_type(&self) -> ControlType {
        match self {
            Self::Integrity(_) => ControlType::Integrity,
            Self::Presence(_) => ControlType::Presence,
        }
    }
}

/// A parsed verification request: which election site to ask, and what to
/// check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub domain: String,
    pub mode: VerificationMode,
}

impl VerificationRequest {
    /// Parses the form input. The domain is checked before anything
    /// mode-specific so a bundle pointing elsewhere is rejected outright.
    pub fn parse(control_type: &str, control_elements: &str) -> Result<Self> {
        let control_type = control_type
            .parse::<ControlType>()
            .map_err(|_| Error::Configuration(control_type.to_owned()))?;
        let elements = control_elements
            .parse::<ControlElements>()
            .map_err(ControlElementsError::Syntax)?;

        if !elements.has_election_domain() {
            return Err(Error::DomainValidation {
                domain: elements.domain,
            });
        }

        let domain = elements.domain.clone();
        let mode = VerificationMode::new(control_type, elements)?;
        Ok(Self { domain, mode })
    }

    /// The election site's URL. The host requests actually go to must itself
    /// be under the election domain.
    pub fn base_url(&self) -> Result<Url> {
        let domain_error = || Error::DomainValidation {
            domain: self.domain.clone(),
        };
        let url = Url::parse(&format!("https://{}", self.domain)).map_err(|_| domain_error())?;

        let is_site_root = url.username().is_empty()
            && url.password().is_none()
            && url.port().is_none()
            && url.query().is_none()
            && url.fragment().is_none()
            && url.path() == "/";
        let is_election_host = url
            .host_str()
            .is_some_and(|host| host.ends_with(DOMAIN_SUFFIX));
        if !(is_site_root && is_election_host) {
            return Err(domain_error());
        }
        Ok(url)
    }
}

/// Opens a connection to an election site.
pub trait Connector {
    type Server: ControlServer;

    fn connect(&self, base_url: Url) -> voteweb_server_client::Result<Self::Server>;
}

/// Connects to election sites over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    timeout: Duration,
}

impl HttpConnector {
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Connector for HttpConnector {
    type Server = Client;

    fn connect(&self, base_url: Url) -> voteweb_server_client::Result<Client> {
        Client::new(base_url, self.timeout)
    }
}

/// What a successful verification shows the voter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "control", rename_all = "camelCase")]
pub enum Outcome {
    /// The ballot paper the control elements decrypt to.
    #[serde(rename_all = "camelCase")]
    Integrity {
        header: VoteHeader,
        ballot: DisplayModel,
    },

    /// The encrypted ballot found in the ballot box, verbatim.
    #[serde(rename_all = "camelCase")]
    Presence {
        header: VoteHeader,
        encrypted_ballot: String,
    },
}

#[derive(Debug)]
pub enum ControlState {
    Idle,
    Requesting,
    Succeeded(Outcome),
    Failed(Error),
}

impl ControlState {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    fn transition(&mut self, next: Self) {
        tracing::debug!(from = self.name(), to = next.name(), "control state changed");
        *self = next;
    }
}

/// Receives the result of a verification attempt.
pub trait Presenter {
    fn succeeded(&mut self, outcome: &Outcome);
    fn failed(&mut self, error: &Error);
}

/// Runs verification attempts against election sites.
#[derive(Debug)]
pub struct Controller<C> {
    connector: C,
    plaintext_policy: PlaintextPolicy,
}

impl<C: Connector> Controller<C> {
    pub const fn new(connector: C, plaintext_policy: PlaintextPolicy) -> Self {
        Self {
            connector,
            plaintext_policy,
        }
    }

    /// Runs one verification attempt and hands its result to `presenter`.
    /// Every failure, wherever it happens, ends up as [`ControlState::Failed`].
    pub async fn verify(
        &self,
        control_type: &str,
        control_elements: &str,
        presenter: &mut impl Presenter,
    ) -> ControlState {
        let mut state = ControlState::Idle;
        let next = match self.attempt(&mut state, control_type, control_elements).await {
            Ok(outcome) => {
                tracing::info!("verification succeeded");
                ControlState::Succeeded(outcome)
            }
            Err(error) => {
                tracing::warn!(%error, "verification failed");
                ControlState::Failed(error)
            }
        };
        state.transition(next);

        match &state {
            ControlState::Succeeded(outcome) => presenter.succeeded(outcome),
            ControlState::Failed(error) => presenter.failed(error),
            ControlState::Idle | ControlState::Requesting => {}
        }
        state
    }

    async fn attempt(
        &self,
        state: &mut ControlState,
        control_type: &str,
        control_elements: &str,
    ) -> Result<Outcome> {
        let request = VerificationRequest::parse(control_type, control_elements)?;
        let base_url = request.base_url()?;
        tracing::info!(
            control_type = %request.mode.control_type(),
            domain = %request.domain,
            "verifying ballot"
        );

        let server = self.connector.connect(base_url)?;
        state.transition(ControlState::Requesting);

        match request.mode {
            VerificationMode::Integrity(elements) => {
                self.control_integrity(&server, &elements).await
            }
            VerificationMode::Presence(elements) => control_presence(&server, &elements).await,
        }
    }

    async fn control_integrity(
        &self,
        server: &impl ControlServer,
        elements: &IntegrityElements,
    ) -> Result<Outcome> {
        let response = server
            .control_integrity(&IntegrityRequest {
                polling_station_token: elements.polling_station_token.clone(),
            })
            .await?;

        if !response.header.has_vote_label() {
            return Err(Error::MalformedResponse(MalformedResponse::MissingVoteLabel));
        }
        let (header, reference) = response.into_parts();

        let raw = aead::decrypt_ballot(
            &elements.cipher_text_with_tag,
            &elements.key,
            &elements.iv,
            self.plaintext_policy,
        )?;
        let reference =
            reference.ok_or(Error::MalformedResponse(MalformedResponse::MissingReference))?;
        let classified = classify(raw, &reference)?;
        tracing::debug!(
            mode = ?classified.mode,
            is_blank = classified.is_blank,
            selections = classified.selections.len(),
            "ballot paper classified"
        );
        let ballot = render(&classified, &reference)?;

        Ok(Outcome::Integrity { header, ballot })
    }
}

async fn control_presence(
    server: &impl ControlServer,
    elements: &PresenceElements,
) -> Result<Outcome> {
    let response = server
        .control_presence(&PresenceRequest {
            polling_station_token: elements.polling_station_token.clone(),
            extra: elements.extra.clone(),
        })
        .await?;
    check_presence(elements, response)
}

/// Compares the ballot box's encrypted ballot with the expected value. Only
/// an exact match counts.
fn check_presence(elements: &PresenceElements, response: PresenceResponse) -> Result<Outcome> {
    let PresenceResponse {
        header,
        encrypted_ballot,
    } = response;

    match encrypted_ballot {
        Some(encrypted_ballot) if encrypted_ballot == elements.ballot_hash => {
            Ok(Outcome::Presence {
                header,
                encrypted_ballot,
            })
        }
        actual => Err(Error::PresenceMismatch {
            expected: elements.ballot_hash.clone(),
            actual,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use types_rs::voteweb::{Candidate, IntegrityResponse};
    use voteweb_server_client::Error as ClientError;

    use super::*;
    use crate::aead::DecryptionError;
    use crate::classify::BallotValidationError;
    use crate::render::{DisplayLine, LineState};
    use crate::test_util::seal;

    const KEY: &str = "000102030405060708090a0b0c0d0e0f";
    const IV: &str = "cafebabefacedbaddecaf888";

    #[derive(Debug, Clone)]
    enum Reply {
        Integrity(IntegrityResponse),
        Presence(PresenceResponse),
        Server(reqwest::StatusCode, String),
        Timeout,
    }

    /// Answers every request with the same reply and records what was asked.
    #[derive(Debug, Clone)]
    struct FakeSite {
        reply: Reply,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl FakeSite {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                log: Arc::default(),
            }
        }

        fn log(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }

        fn record(&self, entry: String) {
            self.log.lock().unwrap().push(entry);
        }

        fn error(&self) -> ClientError {
            match &self.reply {
                Reply::Server(status_code, message) => ClientError::Server {
                    status_code: *status_code,
                    message: message.clone(),
                },
                Reply::Timeout => ClientError::Timeout(Duration::from_secs(60)),
                reply => panic!("unexpected request for reply {reply:?}"),
            }
        }
    }

    impl Connector for FakeSite {
        type Server = Self;

        fn connect(&self, base_url: Url) -> voteweb_server_client::Result<Self> {
            self.record(format!("connect {base_url}"));
            Ok(self.clone())
        }
    }

    impl ControlServer for FakeSite {
        async fn control_integrity(
            &self,
            request: &IntegrityRequest,
        ) -> voteweb_server_client::Result<IntegrityResponse> {
            self.record(format!("integrity p={}", request.polling_station_token));
            match &self.reply {
                Reply::Integrity(response) => Ok(response.clone()),
                _ => Err(self.error()),
            }
        }

        async fn control_presence(
            &self,
            request: &PresenceRequest,
        ) -> voteweb_server_client::Result<PresenceResponse> {
            self.record(format!(
                "presence p={} f={:?}",
                request.polling_station_token, request.extra
            ));
            match &self.reply {
                Reply::Presence(response) => Ok(response.clone()),
                _ => Err(self.error()),
            }
        }
    }

    #[derive(Debug, Default)]
    struct Recorder {
        succeeded: Vec<Outcome>,
        failed: Vec<String>,
    }

    impl Presenter for Recorder {
        fn succeeded(&mut self, outcome: &Outcome) {
            self.succeeded.push(outcome.clone());
        }

        fn failed(&mut self, error: &Error) {
            self.failed.push(error.to_string());
        }
    }

    fn header() -> VoteHeader {
        VoteHeader {
            vote_label: Some("Élections CSE".to_owned()),
            vote_sub_label: Some("Titulaires".to_owned()),
            election_label: Some("Collège cadres".to_owned()),
            ballot_title: None,
        }
    }

    fn candidates_response() -> IntegrityResponse {
        IntegrityResponse {
            header: header(),
            candidates: Some(HashMap::from([
                (
                    "3".to_owned(),
                    Candidate {
                        first_name: "A".to_owned(),
                        last_name: "B".to_owned(),
                        ballot_paper_title: Some("Liste unique".to_owned()),
                    },
                ),
                (
                    "4".to_owned(),
                    Candidate {
                        first_name: "C".to_owned(),
                        last_name: "D".to_owned(),
                        ballot_paper_title: None,
                    },
                ),
            ])),
            ..IntegrityResponse::default()
        }
    }

    fn integrity_elements(plaintext: &[u8]) -> String {
        json!({
            "d": "vote.voteweb.fr",
            "p": "tok-1",
            "c": seal(plaintext, KEY, IV),
            "k": KEY,
            "i": IV,
        })
        .to_string()
    }

    fn presence_elements(ballot_hash: &str) -> String {
        json!({
            "d": "vote.voteweb.fr",
            "p": "tok-2",
            "b": ballot_hash,
            "f": "extra",
        })
        .to_string()
    }

    async fn verify(site: &FakeSite, control_type: &str, elements: &str) -> (ControlState, Recorder) {
        let controller = Controller::new(site.clone(), PlaintextPolicy::Strict);
        let mut recorder = Recorder::default();
        let state = controller.verify(control_type, elements, &mut recorder).await;
        (state, recorder)
    }

    #[tokio::test]
    async fn test_integrity_control() {
        let site = FakeSite::new(Reply::Integrity(candidates_response()));
        let elements = integrity_elements(
            br#"{"userCategoryId":1,"4":0,"3":1,"pollingStationId":2}#padpadpad"#,
        );
        let (state, recorder) = verify(&site, "integrity", &elements).await;

        let expected = Outcome::Integrity {
            header: header(),
            ballot: DisplayModel {
                title: "Bulletin".to_owned(),
                lines: vec![
                    DisplayLine {
                        text: "A B".to_owned(),
                        state: LineState::Checked,
                    },
                    DisplayLine {
                        text: "C D".to_owned(),
                        state: LineState::Unchecked,
                    },
                ],
            },
        };
        match state {
            ControlState::Succeeded(outcome) => assert_eq!(outcome, expected),
            other => panic!("expected success, got: {other:?}"),
        }
        assert_eq!(recorder.succeeded, vec![expected]);
        assert!(recorder.failed.is_empty());
        assert_eq!(
            site.log(),
            vec!["connect https://vote.voteweb.fr/", "integrity p=tok-1"]
        );
    }

    #[tokio::test]
    async fn test_integrity_control_missing_vote_label() {
        let site = FakeSite::new(Reply::Integrity(IntegrityResponse {
            header: VoteHeader::default(),
            ..candidates_response()
        }));
        let (state, recorder) = verify(&site, "integrity", &integrity_elements(br#"{"3":1}"#)).await;
        assert!(matches!(
            state,
            ControlState::Failed(Error::MalformedResponse(MalformedResponse::MissingVoteLabel))
        ));
        assert_eq!(recorder.failed.len(), 1);
        assert!(recorder.succeeded.is_empty());
    }

    #[tokio::test]
    async fn test_integrity_control_missing_reference() {
        let site = FakeSite::new(Reply::Integrity(IntegrityResponse {
            header: header(),
            ..IntegrityResponse::default()
        }));
        let (state, _) = verify(&site, "integrity", &integrity_elements(br#"{"3":1}"#)).await;
        assert!(matches!(
            state,
            ControlState::Failed(Error::MalformedResponse(MalformedResponse::MissingReference))
        ));
    }

    #[tokio::test]
    async fn test_integrity_control_tampered_ciphertext() {
        let site = FakeSite::new(Reply::Integrity(candidates_response()));
        let mut elements: Value =
            serde_json::from_str(&integrity_elements(br#"{"3":1}"#)).unwrap();
        let tampered = {
            let c = elements["c"].as_str().unwrap();
            let flipped = if c.starts_with('0') { "1" } else { "0" };
            format!("{flipped}{}", &c[1..])
        };
        elements["c"] = json!(tampered);

        let (state, recorder) = verify(&site, "integrity", &elements.to_string()).await;
        assert!(matches!(
            state,
            ControlState::Failed(Error::Decryption(DecryptionError::Authentication(_)))
        ));
        assert!(recorder.succeeded.is_empty());
    }

    #[tokio::test]
    async fn test_integrity_control_invalid_ballot() {
        let site = FakeSite::new(Reply::Integrity(candidates_response()));
        let (state, _) = verify(&site, "integrity", &integrity_elements(br#"{"99":1}"#)).await;
        match state {
            ControlState::Failed(Error::BallotValidation(BallotValidationError::UnknownItem {
                item_id,
            })) => assert_eq!(item_id, "99"),
            other => panic!("expected an invalid ballot, got: {other:?}"),
        }

        let (state, _) = verify(
            &site,
            "integrity",
            &integrity_elements(br#"{"userCategoryId":1,"pollingStationId":2}"#),
        )
        .await;
        assert!(matches!(
            state,
            ControlState::Failed(Error::BallotValidation(BallotValidationError::Empty))
        ));
    }

    #[tokio::test]
    async fn test_blank_ballot() {
        let site = FakeSite::new(Reply::Integrity(candidates_response()));
        let (state, _) =
            verify(&site, "integrity", &integrity_elements(br#"{"0":"blank","3":1}"#)).await;
        match state {
            ControlState::Succeeded(Outcome::Integrity { ballot, .. }) => {
                assert_eq!(ballot.title, "Bulletin");
                assert_eq!(
                    ballot.lines,
                    vec![DisplayLine {
                        text: "Blanc".to_owned(),
                        state: LineState::Neutral,
                    }]
                );
            }
            other => panic!("expected a blank ballot, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_domain_gate() {
        let site = FakeSite::new(Reply::Integrity(candidates_response()));
        let elements = json!({"d": "evil.com", "p": "tok", "c": "00", "k": KEY, "i": IV});
        let (state, recorder) = verify(&site, "integrity", &elements.to_string()).await;
        match state {
            ControlState::Failed(Error::DomainValidation { domain }) => {
                assert_eq!(domain, "evil.com");
            }
            other => panic!("expected a domain error, got: {other:?}"),
        }
        assert_eq!(recorder.failed.len(), 1);
        assert!(site.log().is_empty());
    }

    #[tokio::test]
    async fn test_domain_gate_checks_the_request_host() {
        let site = FakeSite::new(Reply::Presence(PresenceResponse::default()));
        for domain in [
            "evil.com/x.voteweb.fr",
            "evil.com#.voteweb.fr",
            "evil.com?.voteweb.fr",
            "token@evil.com/.voteweb.fr",
            "evil.com:8443/voteweb.fr",
        ] {
            let elements = json!({"d": domain, "p": "secret-token", "b": "h"});
            let (state, _) = verify(&site, "presence", &elements.to_string()).await;
            assert!(
                matches!(&state, ControlState::Failed(Error::DomainValidation { .. })),
                "{domain:?} gave {state:?}"
            );
        }
        assert!(site.log().is_empty());
    }

    #[test]
    fn test_base_url_rejects_foreign_hosts() {
        for domain in ["evil.com/x.voteweb.fr", "evil.com#.voteweb.fr", "evil.com"] {
            let request = VerificationRequest {
                domain: domain.to_owned(),
                mode: VerificationMode::Presence(PresenceElements {
                    polling_station_token: "tok".to_owned(),
                    ballot_hash: "h".to_owned(),
                    extra: None,
                }),
            };
            assert!(
                matches!(request.base_url(), Err(Error::DomainValidation { .. })),
                "{domain:?} was accepted"
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_control_type() {
        let site = FakeSite::new(Reply::Timeout);
        let (state, _) = verify(&site, "audit", &presence_elements("abc")).await;
        assert!(matches!(state, ControlState::Failed(Error::Configuration(t)) if t == "audit"));
        assert!(site.log().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_control_elements() {
        let site = FakeSite::new(Reply::Timeout);
        let (state, _) = verify(&site, "presence", "{\"d\": \"vote.voteweb.fr\",").await;
        assert!(matches!(
            state,
            ControlState::Failed(Error::ControlElements(ControlElementsError::Syntax(_)))
        ));

        let elements = json!({"d": "vote.voteweb.fr", "p": "tok", "c": "00", "i": IV});
        let (state, _) = verify(&site, "integrity", &elements.to_string()).await;
        assert!(matches!(
            state,
            ControlState::Failed(Error::ControlElements(ControlElementsError::MissingField("k")))
        ));
        assert!(site.log().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_surfaced() {
        let site = FakeSite::new(Reply::Server(
            reqwest::StatusCode::NOT_FOUND,
            "Bulletin introuvable.".to_owned(),
        ));
        let (state, _) = verify(&site, "integrity", &integrity_elements(br#"{"3":1}"#)).await;
        match state {
            ControlState::Failed(Error::Server {
                status_code,
                message,
            }) => {
                assert_eq!(status_code, reqwest::StatusCode::NOT_FOUND);
                assert_eq!(message, "Bulletin introuvable.");
            }
            other => panic!("expected a server error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_a_transport_error() {
        let site = FakeSite::new(Reply::Timeout);
        let (state, _) = verify(&site, "presence", &presence_elements("abc")).await;
        assert!(matches!(
            state,
            ControlState::Failed(Error::Transport(ClientError::Timeout(_)))
        ));
    }

    #[tokio::test]
    async fn test_presence_control() {
        let site = FakeSite::new(Reply::Presence(PresenceResponse {
            header: header(),
            encrypted_ballot: Some("e3b0c44298fc1c14".to_owned()),
        }));
        let (state, recorder) = verify(&site, "presence", &presence_elements("e3b0c44298fc1c14")).await;
        let expected = Outcome::Presence {
            header: header(),
            encrypted_ballot: "e3b0c44298fc1c14".to_owned(),
        };
        assert!(matches!(&state, ControlState::Succeeded(outcome) if *outcome == expected));
        assert_eq!(recorder.succeeded, vec![expected]);
        assert_eq!(
            site.log(),
            vec![
                "connect https://vote.voteweb.fr/",
                "presence p=tok-2 f=Some(\"extra\")"
            ]
        );
    }

    #[tokio::test]
    async fn test_presence_mismatch() {
        let site = FakeSite::new(Reply::Presence(PresenceResponse {
            header: header(),
            encrypted_ballot: Some("tampered".to_owned()),
        }));
        let (state, recorder) = verify(&site, "presence", &presence_elements("original")).await;
        match state {
            ControlState::Failed(Error::PresenceMismatch { expected, actual }) => {
                assert_eq!(expected, "original");
                assert_eq!(actual.as_deref(), Some("tampered"));
            }
            other => panic!("expected a mismatch, got: {other:?}"),
        }
        assert!(recorder.succeeded.is_empty());
    }

    #[test]
    fn test_presence_without_encrypted_ballot() {
        let elements = PresenceElements {
            polling_station_token: "tok".to_owned(),
            ballot_hash: "abc".to_owned(),
            extra: None,
        };
        assert!(matches!(
            check_presence(&elements, PresenceResponse::default()),
            Err(Error::PresenceMismatch { actual: None, .. })
        ));
    }

    #[test]
    fn test_parse_request() {
        let request = VerificationRequest::parse("presence", &presence_elements("abc")).unwrap();
        assert_eq!(request.domain, "vote.voteweb.fr");
        assert_eq!(
            request.mode,
            VerificationMode::Presence(PresenceElements {
                polling_station_token: "tok-2".to_owned(),
                ballot_hash: "abc".to_owned(),
                extra: Some("extra".to_owned()),
            })
        );
        assert_eq!(request.mode.control_type(), ControlType::Presence);
        assert_eq!(request.base_url().unwrap().as_str(), "https://vote.voteweb.fr/");
    }

    #[test]
    fn test_integrity_elements_debug_hides_key() {
        let request =
            VerificationRequest::parse("integrity", &integrity_elements(br#"{"3":1}"#)).unwrap();
        assert!(!format!("{request:?}").contains(KEY));
    }

    #[test]
    fn test_outcome_json() {
        let outcome = Outcome::Presence {
            header: header(),
            encrypted_ballot: "abc".to_owned(),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "control": "presence",
                "header": {
                    "voteLabel": "Élections CSE",
                    "voteSubLabel": "Titulaires",
                    "electionLabel": "Collège cadres",
                },
                "encryptedBallot": "abc",
            })
        );
    }

    proptest! {
        #[test]
        fn test_presence_is_exact_equality(expected in ".{0,32}", actual in ".{0,32}") {
            let elements = PresenceElements {
                polling_station_token: "tok".to_owned(),
                ballot_hash: expected.clone(),
                extra: None,
            };
            let result = check_presence(
                &elements,
                PresenceResponse {
                    header: VoteHeader::default(),
                    encrypted_ballot: Some(actual.clone()),
                },
            );
            prop_assert_eq!(result.is_ok(), expected == actual);
        }
    }
}
