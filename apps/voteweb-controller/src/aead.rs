//! Authenticated decryption of the ballot paper a voter holds.
//!
//! The control elements carry the ballot paper encrypted with AES-GCM, the
//! 128-bit tag appended to the ciphertext, together with the key and nonce.
//! Nothing is returned unless the tag verifies.

use openssl::symm::{decrypt_aead, Cipher};
use types_rs::voteweb::RawBallotRecord;

/// Length of the GCM authentication tag appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// Everything after the first `#` in the plaintext is padding.
const PADDING_SEPARATOR: char = '#';

#[derive(Debug, thiserror::Error)]
pub enum DecryptionError {
    #[error("invalid hex in {field}: {source}")]
    Hex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("unsupported key length: {0} bytes")]
    KeyLength(usize),

    #[error("empty initialization vector")]
    EmptyIv,

    #[error("ciphertext is {0} bytes, shorter than the authentication tag")]
    Truncated(usize),

    #[error("authentication failed: {0}")]
    Authentication(#[from] openssl::error::ErrorStack),
}

#[derive(Debug, thiserror::Error)]
pub enum PlaintextDecodeError {
    #[error("plaintext is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("plaintext is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// What to do with an authenticated plaintext that does not hold a ballot
/// paper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaintextPolicy {
    /// Report the decoding failure.
    #[default]
    Strict,

    /// Treat it as an empty ballot paper, as older clients did.
    Lenient,
}

/// Decrypts `cipher_text_with_tag` and returns the authenticated plaintext.
pub fn decrypt(
    cipher_text_with_tag: &str,
    key: &str,
    iv: &str,
) -> Result<Vec<u8>, DecryptionError> {
    let data = decode_hex("ciphertext", cipher_text_with_tag)?;
    let key = decode_hex("key", key)?;
    let iv = decode_hex("iv", iv)?;

    let cipher = match key.len() {
        16 => Cipher::aes_128_gcm(),
        24 => Cipher::aes_192_gcm(),
        32 => Cipher::aes_256_gcm(),
        len => return Err(DecryptionError::KeyLength(len)),
    };
    if iv.is_empty() {
        return Err(DecryptionError::EmptyIv);
    }
    if data.len() < TAG_LEN {
        return Err(DecryptionError::Truncated(data.len()));
    }

    let (cipher_text, tag) = data.split_at(data.len() - TAG_LEN);
    Ok(decrypt_aead(cipher, &key, Some(&iv), &[], cipher_text, tag)?)
}

/// Parses an authenticated plaintext into a ballot paper.
pub fn parse_plaintext(
    plaintext: Vec<u8>,
    policy: PlaintextPolicy,
) -> Result<RawBallotRecord, PlaintextDecodeError> {
    match decode_plaintext(plaintext) {
        Ok(record) => Ok(record),
        Err(e) if policy == PlaintextPolicy::Lenient => {
            tracing::warn!("plaintext does not hold a ballot paper, treating it as empty: {e}");
            Ok(RawBallotRecord::new())
        }
        Err(e) => Err(e),
    }
}

/// Decrypts the ballot paper held in the control elements.
pub fn decrypt_ballot(
    cipher_text_with_tag: &str,
    key: &str,
    iv: &str,
    policy: PlaintextPolicy,
) -> crate::Result<RawBallotRecord> {
    let plaintext = decrypt(cipher_text_with_tag, key, iv)?;
    Ok(parse_plaintext(plaintext, policy)?)
}

fn decode_plaintext(plaintext: Vec<u8>) -> Result<RawBallotRecord, PlaintextDecodeError> {
    let plaintext = String::from_utf8(plaintext)?;
    let meaningful = plaintext
        .split(PADDING_SEPARATOR)
        .next()
        .unwrap_or_default();
    Ok(serde_json::from_str(meaningful)?)
}

fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, DecryptionError> {
    hex::decode(value.trim()).map_err(|source| DecryptionError::Hex { field, source })
}
