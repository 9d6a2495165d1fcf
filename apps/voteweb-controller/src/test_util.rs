use openssl::symm::{encrypt_aead, Cipher};

use crate::aead::TAG_LEN;

/// Encrypts `plaintext` the way the voting site does, returning the
/// hex-encoded ciphertext with the tag appended.
pub(crate) fn seal(plaintext: &[u8], key: &str, iv: &str) -> String {
    let key = hex::decode(key).unwrap();
    let cipher = match key.len() {
        16 => Cipher::aes_128_gcm(),
        24 => Cipher::aes_192_gcm(),
        32 => Cipher::aes_256_gcm(),
        len => panic!("unsupported key length: {len}"),
    };
    let mut tag = [0; TAG_LEN];
    let mut sealed = encrypt_aead(
        cipher,
        &key,
        Some(&hex::decode(iv).unwrap()),
        &[],
        plaintext,
        &mut tag,
    )
    .unwrap();
    sealed.extend_from_slice(&tag);
    hex::encode(sealed)
}
