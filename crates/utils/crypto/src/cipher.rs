//! Symmetric payload encryption for code, data, and results.
use std::fmt::{Debug, Formatter};

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::Rng;

use crate::error::Error;

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;

/// A 256-bit ChaCha20-Poly1305 key held by a single participant.
///
/// The key itself never leaves the client in the clear; only its sealed form
/// (see [`crate::seal`]) is ever transmitted.
#[derive(Clone, PartialEq, Eq)]
pub struct SymmetricKey([u8; KEY_LEN]);

impl SymmetricKey {
    pub fn generate() -> Self {
        Self(rand::thread_rng().gen())
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Encrypts `plaintext` under a fresh random nonce; the nonce is
    /// prepended to the returned ciphertext.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.0));
        let nonce_bytes: [u8; NONCE_LEN] = rand::thread_rng().gen();
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| Error::EncryptionFailed)?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypts a nonce-prefixed ciphertext produced by [`Self::encrypt`].
    pub fn decrypt(&self, bytes: &[u8]) -> Result<Vec<u8>, Error> {
        if bytes.len() < NONCE_LEN {
            return Err(Error::MalformedCiphertext);
        }
        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LEN);

        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.0));
        cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| Error::DecryptionFailed)
    }
}

impl TryFrom<&[u8]> for SymmetricKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| Error::BadKeyLength(bytes.len()))?;
        Ok(Self(key))
    }
}

impl Debug for SymmetricKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // never log key material
        write!(f, "SymmetricKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let key = SymmetricKey::generate();
        let plaintext = b"the quick brown fox";

        let ciphertext = key.encrypt(plaintext).unwrap();
        assert_ne!(&ciphertext[NONCE_LEN..], plaintext.as_slice());

        let recovered = key.decrypt(&ciphertext).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn wrong_key_fails() {
        let key = SymmetricKey::generate();
        let other = SymmetricKey::generate();

        let ciphertext = key.encrypt(b"secret").unwrap();
        assert!(matches!(
            other.decrypt(&ciphertext),
            Err(Error::DecryptionFailed)
        ));
    }

    #[test]
    fn truncated_ciphertext_is_malformed() {
        let key = SymmetricKey::generate();
        assert!(matches!(
            key.decrypt(&[0u8; NONCE_LEN - 1]),
            Err(Error::MalformedCiphertext)
        ));
    }
}
