//! Per-participant key material.
use cinnabar_crypto::{passphrase, SymmetricKey};
use cinnabar_registry_core::state::ComputationId;
use k256::ecdsa::SigningKey;

use crate::error::Error;

/// A participant's private cryptographic state: a secp256k1 identity key and
/// a symmetric payload key.
///
/// Owned exclusively by the participant that generated it. The payload key
/// leaves the client only in sealed form; the identity secret never does.
#[derive(Clone)]
pub struct CryptoContext {
    identity: SigningKey,
    payload_key: SymmetricKey,
}

impl CryptoContext {
    pub fn generate() -> Self {
        Self {
            identity: SigningKey::random(&mut rand::thread_rng()),
            payload_key: SymmetricKey::generate(),
        }
    }

    pub fn from_parts(identity: SigningKey, payload_key: SymmetricKey) -> Self {
        Self {
            identity,
            payload_key,
        }
    }

    pub fn identity(&self) -> &SigningKey {
        &self.identity
    }

    /// The participant's registration identity (SEC1 bytes).
    pub fn public_key(&self) -> Vec<u8> {
        self.identity.verifying_key().to_sec1_bytes().to_vec()
    }

    pub fn payload_key(&self) -> &SymmetricKey {
        &self.payload_key
    }

    pub fn encrypt_payload(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        Ok(self.payload_key.encrypt(plaintext)?)
    }

    /// Decrypts a result blob with the retained payload key. A mismatch
    /// between this key and the one sealed at provisioning time is a trust
    /// error and is never retried.
    pub fn decrypt_result(&self, blob: &[u8]) -> Result<Vec<u8>, Error> {
        self.payload_key
            .decrypt(blob)
            .map_err(|_| Error::DecryptionFailure)
    }

    /// The word sequence participants compare out-of-band to confirm they
    /// share the same computation context.
    pub fn context_phrase(&self, computation_id: ComputationId) -> String {
        passphrase::context_phrase(computation_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trip() {
        let ctx = CryptoContext::generate();
        let ciphertext = ctx.encrypt_payload(b"data").unwrap();
        assert_eq!(ctx.decrypt_result(&ciphertext).unwrap(), b"data");
    }

    #[test]
    fn foreign_blob_fails_decryption() {
        let ctx = CryptoContext::generate();
        let other = CryptoContext::generate();
        let blob = other.encrypt_payload(b"data").unwrap();
        assert!(matches!(
            ctx.decrypt_result(&blob),
            Err(Error::DecryptionFailure)
        ));
    }

    #[test]
    fn participants_derive_the_same_phrase() {
        let id = ComputationId::generate();
        let a = CryptoContext::generate();
        let b = CryptoContext::generate();
        assert_eq!(a.context_phrase(id), b.context_phrase(id));
    }
}
