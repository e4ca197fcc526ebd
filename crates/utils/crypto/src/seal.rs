//! Sealed-key exchange: binding a symmetric key to a specific enclave
//! instance via asymmetric encryption under the enclave's public key.
use ecies::{decrypt, encrypt};
use k256::ecdsa::SigningKey;

use crate::{cipher::SymmetricKey, error::Error};

/// Seals `key` under the enclave's SEC1-encoded secp256k1 public key. Only
/// the enclave holding the matching secret key can unseal it.
pub fn seal(enclave_pub_key: &[u8], key: &SymmetricKey) -> Result<Vec<u8>, Error> {
    encrypt(enclave_pub_key, key.as_bytes()).map_err(|e| Error::Sealing(e.to_string()))
}

/// Recovers a sealed symmetric key using the enclave's secret key.
pub fn unseal(sk: &SigningKey, sealed: &[u8]) -> Result<SymmetricKey, Error> {
    let bytes = decrypt(&sk.to_bytes(), sealed).map_err(|e| Error::Unsealing(e.to_string()))?;
    SymmetricKey::try_from(bytes.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_unseal_round_trip() {
        let sk = SigningKey::random(&mut rand::thread_rng());
        let pk = sk.verifying_key().to_sec1_bytes();

        let key = SymmetricKey::generate();
        let sealed = seal(&pk, &key).unwrap();
        assert_ne!(sealed.as_slice(), key.as_bytes().as_slice());

        let unsealed = unseal(&sk, &sealed).unwrap();
        assert_eq!(unsealed, key);
    }

    #[test]
    fn unseal_with_wrong_key_fails() {
        let sk = SigningKey::random(&mut rand::thread_rng());
        let pk = sk.verifying_key().to_sec1_bytes();
        let other = SigningKey::random(&mut rand::thread_rng());

        let sealed = seal(&pk, &SymmetricKey::generate()).unwrap();
        assert!(unseal(&other, &sealed).is_err());
    }
}
