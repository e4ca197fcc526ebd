//! Mock attestation quote format shared by the mock enclave launcher and the
//! client-side verifier.
//!
//! A quote is `measurement || sha256(enclave_pub_key)`: the first half pins
//! the enclave's measured code identity, the second half binds the quote to
//! the key the enclave published, so neither can be swapped independently.
use sha2::{Digest, Sha256};

use crate::error::Error;

pub type Measurement = [u8; 32];

pub const QUOTE_LEN: usize = 64;

pub fn mock_quote(measurement: &Measurement, enclave_pub_key: &[u8]) -> Vec<u8> {
    let mut quote = Vec::with_capacity(QUOTE_LEN);
    quote.extend_from_slice(measurement);
    quote.extend_from_slice(&Sha256::digest(enclave_pub_key));
    quote
}

/// Validates attestation evidence against the expected measurement baseline.
///
/// Callers MUST refuse to provision keys when this fails; a mismatch is a
/// trust error and is never retried.
pub fn verify_quote(
    quote: &[u8],
    expected: &Measurement,
    enclave_pub_key: &[u8],
) -> Result<(), Error> {
    if quote.len() != QUOTE_LEN {
        return Err(Error::MalformedQuote(quote.len()));
    }

    let (measurement, key_digest) = quote.split_at(32);
    if measurement != expected.as_slice() {
        return Err(Error::QuoteMismatch);
    }
    if key_digest != Sha256::digest(enclave_pub_key).as_slice() {
        return Err(Error::QuoteMismatch);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_quote_verifies() {
        let measurement = [7u8; 32];
        let pub_key = [2u8; 33];

        let quote = mock_quote(&measurement, &pub_key);
        assert_eq!(quote.len(), QUOTE_LEN);
        verify_quote(&quote, &measurement, &pub_key).unwrap();
    }

    #[test]
    fn wrong_measurement_is_rejected() {
        let quote = mock_quote(&[7u8; 32], &[2u8; 33]);
        assert!(matches!(
            verify_quote(&quote, &[8u8; 32], &[2u8; 33]),
            Err(Error::QuoteMismatch)
        ));
    }

    #[test]
    fn swapped_key_is_rejected() {
        let quote = mock_quote(&[7u8; 32], &[2u8; 33]);
        assert!(matches!(
            verify_quote(&quote, &[7u8; 32], &[3u8; 33]),
            Err(Error::QuoteMismatch)
        ));
    }

    #[test]
    fn truncated_quote_is_malformed() {
        assert!(matches!(
            verify_quote(&[0u8; 12], &[0u8; 32], &[2u8; 33]),
            Err(Error::MalformedQuote(12))
        ));
    }
}
