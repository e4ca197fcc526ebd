//! Context passphrase derivation.
//!
//! Participants confirm out-of-band that they are talking about the same
//! computation by comparing a short word sequence derived from the
//! computation id. The phrase is low-entropy and human-transferable; it
//! authenticates the shared context, not the participants.
use bip32::{Language, Mnemonic};
use sha2::{Digest, Sha256};

pub const WORD_COUNT: usize = 6;

/// Derives the fixed-length word sequence for a computation.
///
/// Every participant derives the same phrase locally from the computation id;
/// it is never transmitted.
pub fn context_phrase(computation_id: impl AsRef<[u8]>) -> String {
    let entropy: [u8; 32] = Sha256::digest(computation_id.as_ref()).into();
    let mnemonic = Mnemonic::from_entropy(entropy, Language::English);

    mnemonic
        .phrase()
        .split(' ')
        .take(WORD_COUNT)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_is_deterministic() {
        let a = context_phrase("11111111-2222-3333-4444-555555555555");
        let b = context_phrase("11111111-2222-3333-4444-555555555555");
        assert_eq!(a, b);
    }

    #[test]
    fn phrase_has_fixed_word_count() {
        let phrase = context_phrase("some computation");
        assert_eq!(phrase.split(' ').count(), WORD_COUNT);
    }

    #[test]
    fn distinct_computations_get_distinct_phrases() {
        assert_ne!(context_phrase("a"), context_phrase("b"));
    }
}
