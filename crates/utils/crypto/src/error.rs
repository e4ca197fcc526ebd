use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("encryption failed")]
    EncryptionFailed,
    #[error("decryption failed")]
    DecryptionFailed,
    #[error("ciphertext too short to carry a nonce")]
    MalformedCiphertext,
    #[error("bad symmetric key length: {0}")]
    BadKeyLength(usize),
    #[error("sealing failed: {0}")]
    Sealing(String),
    #[error("unsealing failed: {0}")]
    Unsealing(String),
    #[error("attestation quote does not match the expected measurement")]
    QuoteMismatch,
    #[error("malformed attestation quote of {0} bytes")]
    MalformedQuote(usize),
    #[error("entry point `{0}` not found in the code directory")]
    MissingEntryPoint(String),
    #[error("bundle encoding error: {0}")]
    BundleEncode(String),
    #[error("bundle decoding error: {0}")]
    BundleDecode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
