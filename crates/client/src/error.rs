use std::time::Duration;

use cinnabar_registry_core::types::RunFailure;
use thiserror::Error;
use tonic::{Code, Status};

#[derive(Debug, Error)]
pub enum Error {
    #[error("timed out after {0:?} waiting for {1}")]
    Timeout(Duration, String),
    #[error("attestation quote does not match the expected measurement")]
    AttestationMismatch,
    #[error("result decryption failed")]
    DecryptionFailure,
    #[error("result not ready")]
    ResultNotReady,
    #[error("run failed with exit code {}", .0.exit_code)]
    RunFailed(RunFailure),
    #[error("registry error: {0}")]
    Registry(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("crypto error: {0}")]
    Crypto(#[from] cinnabar_crypto::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Status> for Error {
    fn from(status: Status) -> Self {
        match status.code() {
            // a failed run's detail payload rides in the status message
            Code::Aborted => serde_json::from_str::<RunFailure>(status.message())
                .map(Error::RunFailed)
                .unwrap_or_else(|_| Error::Registry(status.message().to_string())),
            Code::Unavailable => Error::ResultNotReady,
            _ => Error::Registry(status.message().to_string()),
        }
    }
}
