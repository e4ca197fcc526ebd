use crate::state::{ComputationId, EnclaveIdentity, SealedKey};

pub mod mock;

/// Everything the enclave needs for one run, snapshotted at the moment the
/// sealed-key barrier completes.
#[derive(Clone, Debug)]
pub struct RunJob {
    pub computation: ComputationId,
    /// The committed code payload (an encoded bundle; only the entry point
    /// is cleartext).
    pub code: Vec<u8>,
    /// Committed data payloads: (provider public key, ciphertext).
    pub data: Vec<(Vec<u8>, Vec<u8>)>,
    pub sealed_keys: Vec<SealedKey>,
    /// Result consumers, each of which receives the result encrypted under
    /// their own provisioned key.
    pub consumers: Vec<Vec<u8>>,
}

#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub results: std::collections::BTreeMap<Vec<u8>, Vec<u8>>,
}

/// The interface to the enclave-hosting service.
///
/// The registry never touches key material or plaintext itself; it hands the
/// launcher the sealed keys and ciphertexts and records the outcome.
/// Production deployments implement this against their enclave host;
/// [`mock::MockEnclave`] stands in for development and testing.
#[async_trait::async_trait]
pub trait EnclaveLauncher: Send + Sync + 'static {
    type Error: ToString + Send + Sync;

    /// Boots the enclave for a computation and returns its published
    /// identity (public key + attestation quote).
    async fn launch(&self, computation: ComputationId) -> Result<EnclaveIdentity, Self::Error>;

    /// Executes the run to completion.
    async fn execute(&self, job: RunJob) -> Result<RunOutcome, Self::Error>;
}
