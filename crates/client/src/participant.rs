//! The high-level participant workflow.
//!
//! One `Participant` per process: register, wait for the attested enclave,
//! upload, provision a sealed key, and retrieve the result. Waiting is
//! cooperative polling with a fixed interval and a hard deadline.
use std::{fs, path::Path, time::Duration};

use cinnabar_crypto::{CodeBundle, Measurement};
use cinnabar_registry_core::{
    state::{ComputationId, Phase, Role},
    types::{
        ComputationAbandonRequest, ComputationCreateRequest, ComputationQueryResponse,
        KeyProvisionRequest, ParticipantRegisterRequest, ParticipantsApproveRequest,
        RunStatusQueryResponse,
    },
    upload::{PayloadKind, UploadId},
};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::{
    attestation::{self, VerifiedIdentity},
    client::RegistryClient,
    crypto::CryptoContext,
    error::Error,
    upload::upload_payload,
};

#[derive(Clone, Copy, Debug)]
pub struct PollOpts {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollOpts {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct Participant<C> {
    client: C,
    ctx: CryptoContext,
}

impl<C: RegistryClient> Participant<C> {
    pub fn new(client: C, ctx: CryptoContext) -> Self {
        Self { client, ctx }
    }

    pub fn crypto(&self) -> &CryptoContext {
        &self.ctx
    }

    pub fn public_key(&self) -> Vec<u8> {
        self.ctx.public_key()
    }

    /// Creates a computation with this participant as its owner.
    pub async fn create_computation(
        &self,
        name: impl Into<String>,
        roles: Vec<Role>,
    ) -> Result<ComputationId, Error> {
        let response = self
            .client
            .computation_create(ComputationCreateRequest {
                name: name.into(),
                roles,
                owner_pub_key: self.public_key(),
            })
            .await?;
        let id = response.computation_id;
        info!(
            "created computation {}; context phrase: {}",
            id,
            self.ctx.context_phrase(id)
        );
        Ok(id)
    }

    pub async fn register(&self, computation_id: ComputationId, role: Role) -> Result<(), Error> {
        self.client
            .participant_register(ParticipantRegisterRequest {
                computation_id,
                role,
                pub_key: self.public_key(),
            })
            .await?;
        info!("registered as {} for computation {}", role, computation_id);
        Ok(())
    }

    /// Owner-only: locks the participant set and boots the enclave.
    pub async fn approve(&self, computation_id: ComputationId) -> Result<Phase, Error> {
        let response = self
            .client
            .participants_approve(ParticipantsApproveRequest {
                computation_id,
                owner_pub_key: self.public_key(),
            })
            .await?;
        Ok(response.phase)
    }

    pub async fn abandon(&self, computation_id: ComputationId) -> Result<(), Error> {
        self.client
            .computation_abandon(ComputationAbandonRequest {
                computation_id,
                pub_key: self.public_key(),
            })
            .await?;
        Ok(())
    }

    pub async fn status(
        &self,
        computation_id: ComputationId,
    ) -> Result<ComputationQueryResponse, Error> {
        self.client.computation_query(computation_id).await
    }

    /// Waits for the enclave to publish its identity and verifies its quote
    /// against the expected measurement. Only the returned witness can be
    /// used to seal keys.
    pub async fn wait_for_enclave(
        &self,
        computation_id: ComputationId,
        expected: &Measurement,
        opts: PollOpts,
    ) -> Result<VerifiedIdentity, Error> {
        let identity =
            attestation::wait_for_identity(&self.client, computation_id, opts.interval, opts.timeout)
                .await?;
        attestation::verify(identity, expected)
    }

    /// Encrypts the code directory (entry point excepted) with this
    /// participant's payload key and uploads the bundle.
    pub async fn upload_code(
        &self,
        computation_id: ComputationId,
        code_dir: &Path,
        entry_point: &Path,
    ) -> Result<UploadId, Error> {
        let bundle = CodeBundle::build(code_dir, entry_point, self.ctx.payload_key())?;
        let payload = bundle.encode()?;
        debug!("code bundle encoded: {} byte(s)", payload.len());
        upload_payload(
            &self.client,
            computation_id,
            PayloadKind::Code,
            self.public_key(),
            &payload,
        )
        .await
    }

    /// Encrypts a data file with this participant's payload key and uploads
    /// the ciphertext.
    pub async fn upload_data(
        &self,
        computation_id: ComputationId,
        path: &Path,
    ) -> Result<UploadId, Error> {
        let plaintext = fs::read(path)?;
        let ciphertext = self.ctx.encrypt_payload(&plaintext)?;
        upload_payload(
            &self.client,
            computation_id,
            PayloadKind::Data,
            self.public_key(),
            &ciphertext,
        )
        .await
    }

    /// Seals this participant's payload key to the verified enclave and
    /// submits it. Returns `true` when this key tripped the barrier and the
    /// run auto-started.
    pub async fn provision_key(
        &self,
        computation_id: ComputationId,
        role: Role,
        enclave: &VerifiedIdentity,
    ) -> Result<bool, Error> {
        let sealed = attestation::seal_key(self.ctx.payload_key(), enclave)?;
        let response = self
            .client
            .key_provision(KeyProvisionRequest {
                computation_id,
                role,
                pub_key: self.public_key(),
                sealed_key: sealed,
            })
            .await?;
        Ok(response.run_started)
    }

    pub async fn run_status(
        &self,
        computation_id: ComputationId,
    ) -> Result<RunStatusQueryResponse, Error> {
        self.client.run_status(computation_id).await
    }

    /// Polls until the run is terminal, then decrypts this participant's
    /// result blob. A failed run surfaces as [`Error::RunFailed`] and is
    /// never retried.
    pub async fn wait_for_result(
        &self,
        computation_id: ComputationId,
        opts: PollOpts,
    ) -> Result<Vec<u8>, Error> {
        let deadline = Instant::now() + opts.timeout;
        loop {
            match self
                .client
                .result_fetch(computation_id, self.public_key())
                .await
            {
                Ok(response) => return self.ctx.decrypt_result(&response.ciphertext),
                Err(Error::ResultNotReady) => {
                    if Instant::now() + opts.interval > deadline {
                        return Err(Error::Timeout(opts.timeout, "run result".to_string()));
                    }
                    debug!("result not ready, retrying");
                    tokio::time::sleep(opts.interval).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
