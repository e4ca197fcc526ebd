//! The enclave attestation gateway: waiting for the enclave's published
//! identity, verifying its quote, and sealing keys to it.
use std::time::Duration;

use cinnabar_crypto::{
    quote::verify_quote,
    seal::seal,
    Measurement, SymmetricKey,
};
use cinnabar_registry_core::{state::ComputationId, types::EnclaveIdentityInfo};
use tokio::time::Instant;
use tracing::debug;

use crate::{client::RegistryClient, error::Error};

/// A verification witness: the only way to obtain one is through
/// [`verify`], so APIs that release key material (see [`seal_key`]) cannot
/// be called with an unverified enclave.
#[derive(Clone, Debug)]
pub struct VerifiedIdentity {
    inner: EnclaveIdentityInfo,
}

impl VerifiedIdentity {
    pub fn pub_key(&self) -> &[u8] {
        &self.inner.pub_key
    }

    pub fn measurement(&self) -> &Measurement {
        &self.inner.measurement
    }
}

/// Validates the enclave's attestation evidence against the expected
/// measurement baseline. Never retried: a mismatch means the enclave is not
/// running the code the participants agreed on.
pub fn verify(
    identity: EnclaveIdentityInfo,
    expected: &Measurement,
) -> Result<VerifiedIdentity, Error> {
    verify_quote(&identity.quote, expected, &identity.pub_key)
        .map_err(|_| Error::AttestationMismatch)?;
    Ok(VerifiedIdentity { inner: identity })
}

/// Polls until the enclave publishes its identity, or fails with
/// [`Error::Timeout`].
pub async fn wait_for_identity<C: RegistryClient>(
    client: &C,
    computation_id: ComputationId,
    interval: Duration,
    timeout: Duration,
) -> Result<EnclaveIdentityInfo, Error> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(identity) = client.enclave_identity(computation_id).await? {
            return Ok(identity);
        }
        if Instant::now() + interval > deadline {
            return Err(Error::Timeout(timeout, "enclave identity".to_string()));
        }
        debug!("enclave identity not yet published, retrying");
        tokio::time::sleep(interval).await;
    }
}

/// Seals a payload key to a verified enclave.
pub fn seal_key(key: &SymmetricKey, identity: &VerifiedIdentity) -> Result<Vec<u8>, Error> {
    Ok(seal(identity.pub_key(), key)?)
}
