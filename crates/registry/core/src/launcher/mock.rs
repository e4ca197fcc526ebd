//! A mock enclave for development and testing.
//!
//! The mock performs the same key dance a real enclave would — publish an
//! identity, unseal the provisioned keys, decrypt payloads, re-encrypt the
//! result per consumer — but "runs" the identity program: its output is the
//! concatenation of the decrypted data inputs.
use std::{collections::BTreeMap, sync::Arc};

use cinnabar_crypto::{bundle::CodeBundle, quote::mock_quote, seal::unseal, Measurement};
use k256::ecdsa::SigningKey;
use log::{debug, info};
use tokio::sync::RwLock;

use crate::{
    launcher::{EnclaveLauncher, RunJob, RunOutcome},
    state::{ComputationId, EnclaveIdentity, Role},
};

#[derive(Clone, Debug)]
enum Behavior {
    Succeed,
    Fail { exit_code: i32, stderr: String },
}

#[derive(Clone, Debug)]
pub struct MockEnclave {
    measurement: Measurement,
    behavior: Behavior,
    keys: Arc<RwLock<BTreeMap<ComputationId, SigningKey>>>,
}

impl MockEnclave {
    pub fn new(measurement: Measurement) -> Self {
        Self {
            measurement,
            behavior: Behavior::Succeed,
            keys: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// A mock whose runs always fail with the given exit code and stderr,
    /// simulating a user-code failure inside the enclave.
    pub fn failing(measurement: Measurement, exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            measurement,
            behavior: Behavior::Fail {
                exit_code,
                stderr: stderr.into(),
            },
            keys: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub fn measurement(&self) -> Measurement {
        self.measurement
    }
}

#[async_trait::async_trait]
impl EnclaveLauncher for MockEnclave {
    type Error = String;

    async fn launch(&self, computation: ComputationId) -> Result<EnclaveIdentity, Self::Error> {
        let sk = SigningKey::random(&mut rand::thread_rng());
        let pub_key = sk.verifying_key().to_sec1_bytes().to_vec();
        let quote = mock_quote(&self.measurement, &pub_key);

        self.keys.write().await.insert(computation, sk);
        info!("mock enclave booted for computation {}", computation);

        Ok(EnclaveIdentity {
            pub_key,
            quote,
            measurement: self.measurement,
        })
    }

    async fn execute(&self, job: RunJob) -> Result<RunOutcome, Self::Error> {
        let sk = self
            .keys
            .read()
            .await
            .get(&job.computation)
            .cloned()
            .ok_or_else(|| format!("no enclave booted for computation {}", job.computation))?;

        if let Behavior::Fail { exit_code, stderr } = &self.behavior {
            return Ok(RunOutcome {
                exit_code: *exit_code,
                stdout: String::new(),
                stderr: stderr.clone(),
                results: BTreeMap::new(),
            });
        }

        // unseal every provisioned key with the enclave's secret key
        let mut keys = BTreeMap::new();
        for sealed in &job.sealed_keys {
            let key = unseal(&sk, &sealed.sealed).map_err(|e| e.to_string())?;
            keys.insert((sealed.role, sealed.pub_key.clone()), key);
        }

        // the code bundle must decrypt and carry a cleartext entry point
        let code_key = job
            .sealed_keys
            .iter()
            .find(|k| k.role == Role::CodeProvider)
            .and_then(|k| keys.get(&(Role::CodeProvider, k.pub_key.clone())))
            .ok_or("no code provider key provisioned")?;
        let bundle = CodeBundle::decode(&job.code).map_err(|e| e.to_string())?;
        let (entry_point, _) = bundle.entry_point().ok_or("bundle has no entry point")?;
        let files = bundle.open(code_key).map_err(|e| e.to_string())?;
        debug!(
            "decrypted code bundle: {} file(s), entry point {}",
            files.len(),
            entry_point
        );

        // identity program: output = concatenation of the decrypted inputs
        let mut output = Vec::new();
        for (provider, ciphertext) in &job.data {
            let key = keys
                .get(&(Role::DataProvider, provider.clone()))
                .ok_or("data provider key not provisioned")?;
            output.extend(key.decrypt(ciphertext).map_err(|e| e.to_string())?);
        }

        let mut results = BTreeMap::new();
        for consumer in &job.consumers {
            let key = keys
                .get(&(Role::ResultConsumer, consumer.clone()))
                .ok_or("result consumer key not provisioned")?;
            results.insert(
                consumer.clone(),
                key.encrypt(&output).map_err(|e| e.to_string())?,
            );
        }

        Ok(RunOutcome {
            exit_code: 0,
            stdout: format!(
                "processed {} input(s), {} byte(s)",
                job.data.len(),
                output.len()
            ),
            stderr: String::new(),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use cinnabar_crypto::{quote::verify_quote, seal::seal, SymmetricKey};

    use super::*;
    use crate::state::SealedKey;

    #[tokio::test]
    async fn launch_publishes_a_verifiable_identity() {
        let enclave = MockEnclave::new([7; 32]);
        let identity = enclave.launch(ComputationId::generate()).await.unwrap();
        verify_quote(&identity.quote, &[7; 32], &identity.pub_key).unwrap();
    }

    #[tokio::test]
    async fn execute_runs_the_identity_program() {
        let enclave = MockEnclave::new([7; 32]);
        let computation = ComputationId::generate();
        let identity = enclave.launch(computation).await.unwrap();

        let code_key = SymmetricKey::generate();
        let data_key = SymmetricKey::generate();
        let consumer_key = SymmetricKey::generate();

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.py"), b"# entry").unwrap();
        std::fs::write(dir.path().join("helper.py"), b"# secret").unwrap();
        let bundle =
            CodeBundle::build(dir.path(), std::path::Path::new("main.py"), &code_key).unwrap();

        let job = RunJob {
            computation,
            code: bundle.encode().unwrap(),
            data: vec![(vec![2; 33], data_key.encrypt(b"input bytes").unwrap())],
            sealed_keys: vec![
                SealedKey {
                    role: Role::CodeProvider,
                    pub_key: vec![1; 33],
                    sealed: seal(&identity.pub_key, &code_key).unwrap(),
                },
                SealedKey {
                    role: Role::DataProvider,
                    pub_key: vec![2; 33],
                    sealed: seal(&identity.pub_key, &data_key).unwrap(),
                },
                SealedKey {
                    role: Role::ResultConsumer,
                    pub_key: vec![3; 33],
                    sealed: seal(&identity.pub_key, &consumer_key).unwrap(),
                },
            ],
            consumers: vec![vec![3; 33]],
        };

        let outcome = enclave.execute(job).await.unwrap();
        assert_eq!(outcome.exit_code, 0);

        let blob = outcome.results.get(&vec![3u8; 33]).unwrap();
        assert_eq!(consumer_key.decrypt(blob).unwrap(), b"input bytes");
    }

    #[tokio::test]
    async fn failing_mock_reports_exit_code_and_stderr() {
        let enclave = MockEnclave::failing([7; 32], 1, "Traceback: boom");
        let computation = ComputationId::generate();
        enclave.launch(computation).await.unwrap();

        let outcome = enclave
            .execute(RunJob {
                computation,
                code: Vec::new(),
                data: Vec::new(),
                sealed_keys: Vec::new(),
                consumers: Vec::new(),
            })
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, 1);
        assert_eq!(outcome.stderr, "Traceback: boom");
    }
}
