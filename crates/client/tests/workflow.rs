//! End-to-end workflow scenarios against an in-process registry backed by
//! the mock enclave.
use std::{fs, time::Duration};

use cinnabar_client::{
    CryptoContext, Error, LocalRegistryClient, Participant, PollOpts, RegistryClient,
};
use cinnabar_crypto::Measurement;
use cinnabar_registry_core::{
    launcher::mock::MockEnclave,
    state::{Phase, Role},
    store::default::SharedStore,
    types::{UploadBeginRequest, UploadChunkRequest},
    upload::PayloadKind,
    DefaultRegistry,
};
use sha2::{Digest, Sha256};

const MEASUREMENT: Measurement = [7u8; 32];

type LocalClient = LocalRegistryClient<DefaultRegistry<MockEnclave, SharedStore>>;

fn local_client(launcher: MockEnclave) -> LocalClient {
    LocalRegistryClient::new(DefaultRegistry::new(launcher, SharedStore::new()))
}

fn participant(client: &LocalClient) -> Participant<LocalClient> {
    Participant::new(client.clone(), CryptoContext::generate())
}

fn poll_opts() -> PollOpts {
    PollOpts {
        interval: Duration::from_millis(20),
        timeout: Duration::from_secs(10),
    }
}

fn code_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.py"), b"import process\nprocess.run()").unwrap();
    fs::write(dir.path().join("process.py"), b"def run(): ...").unwrap();
    dir
}

struct Parties {
    owner: Participant<LocalClient>,
    code_provider: Participant<LocalClient>,
    data_provider: Participant<LocalClient>,
    result_consumer: Participant<LocalClient>,
}

impl Parties {
    fn new(client: &LocalClient) -> Self {
        Self {
            owner: participant(client),
            code_provider: participant(client),
            data_provider: participant(client),
            result_consumer: participant(client),
        }
    }
}

async fn registered_and_approved(parties: &Parties) -> cinnabar_registry_core::state::ComputationId {
    let id = parties
        .owner
        .create_computation(
            "credit-scoring",
            vec![Role::CodeProvider, Role::DataProvider, Role::ResultConsumer],
        )
        .await
        .unwrap();

    parties
        .code_provider
        .register(id, Role::CodeProvider)
        .await
        .unwrap();
    parties
        .data_provider
        .register(id, Role::DataProvider)
        .await
        .unwrap();
    parties
        .result_consumer
        .register(id, Role::ResultConsumer)
        .await
        .unwrap();

    assert_eq!(parties.owner.approve(id).await.unwrap(), Phase::Approved);
    id
}

#[tokio::test]
async fn full_workflow_produces_a_decryptable_result() {
    let client = local_client(MockEnclave::new(MEASUREMENT));
    let parties = Parties::new(&client);
    let id = registered_and_approved(&parties).await;

    // every key-holding participant verifies the enclave independently
    let cp_enclave = parties
        .code_provider
        .wait_for_enclave(id, &MEASUREMENT, poll_opts())
        .await
        .unwrap();
    let dp_enclave = parties
        .data_provider
        .wait_for_enclave(id, &MEASUREMENT, poll_opts())
        .await
        .unwrap();
    let rc_enclave = parties
        .result_consumer
        .wait_for_enclave(id, &MEASUREMENT, poll_opts())
        .await
        .unwrap();

    let code = code_dir();
    parties
        .code_provider
        .upload_code(id, code.path(), std::path::Path::new("main.py"))
        .await
        .unwrap();

    let data_file = tempfile::NamedTempFile::new().unwrap();
    fs::write(data_file.path(), b"alice,720\nbob,680\n").unwrap();
    parties
        .data_provider
        .upload_data(id, data_file.path())
        .await
        .unwrap();

    // the run starts only with the last sealed key
    assert!(!parties
        .code_provider
        .provision_key(id, Role::CodeProvider, &cp_enclave)
        .await
        .unwrap());
    assert!(!parties
        .data_provider
        .provision_key(id, Role::DataProvider, &dp_enclave)
        .await
        .unwrap());
    assert!(parties
        .result_consumer
        .provision_key(id, Role::ResultConsumer, &rc_enclave)
        .await
        .unwrap());

    let result = parties
        .result_consumer
        .wait_for_result(id, poll_opts())
        .await
        .unwrap();
    assert_eq!(result, b"alice,720\nbob,680\n");

    let status = parties.result_consumer.run_status(id).await.unwrap();
    assert_eq!(status.phase, Phase::Completed);
    assert_eq!(status.current_run, None);
    assert_eq!(status.history.len(), 1);
    assert_eq!(status.history[0].exit_code, 0);
}

#[tokio::test]
async fn no_provisioning_before_code_upload() {
    let client = local_client(MockEnclave::new(MEASUREMENT));
    let parties = Parties::new(&client);
    let id = registered_and_approved(&parties).await;

    let enclave = parties
        .result_consumer
        .wait_for_enclave(id, &MEASUREMENT, poll_opts())
        .await
        .unwrap();

    // enclave identity exists, but the code payload does not
    let err = parties
        .result_consumer
        .provision_key(id, Role::ResultConsumer, &enclave)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Registry(_)));
}

#[tokio::test]
async fn attestation_mismatch_releases_no_keys() {
    let client = local_client(MockEnclave::new(MEASUREMENT));
    let parties = Parties::new(&client);
    let id = registered_and_approved(&parties).await;

    // the enclave's measurement does not match what this participant expects
    let err = parties
        .data_provider
        .wait_for_enclave(id, &[8u8; 32], poll_opts())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AttestationMismatch));

    // nothing was provisioned; the computation is parked pre-upload
    let status = parties.owner.status(id).await.unwrap();
    assert_eq!(status.phase, Phase::Approved);
}

#[tokio::test]
async fn failed_run_surfaces_exit_code_and_never_a_result() {
    let client = local_client(MockEnclave::failing(MEASUREMENT, 1, "Traceback: boom"));
    let parties = Parties::new(&client);
    let id = registered_and_approved(&parties).await;

    let cp_enclave = parties
        .code_provider
        .wait_for_enclave(id, &MEASUREMENT, poll_opts())
        .await
        .unwrap();
    let dp_enclave = parties
        .data_provider
        .wait_for_enclave(id, &MEASUREMENT, poll_opts())
        .await
        .unwrap();
    let rc_enclave = parties
        .result_consumer
        .wait_for_enclave(id, &MEASUREMENT, poll_opts())
        .await
        .unwrap();

    let code = code_dir();
    parties
        .code_provider
        .upload_code(id, code.path(), std::path::Path::new("main.py"))
        .await
        .unwrap();
    let data_file = tempfile::NamedTempFile::new().unwrap();
    fs::write(data_file.path(), b"rows").unwrap();
    parties
        .data_provider
        .upload_data(id, data_file.path())
        .await
        .unwrap();

    parties
        .code_provider
        .provision_key(id, Role::CodeProvider, &cp_enclave)
        .await
        .unwrap();
    parties
        .data_provider
        .provision_key(id, Role::DataProvider, &dp_enclave)
        .await
        .unwrap();
    parties
        .result_consumer
        .provision_key(id, Role::ResultConsumer, &rc_enclave)
        .await
        .unwrap();

    let err = parties
        .result_consumer
        .wait_for_result(id, poll_opts())
        .await
        .unwrap_err();
    match err {
        Error::RunFailed(failure) => {
            assert_eq!(failure.exit_code, 1);
            assert_eq!(failure.stderr, "Traceback: boom");
        }
        other => panic!("expected RunFailed, got {other:?}"),
    }

    let status = parties.owner.run_status(id).await.unwrap();
    assert_eq!(status.phase, Phase::Failed);
    assert_eq!(status.history.len(), 1);
    assert_eq!(status.history[0].exit_code, 1);
}

#[tokio::test]
async fn duplicate_role_registration_is_rejected() {
    let client = local_client(MockEnclave::new(MEASUREMENT));
    let owner = participant(&client);
    let first = participant(&client);
    let second = participant(&client);

    let id = owner
        .create_computation(
            "dup",
            vec![Role::CodeProvider, Role::DataProvider, Role::ResultConsumer],
        )
        .await
        .unwrap();

    first.register(id, Role::DataProvider).await.unwrap();
    let err = second.register(id, Role::DataProvider).await.unwrap_err();
    assert!(matches!(err, Error::Registry(message) if message.contains("already filled")));
}

#[tokio::test]
async fn resending_a_sealed_key_is_rejected_without_side_effects() {
    let client = local_client(MockEnclave::new(MEASUREMENT));
    let parties = Parties::new(&client);
    let id = registered_and_approved(&parties).await;

    let enclave = parties
        .code_provider
        .wait_for_enclave(id, &MEASUREMENT, poll_opts())
        .await
        .unwrap();
    let code = code_dir();
    parties
        .code_provider
        .upload_code(id, code.path(), std::path::Path::new("main.py"))
        .await
        .unwrap();

    assert!(!parties
        .code_provider
        .provision_key(id, Role::CodeProvider, &enclave)
        .await
        .unwrap());

    let err = parties
        .code_provider
        .provision_key(id, Role::CodeProvider, &enclave)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Registry(message) if message.contains("already provisioned")));

    // the barrier did not move: the run is still waiting on the other keys
    let status = parties.owner.run_status(id).await.unwrap();
    assert_eq!(status.phase, Phase::CodeUploaded);
}

#[tokio::test]
async fn interrupted_upload_resumes_and_commits() {
    let client = local_client(MockEnclave::new(MEASUREMENT));
    let parties = Parties::new(&client);
    let id = registered_and_approved(&parties).await;

    let payload: Vec<u8> = (0..200_000).map(|i| (i % 256) as u8).collect();
    let digest: [u8; 32] = Sha256::digest(&payload).into();

    let begin = client
        .upload_begin(UploadBeginRequest {
            computation_id: id,
            kind: PayloadKind::Data,
            pub_key: parties.data_provider.public_key(),
            total_len: payload.len() as u64,
            digest,
        })
        .await
        .unwrap();
    let chunk_size = begin.chunk_size as usize;
    assert_eq!(payload.len().div_ceil(chunk_size), 4);

    // only half of the chunks arrive before the "interruption"
    for seq in [0u64, 2] {
        let start = seq as usize * chunk_size;
        let end = usize::min(start + chunk_size, payload.len());
        client
            .upload_chunk(UploadChunkRequest {
                computation_id: id,
                upload_id: begin.upload_id,
                seq,
                bytes: payload[start..end].to_vec(),
            })
            .await
            .unwrap();
    }

    // a half-uploaded payload is never committable
    let err = client
        .upload_commit(id, begin.upload_id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Registry(message) if message.contains("incomplete")));

    let status = client.upload_status(id, begin.upload_id).await.unwrap();
    assert_eq!(status.missing, vec![1, 3]);

    for seq in status.missing {
        let start = seq as usize * chunk_size;
        let end = usize::min(start + chunk_size, payload.len());
        client
            .upload_chunk(UploadChunkRequest {
                computation_id: id,
                upload_id: begin.upload_id,
                seq,
                bytes: payload[start..end].to_vec(),
            })
            .await
            .unwrap();
    }
    client.upload_commit(id, begin.upload_id).await.unwrap();
}

#[tokio::test]
async fn waiting_for_an_unbooted_enclave_times_out() {
    let client = local_client(MockEnclave::new(MEASUREMENT));
    let owner = participant(&client);
    let id = owner
        .create_computation(
            "stalled",
            vec![Role::CodeProvider, Role::DataProvider, Role::ResultConsumer],
        )
        .await
        .unwrap();

    // nobody registered, nothing approved: the enclave never boots
    let err = owner
        .wait_for_enclave(
            id,
            &MEASUREMENT,
            PollOpts {
                interval: Duration::from_millis(10),
                timeout: Duration::from_millis(50),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout(..)));
}

#[tokio::test]
async fn abandonment_is_rejected_after_approval() {
    let client = local_client(MockEnclave::new(MEASUREMENT));
    let parties = Parties::new(&client);
    let id = registered_and_approved(&parties).await;

    let err = parties.data_provider.abandon(id).await.unwrap_err();
    assert!(matches!(err, Error::Registry(_)));

    // before approval it is allowed
    let other_id = parties
        .owner
        .create_computation(
            "walk-away",
            vec![Role::CodeProvider, Role::DataProvider, Role::ResultConsumer],
        )
        .await
        .unwrap();
    parties.owner.abandon(other_id).await.unwrap();
    let status = parties.owner.status(other_id).await.unwrap();
    assert_eq!(status.phase, Phase::Abandoned);
}
