//! Domain state of a computation: participants, lifecycle phases, the
//! enclave identity, sealed keys, and runs.
//!
//! All mutation goes through [`Computation`]'s methods; the store serializes
//! access to them, which makes the registry the sole arbiter of ordering.
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    str::FromStr,
};

use cinnabar_crypto::Measurement;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::Error,
    launcher::RunJob,
    types::RunFailure,
    upload::{PayloadKind, UploadId, UploadSession},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComputationId(Uuid);

impl ComputationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for ComputationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ComputationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RunId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A capability a participant holds within one computation. A single identity
/// may register for several roles; each (role, identity) pair is distinct.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    CodeProvider,
    DataProvider,
    ResultConsumer,
}

impl Role {
    /// Whether this role provisions a sealed payload key. The owner
    /// administers the computation but holds no payload.
    pub fn holds_payload_key(&self) -> bool {
        !matches!(self, Role::Owner)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Owner => "owner",
            Role::CodeProvider => "code_provider",
            Role::DataProvider => "data_provider",
            Role::ResultConsumer => "result_consumer",
        };
        write!(f, "{}", name)
    }
}

/// Lifecycle of a computation. Transitions are strictly ordered; the only
/// branch is `Created | Registering -> Abandoned`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Created,
    Registering,
    Approved,
    CodeUploaded,
    KeysProvisioned,
    Running,
    Completed,
    Failed,
    Abandoned,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed | Phase::Abandoned)
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Created => "created",
            Phase::Registering => "registering",
            Phase::Approved => "approved",
            Phase::CodeUploaded => "code_uploaded",
            Phase::KeysProvisioned => "keys_provisioned",
            Phase::Running => "running",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
            Phase::Abandoned => "abandoned",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub role: Role,
    pub pub_key: Vec<u8>,
    pub approved: bool,
}

/// The enclave's published identity: public key plus attestation quote.
/// Recorded once when the enclave boots and immutable thereafter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnclaveIdentity {
    pub pub_key: Vec<u8>,
    pub quote: Vec<u8>,
    pub measurement: Measurement,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedKey {
    pub role: Role,
    pub pub_key: Vec<u8>,
    pub sealed: Vec<u8>,
}

/// Outcome of a finished run. `results` maps each result consumer's public
/// key to the result blob encrypted under that consumer's provisioned key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunRecord {
    pub id: RunId,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub results: BTreeMap<Vec<u8>, Vec<u8>>,
}

#[derive(Clone, Debug)]
pub struct Computation {
    id: ComputationId,
    name: String,
    phase: Phase,
    declared_roles: Vec<Role>,
    participants: Vec<Participant>,
    enclave: Option<EnclaveIdentity>,
    uploads: BTreeMap<UploadId, UploadSession>,
    code_payload: Option<Vec<u8>>,
    data_payloads: BTreeMap<Vec<u8>, Vec<u8>>,
    sealed_keys: Vec<SealedKey>,
    current_run: Option<RunId>,
    history: Vec<RunRecord>,
}

impl Computation {
    /// Creates a computation. The owner is registered implicitly; the
    /// declared role list covers everyone else and must name exactly one
    /// code provider and at least one data provider and result consumer.
    pub fn create(
        id: ComputationId,
        name: String,
        owner_pub_key: Vec<u8>,
        declared_roles: Vec<Role>,
    ) -> Result<Self, Error> {
        if declared_roles.contains(&Role::Owner) {
            return Err(Error::InvalidRoles(
                "the owner role is implicit and cannot be declared".to_string(),
            ));
        }
        let count = |role| declared_roles.iter().filter(|r| **r == role).count();
        if count(Role::CodeProvider) != 1 {
            return Err(Error::InvalidRoles(
                "exactly one code provider is required".to_string(),
            ));
        }
        if count(Role::DataProvider) == 0 {
            return Err(Error::InvalidRoles(
                "at least one data provider is required".to_string(),
            ));
        }
        if count(Role::ResultConsumer) == 0 {
            return Err(Error::InvalidRoles(
                "at least one result consumer is required".to_string(),
            ));
        }

        Ok(Self {
            id,
            name,
            phase: Phase::Created,
            declared_roles,
            participants: vec![Participant {
                role: Role::Owner,
                pub_key: owner_pub_key,
                approved: true,
            }],
            enclave: None,
            uploads: BTreeMap::new(),
            code_payload: None,
            data_payloads: BTreeMap::new(),
            sealed_keys: Vec::new(),
            current_run: None,
            history: Vec::new(),
        })
    }

    pub fn id(&self) -> ComputationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn declared_roles(&self) -> &[Role] {
        &self.declared_roles
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn enclave(&self) -> Option<&EnclaveIdentity> {
        self.enclave.as_ref()
    }

    pub fn current_run(&self) -> Option<RunId> {
        self.current_run
    }

    pub fn history(&self) -> &[RunRecord] {
        &self.history
    }

    fn participant(&self, role: Role, pub_key: &[u8]) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.role == role && p.pub_key == pub_key)
    }

    fn transition(&mut self, from: Phase, to: Phase) -> Result<(), Error> {
        if self.phase != from {
            return Err(Error::InvalidStateTransition {
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        Ok(())
    }

    /// Registers `pub_key` for `role`. Exactly one registration can win each
    /// declared slot; the same identity cannot take a role twice.
    pub fn register(&mut self, role: Role, pub_key: Vec<u8>) -> Result<(), Error> {
        if !matches!(self.phase, Phase::Created | Phase::Registering) {
            return Err(Error::InvalidStateTransition {
                from: self.phase,
                to: Phase::Registering,
            });
        }

        let declared = self.declared_roles.iter().filter(|r| **r == role).count();
        let taken = self.participants.iter().filter(|p| p.role == role).count();
        if role == Role::Owner || taken >= declared {
            return Err(Error::DuplicateRole(role));
        }
        if self.participant(role, &pub_key).is_some() {
            return Err(Error::DuplicateRole(role));
        }

        self.participants.push(Participant {
            role,
            pub_key,
            approved: false,
        });
        if self.phase == Phase::Created {
            self.phase = Phase::Registering;
        }
        Ok(())
    }

    /// Owner-only. Succeeds only once every declared slot is filled.
    pub fn approve(&mut self, owner_pub_key: &[u8]) -> Result<(), Error> {
        if !matches!(self.phase, Phase::Created | Phase::Registering) {
            return Err(Error::InvalidStateTransition {
                from: self.phase,
                to: Phase::Approved,
            });
        }
        if self.participant(Role::Owner, owner_pub_key).is_none() {
            return Err(Error::Unauthorized);
        }

        let missing: Vec<Role> = self
            .declared_roles
            .iter()
            .copied()
            .filter(|role| {
                let declared = self.declared_roles.iter().filter(|r| *r == role).count();
                let taken = self.participants.iter().filter(|p| p.role == *role).count();
                taken < declared
            })
            .collect();
        if !missing.is_empty() {
            return Err(Error::RolesUnfilled { missing });
        }

        for participant in &mut self.participants {
            participant.approved = true;
        }
        self.phase = Phase::Approved;
        Ok(())
    }

    /// A participant may walk away before approval; afterwards the
    /// computation is committed and abandonment is rejected.
    pub fn abandon(&mut self, pub_key: &[u8]) -> Result<(), Error> {
        if !matches!(self.phase, Phase::Created | Phase::Registering) {
            return Err(Error::InvalidStateTransition {
                from: self.phase,
                to: Phase::Abandoned,
            });
        }
        if !self.participants.iter().any(|p| p.pub_key == pub_key) {
            return Err(Error::UnknownParticipant);
        }
        self.phase = Phase::Abandoned;
        Ok(())
    }

    /// Records the booted enclave's identity. Immutable once set.
    pub fn record_enclave_identity(&mut self, identity: EnclaveIdentity) -> Result<(), Error> {
        if self.phase != Phase::Approved || self.enclave.is_some() {
            return Err(Error::InvalidStateTransition {
                from: self.phase,
                to: Phase::Approved,
            });
        }
        self.enclave = Some(identity);
        Ok(())
    }

    /// Opens an upload session for a payload. Code may only be uploaded by
    /// the code provider after approval; data by a data provider until the
    /// run's keys start arriving.
    pub fn begin_upload(
        &mut self,
        kind: PayloadKind,
        pub_key: Vec<u8>,
        total_len: u64,
        digest: [u8; 32],
    ) -> Result<UploadId, Error> {
        match kind {
            PayloadKind::Code => {
                self.participant(Role::CodeProvider, &pub_key)
                    .ok_or(Error::UnknownParticipant)?;
                if self.code_payload.is_some() {
                    return Err(Error::AlreadyUploaded(Role::CodeProvider));
                }
                if self.phase != Phase::Approved {
                    return Err(Error::InvalidStateTransition {
                        from: self.phase,
                        to: Phase::CodeUploaded,
                    });
                }
            }
            PayloadKind::Data => {
                self.participant(Role::DataProvider, &pub_key)
                    .ok_or(Error::UnknownParticipant)?;
                if self.data_payloads.contains_key(&pub_key) {
                    return Err(Error::AlreadyUploaded(Role::DataProvider));
                }
                if !matches!(self.phase, Phase::Approved | Phase::CodeUploaded) {
                    return Err(Error::InvalidStateTransition {
                        from: self.phase,
                        to: Phase::CodeUploaded,
                    });
                }
            }
        }

        let id = UploadId::generate();
        self.uploads
            .insert(id, UploadSession::new(kind, pub_key, total_len, digest));
        Ok(id)
    }

    pub fn upload(&self, id: UploadId) -> Result<&UploadSession, Error> {
        self.uploads.get(&id).ok_or(Error::UnknownUpload(id))
    }

    pub fn upload_chunk(&mut self, id: UploadId, seq: u64, bytes: Vec<u8>) -> Result<(), Error> {
        self.uploads
            .get_mut(&id)
            .ok_or(Error::UnknownUpload(id))?
            .insert_chunk(seq, bytes)
    }

    /// Verifies and commits an upload session. Only a committed payload is
    /// visible to provisioning and runs — a half-uploaded payload never is.
    pub fn commit_upload(&mut self, id: UploadId) -> Result<PayloadKind, Error> {
        let session = self.uploads.get_mut(&id).ok_or(Error::UnknownUpload(id))?;
        let kind = session.kind();
        let owner = session.owner().to_vec();
        let payload = session.commit()?;

        match kind {
            PayloadKind::Code => {
                self.code_payload = Some(payload);
                self.transition(Phase::Approved, Phase::CodeUploaded)?;
            }
            PayloadKind::Data => {
                self.data_payloads.insert(owner, payload);
            }
        }
        Ok(kind)
    }

    /// Accepts a sealed payload key. Ordering invariants: the enclave
    /// identity must exist, the code payload must be committed, and the
    /// caller's own payload must be committed. Re-submission for an already
    /// provisioned (participant, role) is rejected without side effects.
    ///
    /// Returns `true` when this key completes the barrier — every registered
    /// payload-key role has provisioned — which auto-starts the run.
    pub fn provision_key(
        &mut self,
        role: Role,
        pub_key: Vec<u8>,
        sealed: Vec<u8>,
    ) -> Result<bool, Error> {
        if self
            .sealed_keys
            .iter()
            .any(|k| k.role == role && k.pub_key == pub_key)
        {
            return Err(Error::AlreadyProvisioned(role));
        }
        if !role.holds_payload_key() {
            return Err(Error::Unauthorized);
        }
        self.participant(role, &pub_key)
            .ok_or(Error::UnknownParticipant)?;
        if self.phase != Phase::CodeUploaded {
            return Err(Error::InvalidStateTransition {
                from: self.phase,
                to: Phase::KeysProvisioned,
            });
        }
        if self.enclave.is_none() {
            return Err(Error::EnclaveIdentityMissing);
        }
        if role == Role::DataProvider && !self.data_payloads.contains_key(&pub_key) {
            return Err(Error::PayloadNotUploaded(role));
        }

        self.sealed_keys.push(SealedKey {
            role,
            pub_key,
            sealed,
        });

        let barrier_complete = self.all_keys_provisioned();
        if barrier_complete {
            self.transition(Phase::CodeUploaded, Phase::KeysProvisioned)?;
        }
        Ok(barrier_complete)
    }

    pub fn all_keys_provisioned(&self) -> bool {
        self.participants
            .iter()
            .filter(|p| p.role.holds_payload_key())
            .all(|p| {
                self.sealed_keys
                    .iter()
                    .any(|k| k.role == p.role && k.pub_key == p.pub_key)
            })
    }

    /// Transitions to `Running` and snapshots everything the enclave needs.
    pub fn begin_run(&mut self, run_id: RunId) -> Result<RunJob, Error> {
        self.transition(Phase::KeysProvisioned, Phase::Running)?;
        self.current_run = Some(run_id);

        Ok(RunJob {
            computation: self.id,
            code: self
                .code_payload
                .clone()
                .expect("code payload exists in KeysProvisioned"),
            data: self
                .data_payloads
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            sealed_keys: self.sealed_keys.clone(),
            consumers: self
                .participants
                .iter()
                .filter(|p| p.role == Role::ResultConsumer)
                .map(|p| p.pub_key.clone())
                .collect(),
        })
    }

    /// Records a finished run. Exit code 0 completes the computation; any
    /// other exit code is fatal — the registry never re-executes user code.
    pub fn complete_run(&mut self, record: RunRecord) -> Result<(), Error> {
        let to = if record.exit_code == 0 {
            Phase::Completed
        } else {
            Phase::Failed
        };
        self.transition(Phase::Running, to)?;
        self.current_run = None;
        self.history.push(record);
        Ok(())
    }

    /// The caller's encrypted result blob, once the run is terminal.
    pub fn result_for(&self, pub_key: &[u8]) -> Result<Vec<u8>, Error> {
        match self.phase {
            Phase::Completed => {
                let record = self.history.last().expect("completed run is recorded");
                record
                    .results
                    .get(pub_key)
                    .cloned()
                    .ok_or(Error::Unauthorized)
            }
            Phase::Failed => {
                let record = self.history.last().expect("failed run is recorded");
                Err(Error::RunFailed(RunFailure {
                    exit_code: record.exit_code,
                    stdout: record.stdout.clone(),
                    stderr: record.stderr.clone(),
                }))
            }
            _ => Err(Error::ResultNotReady),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(tag: u8) -> Vec<u8> {
        vec![tag; 33]
    }

    fn computation() -> Computation {
        Computation::create(
            ComputationId::generate(),
            "test".to_string(),
            pk(0),
            vec![Role::CodeProvider, Role::DataProvider, Role::ResultConsumer],
        )
        .unwrap()
    }

    fn approved_computation() -> Computation {
        let mut c = computation();
        c.register(Role::CodeProvider, pk(1)).unwrap();
        c.register(Role::DataProvider, pk(2)).unwrap();
        c.register(Role::ResultConsumer, pk(3)).unwrap();
        c.approve(&pk(0)).unwrap();
        c.record_enclave_identity(EnclaveIdentity {
            pub_key: pk(9),
            quote: vec![0; 64],
            measurement: [0; 32],
        })
        .unwrap();
        c
    }

    fn upload(c: &mut Computation, kind: PayloadKind, owner: Vec<u8>, payload: &[u8]) {
        use sha2::{Digest, Sha256};
        let digest: [u8; 32] = Sha256::digest(payload).into();
        let id = c
            .begin_upload(kind, owner, payload.len() as u64, digest)
            .unwrap();
        c.upload_chunk(id, 0, payload.to_vec()).unwrap();
        c.commit_upload(id).unwrap();
    }

    #[test]
    fn owner_role_cannot_be_declared() {
        assert!(matches!(
            Computation::create(
                ComputationId::generate(),
                "bad".to_string(),
                pk(0),
                vec![Role::Owner, Role::CodeProvider],
            ),
            Err(Error::InvalidRoles(_))
        ));
    }

    #[test]
    fn register_fills_slots_exactly_once() {
        let mut c = computation();
        c.register(Role::DataProvider, pk(2)).unwrap();
        assert_eq!(c.phase(), Phase::Registering);

        // the single data-provider slot is taken
        assert!(matches!(
            c.register(Role::DataProvider, pk(4)),
            Err(Error::DuplicateRole(Role::DataProvider))
        ));
    }

    #[test]
    fn same_identity_cannot_take_a_role_twice() {
        let mut c = Computation::create(
            ComputationId::generate(),
            "multi".to_string(),
            pk(0),
            vec![
                Role::CodeProvider,
                Role::DataProvider,
                Role::DataProvider,
                Role::ResultConsumer,
            ],
        )
        .unwrap();
        c.register(Role::DataProvider, pk(2)).unwrap();
        assert!(matches!(
            c.register(Role::DataProvider, pk(2)),
            Err(Error::DuplicateRole(Role::DataProvider))
        ));
        // a second, distinct provider still fits
        c.register(Role::DataProvider, pk(4)).unwrap();
    }

    #[test]
    fn approve_requires_all_slots_filled() {
        let mut c = computation();
        c.register(Role::CodeProvider, pk(1)).unwrap();
        assert!(matches!(
            c.approve(&pk(0)),
            Err(Error::RolesUnfilled { .. })
        ));
    }

    #[test]
    fn approve_requires_the_owner() {
        let mut c = computation();
        c.register(Role::CodeProvider, pk(1)).unwrap();
        c.register(Role::DataProvider, pk(2)).unwrap();
        c.register(Role::ResultConsumer, pk(3)).unwrap();
        assert!(matches!(c.approve(&pk(1)), Err(Error::Unauthorized)));
        c.approve(&pk(0)).unwrap();
        assert_eq!(c.phase(), Phase::Approved);
        assert!(c.participants().iter().all(|p| p.approved));
    }

    #[test]
    fn registration_closes_after_approval() {
        let mut c = approved_computation();
        assert!(matches!(
            c.register(Role::DataProvider, pk(4)),
            Err(Error::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn abandon_only_before_approval() {
        let mut c = computation();
        c.register(Role::CodeProvider, pk(1)).unwrap();
        c.abandon(&pk(1)).unwrap();
        assert_eq!(c.phase(), Phase::Abandoned);

        let mut c = approved_computation();
        assert!(matches!(
            c.abandon(&pk(0)),
            Err(Error::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn enclave_identity_is_immutable() {
        let mut c = approved_computation();
        assert!(matches!(
            c.record_enclave_identity(EnclaveIdentity {
                pub_key: pk(8),
                quote: vec![1; 64],
                measurement: [1; 32],
            }),
            Err(Error::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn no_provisioning_before_enclave_identity() {
        let mut c = computation();
        c.register(Role::CodeProvider, pk(1)).unwrap();
        c.register(Role::DataProvider, pk(2)).unwrap();
        c.register(Role::ResultConsumer, pk(3)).unwrap();

        // still registering: no identity, no code
        assert!(c.provision_key(Role::ResultConsumer, pk(3), vec![1]).is_err());
    }

    #[test]
    fn no_provisioning_before_code_upload() {
        let mut c = approved_computation();
        assert!(matches!(
            c.provision_key(Role::ResultConsumer, pk(3), vec![1]),
            Err(Error::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn data_provider_must_upload_before_provisioning() {
        let mut c = approved_computation();
        upload(&mut c, PayloadKind::Code, pk(1), b"bundle");
        assert!(matches!(
            c.provision_key(Role::DataProvider, pk(2), vec![1]),
            Err(Error::PayloadNotUploaded(Role::DataProvider))
        ));
    }

    #[test]
    fn provisioning_is_idempotent_once() {
        let mut c = approved_computation();
        upload(&mut c, PayloadKind::Code, pk(1), b"bundle");
        assert!(!c.provision_key(Role::CodeProvider, pk(1), vec![1]).unwrap());
        assert!(matches!(
            c.provision_key(Role::CodeProvider, pk(1), vec![2]),
            Err(Error::AlreadyProvisioned(Role::CodeProvider))
        ));
        // the rejected re-send left no side effects
        assert_eq!(
            c.sealed_keys
                .iter()
                .filter(|k| k.role == Role::CodeProvider)
                .count(),
            1
        );
        assert_eq!(c.sealed_keys[0].sealed, vec![1]);
    }

    #[test]
    fn barrier_completes_with_the_last_key() {
        let mut c = approved_computation();
        upload(&mut c, PayloadKind::Code, pk(1), b"bundle");
        upload(&mut c, PayloadKind::Data, pk(2), b"data");

        assert!(!c.provision_key(Role::CodeProvider, pk(1), vec![1]).unwrap());
        assert!(!c.provision_key(Role::DataProvider, pk(2), vec![2]).unwrap());
        assert_eq!(c.phase(), Phase::CodeUploaded);

        assert!(c.provision_key(Role::ResultConsumer, pk(3), vec![3]).unwrap());
        assert_eq!(c.phase(), Phase::KeysProvisioned);
    }

    #[test]
    fn run_lifecycle_and_result_routing() {
        let mut c = approved_computation();
        upload(&mut c, PayloadKind::Code, pk(1), b"bundle");
        upload(&mut c, PayloadKind::Data, pk(2), b"data");
        c.provision_key(Role::CodeProvider, pk(1), vec![1]).unwrap();
        c.provision_key(Role::DataProvider, pk(2), vec![2]).unwrap();
        c.provision_key(Role::ResultConsumer, pk(3), vec![3])
            .unwrap();

        assert!(matches!(c.result_for(&pk(3)), Err(Error::ResultNotReady)));

        let run_id = RunId::generate();
        let job = c.begin_run(run_id).unwrap();
        assert_eq!(c.phase(), Phase::Running);
        assert_eq!(c.current_run(), Some(run_id));
        assert_eq!(job.consumers, vec![pk(3)]);

        c.complete_run(RunRecord {
            id: run_id,
            exit_code: 0,
            stdout: "ok".to_string(),
            stderr: String::new(),
            results: [(pk(3), vec![42])].into_iter().collect(),
        })
        .unwrap();

        assert_eq!(c.phase(), Phase::Completed);
        assert_eq!(c.current_run(), None);
        assert_eq!(c.history().len(), 1);
        assert_eq!(c.result_for(&pk(3)).unwrap(), vec![42]);
        // only consumers with a blob may fetch
        assert!(matches!(c.result_for(&pk(2)), Err(Error::Unauthorized)));
    }

    #[test]
    fn failed_run_surfaces_exit_code_and_streams() {
        let mut c = approved_computation();
        upload(&mut c, PayloadKind::Code, pk(1), b"bundle");
        upload(&mut c, PayloadKind::Data, pk(2), b"data");
        c.provision_key(Role::CodeProvider, pk(1), vec![1]).unwrap();
        c.provision_key(Role::DataProvider, pk(2), vec![2]).unwrap();
        c.provision_key(Role::ResultConsumer, pk(3), vec![3])
            .unwrap();

        let run_id = RunId::generate();
        c.begin_run(run_id).unwrap();
        c.complete_run(RunRecord {
            id: run_id,
            exit_code: 1,
            stdout: String::new(),
            stderr: "boom".to_string(),
            results: BTreeMap::new(),
        })
        .unwrap();

        assert_eq!(c.phase(), Phase::Failed);
        match c.result_for(&pk(3)) {
            Err(Error::RunFailed(failure)) => {
                assert_eq!(failure.exit_code, 1);
                assert_eq!(failure.stderr, "boom");
            }
            other => panic!("expected RunFailed, got {:?}", other.map(|_| ())),
        }
    }
}
