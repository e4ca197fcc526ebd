//! Request/response payload types carried in the JSON `message` field of the
//! raw proto messages, plus their raw conversions.
use cinnabar_proto::registry::{
    ComputationAbandonResponse as RawComputationAbandonResponse,
    ComputationCreateResponse as RawComputationCreateResponse,
    ComputationQueryResponse as RawComputationQueryResponse,
    EnclaveIdentityQueryResponse as RawEnclaveIdentityQueryResponse,
    KeyProvisionResponse as RawKeyProvisionResponse,
    ParticipantRegisterResponse as RawParticipantRegisterResponse,
    ParticipantsApproveResponse as RawParticipantsApproveResponse,
    ResultFetchResponse as RawResultFetchResponse, RunStatusQueryResponse as RawRunStatusQueryResponse,
    UploadBeginResponse as RawUploadBeginResponse, UploadChunkResponse as RawUploadChunkResponse,
    UploadCommitResponse as RawUploadCommitResponse, UploadStatusResponse as RawUploadStatusResponse,
};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

use crate::{
    state::{ComputationId, EnclaveIdentity, Participant, Phase, Role, RunId, RunRecord},
    upload::{PayloadKind, UploadId},
};

// requests

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComputationCreateRequest {
    pub name: String,
    pub roles: Vec<Role>,
    #[serde_as(as = "Hex")]
    pub owner_pub_key: Vec<u8>,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRegisterRequest {
    pub computation_id: ComputationId,
    pub role: Role,
    #[serde_as(as = "Hex")]
    pub pub_key: Vec<u8>,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticipantsApproveRequest {
    pub computation_id: ComputationId,
    #[serde_as(as = "Hex")]
    pub owner_pub_key: Vec<u8>,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComputationAbandonRequest {
    pub computation_id: ComputationId,
    #[serde_as(as = "Hex")]
    pub pub_key: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComputationQueryRequest {
    pub computation_id: ComputationId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnclaveIdentityQueryRequest {
    pub computation_id: ComputationId,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadBeginRequest {
    pub computation_id: ComputationId,
    pub kind: PayloadKind,
    #[serde_as(as = "Hex")]
    pub pub_key: Vec<u8>,
    pub total_len: u64,
    #[serde_as(as = "Hex")]
    pub digest: [u8; 32],
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadChunkRequest {
    pub computation_id: ComputationId,
    pub upload_id: UploadId,
    pub seq: u64,
    #[serde_as(as = "Hex")]
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadStatusRequest {
    pub computation_id: ComputationId,
    pub upload_id: UploadId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadCommitRequest {
    pub computation_id: ComputationId,
    pub upload_id: UploadId,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyProvisionRequest {
    pub computation_id: ComputationId,
    pub role: Role,
    #[serde_as(as = "Hex")]
    pub pub_key: Vec<u8>,
    #[serde_as(as = "Hex")]
    pub sealed_key: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunStatusQueryRequest {
    pub computation_id: ComputationId,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultFetchRequest {
    pub computation_id: ComputationId,
    #[serde_as(as = "Hex")]
    pub pub_key: Vec<u8>,
}

// responses

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComputationCreateResponse {
    pub computation_id: ComputationId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRegisterResponse {
    pub computation_id: ComputationId,
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticipantsApproveResponse {
    pub phase: Phase,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComputationAbandonResponse {
    pub phase: Phase,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub role: Role,
    #[serde_as(as = "Hex")]
    pub pub_key: Vec<u8>,
    pub approved: bool,
}

impl From<&Participant> for ParticipantInfo {
    fn from(value: &Participant) -> Self {
        Self {
            role: value.role,
            pub_key: value.pub_key.clone(),
            approved: value.approved,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComputationQueryResponse {
    pub computation_id: ComputationId,
    pub name: String,
    pub phase: Phase,
    pub declared_roles: Vec<Role>,
    pub participants: Vec<ParticipantInfo>,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnclaveIdentityInfo {
    #[serde_as(as = "Hex")]
    pub pub_key: Vec<u8>,
    #[serde_as(as = "Hex")]
    pub quote: Vec<u8>,
    #[serde_as(as = "Hex")]
    pub measurement: [u8; 32],
}

impl From<&EnclaveIdentity> for EnclaveIdentityInfo {
    fn from(value: &EnclaveIdentity) -> Self {
        Self {
            pub_key: value.pub_key.clone(),
            quote: value.quote.clone(),
            measurement: value.measurement,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnclaveIdentityQueryResponse {
    pub identity: Option<EnclaveIdentityInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadBeginResponse {
    pub upload_id: UploadId,
    pub chunk_size: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadChunkResponse {
    pub seq: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadStatusResponse {
    pub chunk_count: u64,
    pub missing: Vec<u64>,
    pub committed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadCommitResponse {
    pub kind: PayloadKind,
    pub phase: Phase,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyProvisionResponse {
    pub run_started: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub id: RunId,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl From<&RunRecord> for RunSummary {
    fn from(value: &RunRecord) -> Self {
        Self {
            id: value.id,
            exit_code: value.exit_code,
            stdout: value.stdout.clone(),
            stderr: value.stderr.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunStatusQueryResponse {
    pub phase: Phase,
    pub current_run: Option<RunId>,
    pub history: Vec<RunSummary>,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultFetchResponse {
    #[serde_as(as = "Hex")]
    pub ciphertext: Vec<u8>,
}

/// Detail payload of a failed run, carried verbatim inside the aborted
/// status so clients can surface exit code and captured streams.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunFailure {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

// raw conversions

macro_rules! impl_raw_response {
    ($domain:ty, $raw:ty) => {
        impl From<$domain> for $raw {
            fn from(value: $domain) -> Self {
                Self {
                    message: serde_json::to_string(&value).expect("infallible serializer"),
                }
            }
        }
    };
}

impl_raw_response!(ComputationCreateResponse, RawComputationCreateResponse);
impl_raw_response!(ParticipantRegisterResponse, RawParticipantRegisterResponse);
impl_raw_response!(ParticipantsApproveResponse, RawParticipantsApproveResponse);
impl_raw_response!(ComputationAbandonResponse, RawComputationAbandonResponse);
impl_raw_response!(ComputationQueryResponse, RawComputationQueryResponse);
impl_raw_response!(EnclaveIdentityQueryResponse, RawEnclaveIdentityQueryResponse);
impl_raw_response!(UploadBeginResponse, RawUploadBeginResponse);
impl_raw_response!(UploadChunkResponse, RawUploadChunkResponse);
impl_raw_response!(UploadStatusResponse, RawUploadStatusResponse);
impl_raw_response!(UploadCommitResponse, RawUploadCommitResponse);
impl_raw_response!(KeyProvisionResponse, RawKeyProvisionResponse);
impl_raw_response!(RunStatusQueryResponse, RawRunStatusQueryResponse);
impl_raw_response!(ResultFetchResponse, RawResultFetchResponse);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_fields_serialize_as_hex() {
        let request = ParticipantRegisterRequest {
            computation_id: ComputationId::generate(),
            role: Role::DataProvider,
            pub_key: vec![0xab, 0xcd],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["pub_key"], "abcd");
        assert_eq!(json["role"], "data_provider");

        let back: ParticipantRegisterRequest =
            serde_json::from_value(json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn responses_wrap_into_raw_messages() {
        let response = KeyProvisionResponse { run_started: true };
        let raw: RawKeyProvisionResponse = response.into();
        assert_eq!(raw.message, r#"{"run_started":true}"#);
    }
}
