//! The registry client abstraction and its implementations.
//!
//! [`RegistryClient`] is the participant's view of the remote registry. Two
//! implementations are provided: [`GrpcRegistryClient`] for a remote
//! registry over tonic, and [`LocalRegistryClient`] which drives a registry
//! in-process (tests, single-process deployments).
use async_trait::async_trait;
use cinnabar_proto::registry::{
    registry_client::RegistryClient as ProtoRegistryClient,
    ComputationAbandonRequest as RawComputationAbandonRequest,
    ComputationCreateRequest as RawComputationCreateRequest,
    ComputationQueryRequest as RawComputationQueryRequest,
    EnclaveIdentityQueryRequest as RawEnclaveIdentityQueryRequest,
    KeyProvisionRequest as RawKeyProvisionRequest,
    ParticipantRegisterRequest as RawParticipantRegisterRequest,
    ParticipantsApproveRequest as RawParticipantsApproveRequest,
    ResultFetchRequest as RawResultFetchRequest, RunStatusQueryRequest as RawRunStatusQueryRequest,
    UploadBeginRequest as RawUploadBeginRequest, UploadChunkRequest as RawUploadChunkRequest,
    UploadCommitRequest as RawUploadCommitRequest, UploadStatusRequest as RawUploadStatusRequest,
};
use cinnabar_registry_core::{
    handler::Handler,
    state::ComputationId,
    types::{
        ComputationAbandonRequest, ComputationAbandonResponse, ComputationCreateRequest,
        ComputationCreateResponse, ComputationQueryRequest, ComputationQueryResponse,
        EnclaveIdentityInfo, EnclaveIdentityQueryRequest, EnclaveIdentityQueryResponse,
        KeyProvisionRequest, KeyProvisionResponse, ParticipantRegisterRequest,
        ParticipantRegisterResponse, ParticipantsApproveRequest, ParticipantsApproveResponse,
        ResultFetchRequest, ResultFetchResponse, RunStatusQueryRequest, RunStatusQueryResponse,
        UploadBeginRequest, UploadBeginResponse, UploadChunkRequest, UploadChunkResponse,
        UploadCommitRequest, UploadCommitResponse, UploadStatusRequest, UploadStatusResponse,
    },
    upload::UploadId,
    Registry,
};
use serde::{de::DeserializeOwned, Serialize};
use tonic::Request;

use crate::error::Error;

#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn computation_create(
        &self,
        request: ComputationCreateRequest,
    ) -> Result<ComputationCreateResponse, Error>;

    async fn participant_register(
        &self,
        request: ParticipantRegisterRequest,
    ) -> Result<ParticipantRegisterResponse, Error>;

    async fn participants_approve(
        &self,
        request: ParticipantsApproveRequest,
    ) -> Result<ParticipantsApproveResponse, Error>;

    async fn computation_abandon(
        &self,
        request: ComputationAbandonRequest,
    ) -> Result<ComputationAbandonResponse, Error>;

    async fn computation_query(
        &self,
        computation_id: ComputationId,
    ) -> Result<ComputationQueryResponse, Error>;

    async fn enclave_identity(
        &self,
        computation_id: ComputationId,
    ) -> Result<Option<EnclaveIdentityInfo>, Error>;

    async fn upload_begin(&self, request: UploadBeginRequest)
        -> Result<UploadBeginResponse, Error>;

    async fn upload_chunk(&self, request: UploadChunkRequest)
        -> Result<UploadChunkResponse, Error>;

    async fn upload_status(
        &self,
        computation_id: ComputationId,
        upload_id: UploadId,
    ) -> Result<UploadStatusResponse, Error>;

    async fn upload_commit(
        &self,
        computation_id: ComputationId,
        upload_id: UploadId,
    ) -> Result<UploadCommitResponse, Error>;

    async fn key_provision(
        &self,
        request: KeyProvisionRequest,
    ) -> Result<KeyProvisionResponse, Error>;

    async fn run_status(
        &self,
        computation_id: ComputationId,
    ) -> Result<RunStatusQueryResponse, Error>;

    async fn result_fetch(
        &self,
        computation_id: ComputationId,
        pub_key: Vec<u8>,
    ) -> Result<ResultFetchResponse, Error>;
}

fn encode<T: Serialize>(value: &T) -> Result<String, Error> {
    Ok(serde_json::to_string(value)?)
}

fn decode<T: DeserializeOwned>(message: &str) -> Result<T, Error> {
    Ok(serde_json::from_str(message)?)
}

/// A client for a remote registry, connecting per call (the registry
/// endpoint is long-lived; participant processes are not).
#[derive(Clone, Debug)]
pub struct GrpcRegistryClient {
    url: String,
    token: String,
}

impl GrpcRegistryClient {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
        }
    }

    async fn connect(
        &self,
    ) -> Result<ProtoRegistryClient<tonic::transport::Channel>, Error> {
        ProtoRegistryClient::connect(self.url.clone())
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }

    fn request<T>(&self, payload: T) -> Result<Request<T>, Error> {
        let mut request = Request::new(payload);
        let token = format!("Bearer {}", self.token)
            .parse()
            .map_err(|_| Error::Transport("bearer token is not valid metadata".to_string()))?;
        request.metadata_mut().insert("authorization", token);
        Ok(request)
    }
}

#[async_trait]
impl RegistryClient for GrpcRegistryClient {
    async fn computation_create(
        &self,
        request: ComputationCreateRequest,
    ) -> Result<ComputationCreateResponse, Error> {
        let raw = RawComputationCreateRequest {
            message: encode(&request)?,
        };
        let response = self
            .connect()
            .await?
            .computation_create(self.request(raw)?)
            .await?;
        decode(&response.into_inner().message)
    }

    async fn participant_register(
        &self,
        request: ParticipantRegisterRequest,
    ) -> Result<ParticipantRegisterResponse, Error> {
        let raw = RawParticipantRegisterRequest {
            message: encode(&request)?,
        };
        let response = self
            .connect()
            .await?
            .participant_register(self.request(raw)?)
            .await?;
        decode(&response.into_inner().message)
    }

    async fn participants_approve(
        &self,
        request: ParticipantsApproveRequest,
    ) -> Result<ParticipantsApproveResponse, Error> {
        let raw = RawParticipantsApproveRequest {
            message: encode(&request)?,
        };
        let response = self
            .connect()
            .await?
            .participants_approve(self.request(raw)?)
            .await?;
        decode(&response.into_inner().message)
    }

    async fn computation_abandon(
        &self,
        request: ComputationAbandonRequest,
    ) -> Result<ComputationAbandonResponse, Error> {
        let raw = RawComputationAbandonRequest {
            message: encode(&request)?,
        };
        let response = self
            .connect()
            .await?
            .computation_abandon(self.request(raw)?)
            .await?;
        decode(&response.into_inner().message)
    }

    async fn computation_query(
        &self,
        computation_id: ComputationId,
    ) -> Result<ComputationQueryResponse, Error> {
        let raw = RawComputationQueryRequest {
            message: encode(&ComputationQueryRequest { computation_id })?,
        };
        let response = self
            .connect()
            .await?
            .computation_query(self.request(raw)?)
            .await?;
        decode(&response.into_inner().message)
    }

    async fn enclave_identity(
        &self,
        computation_id: ComputationId,
    ) -> Result<Option<EnclaveIdentityInfo>, Error> {
        let raw = RawEnclaveIdentityQueryRequest {
            message: encode(&EnclaveIdentityQueryRequest { computation_id })?,
        };
        let response = self
            .connect()
            .await?
            .enclave_identity_query(self.request(raw)?)
            .await?;
        let response: EnclaveIdentityQueryResponse = decode(&response.into_inner().message)?;
        Ok(response.identity)
    }

    async fn upload_begin(
        &self,
        request: UploadBeginRequest,
    ) -> Result<UploadBeginResponse, Error> {
        let raw = RawUploadBeginRequest {
            message: encode(&request)?,
        };
        let response = self
            .connect()
            .await?
            .upload_begin(self.request(raw)?)
            .await?;
        decode(&response.into_inner().message)
    }

    async fn upload_chunk(
        &self,
        request: UploadChunkRequest,
    ) -> Result<UploadChunkResponse, Error> {
        let raw = RawUploadChunkRequest {
            message: encode(&request)?,
        };
        let response = self
            .connect()
            .await?
            .upload_chunk(self.request(raw)?)
            .await?;
        decode(&response.into_inner().message)
    }

    async fn upload_status(
        &self,
        computation_id: ComputationId,
        upload_id: UploadId,
    ) -> Result<UploadStatusResponse, Error> {
        let raw = RawUploadStatusRequest {
            message: encode(&UploadStatusRequest {
                computation_id,
                upload_id,
            })?,
        };
        let response = self
            .connect()
            .await?
            .upload_status(self.request(raw)?)
            .await?;
        decode(&response.into_inner().message)
    }

    async fn upload_commit(
        &self,
        computation_id: ComputationId,
        upload_id: UploadId,
    ) -> Result<UploadCommitResponse, Error> {
        let raw = RawUploadCommitRequest {
            message: encode(&UploadCommitRequest {
                computation_id,
                upload_id,
            })?,
        };
        let response = self
            .connect()
            .await?
            .upload_commit(self.request(raw)?)
            .await?;
        decode(&response.into_inner().message)
    }

    async fn key_provision(
        &self,
        request: KeyProvisionRequest,
    ) -> Result<KeyProvisionResponse, Error> {
        let raw = RawKeyProvisionRequest {
            message: encode(&request)?,
        };
        let response = self
            .connect()
            .await?
            .key_provision(self.request(raw)?)
            .await?;
        decode(&response.into_inner().message)
    }

    async fn run_status(
        &self,
        computation_id: ComputationId,
    ) -> Result<RunStatusQueryResponse, Error> {
        let raw = RawRunStatusQueryRequest {
            message: encode(&RunStatusQueryRequest { computation_id })?,
        };
        let response = self
            .connect()
            .await?
            .run_status_query(self.request(raw)?)
            .await?;
        decode(&response.into_inner().message)
    }

    async fn result_fetch(
        &self,
        computation_id: ComputationId,
        pub_key: Vec<u8>,
    ) -> Result<ResultFetchResponse, Error> {
        let raw = RawResultFetchRequest {
            message: encode(&ResultFetchRequest {
                computation_id,
                pub_key,
            })?,
        };
        let response = self
            .connect()
            .await?
            .result_fetch(self.request(raw)?)
            .await?;
        decode(&response.into_inner().message)
    }
}

/// An in-process client that drives a registry directly through its request
/// handlers — the same code path the gRPC service uses, minus the wire.
#[derive(Clone, Debug)]
pub struct LocalRegistryClient<R> {
    registry: R,
}

impl<R: Registry> LocalRegistryClient<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl<R: Registry> RegistryClient for LocalRegistryClient<R> {
    async fn computation_create(
        &self,
        request: ComputationCreateRequest,
    ) -> Result<ComputationCreateResponse, Error> {
        let raw = RawComputationCreateRequest {
            message: encode(&request)?,
        };
        let response = raw.handle(&self.registry).await?;
        decode(&response.message)
    }

    async fn participant_register(
        &self,
        request: ParticipantRegisterRequest,
    ) -> Result<ParticipantRegisterResponse, Error> {
        let raw = RawParticipantRegisterRequest {
            message: encode(&request)?,
        };
        let response = raw.handle(&self.registry).await?;
        decode(&response.message)
    }

    async fn participants_approve(
        &self,
        request: ParticipantsApproveRequest,
    ) -> Result<ParticipantsApproveResponse, Error> {
        let raw = RawParticipantsApproveRequest {
            message: encode(&request)?,
        };
        let response = raw.handle(&self.registry).await?;
        decode(&response.message)
    }

    async fn computation_abandon(
        &self,
        request: ComputationAbandonRequest,
    ) -> Result<ComputationAbandonResponse, Error> {
        let raw = RawComputationAbandonRequest {
            message: encode(&request)?,
        };
        let response = raw.handle(&self.registry).await?;
        decode(&response.message)
    }

    async fn computation_query(
        &self,
        computation_id: ComputationId,
    ) -> Result<ComputationQueryResponse, Error> {
        let raw = RawComputationQueryRequest {
            message: encode(&ComputationQueryRequest { computation_id })?,
        };
        let response = raw.handle(&self.registry).await?;
        decode(&response.message)
    }

    async fn enclave_identity(
        &self,
        computation_id: ComputationId,
    ) -> Result<Option<EnclaveIdentityInfo>, Error> {
        let raw = RawEnclaveIdentityQueryRequest {
            message: encode(&EnclaveIdentityQueryRequest { computation_id })?,
        };
        let response = raw.handle(&self.registry).await?;
        let response: EnclaveIdentityQueryResponse = decode(&response.message)?;
        Ok(response.identity)
    }

    async fn upload_begin(
        &self,
        request: UploadBeginRequest,
    ) -> Result<UploadBeginResponse, Error> {
        let raw = RawUploadBeginRequest {
            message: encode(&request)?,
        };
        let response = raw.handle(&self.registry).await?;
        decode(&response.message)
    }

    async fn upload_chunk(
        &self,
        request: UploadChunkRequest,
    ) -> Result<UploadChunkResponse, Error> {
        let raw = RawUploadChunkRequest {
            message: encode(&request)?,
        };
        let response = raw.handle(&self.registry).await?;
        decode(&response.message)
    }

    async fn upload_status(
        &self,
        computation_id: ComputationId,
        upload_id: UploadId,
    ) -> Result<UploadStatusResponse, Error> {
        let raw = RawUploadStatusRequest {
            message: encode(&UploadStatusRequest {
                computation_id,
                upload_id,
            })?,
        };
        let response = raw.handle(&self.registry).await?;
        decode(&response.message)
    }

    async fn upload_commit(
        &self,
        computation_id: ComputationId,
        upload_id: UploadId,
    ) -> Result<UploadCommitResponse, Error> {
        let raw = RawUploadCommitRequest {
            message: encode(&UploadCommitRequest {
                computation_id,
                upload_id,
            })?,
        };
        let response = raw.handle(&self.registry).await?;
        decode(&response.message)
    }

    async fn key_provision(
        &self,
        request: KeyProvisionRequest,
    ) -> Result<KeyProvisionResponse, Error> {
        let raw = RawKeyProvisionRequest {
            message: encode(&request)?,
        };
        let response = raw.handle(&self.registry).await?;
        decode(&response.message)
    }

    async fn run_status(
        &self,
        computation_id: ComputationId,
    ) -> Result<RunStatusQueryResponse, Error> {
        let raw = RawRunStatusQueryRequest {
            message: encode(&RunStatusQueryRequest { computation_id })?,
        };
        let response = raw.handle(&self.registry).await?;
        decode(&response.message)
    }

    async fn result_fetch(
        &self,
        computation_id: ComputationId,
        pub_key: Vec<u8>,
    ) -> Result<ResultFetchResponse, Error> {
        let raw = RawResultFetchRequest {
            message: encode(&ResultFetchRequest {
                computation_id,
                pub_key,
            })?,
        };
        let response = raw.handle(&self.registry).await?;
        decode(&response.message)
    }
}
