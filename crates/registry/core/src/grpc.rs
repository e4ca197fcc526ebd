//! gRPC service implementation for the registry.
use cinnabar_proto::registry::{
    registry_server::Registry as RegistryService, ComputationAbandonRequest,
    ComputationAbandonResponse, ComputationCreateRequest, ComputationCreateResponse,
    ComputationQueryRequest, ComputationQueryResponse, EnclaveIdentityQueryRequest,
    EnclaveIdentityQueryResponse, KeyProvisionRequest, KeyProvisionResponse,
    ParticipantRegisterRequest, ParticipantRegisterResponse, ParticipantsApproveRequest,
    ParticipantsApproveResponse, ResultFetchRequest, ResultFetchResponse, RunStatusQueryRequest,
    RunStatusQueryResponse, UploadBeginRequest, UploadBeginResponse, UploadChunkRequest,
    UploadChunkResponse, UploadCommitRequest, UploadCommitResponse, UploadStatusRequest,
    UploadStatusResponse,
};
use tonic::{Request, Response, Status};

use crate::{handler::Handler, launcher::EnclaveLauncher, store::Store, DefaultRegistry};

#[async_trait::async_trait]
impl<L, S> RegistryService for DefaultRegistry<L, S>
where
    L: EnclaveLauncher + Clone,
    S: Store + Clone,
{
    async fn computation_create(
        &self,
        request: Request<ComputationCreateRequest>,
    ) -> Result<Response<ComputationCreateResponse>, Status> {
        request.handle(self).await
    }

    async fn participant_register(
        &self,
        request: Request<ParticipantRegisterRequest>,
    ) -> Result<Response<ParticipantRegisterResponse>, Status> {
        request.handle(self).await
    }

    async fn participants_approve(
        &self,
        request: Request<ParticipantsApproveRequest>,
    ) -> Result<Response<ParticipantsApproveResponse>, Status> {
        request.handle(self).await
    }

    async fn computation_abandon(
        &self,
        request: Request<ComputationAbandonRequest>,
    ) -> Result<Response<ComputationAbandonResponse>, Status> {
        request.handle(self).await
    }

    async fn computation_query(
        &self,
        request: Request<ComputationQueryRequest>,
    ) -> Result<Response<ComputationQueryResponse>, Status> {
        request.handle(self).await
    }

    async fn enclave_identity_query(
        &self,
        request: Request<EnclaveIdentityQueryRequest>,
    ) -> Result<Response<EnclaveIdentityQueryResponse>, Status> {
        request.handle(self).await
    }

    async fn upload_begin(
        &self,
        request: Request<UploadBeginRequest>,
    ) -> Result<Response<UploadBeginResponse>, Status> {
        request.handle(self).await
    }

    async fn upload_chunk(
        &self,
        request: Request<UploadChunkRequest>,
    ) -> Result<Response<UploadChunkResponse>, Status> {
        request.handle(self).await
    }

    async fn upload_status(
        &self,
        request: Request<UploadStatusRequest>,
    ) -> Result<Response<UploadStatusResponse>, Status> {
        request.handle(self).await
    }

    async fn upload_commit(
        &self,
        request: Request<UploadCommitRequest>,
    ) -> Result<Response<UploadCommitResponse>, Status> {
        request.handle(self).await
    }

    async fn key_provision(
        &self,
        request: Request<KeyProvisionRequest>,
    ) -> Result<Response<KeyProvisionResponse>, Status> {
        request.handle(self).await
    }

    async fn run_status_query(
        &self,
        request: Request<RunStatusQueryRequest>,
    ) -> Result<Response<RunStatusQueryResponse>, Status> {
        request.handle(self).await
    }

    async fn result_fetch(
        &self,
        request: Request<ResultFetchRequest>,
    ) -> Result<Response<ResultFetchResponse>, Status> {
        request.handle(self).await
    }
}
