use cinnabar_proto::registry::{
    UploadCommitRequest as RawUploadCommitRequest, UploadCommitResponse as RawUploadCommitResponse,
};
use log::info;
use tonic::Status;

use crate::{
    error::Error,
    handler::Handler,
    store::Store,
    types::{UploadCommitRequest, UploadCommitResponse},
    Registry,
};

#[async_trait::async_trait]
impl<R: Registry> Handler<R> for RawUploadCommitRequest {
    type Error = Status;
    type Response = RawUploadCommitResponse;

    async fn handle(self, ctx: &R) -> Result<Self::Response, Self::Error> {
        let UploadCommitRequest {
            computation_id,
            upload_id,
        } = serde_json::from_str(&self.message)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let (kind, phase) = ctx
            .store()
            .await
            .with_computation(computation_id, |c| {
                let kind = c.commit_upload(upload_id)?;
                Ok::<_, Error>((kind, c.phase()))
            })
            .await
            .map_err(|e| Status::internal(e.to_string()))?
            .ok_or_else(|| Status::from(Error::UnknownComputation(computation_id)))?
            .map_err(Status::from)?;
        info!(
            "computation {}: {} payload committed (upload {})",
            computation_id, kind, upload_id
        );

        Ok(UploadCommitResponse { kind, phase }.into())
    }
}
