use cinnabar_proto::registry::{
    UploadStatusRequest as RawUploadStatusRequest, UploadStatusResponse as RawUploadStatusResponse,
};
use tonic::Status;

use crate::{
    error::Error,
    handler::Handler,
    store::Store,
    types::{UploadStatusRequest, UploadStatusResponse},
    Registry,
};

#[async_trait::async_trait]
impl<R: Registry> Handler<R> for RawUploadStatusRequest {
    type Error = Status;
    type Response = RawUploadStatusResponse;

    async fn handle(self, ctx: &R) -> Result<Self::Response, Self::Error> {
        let UploadStatusRequest {
            computation_id,
            upload_id,
        } = serde_json::from_str(&self.message)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let response = ctx
            .store()
            .await
            .with_computation(computation_id, |c| {
                let session = c.upload(upload_id)?;
                Ok::<_, Error>(UploadStatusResponse {
                    chunk_count: session.chunk_count(),
                    missing: session.missing_chunks(),
                    committed: session.committed(),
                })
            })
            .await
            .map_err(|e| Status::internal(e.to_string()))?
            .ok_or_else(|| Status::from(Error::UnknownComputation(computation_id)))?
            .map_err(Status::from)?;

        Ok(response.into())
    }
}
