use cinnabar_proto::registry::{
    UploadChunkRequest as RawUploadChunkRequest, UploadChunkResponse as RawUploadChunkResponse,
};
use tonic::Status;

use crate::{
    error::Error,
    handler::Handler,
    store::Store,
    types::{UploadChunkRequest, UploadChunkResponse},
    Registry,
};

#[async_trait::async_trait]
impl<R: Registry> Handler<R> for RawUploadChunkRequest {
    type Error = Status;
    type Response = RawUploadChunkResponse;

    async fn handle(self, ctx: &R) -> Result<Self::Response, Self::Error> {
        let UploadChunkRequest {
            computation_id,
            upload_id,
            seq,
            bytes,
        } = serde_json::from_str(&self.message)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        ctx.store()
            .await
            .with_computation(computation_id, |c| c.upload_chunk(upload_id, seq, bytes))
            .await
            .map_err(|e| Status::internal(e.to_string()))?
            .ok_or_else(|| Status::from(Error::UnknownComputation(computation_id)))?
            .map_err(Status::from)?;

        Ok(UploadChunkResponse { seq }.into())
    }
}
