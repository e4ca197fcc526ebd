use cinnabar_proto::registry::{
    UploadBeginRequest as RawUploadBeginRequest, UploadBeginResponse as RawUploadBeginResponse,
};
use tonic::Status;

use crate::{
    error::Error,
    handler::Handler,
    store::Store,
    types::{UploadBeginRequest, UploadBeginResponse},
    upload::CHUNK_SIZE,
    Registry,
};

#[async_trait::async_trait]
impl<R: Registry> Handler<R> for RawUploadBeginRequest {
    type Error = Status;
    type Response = RawUploadBeginResponse;

    async fn handle(self, ctx: &R) -> Result<Self::Response, Self::Error> {
        let UploadBeginRequest {
            computation_id,
            kind,
            pub_key,
            total_len,
            digest,
        } = serde_json::from_str(&self.message)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let upload_id = ctx
            .store()
            .await
            .with_computation(computation_id, |c| {
                c.begin_upload(kind, pub_key, total_len, digest)
            })
            .await
            .map_err(|e| Status::internal(e.to_string()))?
            .ok_or_else(|| Status::from(Error::UnknownComputation(computation_id)))?
            .map_err(Status::from)?;

        Ok(UploadBeginResponse {
            upload_id,
            chunk_size: CHUNK_SIZE as u64,
        }
        .into())
    }
}
