use cinnabar_proto::registry::{
    ResultFetchRequest as RawResultFetchRequest, ResultFetchResponse as RawResultFetchResponse,
};
use tonic::Status;

use crate::{
    error::Error,
    handler::Handler,
    store::Store,
    types::{ResultFetchRequest, ResultFetchResponse},
    Registry,
};

#[async_trait::async_trait]
impl<R: Registry> Handler<R> for RawResultFetchRequest {
    type Error = Status;
    type Response = RawResultFetchResponse;

    async fn handle(self, ctx: &R) -> Result<Self::Response, Self::Error> {
        let ResultFetchRequest {
            computation_id,
            pub_key,
        } = serde_json::from_str(&self.message)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let ciphertext = ctx
            .store()
            .await
            .with_computation(computation_id, |c| c.result_for(&pub_key))
            .await
            .map_err(|e| Status::internal(e.to_string()))?
            .ok_or_else(|| Status::from(Error::UnknownComputation(computation_id)))?
            .map_err(Status::from)?;

        Ok(ResultFetchResponse { ciphertext }.into())
    }
}
