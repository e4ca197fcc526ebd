use cinnabar_proto::registry::{
    EnclaveIdentityQueryRequest as RawEnclaveIdentityQueryRequest,
    EnclaveIdentityQueryResponse as RawEnclaveIdentityQueryResponse,
};
use tonic::Status;

use crate::{
    error::Error,
    handler::Handler,
    store::Store,
    types::{EnclaveIdentityQueryRequest, EnclaveIdentityQueryResponse},
    Registry,
};

#[async_trait::async_trait]
impl<R: Registry> Handler<R> for RawEnclaveIdentityQueryRequest {
    type Error = Status;
    type Response = RawEnclaveIdentityQueryResponse;

    async fn handle(self, ctx: &R) -> Result<Self::Response, Self::Error> {
        let EnclaveIdentityQueryRequest { computation_id } = serde_json::from_str(&self.message)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        // `None` is not an error here: clients poll until the enclave boots
        let identity = ctx
            .store()
            .await
            .with_computation(computation_id, |c| c.enclave().map(Into::into))
            .await
            .map_err(|e| Status::internal(e.to_string()))?
            .ok_or_else(|| Status::from(Error::UnknownComputation(computation_id)))?;

        Ok(EnclaveIdentityQueryResponse { identity }.into())
    }
}
