use cinnabar_proto::registry::{
    ComputationQueryRequest as RawComputationQueryRequest,
    ComputationQueryResponse as RawComputationQueryResponse,
};
use tonic::Status;

use crate::{
    error::Error,
    handler::Handler,
    store::Store,
    types::{ComputationQueryRequest, ComputationQueryResponse},
    Registry,
};

#[async_trait::async_trait]
impl<R: Registry> Handler<R> for RawComputationQueryRequest {
    type Error = Status;
    type Response = RawComputationQueryResponse;

    async fn handle(self, ctx: &R) -> Result<Self::Response, Self::Error> {
        let ComputationQueryRequest { computation_id } = serde_json::from_str(&self.message)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let response = ctx
            .store()
            .await
            .with_computation(computation_id, |c| ComputationQueryResponse {
                computation_id: c.id(),
                name: c.name().to_string(),
                phase: c.phase(),
                declared_roles: c.declared_roles().to_vec(),
                participants: c.participants().iter().map(Into::into).collect(),
            })
            .await
            .map_err(|e| Status::internal(e.to_string()))?
            .ok_or_else(|| Status::from(Error::UnknownComputation(computation_id)))?;

        Ok(response.into())
    }
}
