use cinnabar_proto::registry::{
    ComputationCreateRequest as RawComputationCreateRequest,
    ComputationCreateResponse as RawComputationCreateResponse,
};
use log::info;
use tonic::Status;

use crate::{
    handler::Handler,
    state::{Computation, ComputationId},
    store::Store,
    types::{ComputationCreateRequest, ComputationCreateResponse},
    Registry,
};

#[async_trait::async_trait]
impl<R: Registry> Handler<R> for RawComputationCreateRequest {
    type Error = Status;
    type Response = RawComputationCreateResponse;

    async fn handle(self, ctx: &R) -> Result<Self::Response, Self::Error> {
        let request: ComputationCreateRequest = serde_json::from_str(&self.message)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let id = ComputationId::generate();
        let computation = Computation::create(
            id,
            request.name.clone(),
            request.owner_pub_key,
            request.roles,
        )
        .map_err(Status::from)?;

        ctx.store()
            .await
            .create(computation)
            .await
            .map_err(|e| Status::internal(e.to_string()))?;
        info!("created computation {} ({})", id, request.name);

        Ok(ComputationCreateResponse { computation_id: id }.into())
    }
}
