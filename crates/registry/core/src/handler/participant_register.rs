use cinnabar_proto::registry::{
    ParticipantRegisterRequest as RawParticipantRegisterRequest,
    ParticipantRegisterResponse as RawParticipantRegisterResponse,
};
use tonic::Status;

use crate::{
    error::Error,
    handler::Handler,
    store::Store,
    types::{ParticipantRegisterRequest, ParticipantRegisterResponse},
    Registry,
};

#[async_trait::async_trait]
impl<R: Registry> Handler<R> for RawParticipantRegisterRequest {
    type Error = Status;
    type Response = RawParticipantRegisterResponse;

    async fn handle(self, ctx: &R) -> Result<Self::Response, Self::Error> {
        let ParticipantRegisterRequest {
            computation_id,
            role,
            pub_key,
        } = serde_json::from_str(&self.message)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        ctx.store()
            .await
            .with_computation(computation_id, |c| c.register(role, pub_key))
            .await
            .map_err(|e| Status::internal(e.to_string()))?
            .ok_or_else(|| Status::from(Error::UnknownComputation(computation_id)))?
            .map_err(Status::from)?;

        Ok(ParticipantRegisterResponse {
            computation_id,
            role,
        }
        .into())
    }
}
