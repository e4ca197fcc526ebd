use cinnabar_proto::registry::{
    ComputationAbandonRequest as RawComputationAbandonRequest,
    ComputationAbandonResponse as RawComputationAbandonResponse,
};
use log::info;
use tonic::Status;

use crate::{
    error::Error,
    handler::Handler,
    store::Store,
    types::{ComputationAbandonRequest, ComputationAbandonResponse},
    Registry,
};

#[async_trait::async_trait]
impl<R: Registry> Handler<R> for RawComputationAbandonRequest {
    type Error = Status;
    type Response = RawComputationAbandonResponse;

    async fn handle(self, ctx: &R) -> Result<Self::Response, Self::Error> {
        let ComputationAbandonRequest {
            computation_id,
            pub_key,
        } = serde_json::from_str(&self.message)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let phase = ctx
            .store()
            .await
            .with_computation(computation_id, |c| {
                c.abandon(&pub_key)?;
                Ok::<_, Error>(c.phase())
            })
            .await
            .map_err(|e| Status::internal(e.to_string()))?
            .ok_or_else(|| Status::from(Error::UnknownComputation(computation_id)))?
            .map_err(Status::from)?;
        info!("computation {} abandoned", computation_id);

        Ok(ComputationAbandonResponse { phase }.into())
    }
}
