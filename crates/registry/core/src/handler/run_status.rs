use cinnabar_proto::registry::{
    RunStatusQueryRequest as RawRunStatusQueryRequest,
    RunStatusQueryResponse as RawRunStatusQueryResponse,
};
use tonic::Status;

use crate::{
    error::Error,
    handler::Handler,
    store::Store,
    types::{RunStatusQueryRequest, RunStatusQueryResponse},
    Registry,
};

#[async_trait::async_trait]
impl<R: Registry> Handler<R> for RawRunStatusQueryRequest {
    type Error = Status;
    type Response = RawRunStatusQueryResponse;

    async fn handle(self, ctx: &R) -> Result<Self::Response, Self::Error> {
        let RunStatusQueryRequest { computation_id } = serde_json::from_str(&self.message)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let response = ctx
            .store()
            .await
            .with_computation(computation_id, |c| RunStatusQueryResponse {
                phase: c.phase(),
                current_run: c.current_run(),
                history: c.history().iter().map(Into::into).collect(),
            })
            .await
            .map_err(|e| Status::internal(e.to_string()))?
            .ok_or_else(|| Status::from(Error::UnknownComputation(computation_id)))?;

        Ok(response.into())
    }
}
