use cinnabar_proto::registry::{
    KeyProvisionRequest as RawKeyProvisionRequest, KeyProvisionResponse as RawKeyProvisionResponse,
};
use log::info;
use tonic::Status;

use crate::{
    error::Error,
    handler::Handler,
    orchestrator,
    store::Store,
    types::{KeyProvisionRequest, KeyProvisionResponse},
    Registry,
};

#[async_trait::async_trait]
impl<R: Registry> Handler<R> for RawKeyProvisionRequest {
    type Error = Status;
    type Response = RawKeyProvisionResponse;

    async fn handle(self, ctx: &R) -> Result<Self::Response, Self::Error> {
        let KeyProvisionRequest {
            computation_id,
            role,
            pub_key,
            sealed_key,
        } = serde_json::from_str(&self.message)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let run_started = ctx
            .store()
            .await
            .with_computation(computation_id, |c| {
                c.provision_key(role, pub_key, sealed_key)
            })
            .await
            .map_err(|e| Status::internal(e.to_string()))?
            .ok_or_else(|| Status::from(Error::UnknownComputation(computation_id)))?
            .map_err(Status::from)?;
        info!("computation {}: sealed key provisioned for {}", computation_id, role);

        // implicit barrier: the last key auto-starts the run
        if run_started {
            orchestrator::start_run(ctx, computation_id)
                .await
                .map_err(Status::from)?;
        }

        Ok(KeyProvisionResponse { run_started }.into())
    }
}
