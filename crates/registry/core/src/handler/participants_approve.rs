use cinnabar_proto::registry::{
    ParticipantsApproveRequest as RawParticipantsApproveRequest,
    ParticipantsApproveResponse as RawParticipantsApproveResponse,
};
use log::info;
use tonic::Status;

use crate::{
    error::Error,
    handler::Handler,
    launcher::EnclaveLauncher,
    store::Store,
    types::{ParticipantsApproveRequest, ParticipantsApproveResponse},
    Registry,
};

#[async_trait::async_trait]
impl<R: Registry> Handler<R> for RawParticipantsApproveRequest {
    type Error = Status;
    type Response = RawParticipantsApproveResponse;

    async fn handle(self, ctx: &R) -> Result<Self::Response, Self::Error> {
        let ParticipantsApproveRequest {
            computation_id,
            owner_pub_key,
        } = serde_json::from_str(&self.message)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let store = ctx.store().await;
        store
            .with_computation(computation_id, |c| c.approve(&owner_pub_key))
            .await
            .map_err(|e| Status::internal(e.to_string()))?
            .ok_or_else(|| Status::from(Error::UnknownComputation(computation_id)))?
            .map_err(Status::from)?;

        // the participant set is final: boot the enclave and publish its
        // identity so key provisioning can begin
        let identity = ctx
            .launcher()
            .await
            .launch(computation_id)
            .await
            .map_err(|e| Status::from(Error::Launcher(e.to_string())))?;

        let phase = store
            .with_computation(computation_id, |c| {
                c.record_enclave_identity(identity)?;
                Ok::<_, Error>(c.phase())
            })
            .await
            .map_err(|e| Status::internal(e.to_string()))?
            .ok_or_else(|| Status::from(Error::UnknownComputation(computation_id)))?
            .map_err(Status::from)?;
        info!("computation {} approved, enclave identity published", computation_id);

        Ok(ParticipantsApproveResponse { phase }.into())
    }
}
