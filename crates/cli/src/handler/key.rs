use async_trait::async_trait;
use color_eyre::{Report, Result};
use tracing::info;

use crate::{
    config::Config,
    handler::{utils::helpers::participant, Handler},
    request::key::ProvisionRequest,
    response::{key::ProvisionResponse, Response},
};

#[async_trait]
impl Handler for ProvisionRequest {
    type Response = Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report> {
        let config = config.as_ref();
        let participant = participant(config)?;
        let expected = config.measurement()?;

        // verification gates sealing: an unverified enclave never sees a key
        let enclave = participant
            .wait_for_enclave(self.computation_id, &expected, config.poll_opts())
            .await?;

        let run_started = participant
            .provision_key(self.computation_id, self.role, &enclave)
            .await?;
        if run_started {
            info!("all sealed keys received, the run has started");
        }

        Ok(ProvisionResponse { run_started }.into())
    }
}
