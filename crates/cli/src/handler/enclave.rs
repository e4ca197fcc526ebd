use async_trait::async_trait;
use color_eyre::{Report, Result};
use tracing::info;

use crate::{
    config::Config,
    handler::{utils::helpers::participant, Handler},
    request::enclave::WaitRequest,
    response::{enclave::WaitResponse, Response},
};

#[async_trait]
impl Handler for WaitRequest {
    type Response = Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report> {
        let config = config.as_ref();
        let participant = participant(config)?;
        let expected = config.measurement()?;

        info!("waiting for the enclave identity");
        let identity = participant
            .wait_for_enclave(self.computation_id, &expected, config.poll_opts())
            .await?;
        info!("attestation quote verified against the expected measurement");

        Ok(WaitResponse {
            pub_key: hex::encode(identity.pub_key()),
            measurement: hex::encode(identity.measurement()),
        }
        .into())
    }
}
