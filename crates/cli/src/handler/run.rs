use async_trait::async_trait;
use color_eyre::{Report, Result};

use crate::{
    config::Config,
    handler::{utils::helpers::participant, Handler},
    request::run::StatusRequest,
    response::{run::StatusResponse, Response},
};

#[async_trait]
impl Handler for StatusRequest {
    type Response = Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report> {
        let config = config.as_ref();
        let participant = participant(config)?;

        let status = participant.run_status(self.computation_id).await?;

        Ok(StatusResponse(status).into())
    }
}
