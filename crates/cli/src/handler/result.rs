use std::{
    fs,
    io::{self, Write},
};

use async_trait::async_trait;
use color_eyre::{Report, Result};
use tracing::info;

use crate::{
    config::Config,
    error::Error,
    handler::{utils::helpers::participant, Handler},
    request::result::FetchRequest,
    response::{result::FetchResponse, Response},
};

#[async_trait]
impl Handler for FetchRequest {
    type Response = Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report> {
        let config = config.as_ref();
        let participant = participant(config)?;

        info!("waiting for the run to reach a terminal state");
        let plaintext = participant
            .wait_for_result(self.computation_id, config.poll_opts())
            .await?;

        match &self.output {
            Some(path) => {
                fs::write(path, &plaintext).map_err(Error::from)?;
                info!("wrote {} byte(s) to {}", plaintext.len(), path.display());
            }
            None => io::stdout().write_all(&plaintext).map_err(Error::from)?,
        }

        Ok(FetchResponse {
            bytes: plaintext.len(),
            output: self.output,
        }
        .into())
    }
}
