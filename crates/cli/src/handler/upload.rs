use async_trait::async_trait;
use color_eyre::{Report, Result};
use tracing::info;

use crate::{
    config::Config,
    handler::{utils::helpers::participant, Handler},
    request::upload::{CodeRequest, DataRequest},
    response::{
        upload::{CodeResponse, DataResponse},
        Response,
    },
};

#[async_trait]
impl Handler for CodeRequest {
    type Response = Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report> {
        let config = config.as_ref();
        let participant = participant(config)?;

        info!(
            "encrypting {} (entry point {} stays cleartext)",
            self.code_dir.display(),
            self.entry_point.display()
        );
        let upload_id = participant
            .upload_code(self.computation_id, &self.code_dir, &self.entry_point)
            .await?;
        info!("code payload committed");

        Ok(CodeResponse { upload_id }.into())
    }
}

#[async_trait]
impl Handler for DataRequest {
    type Response = Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report> {
        let config = config.as_ref();
        let participant = participant(config)?;

        let upload_id = participant
            .upload_data(self.computation_id, &self.file)
            .await?;
        info!("data payload committed");

        Ok(DataResponse { upload_id }.into())
    }
}
