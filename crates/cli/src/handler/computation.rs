use async_trait::async_trait;
use color_eyre::{owo_colors::OwoColorize, Report, Result};
use tracing::info;

use crate::{
    config::Config,
    handler::{utils::helpers::participant, Handler},
    request::computation::{
        AbandonRequest, ApproveRequest, CreateRequest, RegisterRequest, StatusRequest,
    },
    response::{
        computation::{
            AbandonResponse, ApproveResponse, CreateResponse, RegisterResponse, StatusResponse,
        },
        Response,
    },
};

#[async_trait]
impl Handler for CreateRequest {
    type Response = Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report> {
        let config = config.as_ref();

        info!("{}", "\nCreating computation".blue().bold());

        let participant = participant(config)?;
        let computation_id = participant
            .create_computation(self.name, self.roles)
            .await?;
        let context_phrase = participant.crypto().context_phrase(computation_id);

        Ok(CreateResponse {
            computation_id,
            context_phrase,
        }
        .into())
    }
}

#[async_trait]
impl Handler for RegisterRequest {
    type Response = Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report> {
        let config = config.as_ref();
        let participant = participant(config)?;

        participant.register(self.computation_id, self.role).await?;
        info!(
            "context phrase: {} (compare with the other participants)",
            participant.crypto().context_phrase(self.computation_id)
        );

        Ok(RegisterResponse {
            computation_id: self.computation_id,
            role: self.role,
        }
        .into())
    }
}

#[async_trait]
impl Handler for ApproveRequest {
    type Response = Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report> {
        let config = config.as_ref();
        let participant = participant(config)?;

        let phase = participant.approve(self.computation_id).await?;

        Ok(ApproveResponse { phase }.into())
    }
}

#[async_trait]
impl Handler for AbandonRequest {
    type Response = Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report> {
        let config = config.as_ref();
        let participant = participant(config)?;

        participant.abandon(self.computation_id).await?;
        let status = participant.status(self.computation_id).await?;

        Ok(AbandonResponse {
            phase: status.phase,
        }
        .into())
    }
}

#[async_trait]
impl Handler for StatusRequest {
    type Response = Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report> {
        let config = config.as_ref();
        let participant = participant(config)?;

        let status = participant.status(self.computation_id).await?;

        Ok(StatusResponse(status).into())
    }
}
