use async_trait::async_trait;
use color_eyre::{Report, Result};

use crate::{config::Config, request::Request, response::Response};

pub mod utils;
// commands
pub mod computation;
pub mod enclave;
pub mod init;
pub mod key;
pub mod registry;
pub mod result;
pub mod run;
pub mod upload;

#[async_trait]
pub trait Handler {
    type Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report>;
}

#[async_trait]
impl Handler for Request {
    type Response = Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report> {
        match self {
            Request::Init(request) => request.handle(config).await,
            Request::ComputationCreate(request) => request.handle(config).await,
            Request::ComputationRegister(request) => request.handle(config).await,
            Request::ComputationApprove(request) => request.handle(config).await,
            Request::ComputationAbandon(request) => request.handle(config).await,
            Request::ComputationStatus(request) => request.handle(config).await,
            Request::EnclaveWait(request) => request.handle(config).await,
            Request::UploadCode(request) => request.handle(config).await,
            Request::UploadData(request) => request.handle(config).await,
            Request::KeyProvision(request) => request.handle(config).await,
            Request::RunStatus(request) => request.handle(config).await,
            Request::ResultFetch(request) => request.handle(config).await,
            Request::RegistryStart(request) => request.handle(config).await,
        }
    }
}
