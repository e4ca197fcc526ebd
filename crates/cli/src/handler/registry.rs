use std::net::SocketAddr;

use async_trait::async_trait;
use cinnabar_common::registry::{
    launcher::mock::MockEnclave, server::AuthInterceptor, server::CinnabarServer,
    store::default::SharedStore, DefaultRegistry,
};
use color_eyre::{Report, Result};
use tracing::info;

use crate::{
    config::Config,
    error::Error,
    handler::Handler,
    request::registry::StartRequest,
    response::{registry::StartResponse, Response},
};

#[async_trait]
impl Handler for StartRequest {
    type Response = Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report> {
        let config = config.as_ref();

        let addr: SocketAddr = config
            .listen_addr
            .parse()
            .map_err(|_| Error::InvalidListenAddr(config.listen_addr.clone()))?;
        let measurement = config.measurement()?;

        let registry = DefaultRegistry::new(MockEnclave::new(measurement), SharedStore::new());
        let auth = AuthInterceptor::new([config.token.clone()]);

        info!("starting registry on {} (mock enclave launcher)", addr);
        CinnabarServer::new(registry, auth)
            .serve(addr)
            .await
            .map_err(Error::from)?;

        Ok(StartResponse {}.into())
    }
}
