//! Server wiring: the tonic router plus bearer-token authentication.
use std::{collections::HashSet, net::SocketAddr, sync::Arc};

use cinnabar_proto::registry::registry_server::RegistryServer;
use log::info;
use tonic::{
    service::Interceptor,
    transport::{server::Router, Server},
    Request, Status,
};

use crate::{error::Error, launcher::EnclaveLauncher, store::Store, DefaultRegistry};

/// Checks the static bearer token on every request. The token set is the
/// registry's authenticated-channel credential; participant identity rides
/// inside the request payloads as public keys.
#[derive(Clone, Debug)]
pub struct AuthInterceptor {
    tokens: Arc<HashSet<String>>,
}

impl AuthInterceptor {
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            tokens: Arc::new(tokens.into_iter().collect()),
        }
    }
}

impl Interceptor for AuthInterceptor {
    fn call(&mut self, request: Request<()>) -> Result<Request<()>, Status> {
        let token = request
            .metadata()
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match token {
            Some(token) if self.tokens.contains(token) => Ok(request),
            _ => Err(Status::unauthenticated("invalid bearer token")),
        }
    }
}

pub struct CinnabarServer {
    router: Router,
}

impl CinnabarServer {
    pub fn new<L, S>(registry: DefaultRegistry<L, S>, auth: AuthInterceptor) -> Self
    where
        L: EnclaveLauncher + Clone,
        S: Store + Clone,
    {
        let service = RegistryServer::with_interceptor(registry, auth);
        Self {
            router: Server::builder().add_service(service),
        }
    }

    pub async fn serve(self, addr: SocketAddr) -> Result<(), Error> {
        info!("registry listening on {}", addr);
        Ok(self.router.serve(addr).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authed_request(value: &str) -> Request<()> {
        let mut request = Request::new(());
        request
            .metadata_mut()
            .insert("authorization", value.parse().unwrap());
        request
    }

    #[test]
    fn known_token_passes() {
        let mut auth = AuthInterceptor::new(["sekrit".to_string()]);
        assert!(auth.call(authed_request("Bearer sekrit")).is_ok());
    }

    #[test]
    fn unknown_token_is_rejected() {
        let mut auth = AuthInterceptor::new(["sekrit".to_string()]);
        assert!(auth.call(authed_request("Bearer wrong")).is_err());
        assert!(auth.call(authed_request("sekrit")).is_err());
        assert!(auth.call(Request::new(())).is_err());
    }
}
