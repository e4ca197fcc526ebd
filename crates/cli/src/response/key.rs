use serde::Serialize;

use crate::response::Response;

#[derive(Clone, Debug, Serialize)]
pub struct ProvisionResponse {
    pub run_started: bool,
}

impl From<ProvisionResponse> for Response {
    fn from(response: ProvisionResponse) -> Self {
        Response::KeyProvision(response)
    }
}
