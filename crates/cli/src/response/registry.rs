use serde::Serialize;

use crate::response::Response;

#[derive(Clone, Debug, Serialize)]
pub struct StartResponse {}

impl From<StartResponse> for Response {
    fn from(response: StartResponse) -> Self {
        Response::RegistryStart(response)
    }
}
