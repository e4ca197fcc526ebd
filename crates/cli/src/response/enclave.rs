use serde::Serialize;

use crate::response::Response;

#[derive(Clone, Debug, Serialize)]
pub struct WaitResponse {
    pub pub_key: String,
    pub measurement: String,
}

impl From<WaitResponse> for Response {
    fn from(response: WaitResponse) -> Self {
        Response::EnclaveWait(response)
    }
}
