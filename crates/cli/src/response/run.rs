use cinnabar_common::registry::types::RunStatusQueryResponse;
use serde::Serialize;

use crate::response::Response;

#[derive(Clone, Debug, Serialize)]
pub struct StatusResponse(pub RunStatusQueryResponse);

impl From<StatusResponse> for Response {
    fn from(response: StatusResponse) -> Self {
        Response::RunStatus(response)
    }
}
