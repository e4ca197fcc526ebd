use cinnabar_common::registry::state::ComputationId;

use crate::request::Request;

#[derive(Clone, Debug)]
pub struct StatusRequest {
    pub computation_id: ComputationId,
}

impl From<StatusRequest> for Request {
    fn from(request: StatusRequest) -> Self {
        Request::RunStatus(request)
    }
}
