use cinnabar_common::registry::state::ComputationId;

use crate::request::Request;

#[derive(Clone, Debug)]
pub struct WaitRequest {
    pub computation_id: ComputationId,
}

impl From<WaitRequest> for Request {
    fn from(request: WaitRequest) -> Self {
        Request::EnclaveWait(request)
    }
}
