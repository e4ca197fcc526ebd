use cinnabar_common::registry::state::{ComputationId, Role};

use crate::request::Request;

#[derive(Clone, Debug)]
pub struct ProvisionRequest {
    pub computation_id: ComputationId,
    pub role: Role,
}

impl From<ProvisionRequest> for Request {
    fn from(request: ProvisionRequest) -> Self {
        Request::KeyProvision(request)
    }
}
