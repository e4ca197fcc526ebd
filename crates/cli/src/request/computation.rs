use cinnabar_common::registry::state::{ComputationId, Role};

use crate::request::Request;

#[derive(Clone, Debug)]
pub struct CreateRequest {
    pub name: String,
    pub roles: Vec<Role>,
}

#[derive(Clone, Debug)]
pub struct RegisterRequest {
    pub computation_id: ComputationId,
    pub role: Role,
}

#[derive(Clone, Debug)]
pub struct ApproveRequest {
    pub computation_id: ComputationId,
}

#[derive(Clone, Debug)]
pub struct AbandonRequest {
    pub computation_id: ComputationId,
}

#[derive(Clone, Debug)]
pub struct StatusRequest {
    pub computation_id: ComputationId,
}

impl From<CreateRequest> for Request {
    fn from(request: CreateRequest) -> Self {
        Request::ComputationCreate(request)
    }
}

impl From<RegisterRequest> for Request {
    fn from(request: RegisterRequest) -> Self {
        Request::ComputationRegister(request)
    }
}

impl From<ApproveRequest> for Request {
    fn from(request: ApproveRequest) -> Self {
        Request::ComputationApprove(request)
    }
}

impl From<AbandonRequest> for Request {
    fn from(request: AbandonRequest) -> Self {
        Request::ComputationAbandon(request)
    }
}

impl From<StatusRequest> for Request {
    fn from(request: StatusRequest) -> Self {
        Request::ComputationStatus(request)
    }
}
