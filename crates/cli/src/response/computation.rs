use cinnabar_common::registry::{
    state::{ComputationId, Phase, Role},
    types::ComputationQueryResponse,
};
use serde::Serialize;

use crate::response::Response;

#[derive(Clone, Debug, Serialize)]
pub struct CreateResponse {
    pub computation_id: ComputationId,
    /// The word sequence participants compare out-of-band
    pub context_phrase: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegisterResponse {
    pub computation_id: ComputationId,
    pub role: Role,
}

#[derive(Clone, Debug, Serialize)]
pub struct ApproveResponse {
    pub phase: Phase,
}

#[derive(Clone, Debug, Serialize)]
pub struct AbandonResponse {
    pub phase: Phase,
}

#[derive(Clone, Debug, Serialize)]
pub struct StatusResponse(pub ComputationQueryResponse);

impl From<CreateResponse> for Response {
    fn from(response: CreateResponse) -> Self {
        Response::ComputationCreate(response)
    }
}

impl From<RegisterResponse> for Response {
    fn from(response: RegisterResponse) -> Self {
        Response::ComputationRegister(response)
    }
}

impl From<ApproveResponse> for Response {
    fn from(response: ApproveResponse) -> Self {
        Response::ComputationApprove(response)
    }
}

impl From<AbandonResponse> for Response {
    fn from(response: AbandonResponse) -> Self {
        Response::ComputationAbandon(response)
    }
}

impl From<StatusResponse> for Response {
    fn from(response: StatusResponse) -> Self {
        Response::ComputationStatus(response)
    }
}
