use std::path::PathBuf;

use cinnabar_common::registry::state::ComputationId;

use crate::request::Request;

#[derive(Clone, Debug)]
pub struct FetchRequest {
    pub computation_id: ComputationId,
    pub output: Option<PathBuf>,
}

impl From<FetchRequest> for Request {
    fn from(request: FetchRequest) -> Self {
        Request::ResultFetch(request)
    }
}
