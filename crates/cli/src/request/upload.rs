use std::path::PathBuf;

use cinnabar_common::registry::state::ComputationId;

use crate::request::Request;

#[derive(Clone, Debug)]
pub struct CodeRequest {
    pub computation_id: ComputationId,
    pub code_dir: PathBuf,
    pub entry_point: PathBuf,
}

#[derive(Clone, Debug)]
pub struct DataRequest {
    pub computation_id: ComputationId,
    pub file: PathBuf,
}

impl From<CodeRequest> for Request {
    fn from(request: CodeRequest) -> Self {
        Request::UploadCode(request)
    }
}

impl From<DataRequest> for Request {
    fn from(request: DataRequest) -> Self {
        Request::UploadData(request)
    }
}
