use cinnabar_common::registry::upload::UploadId;
use serde::Serialize;

use crate::response::Response;

#[derive(Clone, Debug, Serialize)]
pub struct CodeResponse {
    pub upload_id: UploadId,
}

#[derive(Clone, Debug, Serialize)]
pub struct DataResponse {
    pub upload_id: UploadId,
}

impl From<CodeResponse> for Response {
    fn from(response: CodeResponse) -> Self {
        Response::UploadCode(response)
    }
}

impl From<DataResponse> for Response {
    fn from(response: DataResponse) -> Self {
        Response::UploadData(response)
    }
}
