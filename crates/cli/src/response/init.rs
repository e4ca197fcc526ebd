use std::path::PathBuf;

use serde::Serialize;

use crate::response::Response;

#[derive(Clone, Debug, Serialize)]
pub struct InitResponse {
    pub config_path: PathBuf,
    pub key_path: PathBuf,
    pub public_key: String,
}

impl From<InitResponse> for Response {
    fn from(response: InitResponse) -> Self {
        Response::Init(response)
    }
}
