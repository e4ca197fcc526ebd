use std::path::PathBuf;

use serde::Serialize;

use crate::response::Response;

#[derive(Clone, Debug, Serialize)]
pub struct FetchResponse {
    pub bytes: usize,
    /// Where the decrypted result was written; stdout if unset
    pub output: Option<PathBuf>,
}

impl From<FetchResponse> for Response {
    fn from(response: FetchResponse) -> Self {
        Response::ResultFetch(response)
    }
}
