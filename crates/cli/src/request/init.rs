use crate::request::Request;

#[derive(Clone, Debug)]
pub struct InitRequest {
    pub force: bool,
}

impl From<InitRequest> for Request {
    fn from(request: InitRequest) -> Self {
        Request::Init(request)
    }
}
