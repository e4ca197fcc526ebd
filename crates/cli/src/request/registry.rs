use crate::request::Request;

#[derive(Clone, Debug)]
pub struct StartRequest {}

impl From<StartRequest> for Request {
    fn from(request: StartRequest) -> Self {
        Request::RegistryStart(request)
    }
}
