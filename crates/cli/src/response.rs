use serde::Serialize;

pub mod computation;
pub mod enclave;
pub mod init;
pub mod key;
pub mod registry;
pub mod result;
pub mod run;
pub mod upload;

#[derive(Clone, Debug, Serialize)]
pub enum Response {
    Init(init::InitResponse),
    ComputationCreate(computation::CreateResponse),
    ComputationRegister(computation::RegisterResponse),
    ComputationApprove(computation::ApproveResponse),
    ComputationAbandon(computation::AbandonResponse),
    ComputationStatus(computation::StatusResponse),
    EnclaveWait(enclave::WaitResponse),
    UploadCode(upload::CodeResponse),
    UploadData(upload::DataResponse),
    KeyProvision(key::ProvisionResponse),
    RunStatus(run::StatusResponse),
    ResultFetch(result::FetchResponse),
    RegistryStart(registry::StartResponse),
}
