use thiserror::Error;
use tonic::Status;

use crate::{
    state::{ComputationId, Phase, Role},
    types::RunFailure,
    upload::UploadId,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown computation: {0}")]
    UnknownComputation(ComputationId),
    #[error("role {0} is already filled")]
    DuplicateRole(Role),
    #[error("invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: Phase, to: Phase },
    #[error("sealed key already provisioned for role {0}")]
    AlreadyProvisioned(Role),
    #[error("result not ready")]
    ResultNotReady,
    #[error("run failed with exit code {}", .0.exit_code)]
    RunFailed(RunFailure),
    #[error("caller is not authorized for this operation")]
    Unauthorized,
    #[error("caller is not a participant of this computation")]
    UnknownParticipant,
    #[error("unknown upload: {0}")]
    UnknownUpload(UploadId),
    #[error("payload already uploaded for role {0}")]
    AlreadyUploaded(Role),
    #[error("role {0} must upload its payload before provisioning a key")]
    PayloadNotUploaded(Role),
    #[error("declared roles not yet filled: {missing:?}")]
    RolesUnfilled { missing: Vec<Role> },
    #[error("invalid role declaration: {0}")]
    InvalidRoles(String),
    #[error("enclave identity has not been published yet")]
    EnclaveIdentityMissing,
    #[error("upload incomplete: {missing} chunk(s) missing")]
    UploadIncomplete { missing: u64 },
    #[error("upload payload does not match its declared digest")]
    UploadCorrupted,
    #[error("upload is already committed")]
    UploadClosed,
    #[error("chunk {seq} out of range (upload has {count} chunks)")]
    ChunkOutOfRange { seq: u64, count: u64 },
    #[error("chunk {seq} has the wrong size")]
    ChunkSizeMismatch { seq: u64 },
    #[error("enclave launcher error: {0}")]
    Launcher(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("tonic transport error: {0}")]
    TonicTransport(#[from] tonic::transport::Error),
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::UnknownComputation(_) | Error::UnknownParticipant | Error::UnknownUpload(_) => {
                Status::not_found(err.to_string())
            }
            Error::DuplicateRole(_) | Error::AlreadyProvisioned(_) | Error::AlreadyUploaded(_) => {
                Status::already_exists(err.to_string())
            }
            Error::InvalidStateTransition { .. }
            | Error::PayloadNotUploaded(_)
            | Error::RolesUnfilled { .. }
            | Error::EnclaveIdentityMissing
            | Error::UploadIncomplete { .. }
            | Error::UploadCorrupted
            | Error::UploadClosed => Status::failed_precondition(err.to_string()),
            Error::Unauthorized => Status::permission_denied(err.to_string()),
            Error::InvalidRoles(_)
            | Error::ChunkOutOfRange { .. }
            | Error::ChunkSizeMismatch { .. } => Status::invalid_argument(err.to_string()),
            Error::ResultNotReady => Status::unavailable(err.to_string()),
            // the failure detail rides in the status message so clients can
            // surface exit code and captured streams verbatim
            Error::RunFailed(failure) => Status::aborted(
                serde_json::to_string(&failure).expect("infallible serializer"),
            ),
            Error::Launcher(_) | Error::Store(_) | Error::TonicTransport(_) => {
                Status::internal(err.to_string())
            }
        }
    }
}
