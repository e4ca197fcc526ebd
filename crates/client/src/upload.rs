//! Chunked, resumable payload upload.
use cinnabar_registry_core::{
    state::ComputationId,
    types::{UploadBeginRequest, UploadChunkRequest},
    upload::{PayloadKind, UploadId},
};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::{client::RegistryClient, error::Error};

const MAX_ATTEMPTS: usize = 3;

/// Uploads a payload in chunks and commits it. If chunks go missing (lost
/// requests, interrupted process re-running with the same upload id), the
/// registry's upload status is the resume point: only missing chunks are
/// re-sent. The payload is never visible to the registry until the commit
/// verifies its digest.
pub async fn upload_payload<C: RegistryClient>(
    client: &C,
    computation_id: ComputationId,
    kind: PayloadKind,
    pub_key: Vec<u8>,
    payload: &[u8],
) -> Result<UploadId, Error> {
    let digest: [u8; 32] = Sha256::digest(payload).into();
    let begin = client
        .upload_begin(UploadBeginRequest {
            computation_id,
            kind,
            pub_key,
            total_len: payload.len() as u64,
            digest,
        })
        .await?;
    let upload_id = begin.upload_id;
    let chunk_size = begin.chunk_size as usize;

    let chunk = |seq: u64| {
        let start = seq as usize * chunk_size;
        let end = usize::min(start + chunk_size, payload.len());
        payload[start..end].to_vec()
    };

    let mut missing: Vec<u64> = (0..payload.len().div_ceil(chunk_size) as u64).collect();
    for attempt in 1..=MAX_ATTEMPTS {
        for &seq in &missing {
            let send = client
                .upload_chunk(UploadChunkRequest {
                    computation_id,
                    upload_id,
                    seq,
                    bytes: chunk(seq),
                })
                .await;
            if let Err(e) = send {
                warn!("chunk {} failed on attempt {}: {}", seq, attempt, e);
                break;
            }
        }

        let status = client.upload_status(computation_id, upload_id).await?;
        if status.missing.is_empty() {
            client.upload_commit(computation_id, upload_id).await?;
            return Ok(upload_id);
        }

        debug!(
            "resuming upload {}: {} chunk(s) still missing",
            upload_id,
            status.missing.len()
        );
        missing = status.missing;
    }

    Err(Error::Transport(format!(
        "upload {} did not complete after {} attempts",
        upload_id, MAX_ATTEMPTS
    )))
}
