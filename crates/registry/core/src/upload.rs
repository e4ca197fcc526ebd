//! Chunked, resumable payload uploads.
//!
//! A payload is declared up front (length + SHA-256 digest), streamed in
//! fixed-size chunks, and becomes visible to the registry only when the
//! committed bytes verify against the declaration. Interrupted uploads are
//! resumed by querying the missing chunk sequence numbers.
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::Error;

pub const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadId(Uuid);

impl UploadId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for UploadId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UploadId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Code,
    Data,
}

impl Display for PayloadKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadKind::Code => write!(f, "code"),
            PayloadKind::Data => write!(f, "data"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UploadSession {
    kind: PayloadKind,
    owner: Vec<u8>,
    total_len: u64,
    digest: [u8; 32],
    chunks: BTreeMap<u64, Vec<u8>>,
    committed: bool,
}

impl UploadSession {
    pub fn new(kind: PayloadKind, owner: Vec<u8>, total_len: u64, digest: [u8; 32]) -> Self {
        Self {
            kind,
            owner,
            total_len,
            digest,
            chunks: BTreeMap::new(),
            committed: false,
        }
    }

    pub fn kind(&self) -> PayloadKind {
        self.kind
    }

    pub fn owner(&self) -> &[u8] {
        &self.owner
    }

    pub fn committed(&self) -> bool {
        self.committed
    }

    pub fn chunk_count(&self) -> u64 {
        self.total_len.div_ceil(CHUNK_SIZE as u64)
    }

    pub fn missing_chunks(&self) -> Vec<u64> {
        (0..self.chunk_count())
            .filter(|seq| !self.chunks.contains_key(seq))
            .collect()
    }

    /// Accepts one chunk. All chunks are `CHUNK_SIZE` bytes except the last;
    /// re-sending a chunk overwrites it, which makes retries harmless.
    pub fn insert_chunk(&mut self, seq: u64, bytes: Vec<u8>) -> Result<(), Error> {
        if self.committed {
            return Err(Error::UploadClosed);
        }
        let count = self.chunk_count();
        if seq >= count {
            return Err(Error::ChunkOutOfRange { seq, count });
        }

        let expected = if seq == count - 1 {
            self.total_len as usize - (count as usize - 1) * CHUNK_SIZE
        } else {
            CHUNK_SIZE
        };
        if bytes.len() != expected {
            return Err(Error::ChunkSizeMismatch { seq });
        }

        self.chunks.insert(seq, bytes);
        Ok(())
    }

    /// Verifies completeness and the declared digest, then seals the session
    /// and returns the assembled payload.
    pub fn commit(&mut self) -> Result<Vec<u8>, Error> {
        if self.committed {
            return Err(Error::UploadClosed);
        }
        let missing = self.chunk_count() - self.chunks.len() as u64;
        if missing > 0 {
            return Err(Error::UploadIncomplete { missing });
        }

        let mut payload = Vec::with_capacity(self.total_len as usize);
        for bytes in self.chunks.values() {
            payload.extend_from_slice(bytes);
        }

        let digest: [u8; 32] = Sha256::digest(&payload).into();
        if digest != self.digest {
            return Err(Error::UploadCorrupted);
        }

        self.committed = true;
        self.chunks.clear();
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest_of(bytes: &[u8]) -> [u8; 32] {
        Sha256::digest(bytes).into()
    }

    fn payload_of(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn single_chunk_upload() {
        let payload = b"tiny".to_vec();
        let mut session =
            UploadSession::new(PayloadKind::Data, vec![1], 4, digest_of(&payload));
        assert_eq!(session.chunk_count(), 1);

        session.insert_chunk(0, payload.clone()).unwrap();
        assert_eq!(session.commit().unwrap(), payload);
        assert!(session.committed());
    }

    #[test]
    fn multi_chunk_upload_with_resume() {
        let payload = payload_of(CHUNK_SIZE * 2 + 10);
        let mut session = UploadSession::new(
            PayloadKind::Code,
            vec![1],
            payload.len() as u64,
            digest_of(&payload),
        );
        assert_eq!(session.chunk_count(), 3);

        session
            .insert_chunk(0, payload[..CHUNK_SIZE].to_vec())
            .unwrap();
        session
            .insert_chunk(2, payload[2 * CHUNK_SIZE..].to_vec())
            .unwrap();

        // chunk 1 was lost: the session is not committable yet
        assert_eq!(session.missing_chunks(), vec![1]);
        assert!(matches!(
            session.commit(),
            Err(Error::UploadIncomplete { missing: 1 })
        ));

        session
            .insert_chunk(1, payload[CHUNK_SIZE..2 * CHUNK_SIZE].to_vec())
            .unwrap();
        assert_eq!(session.commit().unwrap(), payload);
    }

    #[test]
    fn digest_mismatch_is_rejected() {
        let payload = b"payload".to_vec();
        let mut session =
            UploadSession::new(PayloadKind::Data, vec![1], 7, digest_of(b"other"));
        session.insert_chunk(0, payload).unwrap();
        assert!(matches!(session.commit(), Err(Error::UploadCorrupted)));
    }

    #[test]
    fn chunk_bounds_are_validated() {
        let payload = payload_of(CHUNK_SIZE + 1);
        let mut session = UploadSession::new(
            PayloadKind::Data,
            vec![1],
            payload.len() as u64,
            digest_of(&payload),
        );

        assert!(matches!(
            session.insert_chunk(5, vec![0; CHUNK_SIZE]),
            Err(Error::ChunkOutOfRange { seq: 5, count: 2 })
        ));
        assert!(matches!(
            session.insert_chunk(0, vec![0; 12]),
            Err(Error::ChunkSizeMismatch { seq: 0 })
        ));
        assert!(matches!(
            session.insert_chunk(1, vec![0; 2]),
            Err(Error::ChunkSizeMismatch { seq: 1 })
        ));
    }

    #[test]
    fn committed_session_rejects_further_writes() {
        let payload = b"done".to_vec();
        let mut session =
            UploadSession::new(PayloadKind::Data, vec![1], 4, digest_of(&payload));
        session.insert_chunk(0, payload.clone()).unwrap();
        session.commit().unwrap();

        assert!(matches!(
            session.insert_chunk(0, payload),
            Err(Error::UploadClosed)
        ));
        assert!(matches!(session.commit(), Err(Error::UploadClosed)));
    }
}
