use std::{fs, path::Path};

use cinnabar_common::{client::CryptoContext, crypto::SymmetricKey};
use k256::ecdsa::SigningKey;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use tracing::debug;

use crate::error::Error;

/// On-disk key material for one participant. Private to this machine; only
/// the public key and the sealed payload key ever leave it.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyFile {
    #[serde_as(as = "Hex")]
    identity: Vec<u8>,
    #[serde_as(as = "Hex")]
    payload_key: Vec<u8>,
}

impl KeyFile {
    pub fn generate() -> (Self, CryptoContext) {
        let ctx = CryptoContext::generate();
        (Self::from(&ctx), ctx)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<CryptoContext, Error> {
        if !path.exists() {
            return Err(Error::KeyFileMissing(path.display().to_string()));
        }
        debug!("loading key material from {}", path.display());
        let file: KeyFile = toml::from_str(&fs::read_to_string(path)?)?;
        file.try_into()
    }
}

impl From<&CryptoContext> for KeyFile {
    fn from(ctx: &CryptoContext) -> Self {
        Self {
            identity: ctx.identity().to_bytes().to_vec(),
            payload_key: ctx.payload_key().as_bytes().to_vec(),
        }
    }
}

impl TryFrom<KeyFile> for CryptoContext {
    type Error = Error;

    fn try_from(file: KeyFile) -> Result<Self, Self::Error> {
        let identity =
            SigningKey::from_slice(&file.identity).map_err(|e| Error::InvalidKey(e.to_string()))?;
        let payload_key = SymmetricKey::try_from(file.payload_key.as_slice())
            .map_err(|e| Error::InvalidKey(e.to_string()))?;
        Ok(CryptoContext::from_parts(identity, payload_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.toml");

        let (file, ctx) = KeyFile::generate();
        file.save(&path).unwrap();

        let loaded = KeyFile::load(&path).unwrap();
        assert_eq!(loaded.public_key(), ctx.public_key());
    }

    #[test]
    fn missing_key_file_is_reported() {
        assert!(matches!(
            KeyFile::load(Path::new("/definitely/not/here.toml")),
            Err(Error::KeyFileMissing(_))
        ));
    }
}
