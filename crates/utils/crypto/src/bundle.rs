//! Code bundles: a directory tree packaged for upload to the enclave.
//!
//! Every file except the designated entry point is encrypted with the code
//! provider's symmetric key. The entry point stays in cleartext because the
//! enclave must execute it before any decryption key has been provisioned.
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{cipher::SymmetricKey, error::Error};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBundle {
    entries: Vec<BundleEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleEntry {
    pub path: String,
    pub body: EntryBody,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryBody {
    Clear(Vec<u8>),
    Encrypted(Vec<u8>),
}

impl CodeBundle {
    /// Packages the directory rooted at `root`. `entry_point` is the
    /// root-relative path of the file left in cleartext.
    pub fn build(root: &Path, entry_point: &Path, key: &SymmetricKey) -> Result<Self, Error> {
        let mut files = Vec::new();
        collect_files(root, root, &mut files)?;
        // deterministic entry order regardless of directory walk order
        files.sort();

        let mut entries = Vec::with_capacity(files.len());
        let mut found_entry_point = false;

        for rel in files {
            let bytes = fs::read(root.join(&rel))?;
            let path = rel.to_string_lossy().into_owned();

            let body = if rel == entry_point {
                found_entry_point = true;
                EntryBody::Clear(bytes)
            } else {
                EntryBody::Encrypted(key.encrypt(&bytes)?)
            };

            entries.push(BundleEntry { path, body });
        }

        if !found_entry_point {
            return Err(Error::MissingEntryPoint(
                entry_point.to_string_lossy().into_owned(),
            ));
        }

        Ok(Self { entries })
    }

    /// The cleartext entry point, if the bundle carries one.
    pub fn entry_point(&self) -> Option<(&str, &[u8])> {
        self.entries.iter().find_map(|e| match &e.body {
            EntryBody::Clear(bytes) => Some((e.path.as_str(), bytes.as_slice())),
            EntryBody::Encrypted(_) => None,
        })
    }

    /// Decrypts every entry, returning `(path, plaintext)` pairs.
    pub fn open(&self, key: &SymmetricKey) -> Result<Vec<(String, Vec<u8>)>, Error> {
        self.entries
            .iter()
            .map(|e| {
                let bytes = match &e.body {
                    EntryBody::Clear(bytes) => bytes.clone(),
                    EntryBody::Encrypted(ciphertext) => key.decrypt(ciphertext)?,
                };
                Ok((e.path.clone(), bytes))
            })
            .collect()
    }

    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        ciborium::ser::into_writer(self, &mut buf)
            .map_err(|e| Error::BundleEncode(e.to_string()))?;
        Ok(buf)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        ciborium::de::from_reader(bytes).map_err(|e| Error::BundleDecode(e.to_string()))
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), Error> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(root, &path, out)?;
        } else {
            let rel = path
                .strip_prefix(root)
                .expect("walked paths are rooted at `root`")
                .to_path_buf();
            out.push(rel);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn sample_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.py"), b"print('entry')").unwrap();
        fs::write(dir.path().join("model.py"), b"weights = [1, 2, 3]").unwrap();
        fs::create_dir(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/util.py"), b"def f(): pass").unwrap();
        dir
    }

    #[test]
    fn entry_point_stays_clear_siblings_do_not() {
        let dir = sample_dir();
        let key = SymmetricKey::generate();

        let bundle = CodeBundle::build(dir.path(), Path::new("main.py"), &key).unwrap();

        let (path, bytes) = bundle.entry_point().unwrap();
        assert_eq!(path, "main.py");
        assert_eq!(bytes, b"print('entry')");

        let encrypted: Vec<_> = bundle
            .entries
            .iter()
            .filter(|e| matches!(e.body, EntryBody::Encrypted(_)))
            .map(|e| e.path.as_str())
            .collect();
        assert_eq!(encrypted, vec!["lib/util.py", "model.py"]);
    }

    #[test]
    fn open_recovers_every_file() {
        let dir = sample_dir();
        let key = SymmetricKey::generate();

        let bundle = CodeBundle::build(dir.path(), Path::new("main.py"), &key).unwrap();
        let files = bundle.open(&key).unwrap();

        assert_eq!(files.len(), 3);
        assert!(files
            .iter()
            .any(|(p, b)| p == "model.py" && b == b"weights = [1, 2, 3]"));
    }

    #[test]
    fn encode_decode_round_trip() {
        let dir = sample_dir();
        let key = SymmetricKey::generate();

        let bundle = CodeBundle::build(dir.path(), Path::new("main.py"), &key).unwrap();
        let decoded = CodeBundle::decode(&bundle.encode().unwrap()).unwrap();
        assert_eq!(decoded, bundle);
    }

    #[test]
    fn missing_entry_point_is_an_error() {
        let dir = sample_dir();
        let key = SymmetricKey::generate();

        assert!(matches!(
            CodeBundle::build(dir.path(), Path::new("nope.py"), &key),
            Err(Error::MissingEntryPoint(_))
        ));
    }

    #[test]
    fn wrong_key_cannot_open() {
        let dir = sample_dir();
        let key = SymmetricKey::generate();

        let bundle = CodeBundle::build(dir.path(), Path::new("main.py"), &key).unwrap();
        assert!(bundle.open(&SymmetricKey::generate()).is_err());
    }
}
