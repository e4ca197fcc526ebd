use displaydoc::Display;
use thiserror::Error;

#[derive(Debug, Display, Error)]
pub enum Error {
    /// specified path `{0}` is not a directory
    PathNotDir(String),
    /// key file `{0}` does not exist; run `cinnabar init` first
    KeyFileMissing(String),
    /// key file `{0}` already exists; pass --force to overwrite
    KeyFileExists(String),
    /// invalid measurement hex: {0}
    InvalidMeasurement(String),
    /// invalid key material: {0}
    InvalidKey(String),
    /// invalid role `{0}`
    InvalidRole(String),
    /// invalid listen address: {0}
    InvalidListenAddr(String),
    /// Config error: {0}
    Config(String),
    /// unspecified error: {0}
    GenericErr(String),
    /// TOML Error: {0}
    TomlError(#[from] toml::de::Error),
    /// TOML Error: {0}
    TomlSerError(#[from] toml::ser::Error),
    /// JSON Error: {0}
    JsonError(#[from] serde_json::Error),
    /// IO Error: {0}
    IoError(#[from] std::io::Error),
    /// Client error: {0}
    ClientError(#[from] cinnabar_common::client::Error),
    /// Registry error: {0}
    RegistryError(#[from] cinnabar_common::registry::Error),
}
