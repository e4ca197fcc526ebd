use std::{path::PathBuf, time::Duration};

use cinnabar_common::{client::PollOpts, crypto::Measurement};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// gRPC address of the registry
    #[serde(default = "default_registry_addr")]
    pub registry_addr: String,

    /// Bearer token for the registry's authenticated channel
    #[serde(default = "default_token")]
    pub token: String,

    /// Expected enclave measurement (hex)
    #[serde(default = "default_measurement")]
    pub measurement: String,

    /// Path to the Cinnabar app directory.
    /// Defaults to current working dir
    #[serde(default = "default_app_dir", skip_serializing)]
    pub app_dir: PathBuf,

    /// Key file, relative to the app directory
    #[serde(default = "default_key_file")]
    pub key_file: PathBuf,

    /// Address the registry listens on (`registry start`)
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Poll interval for blocking waits, in seconds
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Poll timeout for blocking waits, in seconds
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
}

fn default_registry_addr() -> String {
    "http://127.0.0.1:11090".to_string()
}

fn default_token() -> String {
    "devnet".to_string()
}

fn default_measurement() -> String {
    hex::encode([0u8; 32])
}

fn default_app_dir() -> PathBuf {
    ".".parse().expect("default app_dir pathbuf failed")
}

fn default_key_file() -> PathBuf {
    "cinnabar.keys.toml".parse().expect("default key_file pathbuf failed")
}

fn default_listen_addr() -> String {
    "127.0.0.1:11090".to_string()
}

fn default_poll_interval_secs() -> u64 {
    2
}

fn default_poll_timeout_secs() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Config {
            registry_addr: default_registry_addr(),
            token: default_token(),
            measurement: default_measurement(),
            app_dir: default_app_dir(),
            key_file: default_key_file(),
            listen_addr: default_listen_addr(),
            poll_interval_secs: default_poll_interval_secs(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

impl AsRef<Config> for Config {
    fn as_ref(&self) -> &Config {
        self
    }
}

impl Config {
    pub fn config_path(app_dir: &std::path::Path) -> PathBuf {
        app_dir.join("cinnabar.toml")
    }

    pub fn key_path(&self) -> PathBuf {
        self.app_dir.join(&self.key_file)
    }

    pub fn poll_opts(&self) -> PollOpts {
        PollOpts {
            interval: Duration::from_secs(self.poll_interval_secs),
            timeout: Duration::from_secs(self.poll_timeout_secs),
        }
    }

    /// The expected measurement baseline.
    pub fn measurement(&self) -> Result<Measurement, Error> {
        let bytes =
            hex::decode(&self.measurement).map_err(|e| Error::InvalidMeasurement(e.to_string()))?;
        bytes
            .try_into()
            .map_err(|_| Error::InvalidMeasurement("measurement must be 32 bytes".to_string()))
    }
}
