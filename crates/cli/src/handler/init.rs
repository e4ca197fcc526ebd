use std::fs;

use async_trait::async_trait;
use color_eyre::{Report, Result};
use tracing::info;

use crate::{
    config::Config,
    error::Error,
    handler::Handler,
    keys::KeyFile,
    request::init::InitRequest,
    response::{init::InitResponse, Response},
};

#[async_trait]
impl Handler for InitRequest {
    type Response = Response;

    async fn handle<C: AsRef<Config> + Send>(self, config: C) -> Result<Self::Response, Report> {
        let config = config.as_ref();

        if !config.app_dir.is_dir() {
            return Err(Error::PathNotDir(config.app_dir.display().to_string()).into());
        }

        let key_path = config.key_path();
        if key_path.exists() && !self.force {
            return Err(Error::KeyFileExists(key_path.display().to_string()).into());
        }

        let (key_file, ctx) = KeyFile::generate();
        key_file.save(&key_path).map_err(Error::from)?;
        info!("wrote key material to {}", key_path.display());

        let config_path = Config::config_path(&config.app_dir);
        if !config_path.exists() {
            fs::write(
                &config_path,
                toml::to_string(&Config::default()).map_err(Error::from)?,
            )
            .map_err(Error::from)?;
            info!("wrote default config to {}", config_path.display());
        }

        Ok(InitResponse {
            config_path,
            key_path,
            public_key: hex::encode(ctx.public_key()),
        }
        .into())
    }
}
