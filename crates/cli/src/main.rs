use std::path::PathBuf;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Cli, ToFigment},
    config::Config,
    handler::Handler,
    request::Request,
};

mod cli;
mod config;
mod error;
mod handler;
mod keys;
mod request;
mod response;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.verbose.to_level_filter().into())
                .from_env_lossy(),
        )
        .init();

    let app_dir = args.app_dir.clone().unwrap_or_else(|| PathBuf::from("."));

    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(Config::config_path(&app_dir)))
        .merge(Env::prefixed("CINNABAR_"))
        .merge(args.command.to_figment());
    let mut config: Config = figment.extract().map_err(|e| eyre!("config error: {e}"))?;
    config.app_dir = app_dir;

    let request = Request::try_from(args.command)?;
    let response = request.handle(config).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
