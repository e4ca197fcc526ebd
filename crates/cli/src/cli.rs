use std::path::PathBuf;

use cinnabar_common::registry::state::{ComputationId, Role};
use clap::{Parser, Subcommand};
use figment::{providers::Serialized, Figment};
use serde::{Deserialize, Serialize};
use tracing::metadata::LevelFilter;

use crate::handler::utils::helpers::parse_role;

#[derive(clap::Args, Debug, Clone, Serialize)]
pub struct Verbosity {
    /// Increase verbosity, can be repeated up to 2 times
    #[arg(long, short, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Verbosity {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Parser, Serialize)]
#[command(version, long_about = None)]
pub struct Cli {
    /// Increase log verbosity
    #[command(flatten)]
    pub verbose: Verbosity,

    /// Path to the Cinnabar app directory.
    /// Defaults to the current working dir
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_dir: Option<PathBuf>,

    /// Main command
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Serialize, Clone)]
pub enum Command {
    /// Generate key material and a config file for this participant
    Init(InitArgs),

    /// Subcommands for the computation lifecycle
    Computation {
        #[command(subcommand)]
        computation_command: ComputationCommand,
    },

    /// Subcommands for the attested enclave
    Enclave {
        #[command(subcommand)]
        enclave_command: EnclaveCommand,
    },

    /// Subcommands for encrypted payload uploads
    Upload {
        #[command(subcommand)]
        upload_command: UploadCommand,
    },

    /// Subcommands for sealed payload keys
    Key {
        #[command(subcommand)]
        key_command: KeyCommand,
    },

    /// Subcommands for runs
    Run {
        #[command(subcommand)]
        run_command: RunCommand,
    },

    /// Subcommands for computation results
    Result {
        #[command(subcommand)]
        result_command: ResultCommand,
    },

    /// Subcommands for hosting a registry
    Registry {
        #[command(subcommand)]
        registry_command: RegistryCommand,
    },
}

#[derive(Debug, Clone, Subcommand, Serialize)]
pub enum ComputationCommand {
    /// Create a computation with this participant as its owner
    Create(ComputationCreateArgs),
    /// Register this participant for a role
    Register(ComputationRegisterArgs),
    /// Approve the participant set (owner only)
    Approve(ComputationArgs),
    /// Abandon a computation before it is approved
    Abandon(ComputationArgs),
    /// Show a computation's participants and phase
    Status(ComputationArgs),
}

#[derive(Debug, Clone, Subcommand, Serialize)]
pub enum EnclaveCommand {
    /// Wait for the enclave identity and verify its attestation quote
    Wait(EnclaveWaitArgs),
}

#[derive(Debug, Clone, Subcommand, Serialize)]
pub enum UploadCommand {
    /// Encrypt and upload a code directory (the entry point stays cleartext)
    Code(UploadCodeArgs),
    /// Encrypt and upload a data file
    Data(UploadDataArgs),
}

#[derive(Debug, Clone, Subcommand, Serialize)]
pub enum KeyCommand {
    /// Seal this participant's payload key to the enclave and submit it
    Provision(KeyProvisionArgs),
}

#[derive(Debug, Clone, Subcommand, Serialize)]
pub enum RunCommand {
    /// Show the current run and the run history
    Status(ComputationArgs),
}

#[derive(Debug, Clone, Subcommand, Serialize)]
pub enum ResultCommand {
    /// Wait for the run to finish and decrypt this participant's result
    Fetch(ResultFetchArgs),
}

#[derive(Debug, Clone, Subcommand, Serialize)]
pub enum RegistryCommand {
    /// Run a registry service backed by the mock enclave
    Start(RegistryStartArgs),
}

#[derive(Debug, Parser, Clone, Serialize, Deserialize)]
pub struct InitArgs {
    /// Overwrite existing key material
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Debug, Parser, Clone, Serialize, Deserialize)]
pub struct ComputationCreateArgs {
    /// Human-readable name for the computation
    #[arg(long)]
    pub name: String,

    /// Declared roles, e.g. code_provider,data_provider,result_consumer
    #[arg(long, value_delimiter = ',', value_parser = parse_role)]
    pub roles: Vec<Role>,

    /// gRPC address of the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_addr: Option<String>,

    /// Bearer token for the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Parser, Clone, Serialize, Deserialize)]
pub struct ComputationRegisterArgs {
    /// Computation UUID
    #[arg(long)]
    pub computation_id: ComputationId,

    /// Role to register for
    #[arg(long, value_parser = parse_role)]
    pub role: Role,

    /// gRPC address of the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_addr: Option<String>,

    /// Bearer token for the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Parser, Clone, Serialize, Deserialize)]
pub struct ComputationArgs {
    /// Computation UUID
    #[arg(long)]
    pub computation_id: ComputationId,

    /// gRPC address of the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_addr: Option<String>,

    /// Bearer token for the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Parser, Clone, Serialize, Deserialize)]
pub struct EnclaveWaitArgs {
    /// Computation UUID
    #[arg(long)]
    pub computation_id: ComputationId,

    /// Expected enclave measurement (hex)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement: Option<String>,

    /// gRPC address of the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_addr: Option<String>,

    /// Bearer token for the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Parser, Clone, Serialize, Deserialize)]
pub struct UploadCodeArgs {
    /// Computation UUID
    #[arg(long)]
    pub computation_id: ComputationId,

    /// Directory containing the code to upload
    #[arg(long)]
    pub code_dir: PathBuf,

    /// Entry-point file, relative to the code directory; it is uploaded in
    /// cleartext so the enclave can execute it before any key arrives
    #[arg(long)]
    pub entry_point: PathBuf,

    /// gRPC address of the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_addr: Option<String>,

    /// Bearer token for the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Parser, Clone, Serialize, Deserialize)]
pub struct UploadDataArgs {
    /// Computation UUID
    #[arg(long)]
    pub computation_id: ComputationId,

    /// Data file to encrypt and upload
    #[arg(long)]
    pub file: PathBuf,

    /// gRPC address of the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_addr: Option<String>,

    /// Bearer token for the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Parser, Clone, Serialize, Deserialize)]
pub struct KeyProvisionArgs {
    /// Computation UUID
    #[arg(long)]
    pub computation_id: ComputationId,

    /// Role this participant holds
    #[arg(long, value_parser = parse_role)]
    pub role: Role,

    /// Expected enclave measurement (hex)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement: Option<String>,

    /// gRPC address of the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_addr: Option<String>,

    /// Bearer token for the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Parser, Clone, Serialize, Deserialize)]
pub struct ResultFetchArgs {
    /// Computation UUID
    #[arg(long)]
    pub computation_id: ComputationId,

    /// File to write the decrypted result to; stdout if unset
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// gRPC address of the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_addr: Option<String>,

    /// Bearer token for the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Parser, Clone, Serialize, Deserialize)]
pub struct RegistryStartArgs {
    /// Address to listen on
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listen_addr: Option<String>,

    /// Enclave measurement the mock launcher reports (hex)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement: Option<String>,

    /// Bearer token accepted by the registry
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

pub trait ToFigment {
    fn to_figment(&self) -> Figment;
}

impl ToFigment for Command {
    fn to_figment(&self) -> Figment {
        match self {
            Command::Init(args) => Figment::from(Serialized::defaults(args)),
            Command::Computation {
                computation_command,
            } => match computation_command {
                ComputationCommand::Create(args) => Figment::from(Serialized::defaults(args)),
                ComputationCommand::Register(args) => Figment::from(Serialized::defaults(args)),
                ComputationCommand::Approve(args)
                | ComputationCommand::Abandon(args)
                | ComputationCommand::Status(args) => Figment::from(Serialized::defaults(args)),
            },
            Command::Enclave { enclave_command } => match enclave_command {
                EnclaveCommand::Wait(args) => Figment::from(Serialized::defaults(args)),
            },
            Command::Upload { upload_command } => match upload_command {
                UploadCommand::Code(args) => Figment::from(Serialized::defaults(args)),
                UploadCommand::Data(args) => Figment::from(Serialized::defaults(args)),
            },
            Command::Key { key_command } => match key_command {
                KeyCommand::Provision(args) => Figment::from(Serialized::defaults(args)),
            },
            Command::Run { run_command } => match run_command {
                RunCommand::Status(args) => Figment::from(Serialized::defaults(args)),
            },
            Command::Result { result_command } => match result_command {
                ResultCommand::Fetch(args) => Figment::from(Serialized::defaults(args)),
            },
            Command::Registry { registry_command } => match registry_command {
                RegistryCommand::Start(args) => Figment::from(Serialized::defaults(args)),
            },
        }
    }
}
