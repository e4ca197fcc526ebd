use color_eyre::{eyre::eyre, Report, Result};

use crate::cli::{
    Command, ComputationCommand, EnclaveCommand, KeyCommand, RegistryCommand, ResultCommand,
    RunCommand, UploadCommand,
};

pub mod computation;
pub mod enclave;
pub mod init;
pub mod key;
pub mod registry;
pub mod result;
pub mod run;
pub mod upload;

#[derive(Clone, Debug)]
pub enum Request {
    Init(init::InitRequest),
    ComputationCreate(computation::CreateRequest),
    ComputationRegister(computation::RegisterRequest),
    ComputationApprove(computation::ApproveRequest),
    ComputationAbandon(computation::AbandonRequest),
    ComputationStatus(computation::StatusRequest),
    EnclaveWait(enclave::WaitRequest),
    UploadCode(upload::CodeRequest),
    UploadData(upload::DataRequest),
    KeyProvision(key::ProvisionRequest),
    RunStatus(run::StatusRequest),
    ResultFetch(result::FetchRequest),
    RegistryStart(registry::StartRequest),
}

impl TryFrom<Command> for Request {
    type Error = Report;

    fn try_from(cmd: Command) -> Result<Self, Self::Error> {
        match cmd {
            Command::Init(args) => Ok(init::InitRequest { force: args.force }.into()),
            Command::Computation {
                computation_command,
            } => computation_command.try_into(),
            Command::Enclave { enclave_command } => match enclave_command {
                EnclaveCommand::Wait(args) => Ok(enclave::WaitRequest {
                    computation_id: args.computation_id,
                }
                .into()),
            },
            Command::Upload { upload_command } => upload_command.try_into(),
            Command::Key { key_command } => match key_command {
                KeyCommand::Provision(args) => Ok(key::ProvisionRequest {
                    computation_id: args.computation_id,
                    role: args.role,
                }
                .into()),
            },
            Command::Run { run_command } => match run_command {
                RunCommand::Status(args) => Ok(run::StatusRequest {
                    computation_id: args.computation_id,
                }
                .into()),
            },
            Command::Result { result_command } => match result_command {
                ResultCommand::Fetch(args) => Ok(result::FetchRequest {
                    computation_id: args.computation_id,
                    output: args.output,
                }
                .into()),
            },
            Command::Registry { registry_command } => match registry_command {
                RegistryCommand::Start(_) => Ok(registry::StartRequest {}.into()),
            },
        }
    }
}

impl TryFrom<ComputationCommand> for Request {
    type Error = Report;

    fn try_from(cmd: ComputationCommand) -> Result<Request> {
        match cmd {
            ComputationCommand::Create(args) => {
                if args.roles.is_empty() {
                    return Err(eyre!("at least one role must be declared"));
                }
                Ok(computation::CreateRequest {
                    name: args.name,
                    roles: args.roles,
                }
                .into())
            }
            ComputationCommand::Register(args) => Ok(computation::RegisterRequest {
                computation_id: args.computation_id,
                role: args.role,
            }
            .into()),
            ComputationCommand::Approve(args) => Ok(computation::ApproveRequest {
                computation_id: args.computation_id,
            }
            .into()),
            ComputationCommand::Abandon(args) => Ok(computation::AbandonRequest {
                computation_id: args.computation_id,
            }
            .into()),
            ComputationCommand::Status(args) => Ok(computation::StatusRequest {
                computation_id: args.computation_id,
            }
            .into()),
        }
    }
}

impl TryFrom<UploadCommand> for Request {
    type Error = Report;

    fn try_from(cmd: UploadCommand) -> Result<Request> {
        match cmd {
            UploadCommand::Code(args) => {
                if !args.code_dir.is_dir() {
                    return Err(eyre!(
                        "the code directory does not exist: {}",
                        args.code_dir.display()
                    ));
                }
                if !args.code_dir.join(&args.entry_point).is_file() {
                    return Err(eyre!(
                        "the entry point does not exist: {}",
                        args.entry_point.display()
                    ));
                }
                Ok(upload::CodeRequest {
                    computation_id: args.computation_id,
                    code_dir: args.code_dir,
                    entry_point: args.entry_point,
                }
                .into())
            }
            UploadCommand::Data(args) => {
                if !args.file.is_file() {
                    return Err(eyre!("the data file does not exist: {}", args.file.display()));
                }
                Ok(upload::DataRequest {
                    computation_id: args.computation_id,
                    file: args.file,
                }
                .into())
            }
        }
    }
}
