use crate::commands::{
    run_import, run_list_users, run_register, ImportArgs, ListUsersArgs, RegisterArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use user_registry::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "User Registry",
    about = "Validate, register and serve user records backed by a flat-file store",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Register a single user and print the outcome
    Register(RegisterArgs),
    /// Register every row of a CSV export in order
    Import(ImportArgs),
    /// Inspect stored users
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    /// List stored users without their passwords
    List(ListUsersArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured user data file
    #[arg(long)]
    pub(crate) store: Option<std::path::PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Register(args) => run_register(args),
        Command::Import(args) => run_import(args),
        Command::Users {
            command: UsersCommand::List(args),
        } => run_list_users(args),
    }
}
