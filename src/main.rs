//! studio-session CLI entry point

use std::process::ExitCode;

use clap::Parser;

use studio_session::cli::{
    app::{run_devices, run_permissions, run_record, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    logging,
    presenter::Presenter,
};
use studio_session::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting studio-session");

    match cli.command {
        Commands::Config { action } => {
            let presenter = Presenter::new();
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Devices { json } => run_devices(json, cli.manifest).await,
        Commands::Permissions => run_permissions(cli.manifest).await,
        Commands::Record(args) => run_record(args, cli.manifest).await,
    }
}
