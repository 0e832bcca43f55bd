mod cli;
mod commands;
mod files;

use crate::cli::{Commands, ReasonerCli};
use logging::LogMode;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = ReasonerCli::parse_args();

    match cli.command {
        Commands::Analyze(args) => {
            let mode = if args.log_to_file {
                LogMode::Daemon {
                    data_directory: commands::data_directory(&args.data)?,
                }
            } else {
                LogMode::Cli
            };
            let _guards = logging::init(mode, args.verbose)?;
            commands::analyze::run(args).await
        }
        Commands::Insights { path, data } => {
            logging::init(LogMode::Cli, false)?;
            commands::insights::run(&path, &data).await
        }
        Commands::Clean { data } => {
            logging::init(LogMode::Cli, false)?;
            commands::clean::run(&data).await
        }
    }
}
