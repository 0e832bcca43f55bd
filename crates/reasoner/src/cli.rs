use clap::{Args, Parser, Subcommand};
use reasoning_engine::TaskPriority;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "reasoner",
    version,
    about = "Background Reasoning Engine CLI",
    long_about = "Analyzes source files for complexity, code smells and developer intent."
)]
pub struct ReasonerCli {
    #[command(subcommand)]
    pub command: Commands,
}

impl ReasonerCli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze files and print every engine event as a JSON line
    Analyze(AnalyzeArgs),
    /// Print the persisted insights of a file
    Insights {
        /// Source file whose insights to print
        path: PathBuf,

        #[command(flatten)]
        data: DataArgs,
    },
    /// Remove all persisted insights
    Clean {
        #[command(flatten)]
        data: DataArgs,
    },
}

#[derive(Args, Debug)]
pub struct DataArgs {
    /// Directory holding persisted insights and logs (defaults to ~/.reasoner)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Files or directories to analyze; directories are walked respecting .gitignore
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Priority given to every queued file
    #[arg(short, long, default_value_t = TaskPriority::Medium)]
    pub priority: TaskPriority,

    /// Engine configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub data: DataArgs,

    /// Keep insights in memory only
    #[arg(long)]
    pub no_persist: bool,

    /// Write JSON logs to the rolling log file in the data directory
    #[arg(long)]
    pub log_to_file: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        ReasonerCli::command().debug_assert();
    }

    #[test]
    fn test_analyze_defaults() {
        let cli = ReasonerCli::try_parse_from(["reasoner", "analyze"]).unwrap();
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };

        assert_eq!(args.paths, vec![PathBuf::from(".")]);
        assert_eq!(args.priority, TaskPriority::Medium);
        assert!(!args.no_persist);
        assert!(args.data.data_dir.is_none());
    }

    #[test]
    fn test_analyze_flags() {
        let cli = ReasonerCli::try_parse_from([
            "reasoner",
            "analyze",
            "src",
            "lib.ts",
            "--priority",
            "high",
            "--data-dir",
            "/tmp/reasoner",
            "--no-persist",
        ])
        .unwrap();
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };

        assert_eq!(args.paths.len(), 2);
        assert_eq!(args.priority, TaskPriority::High);
        assert_eq!(args.data.data_dir, Some(PathBuf::from("/tmp/reasoner")));
        assert!(args.no_persist);
    }

    #[test]
    fn test_invalid_priority_is_rejected() {
        assert!(ReasonerCli::try_parse_from(["reasoner", "analyze", "-p", "urgent"]).is_err());
    }
}
