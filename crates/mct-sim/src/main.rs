use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::{
    laplace::{self, LaplaceArgs},
    play::{self, PlayArgs},
    tasks::{self, TasksArgs},
    version::{self, VersionArgs},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "mct-sim", about = "Monte-Carlo integration trainer CLI")]
struct Cli {
    /// YAML session policy overriding the built-in tolerances and task defaults.
    #[arg(long, global = true)]
    policy: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate a task batch, printing one summary per task.
    Tasks(TasksArgs),
    /// Run a scripted learner through one batch task and print the session report.
    Play(PlayArgs),
    /// Print the Laplace function table or a confidence tabulation.
    Laplace(LaplaceArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mct_sim=info,mct_task=info,mct_batch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let policy = commands::load_policy_or_default(cli.policy.as_deref())?;
    match cli.command {
        Command::Tasks(args) => tasks::run(&args, &policy),
        Command::Play(args) => play::run(&args, &policy),
        Command::Laplace(args) => laplace::run(&args),
        Command::Version(args) => version::run(&args, &policy),
    }
}
