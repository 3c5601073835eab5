use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};

use fleetscore::config::{AppContext, Environment};
use fleetscore::{commands, logging};

#[derive(Parser)]
#[command(name = "fleetscore")]
#[command(version, about = "Fleet Score Util: device counts per OS and supervisor version")]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Environment whose config file is used
    #[arg(long, env = "FLEETSCORE_ENV", value_enum, default_value_t = Environment::Devenv, global = true)]
    env: Environment,

    /// Directory holding <env>.json config files
    #[arg(long, default_value = "config", global = true)]
    config_dir: PathBuf,

    /// Directory for report and diagnostics files
    #[arg(long, default_value = "logs", global = true)]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Report device counts per OS and supervisor version
    Get,
    /// Print this help
    Help,
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Get) => {
            let ctx = AppContext::load(cli.env, &cli.config_dir, &cli.log_dir)?;
            let _guard = logging::init(&ctx.log_dir, ctx.environment)?;

            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(commands::get(&ctx))
        }
        Some(Command::Help) | Some(Command::Unknown(_)) | None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
