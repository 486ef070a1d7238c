use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use schemars::schema_for;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use traj_control_apps::{utils::load_config_or_default, Backend};

/// Send a fixed trajectory to the arm controller and record its position
/// error and torques until the action finishes.
#[derive(Debug, Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
struct Args {
    /// Path to the setting file.
    #[arg(short, long)]
    config_path: Option<PathBuf>,
    /// Messaging backend.
    #[arg(long, value_enum, default_value_t)]
    backend: Backend,
    #[command(subcommand)]
    subcommand: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the JSON schema of the setting file.
    Schema,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();
    debug!(?args);

    if let Some(Command::Schema) = args.subcommand {
        let schema = schema_for!(traj_control::TrajControlConfig);
        let s = serde_json::to_string_pretty(&schema)
            .context("failed to serialize the setting file schema")?;
        println!("{s}");
        return Ok(ExitCode::SUCCESS);
    }

    let result = load_config_or_default(args.config_path).and_then(|config| {
        traj_control_apps::run(env!("CARGO_BIN_NAME"), args.backend, &config)
    });
    Ok(traj_control_apps::report_exit_code(&result))
}
