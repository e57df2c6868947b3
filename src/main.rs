// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Resolve {
            recipe,
            settings,
            options,
        }) => commands::cmd_resolve(&recipe, &settings, &options),
        Some(Commands::Generate {
            recipe,
            settings,
            options,
            base,
        }) => commands::cmd_generate(&recipe, &settings, &options, &base),
        Some(Commands::Build {
            recipe,
            settings,
            options,
            base,
            driver,
        }) => commands::cmd_build(&recipe, &settings, &options, &base, &driver),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "galley", &mut std::io::stdout());
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("Galley v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'galley --help' for usage information");
            Ok(())
        }
    }
}
