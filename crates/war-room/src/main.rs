use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

mod cli;
mod memory_cmd;

use cli::{Cli, Commands};
use memory_cmd::MemoryEnv;

fn main() -> Result<()> {
    // Initialize tracing (output to stderr, initialize only once)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    let env = resolve_env(cli.cd.as_deref(), cli.memory_file.as_deref())?;

    match cli.command {
        Commands::Log {
            source,
            content,
            category,
        } => memory_cmd::handle_log(&env, &source, &content, &category)?,
        Commands::Tail { limit, aligned } => memory_cmd::handle_tail(&env, limit, aligned)?,
        Commands::Context => memory_cmd::handle_context(&env)?,
        Commands::List { source, category } => {
            memory_cmd::handle_list(&env, source, category, cli.format)?
        }
    }

    Ok(())
}

fn resolve_env(cd: Option<&str>, memory_file: Option<&str>) -> Result<MemoryEnv> {
    let root = match cd {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let mut config = wr_config::ProjectConfig::load(&root)?;
    if let Some(path) = memory_file {
        config.memory.path = PathBuf::from(path);
        config.memory = config.memory.resolve_against(&root);
    }
    wr_config::validate_config(&config)?;
    tracing::debug!(
        root = %root.display(),
        memory = %config.memory.path.display(),
        "resolved war-room environment"
    );

    Ok(MemoryEnv { root, config })
}
