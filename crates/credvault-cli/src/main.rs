//! Credvault CLI - a per-user encrypted credential store
//!
//! This is the command-line interface for Credvault. The calling user is
//! taken from `--user` / `CREDVAULT_USER`; everything else is delegated to
//! the core library.

mod app;
mod auth;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;

use clap::{CommandFactory, Parser};

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{credentials, init, maintenance, principal};
use crate::config::DEFAULT_LOG_LEVEL;
use crate::errors::{exit_code_for, hint_for};

fn main() {
    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    let level = ctx
        .config()
        .map(|config| config.log_level().to_string())
        .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    logging::init_logging(&level);

    if let Err(e) = run(&ctx, &cli) {
        eprintln!("Error: {}", e);
        if let Some(hint) = hint_for(&e) {
            eprintln!("{}", hint);
        }
        std::process::exit(exit_code_for(&e));
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => init::handle_init(ctx, cli.db.as_deref(), args),
        Some(Commands::Register) => principal::handle_register(ctx),
        Some(Commands::Add(args)) => credentials::handle_add(ctx, args),
        Some(Commands::Get(args)) => credentials::handle_get(ctx, args),
        Some(Commands::Update(args)) => credentials::handle_update(ctx, args),
        Some(Commands::Delete(args)) => credentials::handle_delete(ctx, args),
        Some(Commands::List(args)) => credentials::handle_list(ctx, args),
        Some(Commands::Profile(args)) => principal::handle_profile(ctx, args),
        Some(Commands::Unregister(args)) => principal::handle_unregister(ctx, args),
        Some(Commands::Check) => maintenance::handle_check(ctx),
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
