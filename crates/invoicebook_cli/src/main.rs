//! `invoicebook` command-line front end over `invoicebook_core`.

mod args;
mod commands;
mod format;

use anyhow::{anyhow, Context, Result};
use args::Cli;
use clap::Parser;
use invoicebook_core::AppConfig;
use log::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    cli.override_config(&mut config);

    config.init_logging().map_err(|err| anyhow!(err))?;
    info!(
        "event=cli_start module=cli status=ok db_path={}",
        config.db_path.display()
    );

    let mut store = config
        .open_store()
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let stdout = std::io::stdout();
    commands::run(cli.command, &mut store, &mut stdout.lock())
}
