use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use ipchecker::cli::{Cli, Commands, ConfigCommands};
use ipchecker::config::AppConfig;
use ipchecker::runtime::modes;
use ipchecker::system::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // config generate 不需要加载现有配置
    if let Some(Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    }) = &cli.command
    {
        return modes::run_config_generate(output_path.as_deref(), *force);
    }

    let config = AppConfig::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!(e.format_colored()))
        .context("Failed to load configuration")?;

    let _log_guard = init_logging(&config.logging)?;

    match cli.command {
        None | Some(Commands::Serve) => {
            info!("ip-checker {} starting", env!("CARGO_PKG_VERSION"));
            modes::run_server(config).await
        }
        Some(Commands::Cleanup) => modes::run_cleanup(&config).await,
        Some(Commands::Config { .. }) => Ok(()),
    }
}
