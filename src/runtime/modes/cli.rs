//! CLI mode
//!
//! One-shot maintenance commands that run without the HTTP server.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::api::services::cleanup::cleanup_message;
use crate::config::AppConfig;
use crate::services::RetentionTask;
use crate::storage::{IpRecordStore, StorageFactory};

/// Run a single retention pass and print the counts.
pub async fn run_cleanup(config: &AppConfig) -> Result<()> {
    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    let store: Arc<dyn IpRecordStore> = storage;

    let task = RetentionTask::new(store, &config.retention);
    let report = task
        .run_cleanup()
        .await
        .map_err(|e| anyhow::anyhow!(e.format_colored()))?;

    println!("{} {}", "✓".green().bold(), cleanup_message(&report));
    println!(
        "  deleted: {}  remaining: {}  (max age: {} days)",
        report.deleted.to_string().yellow(),
        report.remaining.to_string().cyan(),
        task.max_age_days()
    );
    Ok(())
}

/// Write a sample configuration file.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn run_config_generate(output_path: Option<&str>, force: bool) -> Result<()> {
    let path = output_path.unwrap_or("config.example.toml");

    if Path::new(path).exists() && !force {
        anyhow::bail!(
            "{} already exists, pass --force to overwrite",
            path.bold()
        );
    }

    AppConfig::default()
        .save_to_file(path)
        .with_context(|| format!("Failed to write {}", path))?;

    println!(
        "{} Sample configuration written to {}",
        "✓".green().bold(),
        path.bold()
    );
    Ok(())
}
