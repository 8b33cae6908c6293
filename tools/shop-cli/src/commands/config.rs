//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use tracing_subscriber::EnvFilter;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig, StorageBackend, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;

    // Storage section
    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output.kv("backend", config.storage.backend.as_str());
    ctx.output.kv("data_dir", &ctx.data_dir().display().to_string());

    // Seed section
    ctx.output.info("");
    ctx.output.info("[seed]");
    ctx.output
        .kv("path", config.seed.path.as_deref().unwrap_or("(bundled)"));

    // Assistant section
    ctx.output.info("");
    ctx.output.info("[assistant]");
    ctx.output.kv(
        "response_delay_ms",
        &config.assistant.response_delay_ms.to_string(),
    );
    ctx.output
        .kv("viewed_capacity", &config.assistant.viewed_capacity.to_string());
    ctx.output
        .kv("title_max_chars", &config.assistant.title_max_chars.to_string());
    ctx.output.kv("page_size", &config.assistant.page_size.to_string());

    // Logging section
    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("filter", &config.logging.filter);

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config, ctx);

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Collect (errors, warnings) for a configuration.
fn check_config(config: &CliConfig, ctx: &Context) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    // Check storage
    if config.storage.backend == StorageBackend::File && config.storage.data_dir.trim().is_empty() {
        errors.push("storage.data_dir is required for the file backend".to_string());
    }
    if config.storage.backend == StorageBackend::Memory {
        warnings.push("storage.backend 'memory' keeps nothing between runs".to_string());
    }

    // Check seed
    if let Some(path) = &config.seed.path {
        if !ctx.resolve_path(path).exists() {
            errors.push(format!("seed.path '{}' does not exist", path));
        }
    }

    // Check assistant
    let assistant = &config.assistant;
    if assistant.viewed_capacity == 0 {
        errors.push("assistant.viewed_capacity must be at least 1".to_string());
    }
    if assistant.title_max_chars == 0 {
        errors.push("assistant.title_max_chars must be at least 1".to_string());
    }
    if !(1..=100).contains(&assistant.page_size) {
        errors.push("assistant.page_size must be 1-100".to_string());
    }
    if assistant.response_delay_ms > 10_000 {
        warnings.push(format!(
            "assistant.response_delay_ms {} is unusually long",
            assistant.response_delay_ms
        ));
    }

    // Check logging
    if let Err(e) = EnvFilter::try_new(&config.logging.filter) {
        errors.push(format!("logging.filter is invalid: {}", e));
    }

    (errors, warnings)
}
