mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    prepare_extensions(&mut config.scan.extensions);

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./wavbatch.toml",
        "~/.config/wavbatch/config.toml",
        "/etc/wavbatch/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Lowercase extensions and drop any leading dot so `.MP3` matches `mp3`.
fn prepare_extensions(extensions: &mut Vec<String>) {
    for ext in extensions.iter_mut() {
        *ext = ext.trim().trim_start_matches('.').to_lowercase();
    }
    extensions.retain(|e| !e.is_empty());
    extensions.sort();
    extensions.dedup();
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.jobs.concurrency == 0 {
        anyhow::bail!("jobs.concurrency must be at least 1");
    }

    if config.jobs.task_timeout_secs == Some(0) {
        anyhow::bail!("jobs.task_timeout_secs must be greater than 0 when set");
    }

    if config.scan.extensions.is_empty() {
        anyhow::bail!("scan.extensions must list at least one source extension");
    }

    if config
        .scan
        .extensions
        .iter()
        .any(|e| e == wavbatch_common::paths::INTERMEDIATE_EXTENSION)
    {
        anyhow::bail!("scan.extensions cannot include the output format (wav)");
    }

    if config.paths.input == config.paths.output {
        anyhow::bail!(
            "Input and output roots must differ: {:?}",
            config.paths.input
        );
    }

    if config.paths.output.starts_with(&config.paths.input) {
        tracing::warn!(
            "Output root {:?} is inside input root {:?}",
            config.paths.output,
            config.paths.input
        );
    }

    if !config.paths.input.exists() {
        tracing::warn!("Input root does not exist: {:?}", config.paths.input);
    }

    Ok(())
}
