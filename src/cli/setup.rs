use crate::core::config::AppConfig;
use anyhow::{Context, Result, bail};
use std::path::Path;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

/// Writes the example business profile to the default config location.
pub fn setup() -> Result<()> {
    let path = AppConfig::default_config_path()?;
    setup_at_path(path)
}

/// Writes the example business profile to `path`, refusing to replace an
/// existing file.
pub fn setup_at_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        bail!("Configuration file already exists at {}", path.display());
    }

    let records = example_snapshot_size()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!(
        "Created example configuration with {records} monthly records at {}",
        path.display()
    );
    Ok(())
}

/// Loads the embedded template the same way `run_command` loads a user's
/// file and returns its number of monthly records.
fn example_snapshot_size() -> Result<usize> {
    let config: AppConfig =
        serde_yaml::from_str(EXAMPLE_CONFIG).context("Embedded example config is not valid YAML")?;
    let snapshot = config
        .snapshot()
        .context("Embedded example config holds invalid records")?;
    Ok(snapshot.records().len())
}
