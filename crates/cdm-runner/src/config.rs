use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RunnerError;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

/// Which kind of recorded output a run is scored as.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Interactive tool-calling runs.
    #[default]
    Agent,
    /// All case information given upfront; diagnosis only.
    FullInfo,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Agent => "agent",
            RunMode::FullInfo => "full_info",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Benchmark dataset JSON file.
    #[serde(default)]
    pub benchmark_path: Option<PathBuf>,
    /// Evaluate only the first N cases.
    #[serde(default)]
    pub num_cases: Option<usize>,
    /// JSONL file per-case results are written to.
    #[serde(default)]
    pub results_path: Option<PathBuf>,
    /// Added in v1; older configs are agent runs.
    pub mode: RunMode,
}

/// `<config dir>/cdm-eval/config.json`.
pub fn default_config_path() -> Result<PathBuf, RunnerError> {
    let base = dirs::config_dir().ok_or(RunnerError::NoConfigDir)?;
    Ok(base.join("cdm-eval").join("config.json"))
}

pub fn load_config(path: &Path) -> Result<RunnerConfig, RunnerError> {
    let contents = std::fs::read_to_string(path).map_err(|e| RunnerError::io(path, e))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: RunnerConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(path: &Path) -> Result<RunnerConfig, RunnerError> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(RunnerConfig {
            config_version: CURRENT_VERSION,
            ..RunnerConfig::default()
        })
    }
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
fn migrate(
    mut json: serde_json::Value,
    from_version: u32,
) -> Result<serde_json::Value, RunnerError> {
    if from_version > CURRENT_VERSION {
        return Err(RunnerError::Config(format!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        )));
    }

    // v0 → v1: add mode
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| RunnerError::Config("config is not a JSON object".to_string()))?;
        obj.entry("mode")
            .or_insert(serde_json::Value::String(RunMode::Agent.as_str().to_string()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added mode)");
    }

    Ok(json)
}

pub fn save_config(config: &RunnerConfig, path: &Path) -> Result<(), RunnerError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| RunnerError::io(dir, e))?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes()).map_err(|e| RunnerError::io(&tmp_path, e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| RunnerError::io(path, e))?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
