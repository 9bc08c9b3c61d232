use std::path::{Path, PathBuf};

use analgesia_dosing::conversion::DEFAULT_REDUCTION_PERCENT;
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalgesiaConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Reference table to use instead of the bundled one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base_path: Option<PathBuf>,
    /// Cross-tolerance reduction for target doses, in percent. Added in v1.
    pub default_cross_tolerance_reduction: f64,
    #[serde(default)]
    pub json_logs: bool,
    pub created_at: jiff::Timestamp,
}

impl Default for AnalgesiaConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            knowledge_base_path: None,
            default_cross_tolerance_reduction: DEFAULT_REDUCTION_PERCENT,
            json_logs: false,
            created_at: jiff::Timestamp::now(),
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("analgesia"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// The user's config, or defaults when none has been saved.
pub fn load_config() -> eyre::Result<AnalgesiaConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(AnalgesiaConfig::default());
    }
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> eyre::Result<AnalgesiaConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: AnalgesiaConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update analgesia."
        ));
    }

    // v0 → v1: add default_cross_tolerance_reduction
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("default_cross_tolerance_reduction")
            .or_insert(serde_json::json!(DEFAULT_REDUCTION_PERCENT));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added default_cross_tolerance_reduction)");
    }

    Ok(json)
}

pub fn save_config(config: &AnalgesiaConfig) -> eyre::Result<PathBuf> {
    let dir = config_dir()?;
    save_config_to(config, &dir)
}

/// Write `config.json` into `dir`, creating it if needed.
pub fn save_config_to(config: &AnalgesiaConfig, dir: &Path) -> eyre::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join("config.json");
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = dir.join("config.json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(path)
}
