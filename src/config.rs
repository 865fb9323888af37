use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::auth::Platform;
use crate::error::CrosscastError;
use crate::providers::ProviderConfig;

/// Client registrations for each supported platform, loaded from a JSON
/// config file. Credentials live in configuration handed to adapter
/// constructors, never in process-global state.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrosscastConfig {
    pub youtube: Option<ProviderConfig>,
    pub soundcloud: Option<ProviderConfig>,
}

impl CrosscastConfig {
    pub fn provider(&self, platform: Platform) -> Option<&ProviderConfig> {
        match platform {
            Platform::YouTube => self.youtube.as_ref(),
            Platform::SoundCloud => self.soundcloud.as_ref(),
        }
    }
}

/// Resolve the config file path.
///
/// Precedence:
/// 1. explicit `--config` flag
/// 2. `CROSSCAST_CONFIG` env var
/// 3. `~/.crosscast/config.json`
pub fn config_path(cli_config: Option<&str>) -> PathBuf {
    if let Some(path) = cli_config {
        return PathBuf::from(path);
    }
    if let Ok(env_path) = std::env::var("CROSSCAST_CONFIG") {
        return PathBuf::from(env_path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".crosscast")
        .join("config.json")
}

pub fn load_config(cli_config: Option<&str>) -> Result<CrosscastConfig, CrosscastError> {
    let path = config_path(cli_config);
    load_config_file(&path)
}

pub fn load_config_file(path: &Path) -> Result<CrosscastConfig, CrosscastError> {
    let raw = std::fs::read_to_string(path).map_err(|e| CrosscastError::Config {
        path: path.to_path_buf(),
        detail: format!("cannot read: {e}"),
    })?;

    let expanded = expand_env_vars(&raw);
    serde_json::from_str(&expanded).map_err(|e| CrosscastError::Config {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Replace `${VAR}` references with the value of the environment variable.
/// Unset variables are left as-is so the resulting parse error points at
/// the real problem.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match std::env::var(name) {
                    Ok(val) => result.push_str(&val),
                    Err(_) => {
                        result.push_str("${");
                        result.push_str(name);
                        result.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                result.push_str("${");
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}
