//! Engine settings for the `tabula` binary.
//!
//! Settings are layered, later layers win:
//! - built-in defaults
//! - a JSON file given with `--config`
//! - a `.env` file in the working directory (loaded with dotenvy)
//! - `TABULA_*` environment variables
//!
//! The library itself reads no configuration; only the shell does.

use std::{env, fs, path::Path};

use serde::{Deserialize, Serialize};

const ENV_LOG: &str = "TABULA_LOG";
const ENV_NULL_DISPLAY: &str = "TABULA_NULL_DISPLAY";
const ENV_HISTORY_LIMIT: &str = "TABULA_HISTORY_LIMIT";
const ENV_SPLASH: &str = "TABULA_SPLASH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// An `env_logger` filter, like `warn` or `tabula_engine=debug`.
    pub log_level: String,
    /// What the shell prints for a null cell.
    pub null_display: String,
    /// How many commands a session remembers.
    pub history_limit: usize,
    pub show_splash: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            log_level: "warn".to_string(),
            null_display: "NIL".to_string(),
            history_limit: 100,
            show_splash: true,
        }
    }
}

impl EngineConfig {
    pub fn load(path: Option<&Path>) -> Result<EngineConfig, String> {
        //! Build the configuration from every layer.

        let mut config = match path {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };

        // a missing .env file is fine
        dotenvy::dotenv().ok();
        config.apply_overrides(|key| env::var(key).ok())?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<EngineConfig, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("invalid config file {}: {}", path.display(), e))?;
        EngineConfig::from_json(&contents)
            .map_err(|e| format!("invalid config file {}: {}", path.display(), e))
    }

    pub fn from_json(contents: &str) -> Result<EngineConfig, String> {
        serde_json::from_str(contents).map_err(|e| e.to_string())
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        //! Apply the `TABULA_*` variables found by `lookup`.

        if let Some(level) = lookup(ENV_LOG) {
            self.log_level = level;
        }
        if let Some(display) = lookup(ENV_NULL_DISPLAY) {
            self.null_display = display;
        }
        if let Some(limit) = lookup(ENV_HISTORY_LIMIT) {
            self.history_limit = limit
                .trim()
                .parse()
                .map_err(|_| format!("invalid value {}: {} must be a number", limit, ENV_HISTORY_LIMIT))?;
        }
        if let Some(splash) = lookup(ENV_SPLASH) {
            self.show_splash = match splash.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(format!(
                        "invalid value {}: {} must be a boolean",
                        other, ENV_SPLASH
                    ));
                }
            };
        }
        Ok(())
    }
}
