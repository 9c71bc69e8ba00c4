use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use subterm_config::ConfigError;

use crate::error::RuntimeResult;

const DEFAULT_MAX_TURNS: u32 = 20;
const DEFAULT_NO_ACTION_CAP: u32 = 3;
const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 300;
const DEFAULT_APPROVAL_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MODEL_FALLBACK: &str = "claude-sonnet-4-20250514";
const MODEL_ENV_VAR: &str = "SUBTERM_MODEL";

fn default_navigation_tools() -> HashSet<String> {
    ["browser_click", "browser_navigate", "browser_press_key", "browser_submit"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Run-level knobs, independent of any one service. Constructed in code via
/// [`RuntimeConfig::default`] plus builder methods, or loaded from a TOML
/// file via [`RuntimeConfig::load_toml`] for deployments that prefer to
/// externalize them.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub max_turns: u32,
    pub model: Option<String>,
    pub no_action_cap: u32,
    pub navigation_tools: HashSet<String>,
    pub auth_timeout: Duration,
    pub approval_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            model: None,
            no_action_cap: DEFAULT_NO_ACTION_CAP,
            navigation_tools: default_navigation_tools(),
            auth_timeout: Duration::from_secs(DEFAULT_AUTH_TIMEOUT_SECS),
            approval_timeout: Duration::from_secs(DEFAULT_APPROVAL_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct RuntimeConfigFile {
    max_turns: Option<u32>,
    model: Option<String>,
    no_action_cap: Option<u32>,
    navigation_tools: Option<Vec<String>>,
    auth_timeout_secs: Option<u64>,
    approval_timeout_secs: Option<u64>,
}

impl RuntimeConfig {
    /// Resolves the model to use for one `invoke` call: an explicit
    /// per-call override wins, then this config's own `model`, then the
    /// `SUBTERM_MODEL` environment variable, then a hard-coded fallback.
    #[must_use]
    pub fn resolve_model(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.model.clone())
            .or_else(|| std::env::var(MODEL_ENV_VAR).ok())
            .unwrap_or_else(|| DEFAULT_MODEL_FALLBACK.to_string())
    }

    /// Reads and parses a TOML file into a `RuntimeConfig`, falling back to
    /// [`RuntimeConfig::default`] for any field the file omits.
    pub fn load_toml(path: impl AsRef<Path>) -> RuntimeResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let file: RuntimeConfigFile = toml::from_str(&raw).map_err(|e| ConfigError::InvalidFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let defaults = Self::default();
        Ok(Self {
            max_turns: file.max_turns.unwrap_or(defaults.max_turns),
            model: file.model.or(defaults.model),
            no_action_cap: file.no_action_cap.unwrap_or(defaults.no_action_cap),
            navigation_tools: file
                .navigation_tools
                .map(|tools| tools.into_iter().collect())
                .unwrap_or(defaults.navigation_tools),
            auth_timeout: file
                .auth_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.auth_timeout),
            approval_timeout: file
                .approval_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.approval_timeout),
        })
    }
}
