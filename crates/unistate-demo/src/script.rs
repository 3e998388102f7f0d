//! Demo script loading
//!
//! A script is a TOML file with store options, an optional preloaded state
//! and the actions to dispatch:
//!
//! ```toml
//! [store]
//! label = "demo"
//!
//! [preloaded_state]
//! count = 10
//!
//! [[actions]]
//! type = "INC"
//!
//! [[actions]]
//! type = "ADD_TODO"
//! payload = "write docs"
//!
//! [[actions]]
//! type = "FETCH_FAILED"
//! error = "timeout"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use unistate::{create_action, Action, StoreOptions, Value};

const SCRIPT_FILE: &str = ".unistate-demo.toml";
const APP_NAME: &str = "unistate";

const BUILTIN_SCRIPT: &str = r#"
[store]
label = "demo"

[[actions]]
type = "INC"

[[actions]]
type = "INC"

[[actions]]
type = "ADD"
payload = 40

[[actions]]
type = "ADD_TODO"
payload = "write docs"

[[actions]]
type = "FETCH_FAILED"
error = "timeout"
"#;

/// A parsed demo script
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DemoScript {
    #[serde(default)]
    pub store: StoreOptions,

    #[serde(default)]
    pub preloaded_state: Option<Value>,

    #[serde(default)]
    pub actions: Vec<ScriptedAction>,
}

/// One action of a script
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedAction {
    #[serde(rename = "type")]
    pub kind: Value,

    #[serde(default)]
    pub payload: Option<Value>,

    /// Dispatch an error payload with this message instead of `payload`
    #[serde(default)]
    pub error: Option<String>,
}

impl ScriptedAction {
    pub fn to_action(&self) -> Action {
        let payload = match &self.error {
            Some(message) => Some(Value::error(message.clone())),
            None => self.payload.clone(),
        };
        create_action(self.kind.clone(), payload)
    }
}

impl DemoScript {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse demo script")
    }

    /// Load the script from `path`, the usual locations, or the built-in one
    ///
    /// Without an explicit path, searches in:
    /// 1. `.unistate-demo.toml` in the current directory
    /// 2. `demo.toml` in the unistate config directory
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read script {}", path.display()))?;
            log::info!("Loaded script from {}", path.display());
            return Self::parse(&content);
        }

        if let Some(content) = load_script_file() {
            return Self::parse(&content);
        }

        log::debug!("Using built-in demo script");
        Self::parse(BUILTIN_SCRIPT)
    }
}

fn load_script_file() -> Option<String> {
    // Try current directory first
    if let Ok(content) = std::fs::read_to_string(SCRIPT_FILE) {
        log::debug!("Loaded script from {}", SCRIPT_FILE);
        return Some(content);
    }

    // Then the config directory
    let config_script = config_script_path()?;
    match std::fs::read_to_string(&config_script) {
        Ok(content) => {
            log::debug!("Loaded script from {}", config_script.display());
            Some(content)
        }
        Err(_) => None,
    }
}

/// `~/.config/unistate/demo.toml` on Linux
fn config_script_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join("demo.toml"))
}
