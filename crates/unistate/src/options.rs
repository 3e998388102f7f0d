//! Store options
//!
//! Options can be built in code or read from a TOML table:
//!
//! ```toml
//! label = "session"
//! trace_dispatches = false
//! ```

use crate::tracer::{LogTracer, NoopTracer, Tracer};
use serde::{Deserialize, Serialize};

/// Settings applied when a store is built
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StoreOptions {
    /// Name used to tell stores apart in log output
    #[serde(default = "default_label")]
    pub label: String,

    /// Log every dispatch at debug level
    #[serde(default = "default_trace_dispatches")]
    pub trace_dispatches: bool,
}

fn default_label() -> String {
    "store".to_string()
}

fn default_trace_dispatches() -> bool {
    true
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            label: default_label(),
            trace_dispatches: default_trace_dispatches(),
        }
    }
}

impl StoreOptions {
    /// Parse options from TOML; missing fields fall back to their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Tracer matching these options
    pub fn tracer(&self) -> Box<dyn Tracer> {
        if self.trace_dispatches {
            Box::new(LogTracer::new(self.label.clone()))
        } else {
            Box::new(NoopTracer)
        }
    }
}
