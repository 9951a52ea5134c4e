//! Query configuration that downstream crates can serialize/deserialize.
//!
//! The process-wide configuration is installed at most once. Operators read it
//! through [`QueryConfig::current`] when they build shared state.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static INSTALLED: OnceCell<QueryConfig> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Let `last*` and `reverse` walk a bidirectional source from its end.
    /// When off, they always take the forward fallback.
    pub backward_paths: bool,

    /// Emit a `materialize` event every time an application builds its shared state.
    pub trace_materialization: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            backward_paths: true,
            trace_materialization: true,
        }
    }
}

impl QueryConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `LAZYQ_BACKWARD_PATHS`: `true`/`false` (also `1`/`0`, `yes`/`no`, `on`/`off`)
    /// - `LAZYQ_TRACE_MATERIALIZATION`: same accepted values
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a caller-supplied variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = lookup("LAZYQ_BACKWARD_PATHS").as_deref().and_then(parse_flag) {
            cfg.backward_paths = v;
        }

        if let Some(v) = lookup("LAZYQ_TRACE_MATERIALIZATION")
            .as_deref()
            .and_then(parse_flag)
        {
            cfg.trace_materialization = v;
        }

        cfg
    }

    /// Install this config for the whole process.
    ///
    /// Fails if a config was already installed, or if [`current`](Self::current)
    /// already fell back to the environment.
    pub fn install(self) -> Result<()> {
        INSTALLED
            .set(self)
            .map_err(|_| Error::Config("query configuration already installed".into()))
    }

    /// The installed config, or the environment-derived one on first use.
    pub fn current() -> &'static QueryConfig {
        INSTALLED.get_or_init(Self::from_env)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
