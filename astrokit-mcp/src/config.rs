//! Server configuration from the environment

use std::env;

/// Log filter used when neither `ASTROKIT_LOG` nor `RUST_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// `tracing` filter directive, e.g. `info` or `astrokit_measure=debug`
    pub log_filter: String,
    /// Turn advisory warnings into errors
    pub warnings_as_errors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            warnings_as_errors: false,
        }
    }
}

impl ServerConfig {
    /// Read `ASTROKIT_LOG` (falling back to `RUST_LOG`) and `ASTROKIT_STRICT`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let set = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());
        let log_filter = set("ASTROKIT_LOG")
            .or_else(|| set("RUST_LOG"))
            .unwrap_or(defaults.log_filter);
        let warnings_as_errors = lookup("ASTROKIT_STRICT")
            .map(|s| parse_flag(&s))
            .unwrap_or(defaults.warnings_as_errors);
        Self { log_filter, warnings_as_errors }
    }
}

fn parse_flag(s: &str) -> bool {
    matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
