//! Server configuration loaded from environment variables.
//!
//! | Variable             | Default          | Description                                  |
//! |----------------------|------------------|----------------------------------------------|
//! | `CCUBE_STORE_DIR`    | `./data/qa`      | QA store root directory                      |
//! | `CCUBE_BIND`         | `127.0.0.1:8080` | HTTP listen address                          |
//! | `CCUBE_LOG_LEVEL`    | `info`           | tracing filter (trace/debug/info/warn/error) |
//! | `CCUBE_RECORD_VIEWS` | `true`           | count a view on `GET /questions/{id}`        |
//!
//! Absent or unparseable values fall back to the default.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_STORE_DIR: &str = "./data/qa";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Root of the QA store.
    pub store_dir: PathBuf,

    pub bind: SocketAddr,

    /// Tracing filter string, e.g. `"ccube_query=debug,info"`.
    pub log_level: String,

    /// Whether fetching a question increments its view count.
    pub record_views: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            store_dir: PathBuf::from(
                lookup("CCUBE_STORE_DIR").unwrap_or_else(|| DEFAULT_STORE_DIR.to_string()),
            ),
            bind: parse_or(&lookup, "CCUBE_BIND", || {
                SocketAddr::from(([127, 0, 0, 1], 8080))
            }),
            log_level: lookup("CCUBE_LOG_LEVEL")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            record_views: parse_or(&lookup, "CCUBE_RECORD_VIEWS", || true),
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: impl FnOnce() -> T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_else(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]);
        assert_eq!(cfg.store_dir, PathBuf::from(DEFAULT_STORE_DIR));
        assert_eq!(cfg.bind.to_string(), DEFAULT_BIND);
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.record_views);
    }

    #[test]
    fn values_are_read_from_environment() {
        let cfg = config(&[
            ("CCUBE_STORE_DIR", "/srv/qa"),
            ("CCUBE_BIND", "0.0.0.0:9000"),
            ("CCUBE_LOG_LEVEL", "debug"),
            ("CCUBE_RECORD_VIEWS", "false"),
        ]);
        assert_eq!(cfg.store_dir, PathBuf::from("/srv/qa"));
        assert_eq!(cfg.bind.port(), 9000);
        assert_eq!(cfg.log_level, "debug");
        assert!(!cfg.record_views);
    }

    #[test]
    fn unparseable_values_fall_back() {
        let cfg = config(&[("CCUBE_BIND", "not-an-addr"), ("CCUBE_RECORD_VIEWS", "maybe")]);
        assert_eq!(cfg.bind.to_string(), DEFAULT_BIND);
        assert!(cfg.record_views);
    }
}
