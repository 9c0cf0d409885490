//! Configuration management for the page server.
//!
//! This module provides a centralized configuration structure that is
//! populated from defaults and then overridden from environment variables
//! (a `.env` file is honoured). It is built once at startup and never
//! mutated afterwards.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Default content root, matching a stock web server layout.
pub const DEFAULT_CONTENT_ROOT: &str = "/var/www/html";

/// Default cap on the size of a served page (10 MiB).
pub const DEFAULT_MAX_PAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Main configuration structure for the page server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Page serving behaviour.
    pub pages: PagesConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Content root, deny-list and gate policy.
    pub security: SecurityConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the pages domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Render every rejection (denied or missing) with the same status and
    /// message, so clients cannot tell which one occurred.
    pub uniform_rejection: bool,

    /// Pages larger than this are not served.
    pub max_page_bytes: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for the path gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Absolute directory that bounds all servable content.
    pub content_root: PathBuf,

    /// Absolute paths that are never served.
    pub deny_list: Vec<PathBuf>,

    /// Whether a deny-list entry also protects everything below it.
    pub deny_descendants: bool,

    /// Whether symlinks inside the content root are followed.
    /// Targets are always checked against the root and deny-list.
    pub allow_symlinks: bool,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            uniform_rejection: true,
            max_page_bytes: DEFAULT_MAX_PAGE_BYTES,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Load only the logging section, so logging can be set up before the
    /// rest of the configuration is read (and logged).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut logging = Self::default();
        if let Ok(level) = std::env::var("PAGEGATE_LOG_LEVEL") {
            logging.level = level;
        }
        logging
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from(DEFAULT_CONTENT_ROOT),
            deny_list: Vec::new(),
            deny_descendants: true,
            allow_symlinks: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "page-gate".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            pages: PagesConfig::default(),
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `PAGEGATE_`.
    /// For example: `PAGEGATE_CONTENT_ROOT`, `PAGEGATE_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("PAGEGATE_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();

        config.transport = TransportConfig::from_env();

        if let Ok(root) = std::env::var("PAGEGATE_CONTENT_ROOT") {
            config.security.content_root = PathBuf::from(root);
        }
        info!(
            "Content root configured as {}",
            config.security.content_root.display()
        );

        if let Ok(list) = std::env::var("PAGEGATE_DENY_LIST") {
            config.security.deny_list = parse_path_list(&list);
        }
        if config.security.deny_list.is_empty() {
            warn!("PAGEGATE_DENY_LIST not set - only the content root bounds served files");
        } else {
            info!("{} deny-list entries loaded", config.security.deny_list.len());
        }

        if let Some(flag) = env_flag("PAGEGATE_DENY_DESCENDANTS") {
            config.security.deny_descendants = flag;
        }

        if let Some(flag) = env_flag("PAGEGATE_ALLOW_SYMLINKS") {
            config.security.allow_symlinks = flag;
            info!("Symlinks allowed: {}", flag);
        }

        if let Some(flag) = env_flag("PAGEGATE_UNIFORM_REJECTION") {
            config.pages.uniform_rejection = flag;
            if !flag {
                warn!("Uniform rejection disabled - clients can tell denied pages from missing ones");
            }
        }

        if let Ok(max) = std::env::var("PAGEGATE_MAX_PAGE_BYTES") {
            match max.parse() {
                Ok(bytes) => config.pages.max_page_bytes = bytes,
                Err(_) => warn!("Ignoring invalid PAGEGATE_MAX_PAGE_BYTES: {:?}", max),
            }
        }

        config
    }
}

/// Splits a comma-separated list of paths, dropping blanks.
fn parse_path_list(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Reads a boolean flag; anything other than `false`/`0`/`no`/`off` is true.
fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| {
        let v = v.trim().to_lowercase();
        !matches!(v.as_str(), "false" | "0" | "no" | "off")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_are_strict() {
        let config = Config::default();
        assert_eq!(config.security.content_root, PathBuf::from("/var/www/html"));
        assert!(config.security.deny_list.is_empty());
        assert!(config.security.deny_descendants);
        assert!(config.pages.uniform_rejection);
        assert_eq!(config.pages.max_page_bytes, DEFAULT_MAX_PAGE_BYTES);
    }

    #[test]
    fn test_security_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("PAGEGATE_CONTENT_ROOT", "/srv/site");
            std::env::set_var("PAGEGATE_DENY_LIST", "/root/flag.txt, ,/srv/site/.env");
            std::env::set_var("PAGEGATE_DENY_DESCENDANTS", "false");
        }

        let config = Config::from_env();
        assert_eq!(config.security.content_root, PathBuf::from("/srv/site"));
        assert_eq!(
            config.security.deny_list,
            vec![
                PathBuf::from("/root/flag.txt"),
                PathBuf::from("/srv/site/.env")
            ]
        );
        assert!(!config.security.deny_descendants);

        unsafe {
            std::env::remove_var("PAGEGATE_CONTENT_ROOT");
            std::env::remove_var("PAGEGATE_DENY_LIST");
            std::env::remove_var("PAGEGATE_DENY_DESCENDANTS");
        }
    }

    #[test]
    fn test_pages_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("PAGEGATE_UNIFORM_REJECTION", "0");
            std::env::set_var("PAGEGATE_MAX_PAGE_BYTES", "2048");
        }

        let config = Config::from_env();
        assert!(!config.pages.uniform_rejection);
        assert_eq!(config.pages.max_page_bytes, 2048);

        unsafe {
            std::env::remove_var("PAGEGATE_UNIFORM_REJECTION");
            std::env::remove_var("PAGEGATE_MAX_PAGE_BYTES");
        }
    }

    #[test]
    fn test_invalid_max_bytes_keeps_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("PAGEGATE_MAX_PAGE_BYTES", "lots");
        }

        let config = Config::from_env();
        assert_eq!(config.pages.max_page_bytes, DEFAULT_MAX_PAGE_BYTES);

        unsafe {
            std::env::remove_var("PAGEGATE_MAX_PAGE_BYTES");
        }
    }

    #[test]
    fn test_logging_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("PAGEGATE_LOG_LEVEL", "debug");
        }

        assert_eq!(LoggingConfig::from_env().level, "debug");
        assert_eq!(Config::from_env().logging.level, "debug");

        unsafe {
            std::env::remove_var("PAGEGATE_LOG_LEVEL");
        }
        assert_eq!(LoggingConfig::from_env().level, "info");
    }

    #[test]
    fn test_parse_path_list() {
        assert!(parse_path_list("").is_empty());
        assert_eq!(
            parse_path_list("/a,/b/c"),
            vec![PathBuf::from("/a"), PathBuf::from("/b/c")]
        );
    }
}
