//! Server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                   | Default                          |
//! |----------------------------|----------------------------------|
//! | `NAVRATNA_HOST`            | `127.0.0.1`                      |
//! | `NAVRATNA_PORT`            | `8080`                           |
//! | `NAVRATNA_DB_PATH`         | platform data dir `/navratna.db` |
//! | `NAVRATNA_BUSINESS_NAME`   | `Navratna Gems`                  |
//! | `NAVRATNA_GSTIN`           | unset                            |
//! | `NAVRATNA_STATE_CODE`      | GSTIN prefix, else `27`          |
//! | `NAVRATNA_UPI_ID`          | unset                            |
//! | `NAVRATNA_ADDRESS`         | unset                            |
//! | `NAVRATNA_INVOICE_PREFIX`  | `NR`                             |
//! | `NAVRATNA_CORS_ORIGIN`     | unset (any origin)               |

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use directories::ProjectDirs;

use navratna_core::invoice::Seller;
use navratna_core::tax::state_code_from_gstin;
use navratna_core::validation::validate_gstin;

const DEFAULT_STATE_CODE: &str = "27";

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub db_path: PathBuf,
    /// Printed in the invoice header and used for the UPI link.
    pub seller: Seller,
    pub invoice_prefix: String,
    /// Allowed browser origin. `None` allows any origin.
    pub cors_origin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = parse_or(&var, "NAVRATNA_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or(&var, "NAVRATNA_PORT", 8080u16)?;

        let db_path = match var("NAVRATNA_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let gstin = var("NAVRATNA_GSTIN").map(|g| g.trim().to_uppercase());
        if let Some(gstin) = &gstin {
            validate_gstin(gstin)
                .map_err(|_| ConfigError::InvalidValue("NAVRATNA_GSTIN".to_string()))?;
        }

        let state_code = match var("NAVRATNA_STATE_CODE") {
            Some(code) => {
                let code = code.trim().to_string();
                if code.len() != 2 || !code.chars().all(|c| c.is_ascii_digit()) {
                    return Err(ConfigError::InvalidValue("NAVRATNA_STATE_CODE".to_string()));
                }
                code
            }
            None => gstin
                .as_deref()
                .and_then(state_code_from_gstin)
                .unwrap_or(DEFAULT_STATE_CODE)
                .to_string(),
        };

        let seller = Seller {
            business_name: var("NAVRATNA_BUSINESS_NAME")
                .unwrap_or_else(|| "Navratna Gems".to_string()),
            gstin,
            state_code,
            address: var("NAVRATNA_ADDRESS"),
            upi_id: var("NAVRATNA_UPI_ID"),
        };

        let invoice_prefix = var("NAVRATNA_INVOICE_PREFIX")
            .map(|p| p.trim().to_string())
            .unwrap_or_else(|| "NR".to_string());
        if invoice_prefix.contains('/') {
            return Err(ConfigError::InvalidValue("NAVRATNA_INVOICE_PREFIX".to_string()));
        }

        Ok(Config {
            host,
            port,
            db_path,
            seller,
            invoice_prefix,
            cors_origin: var("NAVRATNA_CORS_ORIGIN"),
        })
    }

    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T, F>(var: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        None => Ok(default),
    }
}

/// Platform data directory.
///
/// - **macOS**: `~/Library/Application Support/in.navratna.navratna/navratna.db`
/// - **Windows**: `%APPDATA%\navratna\navratna\data\navratna.db`
/// - **Linux**: `~/.local/share/navratna/navratna.db`
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("in", "navratna", "navratna")
        .ok_or_else(|| ConfigError::MissingRequired("NAVRATNA_DB_PATH".to_string()))?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {}", data_dir.display(), e)))?;
    Ok(data_dir.join("navratna.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Cannot create data directory {0}")]
    DataDir(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let mut map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        map.entry("NAVRATNA_DB_PATH".to_string())
            .or_insert_with(|| "/tmp/navratna-test.db".to_string());
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address().to_string(), "127.0.0.1:8080");
        assert_eq!(config.invoice_prefix, "NR");
        assert_eq!(config.seller.state_code, "27");
        assert!(config.seller.gstin.is_none());
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn test_state_code_follows_gstin() {
        let config = load(&[("NAVRATNA_GSTIN", "29aagcb7383j1z4")]).unwrap();
        assert_eq!(config.seller.gstin.as_deref(), Some("29AAGCB7383J1Z4"));
        assert_eq!(config.seller.state_code, "29");

        let config = load(&[
            ("NAVRATNA_GSTIN", "29AAGCB7383J1Z4"),
            ("NAVRATNA_STATE_CODE", "24"),
        ])
        .unwrap();
        assert_eq!(config.seller.state_code, "24");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("NAVRATNA_PORT", "eighty")]),
            Err(ConfigError::InvalidValue(name)) if name == "NAVRATNA_PORT"
        ));
        assert!(matches!(
            load(&[("NAVRATNA_GSTIN", "not-a-gstin")]),
            Err(ConfigError::InvalidValue(name)) if name == "NAVRATNA_GSTIN"
        ));
        assert!(matches!(
            load(&[("NAVRATNA_STATE_CODE", "MH")]),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            load(&[("NAVRATNA_INVOICE_PREFIX", "NR/X")]),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = load(&[("NAVRATNA_PORT", "  "), ("NAVRATNA_BUSINESS_NAME", "")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.seller.business_name, "Navratna Gems");
    }
}
