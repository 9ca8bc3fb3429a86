use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::blockchain::{DEFAULT_DIFFICULTY, ValidationMode};
use crate::error::{LedgerError, Result};

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
    pub peer_timeout: Duration,
    pub peer_chain_path: String,
    /// `None` lets a mining search run until it finds a proof.
    pub pow_timeout: Option<Duration>,
    pub pow_max_iterations: Option<u64>,
    pub validation_mode: ValidationMode,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            difficulty: DEFAULT_DIFFICULTY,
            peer_timeout: Duration::from_secs(5),
            peer_chain_path: "/chain".to_string(),
            pow_timeout: Some(Duration::from_secs(120)),
            pow_max_iterations: None,
            validation_mode: ValidationMode::Structural,
        }
    }
}

impl NodeConfig {
    /// Read the process environment, letting a first positional argument
    /// override the port. Call after loading `.env`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::from_lookup(|key| env::var(key).ok())?;
        if let Some(port) = env::args().nth(1) {
            config.port = parse("port argument", &port)?;
        }
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let pow_timeout = match lookup("POW_TIMEOUT_SECS") {
            Some(raw) => match parse::<u64>("POW_TIMEOUT_SECS", &raw)? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            None => defaults.pow_timeout,
        };

        let validation_mode = match lookup("VERIFY_BLOCK_HASHES") {
            Some(raw) if parse::<bool>("VERIFY_BLOCK_HASHES", &raw)? => ValidationMode::Integrity,
            _ => ValidationMode::Structural,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .map(|v| parse("PORT", &v))
                .transpose()?
                .unwrap_or(defaults.port),
            difficulty: lookup("DIFFICULTY")
                .map(|v| parse("DIFFICULTY", &v))
                .transpose()?
                .unwrap_or(defaults.difficulty),
            peer_timeout: lookup("PEER_TIMEOUT_SECS")
                .map(|v| parse("PEER_TIMEOUT_SECS", &v).map(Duration::from_secs))
                .transpose()?
                .unwrap_or(defaults.peer_timeout),
            peer_chain_path: lookup("PEER_CHAIN_PATH").unwrap_or(defaults.peer_chain_path),
            pow_timeout,
            pow_max_iterations: lookup("POW_MAX_ITERATIONS")
                .map(|v| parse("POW_MAX_ITERATIONS", &v))
                .transpose()?,
            validation_mode,
        })
    }
}

fn parse<T: FromStr>(name: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| LedgerError::Config(format!("invalid {name} {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<NodeConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NodeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.difficulty, 4);
        assert_eq!(config.peer_chain_path, "/chain");
        assert_eq!(config.pow_timeout, Some(Duration::from_secs(120)));
        assert_eq!(config.validation_mode, ValidationMode::Structural);
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("PORT", "5001"),
            ("DIFFICULTY", "2"),
            ("PEER_TIMEOUT_SECS", "1"),
            ("POW_TIMEOUT_SECS", "0"),
            ("POW_MAX_ITERATIONS", "1000"),
            ("VERIFY_BLOCK_HASHES", "true"),
        ])
        .unwrap();
        assert_eq!(config.port, 5001);
        assert_eq!(config.difficulty, 2);
        assert_eq!(config.peer_timeout, Duration::from_secs(1));
        assert_eq!(config.pow_timeout, None);
        assert_eq!(config.pow_max_iterations, Some(1000));
        assert_eq!(config.validation_mode, ValidationMode::Integrity);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(load(&[("PORT", "http")]), Err(LedgerError::Config(_))));
        assert!(load(&[("DIFFICULTY", "-1")]).is_err());
    }
}
