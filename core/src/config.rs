//! Negotiation settings.
//!
//! Settings load from TOML and can be overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `SWITCHYARD_DEFAULT_WEIGHT` | `default_weight` |
//! | `SWITCHYARD_ROUTE_CACHE` | `route_cache` |
//! | `SWITCHYARD_ROUTE_CACHE_CAPACITY` | `route_cache_capacity` |

use crate::error::{GraphConfigurationError, NegotiationError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WEIGHT: f64 = 1.0;
pub const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NegotiationConfig {
    /// Weight given to negotiators built without an explicit weight.
    pub default_weight: f64,
    /// Memoise routes resolved against the base graph.
    pub route_cache: bool,
    /// Maximum number of memoised routes before the cache is cleared.
    pub route_cache_capacity: usize,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            default_weight: DEFAULT_WEIGHT,
            route_cache: true,
            route_cache_capacity: DEFAULT_ROUTE_CACHE_CAPACITY,
        }
    }
}

impl NegotiationConfig {
    /// Parse a TOML document into a validated config. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, NegotiationError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `SWITCHYARD_*` environment variables.
    pub fn from_env() -> Result<Self, GraphConfigurationError> {
        Self::default().with_env_overrides()
    }

    /// Apply `SWITCHYARD_*` environment overrides on top of `self`.
    pub fn with_env_overrides(self) -> Result<Self, GraphConfigurationError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, GraphConfigurationError> {
        if let Some(raw) = lookup("SWITCHYARD_DEFAULT_WEIGHT") {
            self.default_weight = raw.trim().parse().map_err(|_| {
                GraphConfigurationError::InvalidConfig(format!(
                    "SWITCHYARD_DEFAULT_WEIGHT is not a number: {raw}"
                ))
            })?;
        }
        if let Some(raw) = lookup("SWITCHYARD_ROUTE_CACHE") {
            self.route_cache = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => true,
                "0" | "false" | "off" | "no" => false,
                other => {
                    return Err(GraphConfigurationError::InvalidConfig(format!(
                        "SWITCHYARD_ROUTE_CACHE must be a boolean, got {other}"
                    )));
                }
            };
        }
        if let Some(raw) = lookup("SWITCHYARD_ROUTE_CACHE_CAPACITY") {
            self.route_cache_capacity = raw.trim().parse().map_err(|_| {
                GraphConfigurationError::InvalidConfig(format!(
                    "SWITCHYARD_ROUTE_CACHE_CAPACITY is not a count: {raw}"
                ))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), GraphConfigurationError> {
        if !self.default_weight.is_finite() || self.default_weight < 0.0 {
            return Err(GraphConfigurationError::InvalidConfig(format!(
                "default_weight must be finite and >= 0, got {}",
                self.default_weight
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = NegotiationConfig::default();
        assert_eq!(config.default_weight, 1.0);
        assert!(config.route_cache);
        assert_eq!(config.route_cache_capacity, 1024);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = NegotiationConfig::from_toml_str("default_weight = 2.5\n").unwrap();
        assert_eq!(config.default_weight, 2.5);
        assert!(config.route_cache);
    }

    #[test]
    fn test_from_toml_rejects_negative_weight() {
        let err = NegotiationConfig::from_toml_str("default_weight = -1.0").unwrap_err();
        assert!(matches!(
            err,
            NegotiationError::Configuration(GraphConfigurationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        let err = NegotiationConfig::from_toml_str("max_hops = 3").unwrap_err();
        assert!(matches!(err, NegotiationError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SWITCHYARD_DEFAULT_WEIGHT", "3"),
            ("SWITCHYARD_ROUTE_CACHE", "off"),
            ("SWITCHYARD_ROUTE_CACHE_CAPACITY", "16"),
        ]);
        let config = NegotiationConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.default_weight, 3.0);
        assert!(!config.route_cache);
        assert_eq!(config.route_cache_capacity, 16);
    }

    const VARS: [&str; 3] = [
        "SWITCHYARD_DEFAULT_WEIGHT",
        "SWITCHYARD_ROUTE_CACHE",
        "SWITCHYARD_ROUTE_CACHE_CAPACITY",
    ];

    #[test]
    fn test_env_without_overrides_keeps_values() {
        if VARS.iter().any(|key| std::env::var_os(key).is_some()) {
            return;
        }
        assert_eq!(NegotiationConfig::from_env().unwrap(), NegotiationConfig::default());

        let custom = NegotiationConfig {
            default_weight: 2.0,
            route_cache_capacity: 7,
            ..Default::default()
        };
        assert_eq!(custom.clone().with_env_overrides().unwrap(), custom);
    }

    #[test]
    fn test_overrides_reject_garbage() {
        let result = NegotiationConfig::default().with_overrides(|key| {
            (key == "SWITCHYARD_ROUTE_CACHE").then(|| "maybe".to_string())
        });
        assert!(result.is_err());
    }
}
