//! Dashboard configuration loaded from environment variables.
//!
//! - `CHAINBOARD_API_URL`: backend base URL (default `http://localhost:8000/api`)
//! - `CHAINBOARD_SYMBOLS`: comma-separated initial selection
//! - `CHAINBOARD_EXPIRY`: expiry filter, e.g. `25-Nov-2025`
//! - `CHAINBOARD_REFRESH_SECS`: enables auto-refresh at this interval
//!
//! Empty variables are treated as unset, except that a blank
//! `CHAINBOARD_REFRESH_SECS` turns auto-refresh on at the default interval.

use crate::constants::API_BASE_URL;
use crate::constants::refresh::DEFAULT_INTERVAL_SECS;
use crate::error::{ChainError, Result};
use crate::pipeline::registry::normalize_symbol;
use crate::pipeline::scheduler::clamp_interval;

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub api_url: String,
    /// Initial selection; empty means "auto-select from the watch-list".
    pub symbols: Vec<String>,
    pub expiry: Option<String>,
    /// Requested auto-refresh interval in seconds, if auto-refresh is wanted.
    pub refresh_secs: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: API_BASE_URL.to_owned(),
            symbols: Vec::new(),
            expiry: None,
            refresh_secs: None,
        }
    }
}

impl DashboardConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Config`] if `CHAINBOARD_REFRESH_SECS` is not a
    /// whole number of seconds.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_url = var("CHAINBOARD_API_URL").unwrap_or_else(|| API_BASE_URL.to_owned());

        let mut symbols: Vec<String> = Vec::new();
        for s in var("CHAINBOARD_SYMBOLS")
            .iter()
            .flat_map(|v| v.split(','))
            .filter_map(normalize_symbol)
        {
            if !symbols.contains(&s) {
                symbols.push(s);
            }
        }

        let expiry = var("CHAINBOARD_EXPIRY").map(|e| e.trim().to_owned());

        let refresh_secs = lookup("CHAINBOARD_REFRESH_SECS")
            .map(|v| {
                if v.trim().is_empty() {
                    return Ok(DEFAULT_INTERVAL_SECS);
                }
                v.trim().parse::<u64>().map_err(|_| {
                    ChainError::Config(format!(
                        "CHAINBOARD_REFRESH_SECS must be a whole number of seconds, got {v:?}"
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            api_url,
            symbols,
            expiry,
            refresh_secs,
        })
    }

    /// Effective auto-refresh period in seconds, after clamping.
    pub fn effective_refresh_secs(&self) -> Option<u64> {
        self.refresh_secs.map(|s| clamp_interval(s).as_secs())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<DashboardConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        assert_eq!(load(&[]).unwrap(), DashboardConfig::default());
    }

    #[test]
    fn empty_values_count_as_unset() {
        let cfg = load(&[("CHAINBOARD_API_URL", ""), ("CHAINBOARD_EXPIRY", "  ")]).unwrap();
        assert_eq!(cfg.api_url, API_BASE_URL);
        assert_eq!(cfg.expiry, None);
    }

    #[test]
    fn parses_symbols_and_refresh() {
        let cfg = load(&[
            ("CHAINBOARD_API_URL", "http://10.0.0.5:8000/api"),
            ("CHAINBOARD_SYMBOLS", "tcs, INFY,,tcs ,sbin"),
            ("CHAINBOARD_EXPIRY", "25-Nov-2025"),
            ("CHAINBOARD_REFRESH_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(cfg.api_url, "http://10.0.0.5:8000/api");
        assert_eq!(cfg.symbols, vec!["TCS", "INFY", "SBIN"]);
        assert_eq!(cfg.expiry.as_deref(), Some("25-Nov-2025"));
        assert_eq!(cfg.refresh_secs, Some(5));
        assert_eq!(cfg.effective_refresh_secs(), Some(10));
    }

    #[test]
    fn blank_refresh_uses_default_interval() {
        let cfg = load(&[("CHAINBOARD_REFRESH_SECS", " ")]).unwrap();
        assert_eq!(cfg.refresh_secs, Some(DEFAULT_INTERVAL_SECS));
        assert_eq!(cfg.effective_refresh_secs(), Some(60));
    }

    #[test]
    fn rejects_non_numeric_refresh() {
        let err = load(&[("CHAINBOARD_REFRESH_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ChainError::Config(_)));
    }
}
