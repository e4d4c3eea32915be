//! Harness configuration.
//!
//! Read from the environment, then overridden by command-line flags:
//! - `MINPRINTF_INT_MODEL`: integer model to emulate (`ilp32`, `lp64`,
//!   `llp64`, `native`). Unset or unrecognized means the native model.
//! - `MINPRINTF_LOG`: path of the JSONL verification log. Unset means no log.

use std::path::PathBuf;

use minprintf_core::IntModel;

pub const INT_MODEL_ENV: &str = "MINPRINTF_INT_MODEL";
pub const LOG_ENV: &str = "MINPRINTF_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub int_model: IntModel,
    pub log_path: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            int_model: IntModel::native(),
            log_path: None,
        }
    }
}

impl HarnessConfig {
    /// Configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let int_model = lookup(INT_MODEL_ENV)
            .map(|raw| IntModel::from_str_loose(&raw))
            .unwrap_or_default();
        let log_path = lookup(LOG_ENV)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);
        Self {
            int_model,
            log_path,
        }
    }

    /// Apply command-line overrides on top.
    #[must_use]
    pub fn with_overrides(mut self, int_model: Option<&str>, log_path: Option<PathBuf>) -> Self {
        if let Some(raw) = int_model {
            self.int_model = IntModel::from_str_loose(raw);
        }
        if log_path.is_some() {
            self.log_path = log_path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lookup() {
        let config = HarnessConfig::from_lookup(|key| match key {
            INT_MODEL_ENV => Some("ILP32".to_string()),
            LOG_ENV => Some("target/verify.jsonl".to_string()),
            _ => None,
        });
        assert_eq!(config.int_model, IntModel::Ilp32);
        assert_eq!(config.log_path, Some(PathBuf::from("target/verify.jsonl")));
    }

    #[test]
    fn test_unset_is_native_without_log() {
        let config = HarnessConfig::from_lookup(|_| None);
        assert_eq!(config, HarnessConfig::default());
        let blank = HarnessConfig::from_lookup(|key| (key == LOG_ENV).then(|| "  ".to_string()));
        assert_eq!(blank.log_path, None);
    }

    #[test]
    fn test_overrides_win() {
        let config = HarnessConfig::from_lookup(|key| (key == INT_MODEL_ENV).then(|| "lp64".to_string()))
            .with_overrides(Some("llp64"), Some(PathBuf::from("a.jsonl")));
        assert_eq!(config.int_model, IntModel::Llp64);
        assert_eq!(config.log_path, Some(PathBuf::from("a.jsonl")));
        let kept = config.clone().with_overrides(None, None);
        assert_eq!(kept, config);
    }
}
