// IntegritySpy - app/config.rs
//
// Resolution of the two required parameters (watched directory and scan
// interval) from CLI flags with environment-variable fallback.
//
// The CLI arguments arrive as unvalidated Option<String>s (clap only
// tokenises; it must not own the error text, because the stderr contract
// requires exact substrings). Resolution order matches the contract:
//   1. dir present?         -> "dir argument is required"
//   2. interval present?    -> "interval argument is required"
//   3. interval valid?      -> "invalid interval argument"
// Directory openability is checked afterwards by the baseline scan, which
// reports "failed to open directory".

use crate::util::constants::{ENV_DIR, ENV_INTERVAL};
use crate::util::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

/// Fully resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Directory whose regular files are monitored.
    pub dir: PathBuf,
    /// Period between timer-triggered scans.
    pub interval: Duration,
}

impl WatchConfig {
    /// Resolve from CLI values with fallback to the `dir` / `interval`
    /// environment variables. CLI flags take precedence.
    pub fn resolve(
        cli_dir: Option<String>,
        cli_interval: Option<String>,
    ) -> Result<Self, ConfigError> {
        Self::resolve_with_env(cli_dir, cli_interval, |name| std::env::var(name).ok())
    }

    /// Resolution against an injectable environment lookup, so tests can
    /// exercise the fallback without mutating process-global state.
    fn resolve_with_env<E>(
        cli_dir: Option<String>,
        cli_interval: Option<String>,
        env: E,
    ) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let dir = cli_dir
            .or_else(|| env(ENV_DIR))
            .ok_or(ConfigError::MissingDir)?;

        let interval_raw = cli_interval
            .or_else(|| env(ENV_INTERVAL))
            .ok_or(ConfigError::MissingInterval)?;

        let interval_secs: u64 = match interval_raw.parse() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(ConfigError::InvalidInterval {
                    value: interval_raw,
                })
            }
        };

        Ok(Self {
            dir: PathBuf::from(dir),
            interval: Duration::from_secs(interval_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_cli_values_resolve() {
        let config = WatchConfig::resolve_with_env(
            Some("./watched".to_string()),
            Some("10".to_string()),
            no_env,
        )
        .unwrap();
        assert_eq!(config.dir, PathBuf::from("./watched"));
        assert_eq!(config.interval, Duration::from_secs(10));
    }

    #[test]
    fn test_missing_dir_is_reported_first() {
        let result = WatchConfig::resolve_with_env(None, Some("10".to_string()), no_env);
        assert!(matches!(result, Err(ConfigError::MissingDir)));
    }

    #[test]
    fn test_missing_interval_reported_before_dir_validity() {
        // The directory does not exist, but the missing interval wins.
        let result =
            WatchConfig::resolve_with_env(Some("./does_not_exist".to_string()), None, no_env);
        assert!(matches!(result, Err(ConfigError::MissingInterval)));
    }

    #[test]
    fn test_non_numeric_interval_is_invalid() {
        let result = WatchConfig::resolve_with_env(
            Some("./watched".to_string()),
            Some("abc".to_string()),
            no_env,
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidInterval { value }) if value == "abc"
        ));
    }

    #[test]
    fn test_zero_interval_is_invalid() {
        let result = WatchConfig::resolve_with_env(
            Some("./watched".to_string()),
            Some("0".to_string()),
            no_env,
        );
        assert!(matches!(result, Err(ConfigError::InvalidInterval { .. })));
    }

    #[test]
    fn test_negative_interval_is_invalid() {
        let result = WatchConfig::resolve_with_env(
            Some("./watched".to_string()),
            Some("-5".to_string()),
            no_env,
        );
        assert!(matches!(result, Err(ConfigError::InvalidInterval { .. })));
    }

    #[test]
    fn test_env_fallback_is_consulted() {
        let env = |name: &str| match name {
            "dir" => Some("./from_env".to_string()),
            "interval" => Some("30".to_string()),
            _ => None,
        };
        let config = WatchConfig::resolve_with_env(None, None, env).unwrap();
        assert_eq!(config.dir, PathBuf::from("./from_env"));
        assert_eq!(config.interval, Duration::from_secs(30));
    }

    #[test]
    fn test_env_interval_is_validated_like_cli() {
        // Proves the env path reaches the same validator: dir comes from the
        // environment, interval from the environment is junk.
        let env = |name: &str| match name {
            "dir" => Some("./from_env".to_string()),
            "interval" => Some("abc".to_string()),
            _ => None,
        };
        let result = WatchConfig::resolve_with_env(None, None, env);
        assert!(matches!(result, Err(ConfigError::InvalidInterval { .. })));
    }

    #[test]
    fn test_cli_overrides_env() {
        let env = |name: &str| match name {
            "dir" => Some("./from_env".to_string()),
            "interval" => Some("999".to_string()),
            _ => None,
        };
        let config = WatchConfig::resolve_with_env(
            Some("./from_cli".to_string()),
            Some("5".to_string()),
            env,
        )
        .unwrap();
        assert_eq!(config.dir, PathBuf::from("./from_cli"));
        assert_eq!(config.interval, Duration::from_secs(5));
    }
}
