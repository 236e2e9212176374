//! Runner Configuration
//!
//! Loads the JSON config file provisioned onto the workspace host (default
//! `~/.cloudide.config`) and validates the fields the session core depends
//! on. Keys are camelCase to match what the provisioner writes. A missing or
//! zero-valued required field aborts startup; the scheduler never runs on a
//! half-configured runner.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SessionError};

/// Default expiry check cadence, in seconds.
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 30;

/// Default grace window for the hard-limit comparison, in minutes.
///
/// Kept configurable (`hardLimitGraceMinutes`) until product settles on the
/// intended margin.
pub const DEFAULT_HARD_LIMIT_GRACE_MINUTES: i64 = 60;

/// Ceiling for `maxSessionTime`; a session never spans more than a year.
pub const MAX_SESSION_TIME_SECS: i64 = 365 * 24 * 3600;

/// Runner configuration as provisioned on the workspace host
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunnerConfig {
    /// Base URL of the monolith backend
    pub monolith_url: String,
    /// Runner identifier assigned by the backend
    pub runner_id: u64,
    /// Token sent in both auth headers on every backend call
    pub runner_auth: String,
    /// Maximum allowed session duration, in seconds
    pub max_session_time: i64,
    /// Provisioned session start; diagnostics only, the backend window is
    /// the truth
    pub session_start: Option<DateTime<Utc>>,
    /// Minutes before expiry at which the renewal prompt fires
    pub expiry_notification_minutes: u32,
    /// Minutes requested per accepted renewal
    pub add_time_minutes: u32,
    /// Optional file a surface should open on startup
    pub file_path: Option<PathBuf>,
    /// Grace window for the hard-limit comparison, in minutes
    pub hard_limit_grace_minutes: i64,
    /// Expiry check cadence, in seconds
    pub check_interval_seconds: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            monolith_url: String::new(),
            runner_id: 0,
            runner_auth: String::new(),
            max_session_time: 0,
            session_start: None,
            expiry_notification_minutes: 0,
            add_time_minutes: 0,
            file_path: None,
            hard_limit_grace_minutes: DEFAULT_HARD_LIMIT_GRACE_MINUTES,
            check_interval_seconds: DEFAULT_CHECK_INTERVAL_SECS,
        }
    }
}

impl RunnerConfig {
    /// Default config file location on the workspace host.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/home/ubuntu"))
            .join(".cloudide.config")
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SessionError::Config(format!("issue reading config file {}: {}", path.display(), e))
        })?;
        let config: RunnerConfig = serde_json::from_str(&raw)
            .map_err(|e| SessionError::Config(format!("issue parsing config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate required fields. Absent and zero-valued fields are
    /// indistinguishable on purpose; neither is usable.
    pub fn validate(&self) -> Result<()> {
        if self.monolith_url.is_empty() {
            return Err(SessionError::Config("no monolithUrl provided".to_string()));
        }
        url::Url::parse(&self.monolith_url)
            .map_err(|e| SessionError::Config(format!("invalid monolithUrl: {}", e)))?;
        if self.runner_id == 0 {
            return Err(SessionError::Config("no runnerId provided".to_string()));
        }
        if self.runner_auth.is_empty() {
            return Err(SessionError::Config("no runnerAuth provided".to_string()));
        }
        if self.max_session_time <= 0 {
            return Err(SessionError::Config("no maxSessionTime provided".to_string()));
        }
        if self.max_session_time > MAX_SESSION_TIME_SECS {
            return Err(SessionError::Config(
                "maxSessionTime out of range".to_string(),
            ));
        }
        if self.session_start.is_none() {
            return Err(SessionError::Config("no sessionStart provided".to_string()));
        }
        if self.expiry_notification_minutes == 0 {
            return Err(SessionError::Config(
                "no expiryNotificationMinutes provided".to_string(),
            ));
        }
        if self.add_time_minutes == 0 {
            return Err(SessionError::Config("no addTimeMinutes provided".to_string()));
        }
        if self.check_interval_seconds == 0 {
            return Err(SessionError::Config(
                "checkIntervalSeconds must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Expiry check cadence as a wall duration.
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_seconds)
    }

    /// Grace window for the hard-limit comparison.
    pub fn hard_limit_grace(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.hard_limit_grace_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "monolithUrl": "https://app.revature.com",
            "runnerId": 4182,
            "runnerAuth": "tok-4182-secret",
            "maxSessionTime": 28800,
            "sessionStart": "2025-05-02T15:30:00Z",
            "expiryNotificationMinutes": 10,
            "addTimeMinutes": 30
        })
    }

    fn write_config(value: &serde_json::Value) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".cloudide.config");
        std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_valid_config() {
        let (_dir, path) = write_config(&sample_json());
        let config = RunnerConfig::load(&path).unwrap();

        assert_eq!(config.monolith_url, "https://app.revature.com");
        assert_eq!(config.runner_id, 4182);
        assert_eq!(config.runner_auth, "tok-4182-secret");
        assert_eq!(config.max_session_time, 28800);
        assert_eq!(config.expiry_notification_minutes, 10);
        assert_eq!(config.add_time_minutes, 30);
        // Optional fields fall back to defaults
        assert_eq!(config.hard_limit_grace_minutes, DEFAULT_HARD_LIMIT_GRACE_MINUTES);
        assert_eq!(config.check_interval_seconds, DEFAULT_CHECK_INTERVAL_SECS);
        assert!(config.file_path.is_none());
    }

    #[test]
    fn test_session_start_parses_utc() {
        let (_dir, path) = write_config(&sample_json());
        let config = RunnerConfig::load(&path).unwrap();

        let start = config.session_start.unwrap();
        assert_eq!(start.to_rfc3339(), "2025-05-02T15:30:00+00:00");
    }

    #[test]
    fn test_missing_runner_auth_rejected() {
        let mut value = sample_json();
        value.as_object_mut().unwrap().remove("runnerAuth");
        let (_dir, path) = write_config(&value);

        let err = RunnerConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("no runnerAuth provided"));
    }

    #[test]
    fn test_zero_runner_id_rejected() {
        let mut value = sample_json();
        value["runnerId"] = serde_json::json!(0);
        let (_dir, path) = write_config(&value);

        let err = RunnerConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("no runnerId provided"));
    }

    #[test]
    fn test_invalid_monolith_url_rejected() {
        let mut value = sample_json();
        value["monolithUrl"] = serde_json::json!("not a url");
        let (_dir, path) = write_config(&value);

        let err = RunnerConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("invalid monolithUrl"));
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let mut value = sample_json();
        value["expiryNotificationMinutes"] = serde_json::json!(0);
        let (_dir, path) = write_config(&value);

        let err = RunnerConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("no expiryNotificationMinutes provided"));
    }

    #[test]
    fn test_oversized_max_session_time_rejected() {
        // Large enough to overflow the millisecond arithmetic downstream.
        let mut value = sample_json();
        value["maxSessionTime"] = serde_json::json!(10_000_000_000_000_000i64);
        let (_dir, path) = write_config(&value);

        let err = RunnerConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("maxSessionTime out of range"));
    }

    #[test]
    fn test_missing_file_reported_as_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunnerConfig::load(&dir.path().join("absent.config")).unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
        assert!(err.to_string().contains("issue reading config file"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut value = sample_json();
        value["somethingNew"] = serde_json::json!({"nested": true});
        let (_dir, path) = write_config(&value);

        assert!(RunnerConfig::load(&path).is_ok());
    }

    #[test]
    fn test_optional_overrides_honored() {
        let mut value = sample_json();
        value["hardLimitGraceMinutes"] = serde_json::json!(15);
        value["checkIntervalSeconds"] = serde_json::json!(5);
        value["filePath"] = serde_json::json!("/home/ubuntu/project/guide.md");
        let (_dir, path) = write_config(&value);

        let config = RunnerConfig::load(&path).unwrap();
        assert_eq!(config.hard_limit_grace(), chrono::Duration::minutes(15));
        assert_eq!(config.check_interval(), Duration::from_secs(5));
        assert_eq!(
            config.file_path.as_deref(),
            Some(Path::new("/home/ubuntu/project/guide.md"))
        );
    }
}
