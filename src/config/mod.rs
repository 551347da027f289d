#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_zero_duration, validate_positive_number, validate_url, Validate,
};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_MAX_CHANGES_PER_QUERY: usize = 50;
pub const DEFAULT_SLEEP_BETWEEN_CHANGES: Duration = Duration::from_secs(5);

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Settings for one client. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GrouperConfig {
    /// Groups endpoint, e.g. `https://host/grouper-ws/servicesRest/json/v2_2_000/groups`.
    pub base_url: String,
    pub credentials: Option<Credentials>,
    /// Per-call timeout.
    pub timeout: Duration,
    /// Total attempts per HTTP call, including the first.
    pub max_attempts: u32,
    pub max_changes_per_query: usize,
    /// `None` disables pacing between chunks.
    pub sleep_between_changes: Option<Duration>,
}

impl GrouperConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_changes_per_query: DEFAULT_MAX_CHANGES_PER_QUERY,
            sleep_between_changes: Some(DEFAULT_SLEEP_BETWEEN_CHANGES),
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_max_changes_per_query(mut self, max_changes_per_query: usize) -> Self {
        self.max_changes_per_query = max_changes_per_query;
        self
    }

    pub fn with_sleep_between_changes(mut self, sleep: Option<Duration>) -> Self {
        self.sleep_between_changes = sleep.filter(|d| !d.is_zero());
        self
    }

    /// Pacing in seconds; only a positive, finite value enables it.
    pub fn with_sleep_between_changes_secs(self, seconds: f64) -> Self {
        self.with_sleep_between_changes(pacing_from_secs(seconds))
    }
}

pub fn pacing_from_secs(seconds: f64) -> Option<Duration> {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::try_from_secs_f64(seconds).ok()
    } else {
        None
    }
}

impl Validate for GrouperConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_non_zero_duration("timeout", self.timeout)?;
        validate_positive_number("max_attempts", self.max_attempts as usize, 1)?;
        validate_positive_number("max_changes_per_query", self.max_changes_per_query, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GrouperConfig::new("https://grouper.example.edu/groups");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.max_changes_per_query, 50);
        assert_eq!(config.sleep_between_changes, Some(Duration::from_secs(5)));
        assert!(config.credentials.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_positive_pacing_disables_sleep() {
        let base = GrouperConfig::new("https://grouper.example.edu/groups");
        assert_eq!(base.clone().with_sleep_between_changes_secs(0.0).sleep_between_changes, None);
        assert_eq!(base.clone().with_sleep_between_changes_secs(-2.0).sleep_between_changes, None);
        assert_eq!(base.clone().with_sleep_between_changes_secs(f64::NAN).sleep_between_changes, None);
        assert_eq!(
            base.with_sleep_between_changes_secs(0.5).sleep_between_changes,
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_invalid_knobs_fail_validation() {
        let base = GrouperConfig::new("https://grouper.example.edu/groups");
        assert!(base.clone().with_max_attempts(0).validate().is_err());
        assert!(base.clone().with_max_changes_per_query(0).validate().is_err());
        assert!(base.clone().with_timeout(Duration::ZERO).validate().is_err());
        assert!(GrouperConfig::new("not a url").validate().is_err());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let config = GrouperConfig::new("https://grouper.example.edu/groups")
            .with_credentials("svc-sync", "hunter2");
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("svc-sync"));
        assert!(!rendered.contains("hunter2"));
    }
}
