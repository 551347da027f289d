use crate::config::{pacing_from_secs, GrouperConfig};
use crate::utils::error::{GrouperError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// On-disk configuration:
///
/// ```toml
/// [grouper]
/// base_url = "https://grouper.example.edu/grouper-ws/servicesRest/json/v2_2_000/groups"
/// username = "${GROUPER_USER}"
/// password = "${GROUPER_PASSWORD}"
/// timeout_seconds = 5
/// max_attempts = 3
/// max_changes_per_query = 50
/// sleep_between_changes = 5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub grouper: GrouperSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrouperSection {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_attempts: Option<u32>,
    pub max_changes_per_query: Option<usize>,
    /// Seconds; anything that is not a positive number disables pacing.
    pub sleep_between_changes: Option<toml::Value>,
}

impl TomlConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GrouperError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GrouperError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` references with environment values; unknown ones are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GrouperError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn sleep_between_changes(&self) -> Option<Duration> {
        let Some(value) = &self.grouper.sleep_between_changes else {
            return Some(crate::config::DEFAULT_SLEEP_BETWEEN_CHANGES);
        };
        let seconds = match value {
            toml::Value::Integer(i) => *i as f64,
            toml::Value::Float(f) => *f,
            other => {
                tracing::warn!(
                    "sleep_between_changes is not numeric ({}), pacing disabled",
                    other
                );
                return None;
            }
        };
        pacing_from_secs(seconds)
    }

    pub fn to_grouper_config(&self) -> Result<GrouperConfig> {
        let section = &self.grouper;
        let mut config = GrouperConfig::new(section.base_url.clone());

        match (&section.username, &section.password) {
            (Some(username), Some(password)) => {
                config = config.with_credentials(username.clone(), password.clone());
            }
            (Some(_), None) => {
                return Err(GrouperError::MissingConfigError {
                    field: "grouper.password".to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(GrouperError::MissingConfigError {
                    field: "grouper.username".to_string(),
                })
            }
            (None, None) => {}
        }

        if let Some(timeout) = section.timeout_seconds {
            config = config.with_timeout(Duration::from_secs(timeout));
        }
        if let Some(attempts) = section.max_attempts {
            config = config.with_max_attempts(attempts);
        }
        if let Some(batch) = section.max_changes_per_query {
            config = config.with_max_changes_per_query(batch);
        }
        config = config.with_sleep_between_changes(self.sleep_between_changes());

        config.validate()?;
        Ok(config)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("grouper.base_url", &self.grouper.base_url)?;
        self.to_grouper_config().map(|_| ())
    }
}
