use crate::config::toml_config::TomlConfig;
use crate::config::GrouperConfig;
use crate::utils::error::{GrouperError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "grouper")]
#[command(about = "Add, remove and list Grouper group members in paced batches")]
pub struct CliArgs {
    #[arg(long, short, help = "TOML configuration file with a [grouper] table")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "GROUPER_BASE_URL", help = "Groups endpoint of the Grouper web service")]
    pub base_url: Option<String>,

    #[arg(long, env = "GROUPER_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "GROUPER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, help = "Per-request timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long)]
    pub max_attempts: Option<u32>,

    #[arg(long)]
    pub max_changes_per_query: Option<usize>,

    #[arg(long, help = "Seconds to wait between chunks; 0 disables pacing")]
    pub sleep_between_changes: Option<f64>,

    #[arg(long, help = "Emit JSON log lines")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Add subjects to a group
    Add {
        group: String,
        subject_ids: Vec<String>,
        #[arg(long, help = "Read subject ids from a file, one per line")]
        from_file: Option<PathBuf>,
        #[arg(long, help = "Replace the current membership with the given subjects")]
        replace: bool,
    },
    /// Remove subjects from a group
    Remove {
        group: String,
        subject_ids: Vec<String>,
        #[arg(long, help = "Read subject ids from a file, one per line")]
        from_file: Option<PathBuf>,
    },
    /// Print the subject ids of a group's members
    List { group: String },
}

impl Command {
    pub fn group(&self) -> &str {
        match self {
            Command::Add { group, .. } | Command::Remove { group, .. } | Command::List { group } => {
                group
            }
        }
    }

    /// Subject ids from the command line followed by those read from `--from-file`.
    pub fn subject_ids(&self) -> Result<Vec<String>> {
        let (inline, from_file) = match self {
            Command::Add {
                subject_ids,
                from_file,
                ..
            }
            | Command::Remove {
                subject_ids,
                from_file,
                ..
            } => (subject_ids, from_file),
            Command::List { .. } => return Ok(Vec::new()),
        };

        let mut ids = inline.clone();
        if let Some(path) = from_file {
            let content = std::fs::read_to_string(path)?;
            ids.extend(parse_subject_lines(&content));
        }
        Ok(ids)
    }
}

pub fn parse_subject_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl CliArgs {
    /// Config file first, then command line overrides on top.
    pub fn to_grouper_config(&self) -> Result<GrouperConfig> {
        let mut config = match (&self.config, &self.base_url) {
            (Some(path), _) => TomlConfig::from_file(path)?.to_grouper_config()?,
            (None, Some(base_url)) => GrouperConfig::new(base_url.clone()),
            (None, None) => {
                return Err(GrouperError::MissingConfigError {
                    field: "--config or --base-url".to_string(),
                })
            }
        };

        if self.config.is_some() {
            if let Some(base_url) = &self.base_url {
                config.base_url = base_url.clone();
            }
        }
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => {
                config = config.with_credentials(username.clone(), password.clone());
            }
            (Some(_), None) => {
                return Err(GrouperError::MissingConfigError {
                    field: "--password".to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(GrouperError::MissingConfigError {
                    field: "--username".to_string(),
                })
            }
            (None, None) => {}
        }
        if let Some(timeout) = self.timeout_seconds {
            config = config.with_timeout(Duration::from_secs(timeout));
        }
        if let Some(attempts) = self.max_attempts {
            config = config.with_max_attempts(attempts);
        }
        if let Some(batch) = self.max_changes_per_query {
            config = config.with_max_changes_per_query(batch);
        }
        if let Some(seconds) = self.sleep_between_changes {
            config = config.with_sleep_between_changes_secs(seconds);
        }

        config.validate()?;
        Ok(config)
    }
}

impl Validate for CliArgs {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("group", self.command.group())?;
        if !matches!(self.command, Command::List { .. }) && self.command.subject_ids()?.is_empty() {
            return Err(GrouperError::MissingConfigError {
                field: "subject ids".to_string(),
            });
        }
        self.to_grouper_config().map(|_| ())
    }
}
