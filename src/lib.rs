pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::http::ReqwestTransport;
pub use config::{toml_config::TomlConfig, GrouperConfig};
pub use core::{batcher::Batcher, client::BatchedMembershipClient, requester::RetryingRequester};
pub use utils::error::{GrouperError, Result};
