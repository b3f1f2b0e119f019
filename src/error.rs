use std::io;
use thiserror::Error;

use crate::config::ConfigError;
use crate::worker::fetch::FetchError;

/// Anything that stops the shell from coming up. Shown on the fatal panel.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("asset client: {0}")]
    Fetch(#[from] FetchError),
    #[error("could not start the cache worker: {0}")]
    Worker(#[from] io::Error),
    #[error("startup panicked: {0}")]
    Panic(String),
}
