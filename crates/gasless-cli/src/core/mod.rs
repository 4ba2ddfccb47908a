use thiserror::Error;

pub mod environment;
pub mod settings;

mod tracing;
pub use tracing::{Fmt, VerbosityConfiguration};

#[derive(Error, Debug)]
pub enum Error {
    #[error("CLI execution error: {0}")]
    Execution(String),

    #[error("CLI validation error: {0}")]
    Validation(String),

    #[error("CLI configuration error: {0}")]
    Configuration(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error(transparent)]
    Wallet(#[from] gasless_wallet::Error),
}

impl From<gasless_paymaster::Error> for Error {
    fn from(value: gasless_paymaster::Error) -> Self {
        Self::Wallet(value.into())
    }
}
