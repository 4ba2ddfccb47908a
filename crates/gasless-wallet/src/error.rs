use thiserror::Error;

pub const ACCOUNT_NOT_INITIALIZED: &str = "Account not initialized";
pub const API_KEY_REQUIRED: &str = "AVNU API key is required. Set GASLESS_AVNU_API_KEY or configure a key with `gasless settings set-api-key`.";
pub const API_KEY_INVALID: &str = "AVNU API key is invalid or expired. Get a new key at https://docs.avnu.fi";
pub const API_KEY_FORBIDDEN: &str = "AVNU API key does not have permission for paymaster transactions";
pub const RATE_LIMITED: &str = "AVNU rate limit exceeded. Please try again later.";

/// Broad class of a failure, used by front-ends to decide how to present it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Something required before any network call is absent: session, account or API key
    PreconditionMissing,
    /// The node or the paymaster could not be reached, or the transaction did not go through
    NetworkFailure,
    /// The paymaster refused the request
    PaymasterRejected,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn account_not_initialized() -> Self {
        Self::new(ErrorKind::PreconditionMissing, ACCOUNT_NOT_INITIALIZED)
    }

    pub fn api_key_required() -> Self {
        Self::new(ErrorKind::PreconditionMissing, API_KEY_REQUIRED)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<gasless_starknet::Error> for Error {
    fn from(value: gasless_starknet::Error) -> Self {
        use gasless_starknet::Error as StarknetError;

        match value {
            StarknetError::InvalidIdentity | StarknetError::Configuration(_) | StarknetError::UnknownChain(_) => {
                Self::new(ErrorKind::PreconditionMissing, value.to_string())
            },
            e => Self::new(ErrorKind::NetworkFailure, e.to_string()),
        }
    }
}

impl From<gasless_paymaster::Error> for Error {
    fn from(value: gasless_paymaster::Error) -> Self {
        use gasless_paymaster::Error as PaymasterError;

        match value.status() {
            Some(401) => return Self::new(ErrorKind::PaymasterRejected, API_KEY_INVALID),
            Some(403) => return Self::new(ErrorKind::PaymasterRejected, API_KEY_FORBIDDEN),
            Some(429) => return Self::new(ErrorKind::PaymasterRejected, RATE_LIMITED),
            _ => {},
        }

        match value {
            PaymasterError::InvalidEndpoint(_) | PaymasterError::InvalidApiKey => Self::new(ErrorKind::PreconditionMissing, value.to_string()),
            PaymasterError::Rpc { .. } | PaymasterError::MaxFeeExceeded { .. } | PaymasterError::UnexpectedTransaction(_) => {
                Self::new(ErrorKind::PaymasterRejected, value.to_string())
            },
            e => Self::new(ErrorKind::NetworkFailure, e.to_string()),
        }
    }
}
