use jsonrpsee::core::ClientError;
use jsonrpsee::http_client::transport::Error as TransportError;
use serde_json::Value;
use starknet::core::types::Felt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid paymaster endpoint {0}")]
    InvalidEndpoint(String),

    #[error("api key is not a valid header value")]
    InvalidApiKey,

    #[error("paymaster unreachable: {0}")]
    Transport(String),

    #[error("paymaster responded with status {status}")]
    Http { status: u16 },

    #[error("{message}")]
    Rpc { code: i64, message: String, data: Option<Value> },

    #[error("malformed paymaster response: {0}")]
    Format(String),

    #[error("paymaster fee {fee} is above the accepted maximum {max_fee}")]
    MaxFeeExceeded { fee: Felt, max_fee: Felt },

    #[error("paymaster built a {0} transaction where an invoke was expected")]
    UnexpectedTransaction(&'static str),

    #[error("could not sign paymaster transaction: {0}")]
    Signature(String),
}

impl Error {
    /// HTTP status code of the paymaster response, when the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<ClientError> for Error {
    fn from(value: ClientError) -> Self {
        match value {
            ClientError::Call(error) => Error::Rpc {
                code: error.code() as i64,
                message: error.message().to_string(),
                data: error.data().and_then(|data| serde_json::from_str(data.get()).ok()),
            },
            ClientError::Transport(error) => match error.downcast_ref::<TransportError>() {
                Some(TransportError::Rejected { status_code }) => Error::Http { status: *status_code },
                _ => Error::Transport(error.to_string()),
            },
            ClientError::ParseError(error) => Error::Format(error.to_string()),
            e => Error::Transport(e.to_string()),
        }
    }
}
