//! Session-scoped Starknet wallet: derives the account of an authenticated user, keeps
//! its balances fresh and submits sponsored transactions through a paymaster.

mod configuration;
pub use configuration::{Configuration, ConfirmationConfiguration, PaymasterEndpoint};

mod context;
pub use context::{StarknetContext, TransactionResult};

mod error;
pub use error::{Error, ErrorKind};

mod monitoring;

mod session;
pub use session::{IdentityBinding, IdentityBindingContext, SessionIdentity};

mod state;
pub use state::{ContextState, ReadyState, SessionState};
