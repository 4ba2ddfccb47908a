//! Client side of the SNIP-29 paymaster API: the JSON-RPC client itself and an
//! account view that builds, signs and executes sponsored transactions.

mod account;
pub use account::{PaymasterAccount, PaymasterDetails};

mod client;
pub use client::{Client, Configuration};

mod error;
pub use error::Error;

pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
