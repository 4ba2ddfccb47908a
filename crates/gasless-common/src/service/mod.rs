use async_trait::async_trait;
use thiserror::Error;

mod runner;
pub use runner::{ServiceHandle, ServiceManager};

pub mod monitoring;

pub use tracing;

/// Log the error of a result, if any, and hand the result back unchanged.
#[macro_export]
macro_rules! log_if_error {
    ($e: expr) => {
        match $e {
            Ok(v) => Ok(v),
            Err(e) => {
                $crate::service::tracing::error!("{}", e);
                Err(e)
            },
        }
    };
}

/// Log a message tagged with the name of the enclosing [`Service`].
/// Must be used inside an `impl Service for ...` block.
#[macro_export]
macro_rules! service_info {
    ($($arg: tt)+) => {
        $crate::service::tracing::info!(service = <Self as $crate::service::Service>::NAME, $($arg)+)
    };
}

/// See [`service_info`]
#[macro_export]
macro_rules! service_warn {
    ($($arg: tt)+) => {
        $crate::service::tracing::warn!(service = <Self as $crate::service::Service>::NAME, $($arg)+)
    };
}

/// See [`service_info`]
#[macro_export]
macro_rules! service_debug {
    ($($arg: tt)+) => {
        $crate::service::tracing::debug!(service = <Self as $crate::service::Service>::NAME, $($arg)+)
    };
}

/// Unwrap an `Ok` value. On `Err`, log a warning tagged with the service name and
/// evaluate the fallback expression (typically `continue` or `return ...`).
///
/// ```rust
/// let balances = service_check!(client.fetch_balances(address).await => continue);
/// ```
#[macro_export]
macro_rules! service_check {
    ($v: expr) => {
        $crate::service_check!($v => {})
    };
    ($v: expr => $e: expr) => {
        match $v {
            Ok(v) => v,
            Err(e) => {
                $crate::service_warn!("{}", e);
                $e
            },
        }
    };
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct Error(String);

impl Error {
    pub fn new(s: &str) -> Error {
        Error(s.to_string())
    }

    pub fn from<E: std::error::Error>(e: E) -> Self {
        Self(e.to_string())
    }
}

/// Long running background task with its own lifecycle, spawned through a [`ServiceManager`].
/// The service is built from a cloned [`Service::Context`] using [`Service::new`] then driven by [`Service::run`].
///
/// Returning `Ok(())` from [`Service::run`] means the service is done and will not be restarted.
/// Returning an error makes the manager build a fresh instance and run it again after a delay.
#[async_trait]
pub trait Service {
    const NAME: &'static str;
    type Context: Clone + Send;

    async fn new(context: Self::Context) -> Self;

    async fn run(self) -> Result<(), Error>;
}
