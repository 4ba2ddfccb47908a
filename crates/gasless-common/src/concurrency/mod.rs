mod workers;

use thiserror::Error;
use tokio::task::JoinError;
pub use workers::ConcurrentExecutor;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Join(#[from] JoinError),

    #[error("executor has no worker slot")]
    NoWorkers,
}
