use std::collections::VecDeque;

use futures_core::future::BoxFuture;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::concurrency::Error;

/// Wrap a block into a boxed future usable with [`ConcurrentExecutor::register`].
/// The surrounding environment is moved into the block.
#[macro_export]
macro_rules! task {
    (|$n: ident| $e: block) => {
        move |$n| { Box::pin(async move $e) }
    };
    (|_| $e: block) => {
        move |_| { Box::pin(async move $e) }
    };
}

type Job<C, S> = Box<dyn FnOnce(C) -> BoxFuture<'static, S> + Send + Sync>;

/// Bounded fan-out of independent requests, e.g. one `balance_of` call per token.
/// At most `n_workers` tasks run at the same time; the others wait in FIFO order.
/// Each task receives a clone of the executor context.
///
/// ```rust
///  use gasless_common::concurrency::ConcurrentExecutor;
///  use gasless_common::task;
///
///  let mut executor = ConcurrentExecutor::new(client, 4);
///  executor.register(task!(|client| { client.fetch_balance(strk).await }));
///  executor.register(task!(|client| { client.fetch_balance(eth).await }));
///
///  let balances = executor.try_execute().await?;
/// ```
pub struct ConcurrentExecutor<C, S> {
    context: C,
    n_workers: usize,

    running: JoinSet<S>,
    pending: VecDeque<Job<C, S>>,
}

impl<C: Clone, S: 'static + Send> ConcurrentExecutor<C, S> {
    pub fn new(context: C, n_workers: usize) -> Self {
        Self {
            context,
            n_workers,

            running: JoinSet::new(),
            pending: VecDeque::new(),
        }
    }

    /// Register a task. It starts right away when a worker slot is free.
    pub fn register<F>(&mut self, task: F) -> &mut Self
    where
        F: 'static + FnOnce(C) -> BoxFuture<'static, S>,
        F: Send + Sync,
    {
        if self.running.len() < self.n_workers {
            self.running.spawn(task(self.context.clone()).in_current_span());
        } else {
            self.pending.push_back(Box::new(task));
        }

        self
    }

    /// Wait for the next task to finish and start a pending one in its slot.
    /// Returns `None` once every registered task has completed.
    pub async fn next(&mut self) -> Option<Result<S, Error>> {
        if self.n_workers == 0 && !self.pending.is_empty() {
            return Some(Err(Error::NoWorkers));
        }

        let value = self.running.join_next().await?;
        if let Some(task) = self.pending.pop_front() {
            self.running.spawn(task(self.context.clone()).in_current_span());
        }

        Some(value.map_err(Error::Join))
    }

    /// Run every registered task to completion. Results come back in completion order.
    pub async fn execute(&mut self) -> Result<Vec<S>, Error> {
        let mut results = Vec::with_capacity(self.running.len() + self.pending.len());
        while let Some(value) = self.next().await {
            results.push(value?)
        }

        Ok(results)
    }
}

impl<C: Clone, T: 'static + Send, E: 'static + Send + From<Error>> ConcurrentExecutor<C, Result<T, E>> {
    /// Run the registered fallible tasks and stop at the first failure.
    /// Tasks still running when a failure is observed are aborted.
    pub async fn try_execute(&mut self) -> Result<Vec<T>, E> {
        let mut results = Vec::with_capacity(self.running.len() + self.pending.len());
        while let Some(value) = self.next().await {
            match value {
                Ok(Ok(value)) => results.push(value),
                Ok(Err(e)) => return Err(self.abort_with(e)),
                Err(e) => return Err(self.abort_with(e.into())),
            }
        }

        Ok(results)
    }

    fn abort_with(&mut self, error: E) -> E {
        self.pending.clear();
        self.running.abort_all();

        error
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::concurrency::{ConcurrentExecutor, Error};

    #[derive(Debug, PartialEq)]
    enum FetchError {
        Unreachable,
        Executor,
    }

    impl From<Error> for FetchError {
        fn from(_: Error) -> Self {
            Self::Executor
        }
    }

    #[tokio::test]
    async fn nothing_registered_returns_empty() {
        let mut executor = ConcurrentExecutor::<(), u8>::new((), 2);
        let values = executor.execute().await.unwrap();

        assert!(values.is_empty());
    }

    #[tokio::test]
    async fn zero_workers_is_an_error() {
        let mut executor = ConcurrentExecutor::new((), 0);
        executor.register(task!(|_| { 5 }));

        assert!(matches!(executor.execute().await, Err(Error::NoWorkers)));
    }

    #[tokio::test]
    async fn context_is_shared_with_queued_tasks() {
        let mut executor = ConcurrentExecutor::new(10u64, 1);
        for i in 0..4u64 {
            executor.register(task!(|base| { base + i }));
        }

        let mut values = executor.execute().await.unwrap();
        values.sort();

        assert_eq!(values, vec![10, 11, 12, 13]);
    }

    #[tokio::test]
    async fn try_execute_collects_successes() {
        let mut executor = ConcurrentExecutor::new((), 2);
        executor.register(task!(|_| { Ok::<_, FetchError>("STRK") }));
        executor.register(task!(|_| { Ok::<_, FetchError>("ETH") }));

        let mut symbols = executor.try_execute().await.unwrap();
        symbols.sort();

        assert_eq!(symbols, vec!["ETH", "STRK"]);
    }

    #[tokio::test]
    async fn try_execute_stops_at_first_failure() {
        let mut executor = ConcurrentExecutor::new((), 2);
        executor.register(task!(|_| {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<u8, FetchError>(1)
        }));
        executor.register(task!(|_| { Err::<u8, FetchError>(FetchError::Unreachable) }));

        let result = executor.try_execute().await;
        assert_eq!(result, Err(FetchError::Unreachable));
    }
}
