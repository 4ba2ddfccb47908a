use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;
use tracing::{error, info};

use crate::service::Service;

/// Spawn [`Service`] instances on the current Tokio runtime and restart them when they fail.
#[derive(Debug, Clone)]
pub struct ServiceManager {
    restart_delay: Duration,
}

impl Default for ServiceManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl ServiceManager {
    pub fn new(restart_delay: Duration) -> Self {
        Self { restart_delay }
    }

    /// Spawn the service with the given context. The returned handle owns the task:
    /// dropping it (or calling [`ServiceHandle::stop`]) aborts the service.
    pub fn spawn<T>(&self, context: T::Context) -> ServiceHandle
    where
        T: Service + Send + 'static,
        T::Context: 'static,
    {
        let restart_delay = self.restart_delay;

        let task = tokio::spawn(async move {
            loop {
                let service = T::new(context.clone()).await;

                info!(service = T::NAME, "starting service");
                match service.run().await {
                    Ok(()) => {
                        info!(service = T::NAME, "service terminated");
                        break;
                    },
                    Err(err) => {
                        error!(service = T::NAME, "service terminated with error {} - restarting in {:?}", err, restart_delay);
                        time::sleep(restart_delay).await;
                    },
                }
            }
        });

        ServiceHandle { name: T::NAME, task }
    }
}

/// Owner of a spawned service. The service is aborted when the handle is dropped.
#[derive(Debug)]
pub struct ServiceHandle {
    name: &'static str,
    task: JoinHandle<()>,
}

impl ServiceHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn stop(self) {}
}

impl Drop for ServiceHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::service::{Error, Service, ServiceManager};

    #[derive(Clone, Default)]
    struct Counter(Arc<AtomicUsize>);

    struct FailTwice(Counter);

    #[async_trait]
    impl Service for FailTwice {
        type Context = Counter;

        const NAME: &'static str = "FailTwice";

        async fn new(context: Self::Context) -> Self {
            Self(context)
        }

        async fn run(self) -> Result<(), Error> {
            let runs = self.0 .0.fetch_add(1, Ordering::SeqCst) + 1;
            if runs < 3 {
                return Err(Error::new("not yet"));
            }

            Ok(())
        }
    }

    struct Ticker(Counter);

    #[async_trait]
    impl Service for Ticker {
        type Context = Counter;

        const NAME: &'static str = "Ticker";

        async fn new(context: Self::Context) -> Self {
            Self(context)
        }

        async fn run(self) -> Result<(), Error> {
            loop {
                self.0 .0.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }
    }

    #[tokio::test]
    async fn failing_service_is_restarted_until_done() {
        let counter = Counter::default();
        let handle = ServiceManager::new(Duration::from_millis(1)).spawn::<FailTwice>(counter.clone());

        while !handle.is_finished() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(counter.0.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn dropping_the_handle_stops_the_service() {
        let counter = Counter::default();
        let handle = ServiceManager::default().spawn::<Ticker>(counter.clone());

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(handle.name(), "Ticker");
        handle.stop();

        tokio::time::sleep(Duration::from_millis(10)).await;
        let stopped_at = counter.0.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(stopped_at > 0);
        assert_eq!(counter.0.load(Ordering::SeqCst), stopped_at);
    }
}
