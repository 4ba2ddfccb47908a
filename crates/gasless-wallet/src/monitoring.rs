use std::sync::Weak;
use std::time::Duration;

use async_trait::async_trait;
use gasless_common::service::{Error, Service};
use gasless_common::{service_check, service_debug};
use tokio::time;

use crate::context::Inner;
use crate::StarknetContext;

#[derive(Clone)]
pub(crate) struct BalanceMonitoringContext {
    pub context: Weak<Inner>,
    pub epoch: u64,
    pub interval: Duration,
}

/// Refresh the balances of the session started at `epoch`, periodically.
/// Stops by itself once the context is gone or the session has changed.
pub(crate) struct BalanceMonitoring {
    context: BalanceMonitoringContext,
}

#[async_trait]
impl Service for BalanceMonitoring {
    type Context = BalanceMonitoringContext;

    const NAME: &'static str = "BalanceMonitoring";

    async fn new(context: Self::Context) -> Self {
        Self { context }
    }

    async fn run(self) -> Result<(), Error> {
        let mut interval = time::interval(self.context.interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        interval.tick().await;

        loop {
            interval.tick().await;

            let Some(context) = self.context.context.upgrade().map(StarknetContext::from) else {
                return Ok(());
            };

            if context.snapshot().epoch() != self.context.epoch {
                return Ok(());
            }

            service_check!(context.refresh_balance().await => continue);
            service_debug!("balances refreshed");
        }
    }
}
