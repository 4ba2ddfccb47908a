use tracing::info;

use crate::command::{announce_pending, report, Application};
use crate::core::Error;

pub async fn command_increment(application: &Application) -> Result<(), Error> {
    let context = application.connect().await?;
    if !context.snapshot().is_deployed() {
        info!("Account not deployed yet, it will be deployed by this transaction");
    }

    info!("➕ Incrementing counter (gasless)");
    let notice = announce_pending(&context);
    let result = context.increment().await;
    notice.abort();

    report(&context, "Increment", result)?;

    match context.fetch_counter().await {
        Ok(value) => info!("Counter: {}", value),
        Err(e) => info!("Counter unavailable: {}", e),
    }

    Ok(())
}
