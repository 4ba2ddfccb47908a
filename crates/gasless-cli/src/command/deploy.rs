use tracing::info;

use crate::command::{announce_pending, report, Application};
use crate::core::Error;

pub async fn command_deploy(application: &Application) -> Result<(), Error> {
    let context = application.connect().await?;
    if context.snapshot().is_deployed() {
        info!("Account already deployed");
        return Ok(());
    }

    info!("🚀 Deploying account");
    let notice = announce_pending(&context);
    let result = context.deploy_account().await;
    notice.abort();

    report(&context, "Deployment", result)
}
