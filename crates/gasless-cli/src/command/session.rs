use clap::Args;
use tracing::info;

use crate::command::account::display_account;
use crate::command::Application;
use crate::core::settings::StoredSession;
use crate::core::Error;

#[derive(Args, Clone)]
pub struct LoginParameters {
    /// Identifier of the authenticated user, as issued by the login provider
    #[clap(long, env = "GASLESS_USER_ID")]
    pub user_id: String,
}

pub async fn command_login(application: &Application, params: LoginParameters) -> Result<(), Error> {
    if params.user_id.trim().is_empty() {
        return Err(Error::Validation("user id must not be empty".to_string()));
    }

    let session = StoredSession {
        app_id: application.environment.privy_app_id.clone(),
        user_id: params.user_id,
    };
    application.settings.update(|settings| settings.session = Some(session))?;

    let context = application.connect().await?;
    info!("🔑 Logged in");
    display_account(&context, false).await;

    Ok(())
}

pub async fn command_logout(application: &Application) -> Result<(), Error> {
    application.settings.update(|settings| settings.session = None)?;
    info!("👋 Logged out");

    Ok(())
}
