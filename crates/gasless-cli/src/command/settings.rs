use clap::{Args, Subcommand};
use tracing::info;

use crate::command::Application;
use crate::core::Error;

#[derive(Subcommand, Clone)]
pub enum SettingsCommand {
    #[command(about = "Show the stored settings")]
    Show,

    #[command(about = "Store the AVNU API key used for gasless transactions")]
    SetApiKey(SetApiKeyParameters),

    #[command(about = "Remove the stored AVNU API key and fall back to GASLESS_AVNU_API_KEY")]
    ClearApiKey,
}

#[derive(Args, Clone)]
pub struct SetApiKeyParameters {
    pub api_key: String,
}

fn mask(api_key: &str) -> String {
    let visible: String = api_key.chars().take(4).collect();
    format!("{}****", visible)
}

pub async fn command_settings(application: &Application, command: SettingsCommand) -> Result<(), Error> {
    match command {
        SettingsCommand::Show => {
            let settings = application.settings.load()?;
            let default_key = application.environment.avnu_api_key.as_deref().filter(|key| !key.trim().is_empty());

            info!("Settings file: {}", application.settings.path().display());
            match (settings.avnu_api_key.as_deref(), default_key) {
                (Some(key), _) => info!("API key: {} (stored)", mask(key)),
                (None, Some(key)) => info!("API key: {} (environment)", mask(key)),
                (None, None) => info!("API key: not configured"),
            }
            match settings.session_for(application.environment.privy_app_id.as_deref()) {
                Some(session) => info!("Session: {}", session.user_id),
                None => info!("Session: none"),
            }
        },
        SettingsCommand::SetApiKey(params) => {
            let api_key = params.api_key.trim().to_string();
            if api_key.is_empty() {
                return Err(Error::Validation("API key must not be empty".to_string()));
            }

            application.settings.update(|settings| settings.avnu_api_key = Some(api_key))?;
            info!("💾 API key stored");
        },
        SettingsCommand::ClearApiKey => {
            application.settings.update(|settings| settings.avnu_api_key = None)?;
            info!("🗑️ API key removed");
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::mask;

    #[test]
    fn api_key_is_masked() {
        assert_eq!(mask("abcdef123"), "abcd****");
        assert_eq!(mask("ab"), "ab****");
    }
}
