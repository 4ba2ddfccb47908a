use gasless_wallet::{SessionIdentity, StarknetContext, TransactionResult};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::core::environment::Environment;
use crate::core::settings::SettingsStore;
use crate::core::Error;
use crate::display::{short_hash, transaction_link};

pub mod account;
pub mod deploy;
pub mod increment;
pub mod session;
pub mod settings;
pub mod status;
pub mod watch;

/// Everything a command needs: the resolved environment and the local settings
pub struct Application {
    pub environment: Environment,
    pub settings: SettingsStore,
}

impl Application {
    pub fn new(environment: Environment) -> Self {
        let settings = SettingsStore::new(environment.settings_path.clone());

        Self { environment, settings }
    }

    /// Identity of the stored session, if it belongs to the configured login application
    pub fn identity(&self) -> Result<SessionIdentity, Error> {
        let settings = self.settings.load()?;

        settings
            .session_for(self.environment.privy_app_id.as_deref())
            .map(|session| SessionIdentity::new(session.user_id.clone()))
            .ok_or_else(|| Error::Validation("not logged in, run `gasless login --user-id <id>` first".to_string()))
    }

    /// Build a logged out context using the API key stored in the settings, if any
    pub fn context(&self) -> Result<StarknetContext, Error> {
        let context = StarknetContext::new(self.environment.configuration()?);
        context.set_paymaster_api_key(self.settings.load()?.avnu_api_key);

        Ok(context)
    }

    /// Build a context and log the stored session in
    pub async fn connect(&self) -> Result<StarknetContext, Error> {
        let identity = self.identity()?;
        let context = self.context()?;
        context.initialize(&identity).await?;

        Ok(context)
    }
}

/// Print a notice with the explorer link as soon as the context publishes a transaction hash
pub(crate) fn announce_pending(context: &StarknetContext) -> JoinHandle<()> {
    let mut states = context.subscribe();
    let chain_id = context.configuration().starknet.chain_id;

    tokio::spawn(async move {
        let hash = match states.wait_for(|state| state.tx_hash().is_some()).await {
            Ok(state) => state.tx_hash(),
            Err(_) => None,
        };

        if let Some(hash) = hash {
            info!("⏳ Transaction {} pending: {}", short_hash(&hash), transaction_link(&chain_id, &hash));
        }
    })
}

pub(crate) fn report(context: &StarknetContext, action: &str, result: TransactionResult) -> Result<(), Error> {
    let chain_id = context.configuration().starknet.chain_id;

    match (result.success, result.error) {
        (true, _) => {
            if let Some(hash) = result.transaction_hash {
                info!("✅ {} confirmed: {}", action, transaction_link(&chain_id, &hash));
            }
            Ok(())
        },
        (false, error) => {
            if let Some(hash) = result.transaction_hash {
                warn!("{} submitted as {} but did not complete", action, transaction_link(&chain_id, &hash));
            }
            Err(error.map(Error::from).unwrap_or_else(|| Error::Execution(format!("{} failed", action))))
        },
    }
}
