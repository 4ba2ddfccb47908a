use gasless_paymaster::{Client, Configuration};
use tracing::{info, warn};

use crate::command::Application;
use crate::core::Error;

pub async fn command_status(application: &Application) -> Result<(), Error> {
    let context = application.context()?;
    let configuration = context.configuration();

    info!("Network: {}", configuration.starknet.chain_id.as_identifier());
    info!("RPC URL: {}", configuration.starknet.endpoint);
    info!("Counter contract: {}", configuration.counter_address.to_fixed_hex_string());
    info!("Paymaster URL: {}", configuration.paymaster.endpoint);
    if let Some(client_id) = &application.environment.privy_client_id {
        info!("Login client: {}", client_id);
    }

    let api_key = context.paymaster_api_key();
    if api_key.is_none() {
        warn!("No AVNU API key configured, gasless transactions are disabled");
    }

    let client = Client::new(&Configuration {
        endpoint: configuration.paymaster.endpoint.clone(),
        api_key,
        timeout: configuration.paymaster.timeout,
    })?;

    if client.is_available().await? {
        info!("🟢 Paymaster available");
    } else {
        warn!("🔴 Paymaster unavailable");
    }

    Ok(())
}
