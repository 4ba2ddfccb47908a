use gasless_wallet::StarknetContext;
use tracing::{info, warn};

use crate::command::Application;
use crate::core::Error;
use crate::display::{balances, contract_link, short_address};

pub(crate) async fn display_account(context: &StarknetContext, with_counter: bool) {
    let state = context.snapshot();
    let Some(ready) = state.ready() else {
        warn!("No account");
        return;
    };

    let chain_id = context.configuration().starknet.chain_id;
    let address = ready.address();

    info!("Account: {} ({})", short_address(&address), address.to_fixed_hex_string());
    info!("Public key: {}", ready.public_key().to_fixed_hex_string());
    info!("Deployed: {}", if ready.is_deployed { "yes" } else { "no" });
    info!("Balances: {}", balances(Some(&ready.balances)));
    info!("Explorer: {}", contract_link(&chain_id, &address));

    if with_counter {
        match context.fetch_counter().await {
            Ok(value) => info!("Counter: {}", value),
            Err(e) => warn!("Counter unavailable: {}", e),
        }
    }
}

pub async fn command_account(application: &Application) -> Result<(), Error> {
    let context = application.connect().await?;
    display_account(&context, true).await;

    Ok(())
}
