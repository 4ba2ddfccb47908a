use gasless_common::service::ServiceManager;
use gasless_starknet::ChainID;
use gasless_wallet::{ContextState, IdentityBinding, IdentityBindingContext, SessionState};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::command::Application;
use crate::core::Error;
use crate::display::{balances, short_address, transaction_link};

fn display_state(chain_id: &ChainID, state: &ContextState) {
    if let Some(error) = state.error() {
        warn!("Error: {}", error);
    }

    match state.session() {
        SessionState::LoggedOut => info!("Logged out"),
        SessionState::Initializing => info!("Initializing account..."),
        SessionState::Ready(ready) => {
            info!(
                "{} | deployed: {} | {}",
                short_address(&ready.address()),
                if ready.is_deployed { "yes" } else { "no" },
                balances(Some(&ready.balances))
            );
            if let Some(hash) = ready.tx_hash {
                info!("⏳ Transaction pending: {}", transaction_link(chain_id, &hash));
            }
        },
    }
}

/// Follow the stored session and print every state change, balances included, until ctrl-c
pub async fn command_watch(application: &Application) -> Result<(), Error> {
    let identity = application.identity()?;
    let context = application.context()?;
    let chain_id = context.configuration().starknet.chain_id;

    let mut states = context.subscribe();
    let (identities, receiver) = watch::channel(Some(identity));
    let binding = ServiceManager::default().spawn::<IdentityBinding>(IdentityBindingContext {
        context: context.clone(),
        identities: receiver,
    });

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.map_err(|e| Error::Execution(e.to_string()))?;
                break;
            },
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                display_state(&chain_id, &state);
            },
        }
    }

    identities.send_replace(None);
    drop(binding);
    context.logout();

    Ok(())
}
