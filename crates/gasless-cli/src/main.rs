use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gasless_starknet::ChainID;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

mod command;
pub mod core;
mod display;

use crate::command::account::command_account;
use crate::command::deploy::command_deploy;
use crate::command::increment::command_increment;
use crate::command::session::{command_login, command_logout, LoginParameters};
use crate::command::settings::{command_settings, SettingsCommand};
use crate::command::status::command_status;
use crate::command::watch::command_watch;
use crate::command::Application;
use crate::core::environment::Environment;
use crate::core::{Error, Fmt};

#[derive(Parser)]
#[command(name = "gasless", about = "Gasless Starknet counter")]
struct Cli {
    /// Starknet JSON-RPC endpoint, overrides GASLESS_RPC_URL
    #[clap(long, global = true)]
    rpc_url: Option<String>,

    /// Paymaster endpoint, overrides GASLESS_PAYMASTER_URL
    #[clap(long, global = true)]
    paymaster_url: Option<String>,

    /// Counter contract address, overrides GASLESS_CONTRACT_ADDRESS
    #[clap(long, global = true)]
    contract_address: Option<String>,

    #[clap(long, global = true)]
    chain_id: Option<ChainID>,

    #[clap(long, global = true)]
    settings_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn apply(&self, environment: &mut Environment) {
        if let Some(rpc_url) = &self.rpc_url {
            environment.rpc_url = Some(rpc_url.clone());
        }
        if let Some(contract_address) = &self.contract_address {
            environment.contract_address = Some(contract_address.clone());
        }
        if let Some(paymaster_url) = &self.paymaster_url {
            environment.paymaster_url = Some(paymaster_url.clone());
        }
        if let Some(chain_id) = self.chain_id {
            environment.chain_id = chain_id;
        }
        if let Some(settings_path) = &self.settings_path {
            environment.settings_path = settings_path.clone();
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Log a user in and show the derived account")]
    Login(LoginParameters),

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show the account, its balances and the counter value")]
    Account,

    #[command(about = "Deploy the account, paying the fee from its own balance")]
    Deploy,

    #[command(about = "Increment the counter with a sponsored transaction")]
    Increment,

    #[command(about = "Follow the account state until interrupted")]
    Watch,

    #[command(subcommand, about = "Manage local settings")]
    Settings(SettingsCommand),

    #[command(about = "Show the configuration and check the paymaster availability")]
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    let mut environment = Environment::load()?;
    cli.apply(&mut environment);

    let subscriber = Registry::default().with(Fmt::layer(&environment.verbosity));
    tracing::subscriber::set_global_default(subscriber).map_err(|e| Error::Configuration(e.to_string()))?;

    let application = Application::new(environment);

    match cli.command {
        Commands::Login(params) => command_login(&application, params).await?,
        Commands::Logout => command_logout(&application).await?,
        Commands::Account => command_account(&application).await?,
        Commands::Deploy => command_deploy(&application).await?,
        Commands::Increment => command_increment(&application).await?,
        Commands::Watch => command_watch(&application).await?,
        Commands::Settings(command) => command_settings(&application, command).await?,
        Commands::Status => command_status(&application).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::core::environment::Environment;
    use crate::Cli;

    #[test]
    fn flags_stand_in_for_missing_variables() {
        let mut environment = Environment::from_variables(Vec::new()).unwrap();
        assert!(environment.configuration().is_err());

        let cli = Cli::try_parse_from(["gasless", "status", "--rpc-url", "http://localhost:5050", "--contract-address", "0x42"]).unwrap();
        cli.apply(&mut environment);

        let configuration = environment.configuration().unwrap();
        assert_eq!(configuration.starknet.endpoint, "http://localhost:5050");
        assert_eq!(configuration.counter_address, starknet::core::types::Felt::from(0x42u64));
    }

    #[test]
    fn flags_override_variables() {
        let mut environment = Environment::from_variables(vec![("GASLESS_RPC_URL".to_string(), "http://node:1".to_string())]).unwrap();

        let cli = Cli::try_parse_from(["gasless", "--rpc-url", "http://node:2", "account"]).unwrap();
        cli.apply(&mut environment);

        assert_eq!(environment.rpc_url.as_deref(), Some("http://node:2"));
    }
}
