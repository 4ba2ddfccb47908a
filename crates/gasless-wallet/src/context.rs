use std::sync::{Arc, Mutex, PoisonError, RwLock};

use gasless_common::service::{ServiceHandle, ServiceManager};
use gasless_paymaster::types::DeploymentParameters;
use gasless_paymaster::{Configuration as PaymasterConfiguration, PaymasterAccount, PaymasterDetails};
use gasless_starknet::balance::Balances;
use gasless_starknet::constants::Token;
use gasless_starknet::contract::CounterContract;
use gasless_starknet::keys::PrivateKey;
use gasless_starknet::transaction::WaitConfiguration;
use gasless_starknet::Client;
use starknet::core::types::{Call, Felt};
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use crate::monitoring::{BalanceMonitoring, BalanceMonitoringContext};
use crate::state::Session;
use crate::{Configuration, ContextState, Error, SessionIdentity};

/// Outcome of a deploy or gasless transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
    pub transaction_hash: Option<Felt>,
    pub success: bool,
    pub error: Option<Error>,
}

impl TransactionResult {
    fn success(transaction_hash: Felt) -> Self {
        Self {
            transaction_hash: Some(transaction_hash),
            success: true,
            error: None,
        }
    }

    fn failure(transaction_hash: Option<Felt>, error: Error) -> Self {
        Self {
            transaction_hash,
            success: false,
            error: Some(error),
        }
    }
}

pub(crate) struct Inner {
    configuration: Configuration,
    state: watch::Sender<ContextState>,
    api_key: RwLock<Option<String>>,

    services: ServiceManager,
    monitoring: Mutex<Option<ServiceHandle>>,
}

/// Wallet of the authenticated user.
///
/// Cloning is cheap and every clone drives the same state. Consumers read it through
/// [`StarknetContext::snapshot`] or follow it with [`StarknetContext::subscribe`].
/// While a session is ready its balances are refreshed in the background; the refresh
/// stops on logout, on a new login and when the last clone is dropped.
#[derive(Clone)]
pub struct StarknetContext {
    inner: Arc<Inner>,
}

impl From<Arc<Inner>> for StarknetContext {
    fn from(inner: Arc<Inner>) -> Self {
        Self { inner }
    }
}

impl StarknetContext {
    pub fn new(configuration: Configuration) -> Self {
        let (state, _) = watch::channel(ContextState::default());

        Self {
            inner: Arc::new(Inner {
                configuration,
                state,
                api_key: RwLock::new(None),

                services: ServiceManager::default(),
                monitoring: Mutex::new(None),
            }),
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.inner.configuration
    }

    pub fn snapshot(&self) -> ContextState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ContextState> {
        self.inner.state.subscribe()
    }

    /// Override the configured paymaster API key. `None` falls back to the configured one.
    pub fn set_paymaster_api_key(&self, api_key: Option<String>) {
        *self.inner.api_key.write().unwrap_or_else(PoisonError::into_inner) = api_key;
    }

    /// API key used for the next gasless transaction. Blank keys count as absent.
    pub fn paymaster_api_key(&self) -> Option<String> {
        let runtime = self.inner.api_key.read().unwrap_or_else(PoisonError::into_inner).clone();
        let present = |key: &String| !key.trim().is_empty();

        runtime
            .filter(present)
            .or_else(|| self.inner.configuration.paymaster_api_key.clone().filter(present))
    }

    pub fn counter(&self) -> CounterContract {
        CounterContract::new(self.inner.configuration.counter_address)
    }

    fn update(&self, transition: impl FnOnce(&mut ContextState) -> bool) -> bool {
        self.inner.state.send_if_modified(transition)
    }

    fn wait_configuration(&self) -> WaitConfiguration {
        self.inner.configuration.confirmation.into()
    }

    /// Log `identity` in: derive its key, bind the account and load its balances and
    /// deployment status. A failure is recorded in the state and the context goes back
    /// to logged out; calling again retries. A login superseded by a later login or
    /// logout leaves the state untouched.
    #[instrument(name = "initialize", skip_all)]
    pub async fn initialize(&self, identity: &SessionIdentity) -> Result<(), Error> {
        let mut epoch = 0;
        self.inner.state.send_modify(|state| epoch = state.begin_initialize());
        self.stop_monitoring();

        match self.connect(identity).await {
            Ok((session, balances, is_deployed)) => {
                let address = session.account.address();
                if self.update(|state| state.complete_initialize(epoch, session, balances, is_deployed)) {
                    info!(address = %address.to_fixed_hex_string(), is_deployed, "account ready");
                    self.start_monitoring(epoch);
                }

                Ok(())
            },
            Err(e) => {
                error!("could not initialize account: {}", e);
                self.update(|state| state.fail_initialize(epoch, e.message()));

                Err(e)
            },
        }
    }

    async fn connect(&self, identity: &SessionIdentity) -> Result<(Arc<Session>, Balances, bool), Error> {
        let private_key = PrivateKey::derive(identity.as_str())?;
        let starknet = Client::new(&self.inner.configuration.starknet)?;
        let account = starknet.initialize_account(private_key).await?;

        let tokens = Token::tracked(starknet.chain_id());
        let balances = starknet.fetch_balances(account.address(), &tokens).await?;
        let deployment = starknet.check_account_deployment(account.address()).await?;

        Ok((Arc::new(Session { starknet, account }), balances, deployment.is_deployed()))
    }

    /// Drop the session synchronously. Operations still in flight can no longer change the state.
    pub fn logout(&self) {
        self.stop_monitoring();
        self.update(ContextState::logout);
    }

    pub fn clear_error(&self) {
        self.update(ContextState::clear_error);
    }

    /// Reload the balances of the current session. Does nothing while logged out.
    /// On failure the previous balances are kept.
    pub async fn refresh_balance(&self) -> Result<(), Error> {
        let Some((epoch, session)) = self.snapshot().current_session() else {
            return Ok(());
        };

        let tokens = Token::tracked(session.starknet.chain_id());
        let balances = session.starknet.fetch_balances(session.account.address(), &tokens).await?;
        self.update(|state| state.set_balances(epoch, balances));

        Ok(())
    }

    async fn refresh_after_transaction(&self) {
        if let Err(e) = self.refresh_balance().await {
            warn!("could not refresh balances after transaction: {}", e);
        }
    }

    /// Read the current value of the counter contract
    pub async fn fetch_counter(&self) -> Result<Felt, Error> {
        let (_, session) = self.snapshot().current_session().ok_or_else(Error::account_not_initialized)?;

        Ok(session.starknet.fetch_counter(&self.counter()).await?)
    }

    /// Deploy the account with a regular deploy-account transaction paid by the account
    #[instrument(name = "deploy_account", skip_all)]
    pub async fn deploy_account(&self) -> TransactionResult {
        let Some((epoch, session)) = self.snapshot().current_session() else {
            return TransactionResult::failure(None, Error::account_not_initialized());
        };

        self.update(|state| state.begin_transaction(epoch));

        let mut submitted = None;
        let result = self.deploy(epoch, &session, &mut submitted).await;

        self.update(|state| state.end_transaction(epoch));
        self.finish(epoch, submitted, result)
    }

    async fn deploy(&self, epoch: u64, session: &Session, submitted: &mut Option<Felt>) -> Result<Felt, Error> {
        let hash = session.starknet.deploy_account(&session.account).await?;
        *submitted = Some(hash);
        self.update(|state| state.set_transaction_hash(epoch, hash));

        session.starknet.wait_for_transaction(hash, &self.wait_configuration()).await?;
        self.update(|state| state.mark_deployed(epoch));
        self.refresh_after_transaction().await;

        Ok(hash)
    }

    /// Submit `calls` through the paymaster in sponsored mode. An account that is not
    /// deployed yet is deployed by the same transaction.
    #[instrument(name = "execute_gasless_transaction", skip_all, fields(calls = calls.len()))]
    pub async fn execute_gasless_transaction(&self, calls: Vec<Call>) -> TransactionResult {
        let Some((epoch, session)) = self.snapshot().current_session() else {
            return TransactionResult::failure(None, Error::account_not_initialized());
        };

        let Some(api_key) = self.paymaster_api_key() else {
            return TransactionResult::failure(None, Error::api_key_required());
        };

        self.update(|state| state.begin_transaction(epoch));

        let mut submitted = None;
        let result = self.sponsor(epoch, &session, api_key, &calls, &mut submitted).await;

        self.update(|state| state.end_transaction(epoch));
        self.finish(epoch, submitted, result)
    }

    async fn sponsor(&self, epoch: u64, session: &Session, api_key: String, calls: &[Call], submitted: &mut Option<Felt>) -> Result<Felt, Error> {
        let address = session.account.address();
        let deployment = session.starknet.check_account_deployment(address).await?;

        let paymaster = gasless_paymaster::Client::new(&PaymasterConfiguration {
            endpoint: self.inner.configuration.paymaster.endpoint.clone(),
            api_key: Some(api_key),
            timeout: self.inner.configuration.paymaster.timeout,
        })?;
        let account = PaymasterAccount::new(paymaster, address, session.account.private_key().signing_key());

        let mut details = PaymasterDetails::sponsored();
        if !deployment.is_deployed() {
            info!("account not deployed, attaching deployment data");
            details = details.with_deployment(DeploymentParameters::from(session.account.deployment()));
        }

        let estimate = account.estimate_paymaster_transaction_fee(calls, &details).await?;
        let response = account
            .execute_paymaster_transaction(calls, &details, estimate.suggested_max_fee_in_gas_token)
            .await?;

        let hash = response.transaction_hash;
        *submitted = Some(hash);
        self.update(|state| state.set_transaction_hash(epoch, hash));

        session.starknet.wait_for_transaction(hash, &self.wait_configuration()).await?;
        if !deployment.is_deployed() {
            self.update(|state| state.mark_deployed(epoch));
        }
        self.refresh_after_transaction().await;

        Ok(hash)
    }

    /// Increment the counter contract with a sponsored transaction
    pub async fn increment(&self) -> TransactionResult {
        self.execute_gasless_transaction(vec![self.counter().increment()]).await
    }

    fn finish(&self, epoch: u64, submitted: Option<Felt>, result: Result<Felt, Error>) -> TransactionResult {
        match result {
            Ok(hash) => TransactionResult::success(hash),
            Err(e) => {
                error!("transaction failed: {}", e);
                self.update(|state| state.record_error(epoch, e.message()));

                TransactionResult::failure(submitted, e)
            },
        }
    }

    fn start_monitoring(&self, epoch: u64) {
        let context = BalanceMonitoringContext {
            context: Arc::downgrade(&self.inner),
            epoch,
            interval: self.inner.configuration.balance_refresh_interval(),
        };

        let handle = self.inner.services.spawn::<BalanceMonitoring>(context);
        *self.inner.monitoring.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    fn stop_monitoring(&self) {
        self.inner.monitoring.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}
