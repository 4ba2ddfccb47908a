use std::sync::Arc;

use gasless_starknet::account::AccountHandle;
use gasless_starknet::balance::Balances;
use gasless_starknet::Client;
use starknet::core::types::Felt;

/// Live connection of an authenticated user
pub(crate) struct Session {
    pub starknet: Client,
    pub account: AccountHandle,
}

#[derive(Clone)]
pub struct ReadyState {
    pub(crate) session: Arc<Session>,
    pub balances: Balances,
    pub is_deployed: bool,
    pub tx_pending: bool,
    pub tx_hash: Option<Felt>,
}

impl ReadyState {
    pub fn address(&self) -> Felt {
        self.session.account.address()
    }

    pub fn public_key(&self) -> Felt {
        self.session.account.public_key()
    }
}

impl std::fmt::Debug for ReadyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadyState")
            .field("address", &self.address().to_fixed_hex_string())
            .field("balances", &self.balances)
            .field("is_deployed", &self.is_deployed)
            .field("tx_pending", &self.tx_pending)
            .field("tx_hash", &self.tx_hash)
            .finish()
    }
}

/// Lifecycle of the wallet. Account, key and provider only exist inside [`SessionState::Ready`].
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    Initializing,
    Ready(ReadyState),
}

/// Observable state of a [`crate::StarknetContext`].
///
/// Every mutation goes through one of the transition methods below. Transitions that
/// complete an asynchronous operation carry the epoch the operation started in and are
/// ignored once a login or logout has moved the epoch forward. They return whether the
/// state changed so they can feed `watch::Sender::send_if_modified`.
#[derive(Debug, Clone, Default)]
pub struct ContextState {
    session: SessionState,
    error: Option<String>,
    epoch: u64,
}

impl ContextState {
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn ready(&self) -> Option<&ReadyState> {
        match &self.session {
            SessionState::Ready(ready) => Some(ready),
            _ => None,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_initializing(&self) -> bool {
        matches!(self.session, SessionState::Initializing)
    }

    pub fn address(&self) -> Option<Felt> {
        self.ready().map(ReadyState::address)
    }

    pub fn balances(&self) -> Option<&Balances> {
        self.ready().map(|ready| &ready.balances)
    }

    pub fn is_deployed(&self) -> bool {
        self.ready().is_some_and(|ready| ready.is_deployed)
    }

    pub fn tx_pending(&self) -> bool {
        self.ready().is_some_and(|ready| ready.tx_pending)
    }

    pub fn tx_hash(&self) -> Option<Felt> {
        self.ready().and_then(|ready| ready.tx_hash)
    }

    pub(crate) fn current_session(&self) -> Option<(u64, Arc<Session>)> {
        self.ready().map(|ready| (self.epoch, ready.session.clone()))
    }

    fn ready_mut(&mut self, epoch: u64) -> Option<&mut ReadyState> {
        if epoch != self.epoch {
            return None;
        }

        match &mut self.session {
            SessionState::Ready(ready) => Some(ready),
            _ => None,
        }
    }

    pub(crate) fn begin_initialize(&mut self) -> u64 {
        self.epoch += 1;
        self.session = SessionState::Initializing;
        self.error = None;

        self.epoch
    }

    pub(crate) fn complete_initialize(&mut self, epoch: u64, session: Arc<Session>, balances: Balances, is_deployed: bool) -> bool {
        if epoch != self.epoch {
            return false;
        }

        self.session = SessionState::Ready(ReadyState {
            session,
            balances,
            is_deployed,
            tx_pending: false,
            tx_hash: None,
        });

        true
    }

    pub(crate) fn fail_initialize(&mut self, epoch: u64, error: &str) -> bool {
        if epoch != self.epoch {
            return false;
        }

        self.session = SessionState::LoggedOut;
        self.error = Some(error.to_string());

        true
    }

    pub(crate) fn logout(&mut self) -> bool {
        self.epoch += 1;
        self.session = SessionState::LoggedOut;
        self.error = None;

        true
    }

    pub(crate) fn set_balances(&mut self, epoch: u64, balances: Balances) -> bool {
        match self.ready_mut(epoch) {
            Some(ready) => {
                ready.balances = balances;
                true
            },
            None => false,
        }
    }

    pub(crate) fn begin_transaction(&mut self, epoch: u64) -> bool {
        let Some(ready) = self.ready_mut(epoch) else {
            return false;
        };

        ready.tx_pending = true;
        ready.tx_hash = None;
        self.error = None;

        true
    }

    pub(crate) fn set_transaction_hash(&mut self, epoch: u64, hash: Felt) -> bool {
        match self.ready_mut(epoch) {
            Some(ready) => {
                ready.tx_hash = Some(hash);
                true
            },
            None => false,
        }
    }

    pub(crate) fn mark_deployed(&mut self, epoch: u64) -> bool {
        match self.ready_mut(epoch) {
            Some(ready) if !ready.is_deployed => {
                ready.is_deployed = true;
                true
            },
            _ => false,
        }
    }

    pub(crate) fn end_transaction(&mut self, epoch: u64) -> bool {
        match self.ready_mut(epoch) {
            Some(ready) => {
                ready.tx_pending = false;
                ready.tx_hash = None;
                true
            },
            None => false,
        }
    }

    pub(crate) fn record_error(&mut self, epoch: u64, error: &str) -> bool {
        if epoch != self.epoch {
            return false;
        }

        self.error = Some(error.to_string());
        true
    }

    pub(crate) fn clear_error(&mut self) -> bool {
        self.error.take().is_some()
    }
}
