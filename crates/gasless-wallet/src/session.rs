use std::fmt::{Display, Formatter};

use async_trait::async_trait;
use gasless_common::service::{Error, Service};
use gasless_common::{service_info, service_warn};
use tokio::sync::watch;

use crate::StarknetContext;

/// Opaque and stable identifier of an authenticated user, as issued by the login provider
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionIdentity(String);

impl SessionIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone)]
pub struct IdentityBindingContext {
    pub context: StarknetContext,
    pub identities: watch::Receiver<Option<SessionIdentity>>,
}

/// Keep a [`StarknetContext`] in line with the login provider: an identity appearing
/// triggers a login, its disappearance a logout. A change while a login is running
/// abandons that login in favour of the new identity.
pub struct IdentityBinding {
    context: StarknetContext,
    identities: watch::Receiver<Option<SessionIdentity>>,
}

#[async_trait]
impl Service for IdentityBinding {
    type Context = IdentityBindingContext;

    const NAME: &'static str = "IdentityBinding";

    async fn new(context: Self::Context) -> Self {
        Self {
            context: context.context,
            identities: context.identities,
        }
    }

    async fn run(mut self) -> Result<(), Error> {
        let mut current: Option<SessionIdentity> = None;

        loop {
            let identity = self.identities.borrow_and_update().clone();

            match identity {
                Some(identity) if current.as_ref() != Some(&identity) => {
                    service_info!("login of {}", identity);
                    current = Some(identity.clone());

                    tokio::select! {
                        result = self.context.initialize(&identity) => {
                            if let Err(e) = result {
                                service_warn!("login failed: {}", e);
                            }
                        },
                        changed = self.identities.changed() => {
                            if changed.is_err() {
                                return Ok(());
                            }
                            // abandoned login, the same identity sent again must start over
                            current = None;
                            continue;
                        },
                    }
                },
                Some(_) => {},
                None => {
                    if current.take().is_some() {
                        service_info!("logout");
                    }
                    self.context.logout();
                },
            }

            if self.identities.changed().await.is_err() {
                return Ok(());
            }
        }
    }
}
