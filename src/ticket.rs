// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, future::Future};

use futures_util::lock::Mutex;
use log::{debug, info};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Result},
    storage,
};

/// The ticket-granting ticket issued by CAS at login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct MasterTicket(String);

impl MasterTicket {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MasterTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterTicket([REDACTED])")
    }
}

/// A ticket derived from a [`MasterTicket`] that is only valid for the
/// service it was issued for.
pub(crate) struct ServiceTicket {
    service: String,
    value: SecretString,
}

impl ServiceTicket {
    pub(crate) fn new(service: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            value: SecretString::new(value.into()),
        }
    }

    #[cfg(test)]
    pub(crate) fn service(&self) -> &str {
        &self.service
    }

    pub(crate) fn expose_for(&self, service: &str) -> Result<&str> {
        if self.service != service {
            return Err(error::Internal::TicketScope {
                wanted: service.to_owned(),
                got: self.service.clone(),
            }
            .into());
        }
        Ok(self.value.expose_secret())
    }
}

impl fmt::Debug for ServiceTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceTicket")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

/// What is kept in storage between runs: the last master ticket and the user
/// it was issued to.
#[derive(Clone, Serialize, Deserialize)]
pub(crate) struct Cached {
    username: String,
    master_ticket: MasterTicket,
}

/// Which ticket a caller saw fail, so that only the first caller to notice an
/// expired ticket logs in again.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Stale {
    /// No ticket was available.
    Missing,
    /// The ticket of this generation was rejected.
    Generation(u64),
    /// Replace whatever ticket is current.
    Any,
}

struct State<Storage> {
    storage: Storage,
    generation: u64,
}

pub(crate) struct Store<Storage: storage::Storage<Cached>> {
    username: String,
    state: Mutex<State<Storage>>,
}

impl<Storage: storage::Storage<Cached>> Store<Storage> {
    pub(crate) fn new(username: impl Into<String>, storage: Storage) -> Self {
        Self {
            username: username.into(),
            state: Mutex::new(State {
                storage,
                generation: 0,
            }),
        }
    }

    pub(crate) async fn current(&self) -> Result<Option<(u64, MasterTicket)>> {
        let mut state = self.state.lock().await;
        let generation = state.generation;
        Ok(self
            .load(&mut state.storage)
            .await?
            .map(|ticket| (generation, ticket)))
    }

    /// Replaces the master ticket with one produced by `login`, unless another
    /// caller already replaced the ticket described by `stale`. The lock is
    /// held across `login`, so concurrent callers wait and then reuse the
    /// ticket it produced.
    pub(crate) async fn replace<F, Fut>(&self, stale: Stale, login: F) -> Result<(u64, MasterTicket)>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<MasterTicket>> + Send,
    {
        let mut state = self.state.lock().await;
        if let Some(ticket) = self.load(&mut state.storage).await? {
            let fresh = match stale {
                Stale::Missing => true,
                Stale::Generation(seen) => seen != state.generation,
                Stale::Any => false,
            };
            if fresh {
                debug!("Reusing master ticket of generation {}", state.generation);
                return Ok((state.generation, ticket));
            }
        }

        let ticket = match login().await {
            Ok(ticket) => ticket,
            Err(err) => {
                state.storage.clear().await?;
                return Err(err);
            }
        };
        state
            .storage
            .update(&Cached {
                username: self.username.clone(),
                master_ticket: ticket.clone(),
            })
            .await?;
        state.generation += 1;
        info!("Obtained master ticket generation {}", state.generation);
        Ok((state.generation, ticket))
    }

    async fn load(&self, storage: &mut Storage) -> Result<Option<MasterTicket>> {
        Ok(storage
            .get()
            .await?
            .filter(|cached| cached.username == self.username)
            .map(|cached| cached.master_ticket))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::storage::{Memory, Storage as _};

    #[test]
    fn service_ticket_refuses_other_services() {
        let ticket = ServiceTicket::new("attendix", "ST-1");
        assert_eq!(ticket.expose_for("attendix").unwrap(), "ST-1");
        assert!(matches!(
            ticket.expose_for("student/attendance"),
            Err(error::Error::Internal(error::Internal::TicketScope { .. }))
        ));
    }

    #[test]
    fn tickets_are_redacted_in_debug_output() {
        let master = format!("{:?}", MasterTicket::new("TGT-secret"));
        let service = format!("{:?}", ServiceTicket::new("attendix", "ST-secret"));
        assert!(!master.contains("secret"));
        assert!(!service.contains("secret"));
    }

    #[tokio::test]
    async fn ticket_cached_for_other_user_is_ignored() {
        let mut storage = Memory::new();
        storage
            .update(&Cached {
                username: "TP000001".to_owned(),
                master_ticket: MasterTicket::new("TGT-other"),
            })
            .await
            .unwrap();

        let store = Store::new("TP000002", storage);
        assert!(store.current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stale_generation_is_replaced_once() {
        let store = Store::new("TP000001", Memory::new());
        let logins = Arc::new(AtomicUsize::new(0));
        let login = |id: &'static str| {
            let logins = Arc::clone(&logins);
            move || async move {
                _ = logins.fetch_add(1, Ordering::SeqCst);
                Ok::<_, error::Error>(MasterTicket::new(id))
            }
        };

        let (first, _) = store.replace(Stale::Missing, login("TGT-1")).await.unwrap();
        let (second, ticket) = store
            .replace(Stale::Generation(first), login("TGT-2"))
            .await
            .unwrap();
        assert_eq!(ticket.as_str(), "TGT-2");

        // A caller that still holds the first generation reuses the second.
        let (third, ticket) = store
            .replace(Stale::Generation(first), login("TGT-3"))
            .await
            .unwrap();
        assert_eq!(third, second);
        assert_eq!(ticket.as_str(), "TGT-2");
        assert_eq!(logins.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_login_clears_cached_ticket() {
        let store = Store::new("TP000001", Memory::new());
        _ = store
            .replace(Stale::Missing, || async {
                Ok::<_, error::Error>(MasterTicket::new("TGT-1"))
            })
            .await
            .unwrap();

        let result = store
            .replace(Stale::Any, || async {
                Err::<MasterTicket, _>(error::Error::CredentialsInvalid(
                    "Bad credentials".to_owned(),
                ))
            })
            .await;
        assert!(matches!(result, Err(error::Error::CredentialsInvalid(_))));
        assert!(store.current().await.unwrap().is_none());
    }
}
