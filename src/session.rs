// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    api::Executor,
    cas::{self, Credentials, Derived},
    config::Config,
    error::{Error, Result},
    storage,
    ticket::{self, Cached, MasterTicket, Stale},
    transport::{Request, Transport},
};

enum Attempt<R> {
    Done(R),
    Expired,
}

/// An authenticated APSpace session. Owns the HTTP transport and the ticket
/// store; every ticketed call goes through [`Session::execute`].
pub(crate) struct Session<T: Transport, S: storage::Storage<Cached>> {
    transport: T,
    config: Config,
    credentials: Credentials,
    tickets: ticket::Store<S>,
}

impl<T: Transport, S: storage::Storage<Cached>> Session<T, S> {
    pub(crate) fn new(transport: T, config: Config, credentials: Credentials, storage: S) -> Self {
        let tickets = ticket::Store::new(credentials.username(), storage);
        Self {
            transport,
            config,
            credentials,
            tickets,
        }
    }

    /// Logs in unconditionally, replacing any current master ticket.
    pub(crate) async fn login(&self) -> Result<()> {
        _ = self.reauthenticate(Stale::Any).await?;
        Ok(())
    }

    pub(crate) async fn has_ticket(&self) -> Result<bool> {
        Ok(self.tickets.current().await?.is_some())
    }

    /// Calls a ticketed endpoint. A 401 (or a refused service ticket) causes
    /// exactly one login and retry; a second rejection is fatal.
    pub(crate) async fn execute<E: Executor>(&self, resource: &E) -> Result<E::Response> {
        let (generation, master) = match self.tickets.current().await? {
            Some(current) => current,
            None => self.reauthenticate(Stale::Missing).await?,
        };

        if let Attempt::Done(resp) = self.attempt(resource, &master).await? {
            return Ok(resp);
        }

        warn!(
            "Ticket for {} was rejected; reauthenticating",
            E::SERVICE
        );
        let (_, master) = self
            .reauthenticate(Stale::Generation(generation))
            .await?;
        match self.attempt(resource, &master).await? {
            Attempt::Done(resp) => Ok(resp),
            Attempt::Expired => Err(Error::AuthExpired {
                service: E::SERVICE.to_owned(),
            }),
        }
    }

    /// Fetches a public JSON document that needs no ticket.
    pub(crate) async fn fetch<R: DeserializeOwned>(&self, url: Url) -> Result<R> {
        let resp = self.transport.send(Request::get(url)).await?;
        if !resp.is_success() {
            return Err(Error::RemoteService {
                status: resp.status(),
                body: resp.into_text(),
            });
        }
        resp.json()
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// Ends the session, releasing the transport.
    pub(crate) fn close(self) {
        info!("Closing APSpace session for {}", self.credentials.username());
    }

    async fn attempt<E: Executor>(
        &self,
        resource: &E,
        master: &MasterTicket,
    ) -> Result<Attempt<E::Response>> {
        let ticket = match cas::derive_service_ticket(
            &self.transport,
            &self.config,
            master,
            E::SERVICE,
        )
        .await?
        {
            Derived::Ticket(ticket) => ticket,
            Derived::Refused { status, .. } => {
                debug!("Service ticket for {} refused ({})", E::SERVICE, status);
                return Ok(Attempt::Expired);
            }
        };

        let req = resource.request(&self.config, ticket.expose_for(E::SERVICE)?)?;
        let resp = self.transport.send(req).await?;
        match resp.status() {
            200 => {
                debug!("Request to {} succeeded", E::SERVICE);
                Ok(Attempt::Done(resource.parse(&resp)?))
            }
            401 => Ok(Attempt::Expired),
            status => Err(Error::RemoteService {
                status,
                body: resp.into_text(),
            }),
        }
    }

    async fn reauthenticate(&self, stale: Stale) -> Result<(u64, MasterTicket)> {
        self.tickets
            .replace(stale, || {
                cas::login(&self.transport, &self.config, &self.credentials)
            })
            .await
    }
}
