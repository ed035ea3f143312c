// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::{debug, error, info};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;

use crate::{
    config::Config,
    error::{self, Error, Result},
    ticket::{MasterTicket, ServiceTicket},
    transport::{Body, Request, Transport},
};

pub(crate) struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    pub(crate) fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }
}

#[derive(Deserialize)]
struct AuthenticationFailure {
    // Pairs of `[exception name, [reasons...]]`, flattened by the server into
    // `[name, [reason]]`.
    authentication_exceptions: Vec<serde_json::Value>,
}

impl AuthenticationFailure {
    fn reason(&self) -> Option<&str> {
        self.authentication_exceptions
            .get(1)?
            .as_array()?
            .first()?
            .as_str()
    }
}

/// Exchanges credentials for a master ticket.
pub(crate) async fn login<T: Transport + ?Sized>(
    transport: &T,
    config: &Config,
    credentials: &Credentials,
) -> Result<MasterTicket> {
    let req = Request::post(
        config.ticket_url().clone(),
        Body::Form(vec![
            ("username".to_owned(), credentials.username.clone()),
            (
                "password".to_owned(),
                credentials.password.expose_secret().clone(),
            ),
        ]),
    );

    let resp = transport.send(req).await?;
    if resp.status() == 201 {
        let ticket = ticket_from_form(resp.text()).ok_or(error::DataShape::MissingTicketForm)?;
        info!("Logged in to APSpace as {}", credentials.username);
        return Ok(MasterTicket::new(ticket));
    }

    error!("APSpace rejected the credentials for {}", credentials.username);
    let reason = resp
        .json::<AuthenticationFailure>()
        .ok()
        .and_then(|failure| failure.reason().map(str::to_owned))
        .unwrap_or_else(|| format!("login failed with status {}", resp.status()));
    Err(Error::CredentialsInvalid(reason))
}

/// The outcome of asking CAS for a service ticket.
pub(crate) enum Derived {
    Ticket(ServiceTicket),
    /// CAS refused to issue a ticket, most likely because the master ticket
    /// is no longer valid.
    Refused { status: u16, body: String },
}

/// Exchanges a master ticket for a ticket scoped to `service`.
pub(crate) async fn derive_service_ticket<T: Transport + ?Sized>(
    transport: &T,
    config: &Config,
    master: &MasterTicket,
    service: &str,
) -> Result<Derived> {
    let mut url = config.ticket_url().clone();
    _ = url
        .path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .push(master.as_str());
    _ = url
        .query_pairs_mut()
        .append_pair("service", config.service_url(service)?.as_str());

    let resp = transport.send(Request::post(url, Body::Empty)).await?;
    if !resp.is_success() {
        debug!(
            "CAS refused a ticket for {} with status {}",
            service,
            resp.status()
        );
        return Ok(Derived::Refused {
            status: resp.status(),
            body: resp.into_text(),
        });
    }

    Ok(Derived::Ticket(ServiceTicket::new(
        service,
        resp.text().trim(),
    )))
}

/// Pulls the ticket id out of the `action` attribute of the first form in a
/// CAS login response, e.g. `.../cas/v1/tickets/TGT-1-abc`.
fn ticket_from_form(html: &str) -> Option<&str> {
    let form = &html[html.find("<form")?..];
    let tag = &form[..form.find('>')?];
    let start = tag.find("action=")? + "action=".len();
    let quote = tag[start..].chars().next()?;
    let value = if quote == '"' || quote == '\'' {
        let rest = &tag[start + 1..];
        &rest[..rest.find(quote)?]
    } else {
        let rest = &tag[start..];
        rest.split_whitespace().next()?
    };

    let (_, ticket) = value.rsplit_once("/tickets/")?;
    let ticket = ticket.trim_end_matches('/');
    (!ticket.is_empty()).then_some(ticket)
}
