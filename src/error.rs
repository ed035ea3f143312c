// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{io, result, time::Duration};

use thiserror::Error;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
    #[error("JSON format error: {0}")]
    Json(serde_json::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("configuration error: {0}")]
    Config(#[from] Config),
    #[error("unexpected response shape: {0}")]
    DataShape(#[from] DataShape),
    #[error("password retrieval error: {0}")]
    Password(#[from] Password),
    #[error("internal error: {0}")]
    Internal(#[from] Internal),
    #[error("APSpace credentials invalid: {0}")]
    CredentialsInvalid(String),
    #[error("ticket for service {service} expired again after reauthenticating")]
    AuthExpired { service: String },
    #[error("OTP format invalid: {0}")]
    OtpFormat(String),
    #[error("OTP rejected: {0}")]
    Otp(String),
    #[error("remote service responded with status {status}: {body}")]
    RemoteService { status: u16, body: String },
    #[error("request did not complete within {0:?}")]
    Timeout(Duration),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match value.classify() {
            serde_json::error::Category::Io => Self::Io(value.into()),
            _ => Self::Json(value),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            return Self::DataShape(DataShape::Body(value.to_string()));
        }
        Self::Http(value)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Io(value.into())
    }
}

#[derive(Error, Debug)]
pub(crate) enum Config {
    #[error("an API key for the attendance service is required (set APSPACE_API_KEY)")]
    MissingApiKey,
    #[error("no username was provided (set APSPACE_USERNAME)")]
    MissingUsername,
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

#[derive(Error, Debug)]
pub(crate) enum DataShape {
    #[error("login response did not contain a ticket form")]
    MissingTicketForm,
    #[error("student has no intakes on record")]
    NoIntakes,
    #[error("intake {0} has {1} semester records (expected 1 or 2)")]
    UnexpectedRecordCount(String, usize),
    #[error("semester record for intake {0} has no usable GPA")]
    MissingGpa(String),
    #[error("no modules recorded for semester {0}")]
    NoModulesForSemester(u8),
    #[error("attendance response did not confirm a class code")]
    EmptyAttendanceResponse,
    #[error("semester {0} is not 1 or 2")]
    UnknownSemester(i64),
    #[error("response body could not be decoded: {0}")]
    Body(String),
}

#[derive(Error, Debug)]
pub(crate) enum Password {
    #[error("no password prompt available")]
    NoPrompt,
}

#[derive(Error, Debug)]
pub(crate) enum Internal {
    #[error("ticket for service {got} cannot be used for service {wanted}")]
    TicketScope { wanted: String, got: String },
}
