// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use secrecy::{ExposeSecret as _, SecretString};
use url::Url;

use crate::error::{self, Result};

const DEFAULT_TICKET_URL: &str = "https://cas.apiit.edu.my/cas/v1/tickets";
const DEFAULT_SERVICE_URL: &str = "https://api.apiit.edu.my/";
const DEFAULT_STUDENT_URL: &str = "https://api.apiit.edu.my/student/";
const DEFAULT_ATTENDIX_URL: &str = "https://attendix.apu.edu.my/graphql";
const DEFAULT_TIMETABLE_URL: &str =
    "https://s3-ap-southeast-1.amazonaws.com/open-ws/weektimetable";

/// Endpoints and secrets a session needs. Built once at startup and handed to
/// the session; nothing here is read from the environment after that.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    ticket_url: Url,
    service_url: Url,
    student_url: Url,
    attendix_url: Url,
    timetable_url: Url,
    api_key: SecretString,
    timeout: Duration,
}

impl Config {
    #[cfg(test)]
    pub(crate) fn new(api_key: SecretString, timeout: Duration) -> Result<Self> {
        Self::builder().into_config(api_key, timeout)
    }

    pub(crate) fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub(crate) fn ticket_url(&self) -> &Url {
        &self.ticket_url
    }

    /// The URL a CAS service ticket is requested for, e.g.
    /// `https://api.apiit.edu.my/student/attendance`.
    pub(crate) fn service_url(&self, service: &str) -> Result<Url> {
        Ok(self.service_url.join(service)?)
    }

    pub(crate) fn student_url(&self, resource: &str) -> Result<Url> {
        Ok(self.student_url.join(resource)?)
    }

    pub(crate) fn attendix_url(&self) -> &Url {
        &self.attendix_url
    }

    pub(crate) fn timetable_url(&self) -> &Url {
        &self.timetable_url
    }

    pub(crate) fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub(crate) const fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[derive(Default)]
pub(crate) struct ConfigBuilder {
    ticket_url: Option<Url>,
    service_url: Option<Url>,
    student_url: Option<Url>,
    attendix_url: Option<Url>,
    timetable_url: Option<Url>,
}

impl ConfigBuilder {
    pub(crate) fn with_ticket_url(mut self, url: Url) -> Self {
        self.ticket_url = Some(url);
        self
    }

    pub(crate) fn with_service_url(mut self, url: Url) -> Self {
        self.service_url = Some(url);
        self
    }

    pub(crate) fn with_student_url(mut self, url: Url) -> Self {
        self.student_url = Some(url);
        self
    }

    pub(crate) fn with_attendix_url(mut self, url: Url) -> Self {
        self.attendix_url = Some(url);
        self
    }

    pub(crate) fn with_timetable_url(mut self, url: Url) -> Self {
        self.timetable_url = Some(url);
        self
    }

    pub(crate) fn into_config(self, api_key: SecretString, timeout: Duration) -> Result<Config> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(error::Config::MissingApiKey.into());
        }
        if timeout.is_zero() {
            return Err(error::Config::ZeroTimeout.into());
        }

        Ok(Config {
            ticket_url: with_trailing_slash_removed(or_parse(self.ticket_url, DEFAULT_TICKET_URL)?),
            service_url: with_trailing_slash(or_parse(self.service_url, DEFAULT_SERVICE_URL)?),
            student_url: with_trailing_slash(or_parse(self.student_url, DEFAULT_STUDENT_URL)?),
            attendix_url: or_parse(self.attendix_url, DEFAULT_ATTENDIX_URL)?,
            timetable_url: or_parse(self.timetable_url, DEFAULT_TIMETABLE_URL)?,
            api_key,
            timeout,
        })
    }
}

fn or_parse(url: Option<Url>, default: &str) -> Result<Url> {
    match url {
        Some(url) => Ok(url),
        None => Ok(Url::parse(default)?),
    }
}

// `Url::join` replaces the last path segment unless the base ends in a slash.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn with_trailing_slash_removed(mut url: Url) -> Url {
    if url.path().len() > 1 && url.path().ends_with('/') {
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretString {
        SecretString::new("key".to_owned())
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let result = Config::new(SecretString::new("  ".to_owned()), Duration::from_secs(5));
        assert!(matches!(
            result,
            Err(error::Error::Config(error::Config::MissingApiKey))
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(matches!(
            Config::new(key(), Duration::ZERO),
            Err(error::Error::Config(error::Config::ZeroTimeout))
        ));
    }

    #[test]
    fn service_urls_join_onto_base() {
        let config = Config::new(key(), Duration::from_secs(5)).unwrap();
        assert_eq!(
            config.service_url("student/attendance").unwrap().as_str(),
            "https://api.apiit.edu.my/student/attendance"
        );
        assert_eq!(
            config.student_url("courses").unwrap().as_str(),
            "https://api.apiit.edu.my/student/courses"
        );
    }

    #[test]
    fn overridden_bases_gain_trailing_slash() {
        let config = Config::builder()
            .with_student_url("http://localhost:8080/student".parse().unwrap())
            .with_ticket_url("http://localhost:8080/cas/v1/tickets/".parse().unwrap())
            .into_config(key(), Duration::from_secs(5))
            .unwrap();
        assert_eq!(
            config.student_url("attendance").unwrap().as_str(),
            "http://localhost:8080/student/attendance"
        );
        assert_eq!(
            config.ticket_url().as_str(),
            "http://localhost:8080/cas/v1/tickets"
        );
    }
}
