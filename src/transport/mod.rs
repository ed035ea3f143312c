// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

mod http;
#[cfg(test)]
pub(crate) mod scripted;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{self, Result};

pub(crate) use http::Http;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Method {
    Get,
    Post,
}

#[derive(Clone, Debug)]
pub(crate) enum Body {
    Empty,
    Form(Vec<(String, String)>),
    Json(serde_json::Value),
}

/// A single outbound HTTP exchange. Headers are kept as plain pairs so that
/// callers never need to know which client library sends them.
#[derive(Clone, Debug)]
pub(crate) struct Request {
    method: Method,
    url: Url,
    headers: Vec<(&'static str, String)>,
    body: Body,
}

impl Request {
    pub(crate) fn get(url: Url) -> Self {
        Self {
            method: Method::Get,
            url,
            headers: vec![],
            body: Body::Empty,
        }
    }

    pub(crate) fn post(url: Url, body: Body) -> Self {
        Self {
            method: Method::Post,
            url,
            headers: vec![],
            body,
        }
    }

    pub(crate) fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub(crate) const fn method(&self) -> Method {
        self.method
    }

    pub(crate) fn url(&self) -> &Url {
        &self.url
    }

    pub(crate) fn headers(&self) -> &[(&'static str, String)] {
        &self.headers
    }

    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn body(&self) -> &Body {
        &self.body
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Response {
    status: u16,
    body: String,
}

impl Response {
    pub(crate) fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub(crate) const fn status(&self) -> u16 {
        self.status
    }

    pub(crate) const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    pub(crate) fn text(&self) -> &str {
        &self.body
    }

    pub(crate) fn into_text(self) -> String {
        self.body
    }

    /// Decodes the body. A well-formed document of the wrong shape is a
    /// [`error::DataShape`] error.
    pub(crate) fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            if e.is_data() {
                error::DataShape::Body(e.to_string()).into()
            } else {
                e.into()
            }
        })
    }
}

#[async_trait]
pub(crate) trait Transport: Send + Sync {
    async fn send(&self, req: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&self, req: Request) -> Result<Response> {
        (**self).send(req).await
    }
}
