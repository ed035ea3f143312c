// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tokio::time;

use crate::error::{Error, Result};

use super::{Body, Method, Request, Response, Transport};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/101.0.4951.41 Safari/537.36 Edg/101.0.1210.32";
const ORIGIN: &str = "https://apspace.apu.edu.my";
const REFERER: &str = "https://apspace.apu.edu.my/";

/// Transport backed by a single `reqwest` connection pool. The pool is
/// released when this value is dropped.
pub(crate) struct Http {
    client: reqwest::Client,
    timeout: Duration,
}

impl Http {
    pub(crate) fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        _ = headers.insert(header::ORIGIN, HeaderValue::from_static(ORIGIN));
        _ = headers.insert(header::REFERER, HeaderValue::from_static(REFERER));
        _ = headers.insert("DNT", HeaderValue::from_static("1"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Transport for Http {
    async fn send(&self, req: Request) -> Result<Response> {
        debug!("Sending {:?} request to {}", req.method(), req.url().path());

        let mut builder = match req.method() {
            Method::Get => self.client.get(req.url().clone()),
            Method::Post => self.client.post(req.url().clone()),
        };
        for (name, value) in req.headers() {
            builder = builder.header(*name, value);
        }
        builder = match req.body() {
            Body::Empty => builder.body(""),
            Body::Form(fields) => builder.form(fields),
            Body::Json(value) => builder.json(value),
        };

        let exchange = async {
            let resp = builder.send().await?;
            let status = resp.status().as_u16();
            let body = resp.text().await?;
            Ok::<_, Error>(Response::new(status, body))
        };

        let resp = time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;
        debug!("Received status {} from {}", resp.status(), req.url().path());
        Ok(resp)
    }
}
