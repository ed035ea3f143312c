// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory transport that answers requests from a script of canned
//! responses, keyed by method and URL path prefix.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::{Method, Request, Response, Transport};

#[derive(Default)]
pub(crate) struct Scripted {
    routes: Mutex<HashMap<(Method, String), VecDeque<Response>>>,
    sent: Mutex<Vec<Request>>,
}

impl Scripted {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues a response for requests whose path starts with `path`. The last
    /// queued response for a route is repeated once the others are used up.
    pub(crate) fn on(self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(Response::new(status, body));
        self
    }

    pub(crate) fn sent(&self) -> Vec<Request> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, method: Method, path: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|req| req.method() == method && req.url().path() == path)
            .count()
    }

    pub(crate) fn count_prefix(&self, method: Method, path: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|req| req.method() == method && req.url().path().starts_with(path))
            .count()
    }
}

#[async_trait]
impl Transport for Scripted {
    async fn send(&self, req: Request) -> Result<Response> {
        let path = req.url().path().to_owned();
        let method = req.method();
        self.sent.lock().unwrap().push(req);

        let mut routes = self.routes.lock().unwrap();
        let key = routes
            .keys()
            .filter(|(candidate, prefix)| *candidate == method && path.starts_with(prefix.as_str()))
            .max_by_key(|(_, prefix)| prefix.len())
            .cloned()
            .ok_or(Error::RemoteService {
                status: 599,
                body: format!("no scripted response for {method:?} {path}"),
            })?;
        let queue = routes.get_mut(&key).unwrap();
        Ok(if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().unwrap().clone()
        })
    }
}
