// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

use crate::{client::Client, error::Result};

pub(crate) mod attend;
pub(crate) mod attendance;
pub(crate) mod intake;
pub(crate) mod modules;
pub(crate) mod semester;
pub(crate) mod timetable;

#[async_trait]
pub(crate) trait Command {
    async fn execute(self, client: impl Client + Send) -> Result<()>;
}
