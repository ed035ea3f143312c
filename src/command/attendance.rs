// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{client::Client, error::Result};

/// Show the average attendance across this semester's modules.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, client: impl Client + Send) -> Result<()> {
        println!("{:.2}%", client.attendance_percentage().await?);
        Ok(())
    }
}
