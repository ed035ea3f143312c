// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::warn;
use tabled::{
    settings::{object::Cell, Format, Modify, Style},
    Table,
};

use crate::{client::Client, error::Result};

/// List the modules taken this semester.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, client: impl Client + Send) -> Result<()> {
        let modules = client.modules().await?;
        if modules.is_empty() {
            warn!("No modules are recorded for this semester");
            return Ok(());
        }

        println!(
            "{}",
            Table::new(modules)
                .with(Style::rounded())
                .with(Modify::new(Cell::new(0, 0)).with(Format::content(|_| "Module".to_owned())))
        );
        Ok(())
    }
}
