// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{client::Client, error::Result, intake::IntakeQuery};

/// Look up the student's intake and course.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// Which value to print.
    #[arg(long, short, value_enum, default_value_t = IntakeQuery::AllCurrent)]
    query: IntakeQuery,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, client: impl Client + Send) -> Result<()> {
        println!("{}", client.intake(self.query).await?);
        Ok(())
    }
}
