// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{client::Client, error::Result};

/// Sign attendance for the class in progress.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The three-digit code shown by the lecturer.
    #[clap()]
    otp: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, client: impl Client + Send) -> Result<()> {
        let class_code = client.take_attendance(&self.otp).await?;
        println!("Attendance signed for {class_code}");
        Ok(())
    }
}
