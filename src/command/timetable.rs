// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use core::num;

use async_trait::async_trait;
use clap::Parser;
use tabled::{
    settings::{object::Segment, Alignment, Modify, Style},
    Table,
};

use crate::{client::Client, error::Result};

/// Show upcoming classes from this week's timetable.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The number of classes to show.
    #[arg(short, long)]
    count: Option<num::NonZeroUsize>,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, client: impl Client + Send) -> Result<()> {
        let classes = client.weekly_timetable().await?;
        if classes.is_empty() {
            println!("No upcoming classes this week");
            return Ok(());
        }

        println!(
            "{}",
            Table::new(
                classes
                    .iter()
                    .take(self.count.map_or(usize::MAX, num::NonZeroUsize::get))
            )
            .with(Style::rounded())
            .with(Modify::new(Segment::new(1.., 0..1)).with(Alignment::left()))
        );
        Ok(())
    }
}
