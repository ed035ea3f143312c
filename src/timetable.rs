// SPDX-FileCopyrightText: 2026 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};

use crate::api::TimetableEntry;

// Timetable and attendance records spell module names differently, e.g.
// "Data Structures & Algorithms" vs "DATA STRUCTURES AND ALGORITHMS".
fn normalize(name: &str) -> String {
    name.replace('&', "And")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Classes for `intake` that belong to one of `modules` and have not started
/// yet, in timetable order.
pub(crate) fn upcoming(
    entries: Vec<TimetableEntry>,
    modules: &[String],
    intake: &str,
    now: DateTime<Utc>,
) -> Vec<TimetableEntry> {
    let modules: Vec<String> = modules.iter().map(|name| normalize(name)).collect();
    entries
        .into_iter()
        .filter(|entry| {
            entry.intake == intake
                && entry.time_from_iso.with_timezone(&Utc) > now
                && modules.contains(&normalize(&entry.module_name))
        })
        .collect()
}
