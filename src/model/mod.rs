// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Payloads exchanged with the backend. They tolerate fields the backend adds
//! and default the ones it leaves out, since the backend owns their shape.

pub(crate) mod client;
pub(crate) mod history;
pub(crate) mod report;
pub(crate) mod saw;
pub(crate) mod user;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

pub(crate) use client::{Client, ClientInput};
pub(crate) use history::{SharpeningInput, SharpeningKind, SharpeningRecord};
pub(crate) use report::{ClientHistory, ClientSaws, DashboardSummary, SawHistory, Statistics};
pub(crate) use saw::{LastSharpening, Saw, SawInput, SawType, SawTypeInput};
pub(crate) use user::{Identity, Role, User, UserInput};

/// A nested reference to another entity, as the backend embeds it.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct Named {
    #[serde(default)]
    pub(crate) id: Option<i64>,
    #[serde(default)]
    pub(crate) nombre: String,
}

pub(crate) const fn active() -> bool {
    true
}

/// Parses the timestamps the backend emits, which are either RFC 3339
/// instants or bare dates.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

pub(crate) fn format_timestamp(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(raw) => parse_timestamp(raw).map_or_else(
            || raw.to_owned(),
            |ts| ts.format("%Y-%m-%d %H:%M").to_string(),
        ),
        None => "-".to_owned(),
    }
}

pub(crate) fn format_text(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|text| !text.is_empty())
        .unwrap_or("-")
        .to_owned()
}

pub(crate) fn format_named(value: &Option<Named>) -> String {
    value
        .as_ref()
        .map_or_else(|| "N/A".to_owned(), |named| named.nombre.clone())
}

pub(crate) fn format_status(active: &bool) -> String {
    if *active { "Activo" } else { "Inactivo" }.to_owned()
}
