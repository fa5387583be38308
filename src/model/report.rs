// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use tabled::Tabled;

use super::{
    active, format_named, format_status, format_timestamp, parse_timestamp, saw::SawRef, Named,
    Saw, SharpeningRecord,
};

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct Count {
    #[serde(default)]
    pub(crate) total: u64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct LatestSharpening {
    #[serde(default)]
    pub(crate) fecha: Option<String>,
}

/// `GET /api/dashboard/resumen`
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct DashboardSummary {
    #[serde(default)]
    pub(crate) afilados_hoy: Count,
    #[serde(default)]
    pub(crate) resumen_mes: Count,
    #[serde(default)]
    pub(crate) ultimo_afilado: Option<LatestSharpening>,
    #[serde(default)]
    pub(crate) sierras_requieren_atencion: Vec<Saw>,
}

/// `GET /api/reportes/estadisticas`
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct Statistics {
    #[serde(default)]
    pub(crate) total_sierras: u64,
    #[serde(default)]
    pub(crate) sierras_activas: u64,
    #[serde(default)]
    pub(crate) total_afilados: u64,
    #[serde(default)]
    pub(crate) afilados_mes: u64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub(crate) promedio_mensual: Option<f64>,
    #[serde(default)]
    pub(crate) afilados_por_mes: BTreeMap<String, u64>,
    #[serde(default)]
    pub(crate) afilados_por_tipo: BTreeMap<String, u64>,
}

/// `GET /api/reportes/sierra/:id/historial`
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct SawHistory {
    #[serde(default)]
    pub(crate) sierra: Option<SawRef>,
    #[serde(default)]
    pub(crate) registros: Vec<SharpeningRecord>,
}

#[derive(Clone, Debug, PartialEq, Tabled)]
pub(crate) struct Interval {
    #[tabled(rename = "Desde", display_with = "Self::format_since")]
    pub(crate) since: DateTime<Utc>,
    #[tabled(rename = "Días hasta el siguiente")]
    pub(crate) days: i64,
}

impl Interval {
    fn format_since(since: &DateTime<Utc>) -> String {
        since.format("%Y-%m-%d").to_string()
    }
}

impl SawHistory {
    /// Days elapsed between each record and the one listed after it, rounded
    /// to the nearest whole day. Records without a readable date break the
    /// chain on either side.
    pub(crate) fn intervals(&self) -> Vec<Interval> {
        let dates = self
            .registros
            .iter()
            .map(|record| record.fecha.as_deref().and_then(parse_timestamp))
            .collect::<Vec<_>>();

        dates
            .windows(2)
            .filter_map(|pair| match *pair {
                [Some(since), Some(until)] => Some(Interval {
                    since,
                    days: (until - since + chrono::Duration::seconds(SECONDS_PER_DAY / 2))
                        .num_seconds()
                        .div_euclid(SECONDS_PER_DAY),
                }),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn average_interval(&self) -> Option<f64> {
        let intervals = self.intervals();
        if intervals.is_empty() {
            return None;
        }
        let total: i64 = intervals.iter().map(|interval| interval.days).sum();
        // LINT: Day counts are far below the 2^52 limit of exact float
        // representation.
        #[allow(clippy::cast_precision_loss)]
        Some(total as f64 / intervals.len() as f64)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct HistorySummary {
    #[serde(default)]
    pub(crate) fecha_inicio: Option<String>,
    #[serde(default)]
    pub(crate) fecha_fin: Option<String>,
    #[serde(default)]
    pub(crate) afilados_por_mes: BTreeMap<String, u64>,
    #[serde(default)]
    pub(crate) afilados_por_tipo: BTreeMap<String, u64>,
}

/// `GET /api/reportes/cliente/:id/historial`
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct ClientHistory {
    #[serde(default)]
    pub(crate) cliente: Option<Named>,
    #[serde(default)]
    pub(crate) registros: Vec<SharpeningRecord>,
    #[serde(default)]
    pub(crate) resumen: Option<HistorySummary>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Tabled)]
pub(crate) struct ClientSaw {
    #[tabled(rename = "ID")]
    pub(crate) id: i64,
    #[tabled(rename = "Código")]
    pub(crate) codigo: String,
    #[serde(default, alias = "tipos_sierra")]
    #[tabled(rename = "Tipo", display_with = "format_named")]
    pub(crate) tipo_sierra: Option<Named>,
    #[serde(default)]
    #[tabled(rename = "Último afilado", display_with = "format_timestamp")]
    pub(crate) fecha_ultimo_afilado: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[tabled(rename = "Promedio entre afilados", display_with = "Self::format_days")]
    pub(crate) promedio_dias_entre_afilados: Option<f64>,
    #[serde(default = "active")]
    #[tabled(rename = "Estado", display_with = "format_status")]
    pub(crate) estado: bool,
}

impl ClientSaw {
    fn format_days(days: &Option<f64>) -> String {
        days.map_or_else(|| "N/A".to_owned(), |days| format!("{days:.1} días"))
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct ClientSawsSummary {
    #[serde(default)]
    pub(crate) sierras_por_tipo: BTreeMap<String, u64>,
}

/// `GET /api/reportes/cliente/:id/sierras`
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct ClientSaws {
    #[serde(default)]
    pub(crate) cliente: Option<Named>,
    #[serde(default)]
    pub(crate) sierras: Vec<ClientSaw>,
    #[serde(default)]
    pub(crate) resumen: Option<ClientSawsSummary>,
}

/// One line of a labelled breakdown such as sharpenings per month.
#[derive(Clone, Debug, PartialEq, Tabled)]
pub(crate) struct Breakdown {
    #[tabled(rename = "")]
    pub(crate) label: String,
    #[tabled(rename = "Cantidad")]
    pub(crate) count: u64,
}

impl Breakdown {
    pub(crate) fn rows(counts: &BTreeMap<String, u64>) -> Vec<Self> {
        counts
            .iter()
            .map(|(label, count)| Self {
                label: label.clone(),
                count: *count,
            })
            .collect()
    }
}

/// The backend sends averages either as JSON numbers or as numeric strings.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Text(String),
    }

    Ok(
        match Option::<Lenient>::deserialize(deserializer)? {
            Some(Lenient::Number(value)) => Some(value),
            Some(Lenient::Text(text)) => text.trim().parse().ok(),
            None => None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    fn history(dates: &[Option<&str>]) -> Result<SawHistory> {
        let registros = dates
            .iter()
            .enumerate()
            .map(|(id, fecha)| {
                serde_json::json!({
                    "id": id,
                    "fecha": fecha,
                    "tipo_afilado": "LOMO",
                })
            })
            .collect::<Vec<_>>();
        Ok(serde_json::from_value(
            serde_json::json!({ "registros": registros }),
        )?)
    }

    #[test]
    fn intervals_round_to_whole_days() -> Result<()> {
        let history = history(&[
            Some("2024-01-01T08:00:00Z"),
            Some("2024-01-11T20:00:00Z"),
            Some("2024-01-21T19:00:00Z"),
        ])?;

        let days = history
            .intervals()
            .into_iter()
            .map(|interval| interval.days)
            .collect::<Vec<_>>();
        assert_eq!(days, vec![11, 10]);
        assert_eq!(history.average_interval(), Some(10.5));
        Ok(())
    }

    #[test]
    fn undated_records_break_the_chain() -> Result<()> {
        let history = history(&[Some("2024-01-01"), None, Some("2024-01-05")])?;
        assert!(history.intervals().is_empty());
        assert_eq!(history.average_interval(), None);
        Ok(())
    }

    #[test]
    fn averages_accept_numeric_strings() -> Result<()> {
        let stats: Statistics = serde_json::from_value(serde_json::json!({
            "total_sierras": 12,
            "promedio_mensual": "4.25",
            "afilados_por_tipo": { "LOMO": 3, "PECHO": 1 },
        }))?;

        assert_eq!(stats.promedio_mensual, Some(4.25));
        assert_eq!(stats.sierras_activas, 0);
        assert_eq!(
            Breakdown::rows(&stats.afilados_por_tipo),
            vec![
                Breakdown {
                    label: "LOMO".to_owned(),
                    count: 3
                },
                Breakdown {
                    label: "PECHO".to_owned(),
                    count: 1
                },
            ]
        );
        Ok(())
    }
}
