// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use super::{format_named, format_text, format_timestamp, saw::SawRef, Named};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum SharpeningKind {
    Lomo,
    Pecho,
    Completo,
}

impl SharpeningKind {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Lomo => "LOMO",
            Self::Pecho => "PECHO",
            Self::Completo => "COMPLETO",
        }
    }
}

impl fmt::Display for SharpeningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Tabled)]
pub(crate) struct SharpeningRecord {
    #[tabled(rename = "ID")]
    pub(crate) id: i64,
    #[serde(default)]
    #[tabled(rename = "Fecha", display_with = "format_timestamp")]
    pub(crate) fecha: Option<String>,
    #[serde(default)]
    #[tabled(rename = "Sierra", display_with("Self::format_saw", self))]
    pub(crate) sierra: Option<SawRef>,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) sierra_id: Option<i64>,
    #[tabled(rename = "Tipo de afilado")]
    pub(crate) tipo_afilado: SharpeningKind,
    #[serde(default)]
    #[tabled(rename = "Operario", display_with = "format_named")]
    pub(crate) usuario: Option<Named>,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) usuario_id: Option<i64>,
    #[serde(default)]
    #[tabled(rename = "Observaciones", display_with = "format_text")]
    pub(crate) observaciones: Option<String>,
    #[serde(default)]
    #[tabled(rename = "Último", display_with = "Self::format_last")]
    pub(crate) ultimo_afilado: bool,
}

impl SharpeningRecord {
    fn format_saw(&self) -> String {
        match (self.sierra.as_ref(), self.sierra_id) {
            (Some(saw), _) if !saw.codigo.is_empty() => saw.codigo.clone(),
            (_, Some(id)) => format!("#{id}"),
            _ => "N/A".to_owned(),
        }
    }

    fn format_last(last: &bool) -> String {
        if *last { "Sí" } else { "" }.to_owned()
    }
}

/// Body of `POST /api/historial` and `PUT /api/historial/:id`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub(crate) struct SharpeningInput {
    pub(crate) sierra_id: i64,
    pub(crate) tipo_afilado: SharpeningKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) observaciones: Option<String>,
    pub(crate) usuario_id: i64,
    pub(crate) fecha: String,
    pub(crate) ultimo_afilado: bool,
}

impl SharpeningInput {
    /// Rebuilds the body of an existing record so that an edit can change
    /// only the fields it names.
    pub(crate) fn from_record(record: &SharpeningRecord) -> Option<Self> {
        Some(Self {
            sierra_id: record
                .sierra_id
                .or_else(|| record.sierra.as_ref().and_then(|saw| saw.id))?,
            tipo_afilado: record.tipo_afilado,
            observaciones: record.observaciones.clone(),
            usuario_id: record
                .usuario_id
                .or_else(|| record.usuario.as_ref().and_then(|user| user.id))?,
            fecha: record.fecha.clone()?,
            ultimo_afilado: record.ultimo_afilado,
        })
    }
}
