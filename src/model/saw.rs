// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use super::{active, format_named, format_status, format_text, format_timestamp, Named};

#[derive(Clone, Debug, Deserialize, PartialEq, Tabled)]
pub(crate) struct SawType {
    #[tabled(rename = "ID")]
    pub(crate) id: i64,
    #[tabled(rename = "Nombre")]
    pub(crate) nombre: String,
    #[serde(default)]
    #[tabled(rename = "Descripción", display_with = "format_text")]
    pub(crate) descripcion: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub(crate) struct SawTypeInput {
    pub(crate) nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) descripcion: Option<String>,
}

impl From<SawType> for SawTypeInput {
    fn from(value: SawType) -> Self {
        Self {
            nombre: value.nombre,
            descripcion: value.descripcion,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Tabled)]
pub(crate) struct Saw {
    #[tabled(rename = "ID")]
    pub(crate) id: i64,
    #[tabled(rename = "Código")]
    pub(crate) codigo: String,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) tipo_sierra_id: Option<i64>,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) cliente_id: Option<i64>,
    #[serde(default, alias = "tipos_sierra")]
    #[tabled(rename = "Tipo", display_with = "format_named")]
    pub(crate) tipo_sierra: Option<Named>,
    #[serde(default, alias = "clientes")]
    #[tabled(rename = "Cliente", display_with = "format_named")]
    pub(crate) cliente: Option<Named>,
    #[serde(default)]
    #[tabled(rename = "Último afilado", display_with = "format_timestamp")]
    pub(crate) fecha_ultimo_afilado: Option<String>,
    #[serde(default = "active")]
    #[tabled(rename = "Estado", display_with = "format_status")]
    pub(crate) estado: bool,
}

/// Body of `POST /api/sierras` and `PUT /api/sierras/:id`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub(crate) struct SawInput {
    pub(crate) codigo: String,
    pub(crate) tipo_sierra_id: i64,
    pub(crate) cliente_id: i64,
    pub(crate) estado: bool,
}

/// Retires a saw after its final sharpening.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub(crate) struct LastSharpening {
    pub(crate) fecha_ultimo_afilado: String,
    pub(crate) estado: bool,
}

impl LastSharpening {
    pub(crate) fn at(fecha: String) -> Self {
        Self {
            fecha_ultimo_afilado: fecha,
            estado: false,
        }
    }
}

/// A saw as embedded in history records and reports.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub(crate) struct SawRef {
    #[serde(default)]
    pub(crate) id: Option<i64>,
    #[serde(default)]
    pub(crate) codigo: String,
    #[serde(default, alias = "clientes")]
    pub(crate) cliente: Option<Named>,
    #[serde(default, alias = "tipos_sierra")]
    pub(crate) tipo_sierra: Option<Named>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plural_relation_names() -> crate::error::Result<()> {
        let saw: Saw = serde_json::from_value(serde_json::json!({
            "id": 4,
            "codigo": "S-0004",
            "clientes": { "id": 2, "nombre": "Maderas Sur" },
            "tipos_sierra": { "nombre": "Cinta" },
            "estado": false,
        }))?;

        assert_eq!(saw.cliente.map(|c| c.nombre).as_deref(), Some("Maderas Sur"));
        assert_eq!(saw.tipo_sierra.map(|t| t.nombre).as_deref(), Some("Cinta"));
        assert!(!saw.estado);
        assert_eq!(saw.fecha_ultimo_afilado, None);
        Ok(())
    }
}
