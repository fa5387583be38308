// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use super::{active, format_status, format_text};

#[derive(Clone, Debug, Deserialize, PartialEq, Tabled)]
pub(crate) struct Client {
    #[tabled(rename = "ID")]
    pub(crate) id: i64,
    #[tabled(rename = "Nombre")]
    pub(crate) nombre: String,
    #[serde(default)]
    #[tabled(rename = "Dirección", display_with = "format_text")]
    pub(crate) direccion: Option<String>,
    #[serde(default)]
    #[tabled(rename = "Teléfono", display_with = "format_text")]
    pub(crate) telefono: Option<String>,
    #[serde(default)]
    #[tabled(rename = "Correo", display_with = "format_text")]
    pub(crate) email: Option<String>,
    #[serde(default = "active")]
    #[tabled(rename = "Estado", display_with = "format_status")]
    pub(crate) estado: bool,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub(crate) struct ClientInput {
    pub(crate) nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) email: Option<String>,
    pub(crate) estado: bool,
}

impl From<Client> for ClientInput {
    fn from(value: Client) -> Self {
        Self {
            nombre: value.nombre,
            direccion: value.direccion,
            telefono: value.telefono,
            email: value.email,
            estado: value.estado,
        }
    }
}
