// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use clap::ValueEnum;
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use tabled::Tabled;

use super::{active, format_status};

/// The roles that govern what a signed-in user may see and do.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub(crate) enum Role {
    #[serde(rename = "GERENTE")]
    #[value(name = "gerente")]
    Manager,
    #[serde(rename = "OPERARIO")]
    #[value(name = "operario")]
    Operator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Self::Manager => "GERENTE",
            Self::Operator => "OPERARIO",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
pub(crate) struct User {
    #[tabled(rename = "ID")]
    pub(crate) id: i64,
    #[tabled(rename = "Nombre")]
    pub(crate) nombre: String,
    #[serde(default)]
    #[tabled(rename = "Correo")]
    pub(crate) email: String,
    #[tabled(rename = "Rol")]
    pub(crate) rol: Role,
    #[serde(default = "active", alias = "activo")]
    #[tabled(rename = "Estado", display_with = "format_status")]
    pub(crate) estado: bool,
}

/// The signed-in user as resolved from the session credential.
pub(crate) type Identity = User;

/// Body of `POST /api/usuarios` and `PUT /api/usuarios/:id`. Edits never carry
/// a password; it is only changed through the reset endpoint.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct UserInput {
    pub(crate) nombre: String,
    pub(crate) email: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_password"
    )]
    pub(crate) password: Option<SecretString>,
    pub(crate) rol: Role,
    pub(crate) estado: bool,
}

impl From<User> for UserInput {
    fn from(value: User) -> Self {
        Self {
            nombre: value.nombre,
            email: value.email,
            password: None,
            rol: value.rol,
            estado: value.estado,
        }
    }
}

pub(crate) fn serialize_password<S: Serializer>(
    value: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value.as_ref() {
        Some(password) => serializer.serialize_str(password.expose_secret()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use serde_test::{assert_de_tokens, assert_ser_tokens, Token};

    use super::*;

    #[test]
    fn role_uses_backend_names() {
        assert_ser_tokens(
            &Role::Manager,
            &[Token::UnitVariant {
                name: "Role",
                variant: "GERENTE",
            }],
        );
        assert_eq!(Role::Operator.to_string(), "OPERARIO");
    }

    #[test]
    fn identity_defaults_missing_email_and_active_flag() {
        assert_de_tokens(
            &User {
                id: 1,
                nombre: "Ana".to_owned(),
                email: String::new(),
                rol: Role::Manager,
                estado: true,
            },
            &[
                Token::Map { len: None },
                Token::Str("id"),
                Token::I64(1),
                Token::Str("nombre"),
                Token::Str("Ana"),
                Token::Str("rol"),
                Token::UnitVariant {
                    name: "Role",
                    variant: "GERENTE",
                },
                Token::MapEnd,
            ],
        );
    }

    #[test]
    fn edits_omit_the_password() -> crate::error::Result<()> {
        let input = UserInput::from(User {
            id: 7,
            nombre: "Luis".to_owned(),
            email: "luis@taller.cl".to_owned(),
            rol: Role::Operator,
            estado: false,
        });

        assert_eq!(
            serde_json::to_value(&input)?,
            serde_json::json!({
                "nombre": "Luis",
                "email": "luis@taller.cl",
                "rol": "OPERARIO",
                "estado": false,
            })
        );
        Ok(())
    }
}
