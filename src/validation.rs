// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Checks applied to form input before anything is sent to the backend.

use clap::ValueEnum as _;
use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::{ExposeSecret as _, SecretString};

use crate::{error::Validation, model::SharpeningKind};

static EMAIL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").ok());

pub(crate) const MIN_PASSWORD_LENGTH: usize = 6;

pub(crate) fn required(field: &'static str, value: &str) -> Result<String, Validation> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Validation::Required { field })
    } else {
        Ok(trimmed.to_owned())
    }
}

pub(crate) fn email(field: &'static str, value: &str) -> Result<String, Validation> {
    let address = required(field, value)?;
    match *EMAIL {
        Some(ref re) if re.is_match(&address) => Ok(address),
        _ => Err(Validation::Email { field }),
    }
}

pub(crate) fn id(field: &'static str, value: &str) -> Result<i64, Validation> {
    required(field, value)?
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(Validation::Invalid {
            field,
            reason: "debe ser un número mayor que cero",
        })
}

pub(crate) fn sharpening_kind(field: &'static str, value: &str) -> Result<SharpeningKind, Validation> {
    SharpeningKind::from_str(&required(field, value)?, true).map_err(|_| Validation::Invalid {
        field,
        reason: "debe ser LOMO, PECHO o COMPLETO",
    })
}

pub(crate) fn password(field: &'static str, value: &SecretString) -> Result<(), Validation> {
    if value.expose_secret().is_empty() {
        Err(Validation::Required { field })
    } else {
        Ok(())
    }
}

/// A new password has to meet the length the backend expects.
pub(crate) fn new_password(field: &'static str, value: &SecretString) -> Result<(), Validation> {
    password(field, value)?;
    if value.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Validation::Invalid {
            field,
            reason: "debe tener al menos 6 caracteres",
        });
    }
    Ok(())
}

/// Login input that has already passed validation.
pub(crate) struct LoginForm {
    email: String,
    password: SecretString,
}

impl LoginForm {
    pub(crate) fn new(email: &str, password: SecretString) -> Result<Self, Validation> {
        let email = self::email("email", email)?;
        self::password("password", &password)?;
        Ok(Self { email, password })
    }

    pub(crate) fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }
}
