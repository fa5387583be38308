// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{convert::Infallible, io, result};

use reqwest::StatusCode;
use thiserror::Error;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("JSON format error: {0}")]
    Json(serde_json::Error),
    #[error("API error: {0}")]
    Api(#[from] Api),
    #[error("validation error: {0}")]
    Validation(#[from] Validation),
    #[error("storage error: {0}")]
    Storage(#[from] Storage),
    #[error("password retrieval error: {0}")]
    Password(#[from] Password),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("no session is active")]
    NotAuthenticated,
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// The one-line message shown to the person at the terminal. It never
    /// carries transport details, which are only logged.
    pub(crate) fn banner(&self) -> String {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match *self {
            Self::InvalidCredentials => "Credenciales inválidas".to_owned(),
            Self::NotAuthenticated | Self::Api(Api::Unauthenticated) => {
                "Sesión no iniciada o expirada; inicie sesión con `afilado login`".to_owned()
            }
            Self::Transport(_) => "No se pudo contactar al servidor; intente de nuevo".to_owned(),
            Self::Api(Api::Server { ref message, .. }) => format!("Error del servidor: {message}"),
            Self::Api(Api::Validation { ref message })
            | Self::Api(Api::Forbidden { ref message })
            | Self::Api(Api::NotFound { ref message })
            | Self::Api(Api::Conflict { ref message }) => message.clone(),
            Self::Validation(ref e) => e.to_string(),
            Self::Cancelled => "Operación cancelada".to_owned(),
            _ => self.to_string(),
        }
    }
}

impl From<pinentry::Error> for Error {
    fn from(value: pinentry::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(
            clippy::wildcard_enum_match_arm,
            clippy::match_wildcard_for_single_variants
        )]
        match value {
            pinentry::Error::Cancelled | pinentry::Error::Timeout => Self::Cancelled,
            pinentry::Error::Io(e) => Self::Io(e),
            _ => Self::Password(Password::Pinentry(value)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match value.classify() {
            serde_json::error::Category::Io => Self::Io(value.into()),
            _ => Self::Json(value),
        }
    }
}

impl From<dialoguer::Error> for Error {
    fn from(value: dialoguer::Error) -> Self {
        Self::Io(io::Error::new(io::ErrorKind::Other, value))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Io(value.into())
    }
}

impl From<Infallible> for Error {
    fn from(_: Infallible) -> Self {
        unreachable!()
    }
}

/// Failures reported by the backend, classified by HTTP status.
#[derive(Error, Debug)]
pub(crate) enum Api {
    #[error("the server rejected the session credential")]
    Unauthenticated,
    #[error("the server rejected the request: {message}")]
    Validation { message: String },
    #[error("the server denied access: {message}")]
    Forbidden { message: String },
    #[error("not found: {message}")]
    NotFound { message: String },
    #[error("conflict: {message}")]
    Conflict { message: String },
    #[error("server error ({status}): {message}")]
    Server { status: StatusCode, message: String },
}

/// Form input that was rejected before anything was sent.
#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum Validation {
    #[error("{field}: el campo es requerido")]
    Required { field: &'static str },
    #[error("{field}: dirección de correo inválida")]
    Email { field: &'static str },
    #[error("{field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Error, Debug)]
pub(crate) enum Storage {
    #[error("no data directory is available for this platform")]
    NoProjectDirs,
    #[cfg(feature = "secret-service")]
    #[error("secret service error: {0}")]
    SecretService(#[from] oo7::Error),
    #[cfg(feature = "keychain")]
    #[error("keychain error: {0}")]
    Keychain(#[from] security_framework::base::Error),
}

#[derive(Error, Debug)]
pub(crate) enum Password {
    #[error("no password prompt available")]
    NoPrompt,
    #[error("Pinentry implementation error: {0}")]
    Pinentry(pinentry::Error),
}
