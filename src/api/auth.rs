// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use secrecy::ExposeSecret as _;
use serde::Deserialize;
use serde_json::json;

use crate::{model::Identity, session::Credential, validation::LoginForm};

use super::{Executor, Request};

pub(crate) struct Login(pub(crate) LoginForm);

impl From<Login> for Request {
    fn from(value: Login) -> Self {
        Self::post(
            "/api/auth/login",
            json!({
                "email": value.0.email(),
                "password": value.0.password().expose_secret(),
            }),
        )
        .public()
    }
}

/// The backend answers a login with the user's fields and the token side by
/// side.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(flatten)]
    pub(crate) identity: Identity,
    pub(crate) token: Credential,
}

impl Executor for Login {
    type Response = LoginResponse;
}

pub(crate) struct Profile;

impl From<Profile> for Request {
    fn from(_: Profile) -> Self {
        Self::get("/api/auth/profile")
    }
}

impl Executor for Profile {
    type Response = Identity;
}
