// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use secrecy::{ExposeSecret as _, SecretString};
use serde::de::IgnoredAny;
use serde_json::json;

use crate::{
    error::{Error, Result},
    model::{User, UserInput},
};

use super::{Executor, Request};

pub(crate) struct ListUsers;

impl From<ListUsers> for Request {
    fn from(_: ListUsers) -> Self {
        Self::get("/api/usuarios")
    }
}

impl Executor for ListUsers {
    type Response = Vec<User>;
}

pub(crate) struct GetUser {
    pub(crate) id: i64,
}

impl From<GetUser> for Request {
    fn from(value: GetUser) -> Self {
        Self::get(format!("/api/usuarios/{}", value.id))
    }
}

impl Executor for GetUser {
    type Response = User;
}

pub(crate) struct CreateUser(pub(crate) UserInput);

impl TryFrom<CreateUser> for Request {
    type Error = Error;

    fn try_from(value: CreateUser) -> Result<Self> {
        Ok(Self::post("/api/usuarios", serde_json::to_value(value.0)?))
    }
}

impl Executor for CreateUser {
    type Response = User;
}

pub(crate) struct UpdateUser {
    pub(crate) id: i64,
    pub(crate) input: UserInput,
}

impl TryFrom<UpdateUser> for Request {
    type Error = Error;

    fn try_from(mut value: UpdateUser) -> Result<Self> {
        // Passwords only change through the reset endpoint.
        value.input.password = None;
        Ok(Self::put(
            format!("/api/usuarios/{}", value.id),
            serde_json::to_value(value.input)?,
        ))
    }
}

impl Executor for UpdateUser {
    type Response = User;
}

pub(crate) struct DeleteUser {
    pub(crate) id: i64,
}

impl From<DeleteUser> for Request {
    fn from(value: DeleteUser) -> Self {
        Self::delete(format!("/api/usuarios/{}", value.id))
    }
}

impl Executor for DeleteUser {
    type Response = IgnoredAny;
}

pub(crate) struct SetUserStatus {
    pub(crate) id: i64,
    pub(crate) estado: bool,
}

impl From<SetUserStatus> for Request {
    fn from(value: SetUserStatus) -> Self {
        Self::patch(
            format!("/api/usuarios/{}/estado", value.id),
            json!({ "estado": value.estado }),
        )
    }
}

impl Executor for SetUserStatus {
    type Response = IgnoredAny;
}

pub(crate) struct ResetPassword {
    pub(crate) id: i64,
    pub(crate) new_password: SecretString,
}

impl From<ResetPassword> for Request {
    fn from(value: ResetPassword) -> Self {
        Self::post(
            format!("/api/usuarios/{}/reset-password", value.id),
            json!({ "newPassword": value.new_password.expose_secret() }),
        )
    }
}

impl Executor for ResetPassword {
    type Response = IgnoredAny;
}
