// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use serde::de::IgnoredAny;

use crate::{
    error::{Error, Result},
    model::{Client, ClientInput},
};

use super::{Executor, Request};

pub(crate) struct ListClients;

impl From<ListClients> for Request {
    fn from(_: ListClients) -> Self {
        Self::get("/api/clientes")
    }
}

impl Executor for ListClients {
    type Response = Vec<Client>;
}

pub(crate) struct GetClient {
    pub(crate) id: i64,
}

impl From<GetClient> for Request {
    fn from(value: GetClient) -> Self {
        Self::get(format!("/api/clientes/{}", value.id))
    }
}

impl Executor for GetClient {
    type Response = Client;
}

pub(crate) struct SearchClients {
    pub(crate) nombre: String,
}

impl From<SearchClients> for Request {
    fn from(value: SearchClients) -> Self {
        Self::get("/api/busqueda/clientes").with_query("nombre", value.nombre)
    }
}

impl Executor for SearchClients {
    type Response = Vec<Client>;
}

pub(crate) struct CreateClient(pub(crate) ClientInput);

impl TryFrom<CreateClient> for Request {
    type Error = Error;

    fn try_from(value: CreateClient) -> Result<Self> {
        Ok(Self::post("/api/clientes", serde_json::to_value(value.0)?))
    }
}

impl Executor for CreateClient {
    type Response = Client;
}

pub(crate) struct UpdateClient {
    pub(crate) id: i64,
    pub(crate) input: ClientInput,
}

impl TryFrom<UpdateClient> for Request {
    type Error = Error;

    fn try_from(value: UpdateClient) -> Result<Self> {
        Ok(Self::put(
            format!("/api/clientes/{}", value.id),
            serde_json::to_value(value.input)?,
        ))
    }
}

impl Executor for UpdateClient {
    type Response = Client;
}

pub(crate) struct DeleteClient {
    pub(crate) id: i64,
}

impl From<DeleteClient> for Request {
    fn from(value: DeleteClient) -> Self {
        Self::delete(format!("/api/clientes/{}", value.id))
    }
}

impl Executor for DeleteClient {
    type Response = IgnoredAny;
}
