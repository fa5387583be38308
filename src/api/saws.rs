// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use serde::de::IgnoredAny;

use crate::{
    error::{Error, Result},
    model::{LastSharpening, Saw, SawInput, SawType, SawTypeInput},
};

use super::{Executor, Request};

pub(crate) struct ListSaws;

impl From<ListSaws> for Request {
    fn from(_: ListSaws) -> Self {
        Self::get("/api/sierras")
    }
}

impl Executor for ListSaws {
    type Response = Vec<Saw>;
}

pub(crate) struct GetSaw {
    pub(crate) id: i64,
}

impl From<GetSaw> for Request {
    fn from(value: GetSaw) -> Self {
        Self::get(format!("/api/sierras/{}", value.id))
    }
}

impl Executor for GetSaw {
    type Response = Saw;
}

pub(crate) struct SearchSaws {
    pub(crate) codigo: String,
}

impl From<SearchSaws> for Request {
    fn from(value: SearchSaws) -> Self {
        Self::get("/api/busqueda/sierras").with_query("codigo", value.codigo)
    }
}

impl Executor for SearchSaws {
    type Response = Vec<Saw>;
}

pub(crate) struct CreateSaw(pub(crate) SawInput);

impl TryFrom<CreateSaw> for Request {
    type Error = Error;

    fn try_from(value: CreateSaw) -> Result<Self> {
        Ok(Self::post("/api/sierras", serde_json::to_value(value.0)?))
    }
}

impl Executor for CreateSaw {
    type Response = Saw;
}

pub(crate) struct UpdateSaw {
    pub(crate) id: i64,
    pub(crate) input: SawInput,
}

impl TryFrom<UpdateSaw> for Request {
    type Error = Error;

    fn try_from(value: UpdateSaw) -> Result<Self> {
        Ok(Self::put(
            format!("/api/sierras/{}", value.id),
            serde_json::to_value(value.input)?,
        ))
    }
}

impl Executor for UpdateSaw {
    type Response = Saw;
}

/// Marks a saw's final sharpening. Sent as a partial update of the saw.
pub(crate) struct RetireSaw {
    pub(crate) id: i64,
    pub(crate) last: LastSharpening,
}

impl TryFrom<RetireSaw> for Request {
    type Error = Error;

    fn try_from(value: RetireSaw) -> Result<Self> {
        Ok(Self::put(
            format!("/api/sierras/{}", value.id),
            serde_json::to_value(value.last)?,
        ))
    }
}

impl Executor for RetireSaw {
    type Response = IgnoredAny;
}

pub(crate) struct DeleteSaw {
    pub(crate) id: i64,
}

impl From<DeleteSaw> for Request {
    fn from(value: DeleteSaw) -> Self {
        Self::delete(format!("/api/sierras/{}", value.id))
    }
}

impl Executor for DeleteSaw {
    type Response = IgnoredAny;
}

pub(crate) struct ListSawTypes;

impl From<ListSawTypes> for Request {
    fn from(_: ListSawTypes) -> Self {
        Self::get("/api/tipos-sierra")
    }
}

impl Executor for ListSawTypes {
    type Response = Vec<SawType>;
}

pub(crate) struct CreateSawType(pub(crate) SawTypeInput);

impl TryFrom<CreateSawType> for Request {
    type Error = Error;

    fn try_from(value: CreateSawType) -> Result<Self> {
        Ok(Self::post("/api/tipos-sierra", serde_json::to_value(value.0)?))
    }
}

impl Executor for CreateSawType {
    type Response = SawType;
}

pub(crate) struct UpdateSawType {
    pub(crate) id: i64,
    pub(crate) input: SawTypeInput,
}

impl TryFrom<UpdateSawType> for Request {
    type Error = Error;

    fn try_from(value: UpdateSawType) -> Result<Self> {
        Ok(Self::put(
            format!("/api/tipos-sierra/{}", value.id),
            serde_json::to_value(value.input)?,
        ))
    }
}

impl Executor for UpdateSawType {
    type Response = SawType;
}

pub(crate) struct DeleteSawType {
    pub(crate) id: i64,
}

impl From<DeleteSawType> for Request {
    fn from(value: DeleteSawType) -> Self {
        Self::delete(format!("/api/tipos-sierra/{}", value.id))
    }
}

impl Executor for DeleteSawType {
    type Response = IgnoredAny;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn retiring_sends_only_the_last_sharpening_fields() -> Result<()> {
        let req = Request::try_from(RetireSaw {
            id: 7,
            last: LastSharpening::at("2024-03-01T10:00:00.000Z".to_owned()),
        })?;

        assert_eq!(
            req,
            Request::put(
                "/api/sierras/7",
                json!({"fecha_ultimo_afilado": "2024-03-01T10:00:00.000Z", "estado": false})
            )
        );
        Ok(())
    }
}
