// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDate;

use crate::{
    error::{Error, Result},
    model::{SharpeningInput, SharpeningKind, SharpeningRecord},
};

use super::{Executor, Request};

pub(crate) struct ListHistory;

impl From<ListHistory> for Request {
    fn from(_: ListHistory) -> Self {
        Self::get("/api/historial")
    }
}

impl Executor for ListHistory {
    type Response = Vec<SharpeningRecord>;
}

/// Filters the history. Only the filters that are set are sent.
#[derive(Debug, Default)]
pub(crate) struct SearchHistory {
    pub(crate) fecha_inicio: Option<NaiveDate>,
    pub(crate) fecha_fin: Option<NaiveDate>,
    pub(crate) tipo_afilado: Option<SharpeningKind>,
}

impl SearchHistory {
    pub(crate) const fn is_empty(&self) -> bool {
        self.fecha_inicio.is_none() && self.fecha_fin.is_none() && self.tipo_afilado.is_none()
    }
}

impl From<SearchHistory> for Request {
    fn from(value: SearchHistory) -> Self {
        let mut req = Self::get("/api/busqueda/historial");
        if let Some(date) = value.fecha_inicio {
            req = req.with_query("fecha_inicio", date.format("%Y-%m-%d"));
        }
        if let Some(date) = value.fecha_fin {
            req = req.with_query("fecha_fin", date.format("%Y-%m-%d"));
        }
        if let Some(kind) = value.tipo_afilado {
            req = req.with_query("tipo_afilado", kind.as_str());
        }
        req
    }
}

impl Executor for SearchHistory {
    type Response = Vec<SharpeningRecord>;
}

pub(crate) struct CreateSharpening(pub(crate) SharpeningInput);

impl TryFrom<CreateSharpening> for Request {
    type Error = Error;

    fn try_from(value: CreateSharpening) -> Result<Self> {
        Ok(Self::post("/api/historial", serde_json::to_value(value.0)?))
    }
}

impl Executor for CreateSharpening {
    type Response = SharpeningRecord;
}

pub(crate) struct UpdateSharpening {
    pub(crate) id: i64,
    pub(crate) input: SharpeningInput,
}

impl TryFrom<UpdateSharpening> for Request {
    type Error = Error;

    fn try_from(value: UpdateSharpening) -> Result<Self> {
        Ok(Self::put(
            format!("/api/historial/{}", value.id),
            serde_json::to_value(value.input)?,
        ))
    }
}

impl Executor for UpdateSharpening {
    type Response = SharpeningRecord;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        api::testing::{FakeTransport, Reply},
        session::SessionStore,
        storage::Memory,
    };

    #[tokio::test]
    async fn search_sends_only_the_filters_given() -> Result<()> {
        let transport = FakeTransport::new(vec![Reply::json(200, json!([]))]);
        let session = Arc::new(SessionStore::open(Box::new(Memory::new())).await);
        let pipeline = transport.pipeline(session);

        let records = SearchHistory {
            fecha_inicio: NaiveDate::from_ymd_opt(2024, 1, 1),
            fecha_fin: None,
            tipo_afilado: Some(SharpeningKind::Lomo),
        }
        .execute(&pipeline)
        .await?;

        assert!(records.is_empty());
        let url = &transport.sent()[0].url;
        assert_eq!(url.path(), "/api/busqueda/historial");
        assert_eq!(url.query(), Some("fecha_inicio=2024-01-01&tipo_afilado=LOMO"));
        Ok(())
    }

    #[test]
    fn no_filters_means_no_query() {
        assert!(SearchHistory::default().is_empty());
        assert_eq!(
            Request::from(SearchHistory::default()),
            Request::get("/api/busqueda/historial")
        );
    }
}
