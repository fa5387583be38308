// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use crate::model::{ClientHistory, ClientSaws, DashboardSummary, SawHistory, Statistics};

use super::{Executor, Request};

pub(crate) struct Dashboard;

impl From<Dashboard> for Request {
    fn from(_: Dashboard) -> Self {
        Self::get("/api/dashboard/resumen")
    }
}

impl Executor for Dashboard {
    type Response = DashboardSummary;
}

pub(crate) struct GetStatistics;

impl From<GetStatistics> for Request {
    fn from(_: GetStatistics) -> Self {
        Self::get("/api/reportes/estadisticas")
    }
}

impl Executor for GetStatistics {
    type Response = Statistics;
}

pub(crate) struct SawHistoryReport {
    pub(crate) id: i64,
}

impl From<SawHistoryReport> for Request {
    fn from(value: SawHistoryReport) -> Self {
        Self::get(format!("/api/reportes/sierra/{}/historial", value.id))
    }
}

impl Executor for SawHistoryReport {
    type Response = SawHistory;
}

pub(crate) struct ClientHistoryReport {
    pub(crate) id: i64,
}

impl From<ClientHistoryReport> for Request {
    fn from(value: ClientHistoryReport) -> Self {
        Self::get(format!("/api/reportes/cliente/{}/historial", value.id))
    }
}

impl Executor for ClientHistoryReport {
    type Response = ClientHistory;
}

pub(crate) struct ClientSawsReport {
    pub(crate) id: i64,
}

impl From<ClientSawsReport> for Request {
    fn from(value: ClientSawsReport) -> Self {
        Self::get(format!("/api/reportes/cliente/{}/sierras", value.id))
    }
}

impl Executor for ClientSawsReport {
    type Response = ClientSaws;
}
