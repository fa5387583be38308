// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use async_trait::async_trait;

use crate::{error::Result, metadata};

use super::{Inbound, Outbound, Transport};

/// Talks to the backend over HTTPS.
pub(crate) struct Http {
    client: reqwest::Client,
}

impl Http {
    pub(crate) fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(metadata::USER_AGENT.as_str())
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for Http {
    async fn send(&self, req: Outbound) -> Result<Inbound> {
        let mut builder = self.client.request(req.method, req.url);
        if let Some(ref bearer) = req.bearer {
            builder = builder.bearer_auth(bearer.expose());
        }
        if let Some(ref body) = req.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(Inbound { status, body })
    }
}
