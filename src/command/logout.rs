// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{error::Result, route::Route};

use super::{Context, Navigation, View};

/// Forget the stored session. Never contacts the backend.
#[derive(Debug, Default, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl View for Command {
    fn route(&self) -> Route {
        Route::Login
    }

    async fn render(self, ctx: &Context<'_>) -> Result<Navigation> {
        let had_session = ctx.session().credential().await.is_some();
        let target = ctx.session().logout().await;
        if had_session {
            println!("Sesión cerrada.");
        } else {
            println!("No había una sesión activa.");
        }
        Ok(Navigation::Goto(target))
    }
}
