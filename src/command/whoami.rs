// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{error::Result, gate, route::Route};

use super::{Context, Navigation, View};

/// Show the signed-in user and the sections open to them.
#[derive(Debug, Default, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl View for Command {
    fn route(&self) -> Route {
        Route::Home
    }

    async fn render(self, ctx: &Context<'_>) -> Result<Navigation> {
        let identity = ctx.identity().await?;
        println!("{} <{}>", identity.nombre, identity.email);
        println!("Rol: {}", identity.rol);
        println!();
        for (label, route) in gate::menu(&identity) {
            println!("  {label:<12} {route}");
        }
        Ok(Navigation::Done)
    }
}
