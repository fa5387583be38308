// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{error::Result, model::Role, route::Route};

use super::{Context, Navigation, View};

/// Jump to a location by its path.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// A path such as `/sierras` or `/usuarios/3/editar`. Unknown paths open
    /// the dashboard.
    path: String,
}

#[async_trait]
impl View for Command {
    fn route(&self) -> Route {
        Route::parse(&self.path)
    }

    /// Opening is only a redirect; the target view is gated on its own.
    fn requirement(&self) -> Option<&'static [Role]> {
        None
    }

    async fn render(self, _: &Context<'_>) -> Result<Navigation> {
        Ok(Navigation::Goto(self.route()))
    }
}
