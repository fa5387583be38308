// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::{Args, Subcommand};

use crate::{
    api::{saws, Executor},
    error::{self, Result},
    model::{Role, SawTypeInput},
    route::{Route, MANAGERS},
    validation,
};

use super::{print_table, Context, Navigation, View};

#[derive(Debug, Args)]
pub(crate) struct Command {
    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    List,
    Create {
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        descripcion: Option<String>,
    },
    /// Change the given fields of a saw type and keep the rest.
    Update {
        id: i64,
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        descripcion: Option<String>,
    },
    Delete {
        id: i64,
        /// Do not ask for confirmation.
        #[arg(long)]
        yes: bool,
    },
}

#[async_trait]
impl View for Command {
    fn route(&self) -> Route {
        Route::Sierras
    }

    fn requirement(&self) -> Option<&'static [Role]> {
        match self.action {
            Action::List => self.route().requirement(),
            Action::Create { .. } | Action::Update { .. } | Action::Delete { .. } => {
                Some(MANAGERS)
            }
        }
    }

    async fn render(self, ctx: &Context<'_>) -> Result<Navigation> {
        match self.action {
            Action::List => print_table(saws::ListSawTypes.execute(ctx.pipeline).await?),
            Action::Create {
                nombre,
                descripcion,
            } => {
                let nombre = ctx.ask("Nombre", nombre, None).await?;
                let input = SawTypeInput {
                    nombre: validation::required("nombre", &nombre)?,
                    descripcion: ctx.ask_optional("Descripción", descripcion, None).await?,
                };
                let created = saws::CreateSawType(input).execute(ctx.pipeline).await?;
                println!("Tipo de sierra creado.");
                print_table(vec![created]);
            }
            Action::Update {
                id,
                nombre,
                descripcion,
            } => {
                // There is no endpoint for a single type.
                let current: SawTypeInput = saws::ListSawTypes
                    .execute(ctx.pipeline)
                    .await?
                    .into_iter()
                    .find(|t| t.id == id)
                    .ok_or_else(|| error::Api::NotFound {
                        message: format!("Tipo de sierra #{id} no encontrado"),
                    })?
                    .into();
                let nombre = ctx.ask("Nombre", nombre, Some(current.nombre)).await?;
                let input = SawTypeInput {
                    nombre: validation::required("nombre", &nombre)?,
                    descripcion: ctx
                        .ask_optional("Descripción", descripcion, current.descripcion)
                        .await?,
                };
                let updated = saws::UpdateSawType { id, input }
                    .execute(ctx.pipeline)
                    .await?;
                println!("Tipo de sierra actualizado.");
                print_table(vec![updated]);
            }
            Action::Delete { id, yes } => {
                ctx.confirm(
                    format!("¿Está seguro de eliminar el tipo de sierra #{id}?"),
                    yes,
                )
                .await?;
                _ = saws::DeleteSawType { id }.execute(ctx.pipeline).await?;
                println!("Tipo de sierra eliminado.");
            }
        }
        Ok(Navigation::Done)
    }
}
