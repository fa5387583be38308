// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::{Args, Subcommand};

use crate::{
    api::{clients, Executor},
    error::Result,
    model::ClientInput,
    route::Route,
    validation,
};

use super::{print_table, Context, Navigation, View};

#[derive(Debug, Args)]
pub(crate) struct Command {
    #[command(subcommand)]
    action: Action,
}

impl Command {
    pub(crate) const fn list() -> Self {
        Self {
            action: Action::List { name: None },
        }
    }
}

#[derive(Debug, Default, Args)]
struct Fields {
    #[arg(long)]
    nombre: Option<String>,
    #[arg(long)]
    direccion: Option<String>,
    #[arg(long)]
    telefono: Option<String>,
    #[arg(long)]
    email: Option<String>,
    /// Whether the client is active.
    #[arg(long)]
    estado: Option<bool>,
}

impl Fields {
    /// Fills the form, asking for whatever was not given and defaulting to
    /// the current values.
    async fn fill(self, ctx: &Context<'_>, current: Option<ClientInput>) -> Result<ClientInput> {
        let current = current.unwrap_or(ClientInput {
            estado: true,
            ..ClientInput::default()
        });
        let nombre = ctx
            .ask("Nombre", self.nombre, Some(current.nombre).filter(|n| !n.is_empty()))
            .await?;
        let direccion = ctx.ask_optional("Dirección", self.direccion, current.direccion).await?;
        let telefono = ctx.ask_optional("Teléfono", self.telefono, current.telefono).await?;
        let email = ctx.ask_optional("Correo", self.email, current.email).await?;

        Ok(ClientInput {
            nombre: validation::required("nombre", &nombre)?,
            direccion,
            telefono,
            email: email.map(|e| validation::email("email", &e)).transpose()?,
            estado: self.estado.unwrap_or(current.estado),
        })
    }
}

#[derive(Debug, Subcommand)]
enum Action {
    /// List clients, optionally only those whose name matches.
    List {
        #[arg(long)]
        name: Option<String>,
    },
    Show {
        id: i64,
    },
    Create {
        #[command(flatten)]
        fields: Fields,
    },
    /// Change the given fields of a client and keep the rest.
    Update {
        id: i64,
        #[command(flatten)]
        fields: Fields,
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
        Route::Clientes
    }

    async fn render(self, ctx: &Context<'_>) -> Result<Navigation> {
        match self.action {
            Action::List { name: Some(nombre) } => {
                print_table(clients::SearchClients { nombre }.execute(ctx.pipeline).await?);
            }
            Action::List { name: None } => {
                print_table(clients::ListClients.execute(ctx.pipeline).await?);
            }
            Action::Show { id } => {
                print_table(vec![clients::GetClient { id }.execute(ctx.pipeline).await?]);
            }
            Action::Create { fields } => {
                let input = fields.fill(ctx, None).await?;
                let created = clients::CreateClient(input).execute(ctx.pipeline).await?;
                println!("Cliente creado.");
                print_table(vec![created]);
            }
            Action::Update { id, fields } => {
                let current = clients::GetClient { id }.execute(ctx.pipeline).await?;
                let input = fields.fill(ctx, Some(current.into())).await?;
                let updated = clients::UpdateClient { id, input }.execute(ctx.pipeline).await?;
                println!("Cliente actualizado.");
                print_table(vec![updated]);
            }
            Action::Delete { id, yes } => {
                ctx.confirm(format!("¿Está seguro de eliminar el cliente #{id}?"), yes)
                    .await?;
                _ = clients::DeleteClient { id }.execute(ctx.pipeline).await?;
                println!("Cliente eliminado.");
            }
        }
        Ok(Navigation::Done)
    }
}
