// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::{Args, Subcommand};

use crate::{
    api::{saws, Executor},
    error::Result,
    model::{Role, Saw, SawInput},
    route::{Route, MANAGERS},
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
            action: Action::List { code: None },
        }
    }
}

#[derive(Debug, Default, Args)]
pub(crate) struct Fields {
    #[arg(long)]
    pub(crate) codigo: Option<String>,
    /// The saw type's ID.
    #[arg(long = "tipo")]
    pub(crate) tipo_sierra_id: Option<i64>,
    /// The owning client's ID.
    #[arg(long = "cliente")]
    pub(crate) cliente_id: Option<i64>,
    /// Whether the saw is still in service.
    #[arg(long)]
    pub(crate) estado: Option<bool>,
}

impl Fields {
    pub(crate) async fn fill(self, ctx: &Context<'_>, current: Option<&Saw>) -> Result<SawInput> {
        let codigo = ctx
            .ask("Código", self.codigo, current.map(|saw| saw.codigo.clone()))
            .await?;
        let tipo = ctx
            .ask(
                "Tipo de sierra (ID)",
                self.tipo_sierra_id.map(|id| id.to_string()),
                current.and_then(|saw| saw.tipo_sierra_id).map(|id| id.to_string()),
            )
            .await?;
        let cliente = ctx
            .ask(
                "Cliente (ID)",
                self.cliente_id.map(|id| id.to_string()),
                current.and_then(|saw| saw.cliente_id).map(|id| id.to_string()),
            )
            .await?;

        Ok(SawInput {
            codigo: validation::required("codigo", &codigo)?,
            tipo_sierra_id: validation::id("tipo_sierra_id", &tipo)?,
            cliente_id: validation::id("cliente_id", &cliente)?,
            estado: self
                .estado
                .or_else(|| current.map(|saw| saw.estado))
                .unwrap_or(true),
        })
    }
}

#[derive(Debug, Subcommand)]
enum Action {
    /// List saws, optionally only those whose code matches.
    List {
        #[arg(long)]
        code: Option<String>,
    },
    Show {
        id: i64,
    },
    Create {
        #[command(flatten)]
        fields: Fields,
    },
    /// Change the given fields of a saw and keep the rest.
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
        Route::Sierras
    }

    fn requirement(&self) -> Option<&'static [Role]> {
        match self.action {
            Action::List { .. } | Action::Show { .. } => self.route().requirement(),
            Action::Create { .. } | Action::Update { .. } | Action::Delete { .. } => {
                Some(MANAGERS)
            }
        }
    }

    async fn render(self, ctx: &Context<'_>) -> Result<Navigation> {
        match self.action {
            Action::List { code: Some(codigo) } => {
                print_table(saws::SearchSaws { codigo }.execute(ctx.pipeline).await?);
            }
            Action::List { code: None } => {
                print_table(saws::ListSaws.execute(ctx.pipeline).await?);
            }
            Action::Show { id } => {
                print_table(vec![saws::GetSaw { id }.execute(ctx.pipeline).await?]);
            }
            Action::Create { fields } => {
                let input = fields.fill(ctx, None).await?;
                let created = saws::CreateSaw(input).execute(ctx.pipeline).await?;
                println!("Sierra creada.");
                print_table(vec![created]);
            }
            Action::Update { id, fields } => {
                let current = saws::GetSaw { id }.execute(ctx.pipeline).await?;
                let input = fields.fill(ctx, Some(&current)).await?;
                let updated = saws::UpdateSaw { id, input }.execute(ctx.pipeline).await?;
                println!("Sierra actualizada.");
                print_table(vec![updated]);
            }
            Action::Delete { id, yes } => {
                ctx.confirm(format!("¿Está seguro de eliminar la sierra #{id}?"), yes)
                    .await?;
                _ = saws::DeleteSaw { id }.execute(ctx.pipeline).await?;
                println!("Sierra eliminada.");
            }
        }
        Ok(Navigation::Done)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        api::testing::FakeTransport,
        error::{Error, Validation},
        password::testing::Scripted,
        route::ANYONE,
        session::SessionStore,
        storage::Memory,
    };

    #[test]
    fn only_managers_change_saws() {
        let list = Command::list();
        assert_eq!(list.requirement(), Some(ANYONE));

        let delete = Command {
            action: Action::Delete { id: 1, yes: true },
        };
        assert_eq!(delete.requirement(), Some(MANAGERS));
    }

    #[tokio::test]
    async fn code_type_and_client_are_required() {
        let transport = FakeTransport::new(vec![]);
        let pipeline =
            transport.pipeline(Arc::new(SessionStore::open(Box::new(Memory::new())).await));
        let prompt = Scripted::new(&[]);
        let ctx = Context {
            pipeline: &pipeline,
            prompt: &prompt,
            interactive: false,
        };

        let err = Command {
            action: Action::Create {
                fields: Fields {
                    codigo: Some("S-0100".to_owned()),
                    cliente_id: Some(2),
                    ..Fields::default()
                },
            },
        }
        .render(&ctx)
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Validation(Validation::Required { field: "tipo_sierra_id" })
        ));
        assert_eq!(transport.calls(), 0);
    }
}
