// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::{NaiveDate, SecondsFormat, Utc};
use clap::{Args, Subcommand};
use log::debug;

use crate::{
    api::{history, saws, Executor},
    error::{self, Result},
    model::{LastSharpening, SharpeningInput, SharpeningKind},
    route::Route,
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
            action: Action::List {
                from: None,
                to: None,
                kind: None,
            },
        }
    }
}

#[derive(Debug, Subcommand)]
enum Action {
    /// List sharpenings, optionally filtered by date range and kind.
    List {
        /// Earliest date, as YYYY-MM-DD.
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest date, as YYYY-MM-DD.
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long, value_enum)]
        kind: Option<SharpeningKind>,
    },
    /// Record a sharpening done now by the signed-in user.
    Create {
        /// The saw's ID.
        #[arg(long)]
        saw: i64,
        #[arg(long, value_enum)]
        kind: SharpeningKind,
        #[arg(long)]
        notes: Option<String>,
        /// This was the saw's final sharpening; retire it.
        #[arg(long)]
        last: bool,
    },
    /// Change the given fields of a record and keep the rest.
    Update {
        id: i64,
        #[arg(long)]
        saw: Option<i64>,
        #[arg(long, value_enum)]
        kind: Option<SharpeningKind>,
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Records a sharpening done now by the signed-in user. A final sharpening
/// retires the saw before the record is written.
pub(crate) async fn record(
    ctx: &Context<'_>,
    saw: i64,
    kind: SharpeningKind,
    notes: Option<String>,
    last: bool,
) -> Result<()> {
    let identity = ctx.identity().await?;
    let fecha = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    if last {
        debug!("Retiring saw {} after its final sharpening", saw);
        _ = saws::RetireSaw {
            id: saw,
            last: LastSharpening::at(fecha.clone()),
        }
        .execute(ctx.pipeline)
        .await?;
    }

    let created = history::CreateSharpening(SharpeningInput {
        sierra_id: saw,
        tipo_afilado: kind,
        observaciones: notes.filter(|n| !n.trim().is_empty()),
        usuario_id: identity.id,
        fecha,
        ultimo_afilado: last,
    })
    .execute(ctx.pipeline)
    .await?;
    println!("Afilado registrado.");
    print_table(vec![created]);
    Ok(())
}

#[async_trait]
impl View for Command {
    fn route(&self) -> Route {
        Route::Historial
    }

    async fn render(self, ctx: &Context<'_>) -> Result<Navigation> {
        match self.action {
            Action::List { from, to, kind } => {
                let search = history::SearchHistory {
                    fecha_inicio: from,
                    fecha_fin: to,
                    tipo_afilado: kind,
                };
                let records = if search.is_empty() {
                    history::ListHistory.execute(ctx.pipeline).await?
                } else {
                    search.execute(ctx.pipeline).await?
                };
                print_table(records);
            }
            Action::Create {
                saw,
                kind,
                notes,
                last,
            } => record(ctx, saw, kind, notes, last).await?,
            Action::Update {
                id,
                saw,
                kind,
                notes,
            } => {
                // There is no endpoint for a single record.
                let record = history::ListHistory
                    .execute(ctx.pipeline)
                    .await?
                    .into_iter()
                    .find(|r| r.id == id)
                    .ok_or_else(|| error::Api::NotFound {
                        message: format!("Registro #{id} no encontrado"),
                    })?;
                let mut input = SharpeningInput::from_record(&record).ok_or(
                    error::Validation::Invalid {
                        field: "id",
                        reason: "el registro está incompleto",
                    },
                )?;
                if let Some(saw) = saw {
                    input.sierra_id = saw;
                }
                if let Some(kind) = kind {
                    input.tipo_afilado = kind;
                }
                if let Some(notes) = notes {
                    input.observaciones = Some(notes).filter(|n| !n.trim().is_empty());
                }

                let updated = history::UpdateSharpening { id, input }
                    .execute(ctx.pipeline)
                    .await?;
                println!("Registro actualizado.");
                print_table(vec![updated]);
            }
        }
        Ok(Navigation::Done)
    }
}
