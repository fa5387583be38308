// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::{Args, Subcommand};

use crate::{
    api::{reports, Executor},
    error::Result,
    model::{format_named, format_timestamp, report::Breakdown},
    route::Route,
};

use super::{print_table, Context, Navigation, View};

#[derive(Debug, Args)]
pub(crate) struct Command {
    #[command(subcommand)]
    action: Action,
}

impl Command {
    pub(crate) const fn statistics() -> Self {
        Self {
            action: Action::Stats,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Overall counts and monthly and per-kind breakdowns.
    Stats,
    /// Every sharpening of one saw and the days between them.
    Saw { id: i64 },
    /// Every sharpening done for one client.
    Client { id: i64 },
    /// A client's saws and how often each is sharpened.
    ClientSaws { id: i64 },
}

#[async_trait]
impl View for Command {
    fn route(&self) -> Route {
        Route::Reportes
    }

    async fn render(self, ctx: &Context<'_>) -> Result<Navigation> {
        match self.action {
            Action::Stats => {
                let stats = reports::GetStatistics.execute(ctx.pipeline).await?;
                println!("Sierras:            {}", stats.total_sierras);
                println!("Sierras activas:    {}", stats.sierras_activas);
                println!("Afilados:           {}", stats.total_afilados);
                println!("Afilados este mes:  {}", stats.afilados_mes);
                if let Some(average) = stats.promedio_mensual {
                    println!("Promedio mensual:   {average:.1}");
                }
                println!();
                println!("Afilados por mes:");
                print_table(Breakdown::rows(&stats.afilados_por_mes));
                println!("Afilados por tipo:");
                print_table(Breakdown::rows(&stats.afilados_por_tipo));
            }
            Action::Saw { id } => {
                let report = reports::SawHistoryReport { id }.execute(ctx.pipeline).await?;
                if let Some(ref saw) = report.sierra {
                    println!(
                        "Sierra {} ({}), cliente {}",
                        saw.codigo,
                        format_named(&saw.tipo_sierra),
                        format_named(&saw.cliente)
                    );
                }
                let intervals = report.intervals();
                let average = report.average_interval();
                print_table(report.registros);
                if !intervals.is_empty() {
                    println!("Días entre afilados:");
                    print_table(intervals);
                }
                if let Some(average) = average {
                    println!("Promedio: {average:.1} días");
                }
            }
            Action::Client { id } => {
                let report = reports::ClientHistoryReport { id }.execute(ctx.pipeline).await?;
                println!("Cliente: {}", format_named(&report.cliente));
                print_table(report.registros);
                if let Some(summary) = report.resumen {
                    println!(
                        "Periodo: {} a {}",
                        format_timestamp(&summary.fecha_inicio),
                        format_timestamp(&summary.fecha_fin)
                    );
                    println!("Afilados por mes:");
                    print_table(Breakdown::rows(&summary.afilados_por_mes));
                    println!("Afilados por tipo:");
                    print_table(Breakdown::rows(&summary.afilados_por_tipo));
                }
            }
            Action::ClientSaws { id } => {
                let report = reports::ClientSawsReport { id }.execute(ctx.pipeline).await?;
                println!("Cliente: {}", format_named(&report.cliente));
                print_table(report.sierras);
                if let Some(summary) = report.resumen {
                    println!("Sierras por tipo:");
                    print_table(Breakdown::rows(&summary.sierras_por_tipo));
                }
            }
        }
        Ok(Navigation::Done)
    }
}
