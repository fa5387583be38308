// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use clap::Subcommand;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use secrecy::SecretString;
use tabled::{settings::Style, Table, Tabled};
use tokio::task;

use crate::{
    api::Pipeline,
    error::{self, Error, Result},
    model::{Identity, Role},
    password::{self, Prompt},
    route::Route,
    session::SessionStore,
};

pub(crate) mod clients;
pub(crate) mod dashboard;
pub(crate) mod history;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod open;
pub(crate) mod reports;
pub(crate) mod saw_types;
pub(crate) mod saws;
pub(crate) mod users;
pub(crate) mod whoami;

/// Where to go once a view has rendered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Navigation {
    Done,
    Goto(Route),
}

/// Everything a view needs while it renders.
pub(crate) struct Context<'app> {
    pub(crate) pipeline: &'app Pipeline,
    pub(crate) prompt: &'app dyn Prompt,
    /// Whether a person is at the terminal to answer questions.
    pub(crate) interactive: bool,
}

impl Context<'_> {
    pub(crate) fn session(&self) -> &Arc<SessionStore> {
        self.pipeline.session()
    }

    pub(crate) async fn identity(&self) -> Result<Identity> {
        self.session()
            .state()
            .await
            .identity()
            .cloned()
            .ok_or(Error::NotAuthenticated)
    }

    /// Uses the given value, or asks for one. Without a terminal the default
    /// stands in, and a missing default becomes an empty answer.
    pub(crate) async fn ask(
        &self,
        label: &str,
        given: Option<String>,
        default: Option<String>,
    ) -> Result<String> {
        if let Some(value) = given {
            return Ok(value);
        }
        if !self.interactive {
            return Ok(default.unwrap_or_default());
        }

        let label = label.to_owned();
        Ok(task::spawn_blocking(move || {
            let theme = ColorfulTheme::default();
            let mut input = Input::<String>::with_theme(&theme)
                .with_prompt(label)
                .allow_empty(true);
            if let Some(default) = default {
                input = input.default(default);
            }
            input.interact_text()
        })
        .await??)
    }

    /// Like [`Self::ask`], but a blank answer means the field is left out.
    pub(crate) async fn ask_optional(
        &self,
        label: &str,
        given: Option<String>,
        default: Option<String>,
    ) -> Result<Option<String>> {
        let answer = self.ask(label, given, default).await?;
        let trimmed = answer.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
    }

    /// Asks before something irreversible. Declining cancels the operation.
    pub(crate) async fn confirm(&self, question: String, assume_yes: bool) -> Result<()> {
        if assume_yes {
            return Ok(());
        }
        if !self.interactive {
            return Err(error::Validation::Invalid {
                field: "--yes",
                reason: "se requiere confirmar la operación",
            }
            .into());
        }

        let confirmed = task::spawn_blocking(move || {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(question)
                .default(false)
                .interact()
        })
        .await??;

        if confirmed {
            Ok(())
        } else {
            Err(Error::Cancelled)
        }
    }

    /// Offers an optional next step. Without a terminal nobody can accept it.
    pub(crate) async fn offer(&self, question: String) -> Result<bool> {
        if !self.interactive {
            return Ok(false);
        }
        Ok(task::spawn_blocking(move || {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(question)
                .default(true)
                .interact()
        })
        .await??)
    }

    pub(crate) async fn password(&self, description: String) -> Result<SecretString> {
        self.prompt
            .prompt(password::RequestBuilder::new(description).into_request())
            .await?
            .ok_or_else(|| error::Password::NoPrompt.into())
    }
}

pub(crate) fn print_table<T: Tabled>(rows: Vec<T>) {
    if rows.is_empty() {
        println!("No hay registros.");
    } else {
        println!("{}", Table::new(rows).with(Style::rounded()));
    }
}

#[async_trait]
pub(crate) trait View {
    /// The location this view lives at.
    fn route(&self) -> Route;

    /// The roles allowed to render the view, or `None` when it is public.
    /// Views whose actions are narrower than their route override this.
    fn requirement(&self) -> Option<&'static [Role]> {
        self.route().requirement()
    }

    async fn render(self, ctx: &Context<'_>) -> Result<Navigation>;
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Sign in and open the dashboard.
    Login(login::Command),
    /// Sign out of this machine.
    Logout(logout::Command),
    /// Show who is signed in and what they can open.
    Whoami(whoami::Command),
    /// Today's activity and saws that need attention.
    Dashboard(dashboard::Command),
    /// Manage clients.
    Clients(clients::Command),
    /// Manage saws.
    Saws(saws::Command),
    /// Manage saw types.
    SawTypes(saw_types::Command),
    /// Record and browse sharpenings.
    History(history::Command),
    /// Statistics and per-saw or per-client reports.
    Reports(reports::Command),
    /// Manage user accounts.
    Users(users::Command),
    /// Open a location such as `/usuarios/3/editar`.
    Open(open::Command),
}

impl Command {
    /// The view a location opens by default.
    pub(crate) fn for_route(route: Route) -> Self {
        match route {
            Route::Login => Self::Login(login::Command::default()),
            Route::Home => Self::Dashboard(dashboard::Command::default()),
            Route::Clientes => Self::Clients(clients::Command::list()),
            Route::Sierras => Self::Saws(saws::Command::list()),
            Route::Historial => Self::History(history::Command::list()),
            Route::Reportes => Self::Reports(reports::Command::statistics()),
            Route::Usuarios => Self::Users(users::Command::list()),
            Route::UsuarioNuevo => Self::Users(users::Command::create()),
            Route::Usuario(id) => Self::Users(users::Command::show(id)),
            Route::UsuarioEditar(id) => Self::Users(users::Command::edit(id)),
        }
    }
}

#[async_trait]
impl View for Command {
    fn route(&self) -> Route {
        match *self {
            Self::Login(ref cmd) => cmd.route(),
            Self::Logout(ref cmd) => cmd.route(),
            Self::Whoami(ref cmd) => cmd.route(),
            Self::Dashboard(ref cmd) => cmd.route(),
            Self::Clients(ref cmd) => cmd.route(),
            Self::Saws(ref cmd) => cmd.route(),
            Self::SawTypes(ref cmd) => cmd.route(),
            Self::History(ref cmd) => cmd.route(),
            Self::Reports(ref cmd) => cmd.route(),
            Self::Users(ref cmd) => cmd.route(),
            Self::Open(ref cmd) => cmd.route(),
        }
    }

    fn requirement(&self) -> Option<&'static [Role]> {
        match *self {
            Self::Login(ref cmd) => cmd.requirement(),
            Self::Logout(ref cmd) => cmd.requirement(),
            Self::Whoami(ref cmd) => cmd.requirement(),
            Self::Dashboard(ref cmd) => cmd.requirement(),
            Self::Clients(ref cmd) => cmd.requirement(),
            Self::Saws(ref cmd) => cmd.requirement(),
            Self::SawTypes(ref cmd) => cmd.requirement(),
            Self::History(ref cmd) => cmd.requirement(),
            Self::Reports(ref cmd) => cmd.requirement(),
            Self::Users(ref cmd) => cmd.requirement(),
            Self::Open(ref cmd) => cmd.requirement(),
        }
    }

    async fn render(self, ctx: &Context<'_>) -> Result<Navigation> {
        match self {
            Self::Login(cmd) => cmd.render(ctx).await,
            Self::Logout(cmd) => cmd.render(ctx).await,
            Self::Whoami(cmd) => cmd.render(ctx).await,
            Self::Dashboard(cmd) => cmd.render(ctx).await,
            Self::Clients(cmd) => cmd.render(ctx).await,
            Self::Saws(cmd) => cmd.render(ctx).await,
            Self::SawTypes(cmd) => cmd.render(ctx).await,
            Self::History(cmd) => cmd.render(ctx).await,
            Self::Reports(cmd) => cmd.render(ctx).await,
            Self::Users(cmd) => cmd.render(ctx).await,
            Self::Open(cmd) => cmd.render(ctx).await,
        }
    }
}
