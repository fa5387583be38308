// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Runs views one navigation at a time, consulting the gate before each.

use log::debug;

use crate::{
    api::Pipeline,
    command::{Command, Context, Navigation, View},
    error::{Error, Result},
    gate::{self, Decision},
    password::Prompt,
    route::Route,
};

pub(crate) struct App {
    pipeline: Pipeline,
    prompt: Box<dyn Prompt>,
    interactive: bool,
}

impl App {
    pub(crate) fn new(pipeline: Pipeline, prompt: Box<dyn Prompt>, interactive: bool) -> Self {
        Self {
            pipeline,
            prompt,
            interactive,
        }
    }

    fn context(&self) -> Context<'_> {
        Context {
            pipeline: &self.pipeline,
            prompt: &*self.prompt,
            interactive: self.interactive,
        }
    }

    /// Renders `command`, following redirects and the navigation each view
    /// asks for until one of them is done.
    pub(crate) async fn navigate(&self, command: Command) -> Result<()> {
        let ctx = self.context();
        let mut next = command;

        loop {
            let decision = match next.requirement() {
                None => Decision::Render,
                Some(requirement) => {
                    let state = self.pipeline.session().state().await;
                    gate::evaluate(&state, requirement)
                }
            };

            next = match decision {
                Decision::Loading => {
                    if self.interactive {
                        eprintln!("Cargando...");
                    }
                    _ = self.pipeline.session().resolve_identity(&self.pipeline).await;
                    continue;
                }
                Decision::RedirectLogin => {
                    debug!("{} needs a session; redirecting to {}", next.route(), Route::Login);
                    if !self.interactive {
                        return Err(Error::NotAuthenticated);
                    }
                    Command::for_route(Route::Login)
                }
                Decision::RedirectHome => {
                    debug!("{} is not open to this role; redirecting to {}", next.route(), Route::Home);
                    Command::for_route(Route::Home)
                }
                Decision::Render => match next.render(&ctx).await? {
                    Navigation::Done => return Ok(()),
                    Navigation::Goto(Route::Login) => {
                        println!("Inicie sesión con `afilado login`.");
                        return Ok(());
                    }
                    Navigation::Goto(route) => {
                        debug!("Navigating to {}", route);
                        Command::for_route(route)
                    }
                },
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clap::Parser;
    use secrecy::SecretString;
    use serde_json::json;

    use super::*;
    use crate::{
        api::testing::{FakeTransport, Reply},
        error,
        password::testing::Scripted,
        session::{Credential, Data, SessionState, SessionStore},
        storage::{Memory, Storage as _},
        validation::LoginForm,
    };

    #[derive(Parser)]
    struct Cli {
        #[command(subcommand)]
        command: Command,
    }

    fn command(args: &[&str]) -> Command {
        Cli::parse_from(std::iter::once("afilado").chain(args.iter().copied())).command
    }

    fn ana() -> serde_json::Value {
        json!({"id": 1, "nombre": "Ana", "email": "a@b.com", "rol": "GERENTE", "token": "t1"})
    }

    fn pedro() -> serde_json::Value {
        json!({"id": 2, "nombre": "Pedro", "email": "p@b.com", "rol": "OPERARIO"})
    }

    async fn app_with(stored: Option<Data>, replies: Vec<Reply>) -> (App, FakeTransport) {
        let mut memory = Memory::new();
        if let Some(data) = stored {
            memory.update(&data).await.unwrap();
        }
        let session = Arc::new(SessionStore::open(Box::new(memory)).await);
        let transport = FakeTransport::new(replies);
        let app = App::new(
            transport.pipeline(session),
            Box::new(Scripted::new(&[])),
            false,
        );
        (app, transport)
    }

    fn stored() -> Option<Data> {
        Some(Data::new(Credential::new("t1"), None))
    }

    #[tokio::test]
    async fn manager_login_opens_users_and_saws() {
        let (app, transport) = app_with(
            None,
            vec![
                Reply::json(200, ana()),
                Reply::json(200, json!([])),
                Reply::json(200, json!([])),
            ],
        )
        .await;
        let session = app.pipeline.session();
        let form = LoginForm::new("a@b.com", SecretString::new("secret1".to_owned())).unwrap();
        assert_eq!(session.login(&app.pipeline, form).await.unwrap(), Route::Home);

        app.navigate(command(&["users", "list"])).await.unwrap();
        app.navigate(command(&["saws", "list"])).await.unwrap();

        let paths: Vec<_> = transport.sent().iter().map(|o| o.url.path().to_owned()).collect();
        assert_eq!(paths, ["/api/auth/login", "/api/usuarios", "/api/sierras"]);
    }

    #[tokio::test]
    async fn operator_is_sent_home_from_clients() {
        let (app, transport) = app_with(
            stored(),
            vec![
                Reply::json(200, pedro()),
                Reply::json(200, json!({"afilados_hoy": {"total": 3}})),
            ],
        )
        .await;

        app.navigate(command(&["clients", "list"])).await.unwrap();

        let paths: Vec<_> = transport.sent().iter().map(|o| o.url.path().to_owned()).collect();
        assert_eq!(paths, ["/api/auth/profile", "/api/dashboard/resumen"]);
    }

    #[tokio::test]
    async fn operator_cannot_delete_saws() {
        let (app, transport) = app_with(
            stored(),
            vec![Reply::json(200, pedro()), Reply::json(200, json!({}))],
        )
        .await;

        app.navigate(command(&["saws", "delete", "3", "--yes"])).await.unwrap();

        assert!(transport
            .sent()
            .iter()
            .all(|o| o.method != reqwest::Method::DELETE));
    }

    #[tokio::test]
    async fn protected_view_after_logout_requires_login() {
        let (app, transport) = app_with(stored(), vec![]).await;

        app.navigate(command(&["logout"])).await.unwrap();
        let err = app.navigate(command(&["history", "list"])).await.unwrap_err();

        assert!(matches!(err, Error::NotAuthenticated));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn rejected_credential_ends_the_session() {
        let (app, transport) = app_with(
            stored(),
            vec![
                Reply::json(200, ana()),
                Reply::json(401, json!({"message": "Token expirado"})),
            ],
        )
        .await;

        let err = app.navigate(command(&["saws", "list"])).await.unwrap_err();
        assert!(matches!(err, Error::Api(error::Api::Unauthenticated)));
        assert!(matches!(app.pipeline.session().state().await, SessionState::Anonymous));

        let err = app.navigate(command(&["saws", "list"])).await.unwrap_err();
        assert!(matches!(err, Error::NotAuthenticated));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn unknown_paths_open_the_dashboard() {
        let (app, transport) = app_with(
            stored(),
            vec![Reply::json(200, pedro()), Reply::json(200, json!({}))],
        )
        .await;

        app.navigate(command(&["open", "/no/existe"])).await.unwrap();

        assert_eq!(transport.sent()[1].url.path(), "/api/dashboard/resumen");
    }
}
