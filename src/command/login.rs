// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::info;

use crate::{
    error::Result,
    route::Route,
    validation::{self, LoginForm},
};

use super::{Context, Navigation, View};

/// Sign in with an email address and password.
#[derive(Debug, Default, Parser)]
pub(crate) struct Command {
    /// The email address to sign in as. Asked for when omitted.
    #[arg(long, env = "AFILADO_EMAIL")]
    email: Option<String>,
}

#[async_trait]
impl View for Command {
    fn route(&self) -> Route {
        Route::Login
    }

    async fn render(self, ctx: &Context<'_>) -> Result<Navigation> {
        let answer = ctx.ask("Correo electrónico", self.email, None).await?;
        let email = validation::email("email", &answer)?;
        let password = ctx.password(format!("Contraseña para {email}")).await?;
        let form = LoginForm::new(&email, password)?;

        let target = ctx.session().login(ctx.pipeline, form).await?;
        if !ctx.session().is_persistent().await {
            info!("The session is kept in memory only and ends with this process");
        }
        if let Ok(identity) = ctx.identity().await {
            println!("Bienvenido, {} ({})", identity.nombre, identity.rol);
        }

        Ok(Navigation::Goto(target))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        api::testing::{FakeTransport, Reply},
        error::{Error, Validation},
        password::testing::Scripted,
        session::SessionStore,
        storage::Memory,
    };

    #[tokio::test]
    async fn malformed_email_is_rejected_before_any_request() {
        let transport = FakeTransport::new(vec![]);
        let pipeline =
            transport.pipeline(Arc::new(SessionStore::open(Box::new(Memory::new())).await));
        let prompt = Scripted::new(&["secret1"]);
        let ctx = Context {
            pipeline: &pipeline,
            prompt: &prompt,
            interactive: false,
        };

        let err = Command {
            email: Some("ana-at-example".to_owned()),
        }
        .render(&ctx)
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Validation(Validation::Email { field: "email" })));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn successful_login_goes_home() {
        let transport = FakeTransport::new(vec![Reply::json(
            200,
            json!({"id": 1, "nombre": "Ana", "email": "a@b.com", "rol": "GERENTE", "token": "t1"}),
        )]);
        let pipeline =
            transport.pipeline(Arc::new(SessionStore::open(Box::new(Memory::new())).await));
        let prompt = Scripted::new(&["secret1"]);
        let ctx = Context {
            pipeline: &pipeline,
            prompt: &prompt,
            interactive: false,
        };

        let navigation = Command {
            email: Some("a@b.com".to_owned()),
        }
        .render(&ctx)
        .await
        .unwrap();

        assert_eq!(navigation, Navigation::Goto(Route::Home));
        assert_eq!(transport.sent()[0].body, Some(json!({"email": "a@b.com", "password": "secret1"})));
    }
}
