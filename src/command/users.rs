// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::{Args, Subcommand, ValueEnum};

use crate::{
    api::{users, Executor},
    error::Result,
    model::{Role, User, UserInput},
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
            action: Action::List,
        }
    }

    pub(crate) fn create() -> Self {
        Self {
            action: Action::Create {
                fields: Fields::default(),
            },
        }
    }

    pub(crate) const fn show(id: i64) -> Self {
        Self {
            action: Action::Show { id },
        }
    }

    pub(crate) fn edit(id: i64) -> Self {
        Self {
            action: Action::Edit {
                id,
                fields: Fields::default(),
            },
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Status {
    Activo,
    Inactivo,
}

#[derive(Debug, Default, Args)]
struct Fields {
    #[arg(long)]
    nombre: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long, value_enum)]
    rol: Option<Role>,
    #[arg(long, value_enum)]
    estado: Option<Status>,
}

impl Fields {
    async fn fill(self, ctx: &Context<'_>, current: Option<&User>) -> Result<UserInput> {
        let nombre = ctx
            .ask("Nombre", self.nombre, current.map(|u| u.nombre.clone()))
            .await?;
        let email = ctx
            .ask("Correo electrónico", self.email, current.map(|u| u.email.clone()))
            .await?;

        Ok(UserInput {
            nombre: validation::required("nombre", &nombre)?,
            email: validation::email("email", &email)?,
            password: None,
            rol: self
                .rol
                .or_else(|| current.map(|u| u.rol))
                .unwrap_or(Role::Operator),
            estado: self
                .estado
                .map_or_else(|| current.map_or(true, |u| u.estado), |s| s == Status::Activo),
        })
    }
}

#[derive(Debug, Subcommand)]
enum Action {
    List,
    Show {
        id: i64,
    },
    /// Create an account. The password is always asked for.
    Create {
        #[command(flatten)]
        fields: Fields,
    },
    /// Change the given fields of an account. Never changes the password.
    Edit {
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
    /// Activate or deactivate an account.
    Status {
        id: i64,
        #[arg(value_enum)]
        estado: Status,
    },
    /// Set a new password for an account.
    ResetPassword {
        id: i64,
    },
}

#[async_trait]
impl View for Command {
    fn route(&self) -> Route {
        match self.action {
            Action::Create { .. } => Route::UsuarioNuevo,
            Action::Show { id } => Route::Usuario(id),
            Action::Edit { id, .. } => Route::UsuarioEditar(id),
            Action::List
            | Action::Delete { .. }
            | Action::Status { .. }
            | Action::ResetPassword { .. } => Route::Usuarios,
        }
    }

    async fn render(self, ctx: &Context<'_>) -> Result<Navigation> {
        match self.action {
            Action::List => print_table(users::ListUsers.execute(ctx.pipeline).await?),
            Action::Show { id } => {
                print_table(vec![users::GetUser { id }.execute(ctx.pipeline).await?]);
            }
            Action::Create { fields } => {
                let mut input = fields.fill(ctx, None).await?;
                let password = ctx
                    .password(format!("Contraseña para {}", input.email))
                    .await?;
                validation::new_password("password", &password)?;
                input.password = Some(password);

                let created = users::CreateUser(input).execute(ctx.pipeline).await?;
                println!("Usuario creado.");
                print_table(vec![created]);
            }
            Action::Edit { id, fields } => {
                let current = users::GetUser { id }.execute(ctx.pipeline).await?;
                let input = fields.fill(ctx, Some(&current)).await?;
                let updated = users::UpdateUser { id, input }.execute(ctx.pipeline).await?;
                println!("Usuario actualizado.");
                print_table(vec![updated]);
            }
            Action::Delete { id, yes } => {
                ctx.confirm(
                    format!(
                        "¿Está seguro de eliminar el usuario #{id}? Esta acción no se puede deshacer."
                    ),
                    yes,
                )
                .await?;
                _ = users::DeleteUser { id }.execute(ctx.pipeline).await?;
                println!("Usuario eliminado.");
                return Ok(Navigation::Goto(Route::Usuarios));
            }
            Action::Status { id, estado } => {
                _ = users::SetUserStatus {
                    id,
                    estado: estado == Status::Activo,
                }
                .execute(ctx.pipeline)
                .await?;
                println!("Usuario #{id} {}.", match estado {
                    Status::Activo => "activado",
                    Status::Inactivo => "desactivado",
                });
            }
            Action::ResetPassword { id } => {
                let new_password = ctx
                    .password(format!("Nueva contraseña para el usuario #{id}"))
                    .await?;
                validation::new_password("newPassword", &new_password)?;
                _ = users::ResetPassword { id, new_password }
                    .execute(ctx.pipeline)
                    .await?;
                println!("Contraseña restablecida.");
            }
        }
        Ok(Navigation::Done)
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
        route::MANAGERS,
        session::SessionStore,
        storage::Memory,
    };

    async fn context_parts(replies: Vec<Reply>) -> (FakeTransport, crate::api::Pipeline) {
        let transport = FakeTransport::new(replies);
        let session = Arc::new(SessionStore::open(Box::new(Memory::new())).await);
        let pipeline = transport.pipeline(session);
        (transport, pipeline)
    }

    #[test]
    fn every_action_is_for_managers() {
        for command in [Command::list(), Command::create(), Command::show(2), Command::edit(2)] {
            assert_eq!(command.requirement(), Some(MANAGERS));
        }
    }

    #[tokio::test]
    async fn short_passwords_are_refused_locally() {
        let (transport, pipeline) = context_parts(vec![]).await;
        let prompt = Scripted::new(&["12345"]);
        let ctx = Context {
            pipeline: &pipeline,
            prompt: &prompt,
            interactive: false,
        };

        let err = Command {
            action: Action::Create {
                fields: Fields {
                    nombre: Some("Luis".to_owned()),
                    email: Some("luis@x.com".to_owned()),
                    ..Fields::default()
                },
            },
        }
        .render(&ctx)
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Validation(Validation::Invalid { field: "password", .. })));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn create_defaults_to_an_active_operator() {
        let (transport, pipeline) = context_parts(vec![Reply::json(
            201,
            json!({"id": 9, "nombre": "Luis", "email": "luis@x.com", "rol": "OPERARIO"}),
        )])
        .await;
        let prompt = Scripted::new(&["clave123"]);
        let ctx = Context {
            pipeline: &pipeline,
            prompt: &prompt,
            interactive: false,
        };

        _ = Command {
            action: Action::Create {
                fields: Fields {
                    nombre: Some("Luis".to_owned()),
                    email: Some("luis@x.com".to_owned()),
                    ..Fields::default()
                },
            },
        }
        .render(&ctx)
        .await
        .unwrap();

        assert_eq!(
            transport.sent()[0].body,
            Some(json!({
                "nombre": "Luis",
                "email": "luis@x.com",
                "password": "clave123",
                "rol": "OPERARIO",
                "estado": true,
            }))
        );
    }
}
