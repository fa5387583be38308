// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{
    api::{reports, saws, Executor},
    error::Result,
    gate,
    model::{format_timestamp, Saw, SharpeningKind},
    route::{Route, MANAGERS},
    validation,
};

use super::{history, print_table, saws::Fields, Context, Navigation, View};

/// The home page: today's numbers, the latest sharpening and the saws that
/// need attention.
#[derive(Debug, Default, Parser)]
pub(crate) struct Command {
    /// Instead of the summary, find a saw by its code and record a
    /// sharpening for it, registering the saw first if it is new.
    #[arg(long)]
    code: Option<String>,
    /// The kind of sharpening to record for the saw found.
    #[arg(long, value_enum, requires = "code")]
    kind: Option<SharpeningKind>,
    #[arg(long, requires = "code")]
    notes: Option<String>,
    /// This was the saw's final sharpening; retire it.
    #[arg(long, requires = "code")]
    last: bool,
    /// The saw type's ID, when registering a new saw.
    #[arg(long, requires = "code")]
    tipo: Option<i64>,
    /// The owning client's ID, when registering a new saw.
    #[arg(long, requires = "code")]
    cliente: Option<i64>,
}

impl Command {
    async fn quick_search(self, ctx: &Context<'_>, codigo: String) -> Result<Navigation> {
        let found = saws::SearchSaws {
            codigo: codigo.clone(),
        }
        .execute(ctx.pipeline)
        .await?;

        let saw = match pick(found, &codigo) {
            Ok(Some(saw)) => {
                print_table(vec![saw.clone()]);
                saw
            }
            Ok(None) => match self.register(ctx, codigo).await? {
                Some(saw) => saw,
                None => return Ok(Navigation::Done),
            },
            Err(matches) => {
                println!("Varias sierras coinciden con «{codigo}»; indique el código completo.");
                print_table(matches);
                return Ok(Navigation::Done);
            }
        };

        self.record(ctx, &saw).await
    }

    /// Creates the saw that was not found. Only managers register saws.
    async fn register(&self, ctx: &Context<'_>, codigo: String) -> Result<Option<Saw>> {
        println!("No hay ninguna sierra con el código «{codigo}».");
        if !gate::permits(&ctx.identity().await?, MANAGERS) {
            println!("Solo un gerente puede registrar sierras nuevas.");
            return Ok(None);
        }

        let given = self.tipo.is_some() && self.cliente.is_some();
        if !given && !ctx.offer(format!("¿Registrar la sierra {codigo}?")).await? {
            return Ok(None);
        }

        let input = Fields {
            codigo: Some(codigo),
            tipo_sierra_id: self.tipo,
            cliente_id: self.cliente,
            estado: None,
        }
        .fill(ctx, None)
        .await?;
        let created = saws::CreateSaw(input).execute(ctx.pipeline).await?;
        println!("Sierra creada.");
        print_table(vec![created.clone()]);
        Ok(Some(created))
    }

    async fn record(self, ctx: &Context<'_>, saw: &Saw) -> Result<Navigation> {
        let (kind, notes) = if let Some(kind) = self.kind {
            (kind, self.notes)
        } else {
            let question = format!("¿Registrar un afilado para la sierra {}?", saw.codigo);
            if !ctx.offer(question).await? {
                return Ok(Navigation::Done);
            }
            let answer = ctx
                .ask("Tipo de afilado (LOMO, PECHO, COMPLETO)", None, None)
                .await?;
            let kind = validation::sharpening_kind("tipo_afilado", &answer)?;
            (kind, ctx.ask_optional("Observaciones", self.notes, None).await?)
        };

        history::record(ctx, saw.id, kind, notes, self.last).await?;
        Ok(Navigation::Done)
    }
}

/// The saw a code refers to: the only match, or the one whose code is exactly
/// the one given. Several candidates without an exact match are returned as
/// the error.
fn pick(mut found: Vec<Saw>, codigo: &str) -> Result<Option<Saw>, Vec<Saw>> {
    if found.len() <= 1 {
        return Ok(found.pop());
    }
    match found
        .iter()
        .position(|saw| saw.codigo.eq_ignore_ascii_case(codigo.trim()))
    {
        Some(index) => Ok(Some(found.swap_remove(index))),
        None => Err(found),
    }
}

#[async_trait]
impl View for Command {
    fn route(&self) -> Route {
        Route::Home
    }

    async fn render(mut self, ctx: &Context<'_>) -> Result<Navigation> {
        if let Some(codigo) = self.code.take() {
            return self.quick_search(ctx, codigo).await;
        }

        let summary = reports::Dashboard.execute(ctx.pipeline).await?;
        if let Ok(identity) = ctx.identity().await {
            println!("Hola, {}", identity.nombre);
        }
        println!("Afilados hoy:        {}", summary.afilados_hoy.total);
        println!("Afilados este mes:   {}", summary.resumen_mes.total);
        println!(
            "Último afilado:      {}",
            format_timestamp(&summary.ultimo_afilado.and_then(|latest| latest.fecha))
        );
        println!();
        println!("Sierras que requieren atención:");
        print_table(summary.sierras_requieren_atencion);

        Ok(Navigation::Done)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::Method;
    use secrecy::SecretString;
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        api::{
            testing::{FakeTransport, Reply},
            Pipeline,
        },
        password::testing::Scripted,
        session::SessionStore,
        storage::Memory,
        validation::LoginForm,
    };

    fn saw(id: i64, codigo: &str) -> Value {
        json!({"id": id, "codigo": codigo, "tipo_sierra_id": 2, "cliente_id": 5, "estado": true})
    }

    async fn signed_in_as(rol: &str, mut replies: Vec<Reply>) -> (FakeTransport, Pipeline) {
        replies.insert(
            0,
            Reply::json(
                200,
                json!({"id": 7, "nombre": "Pedro", "email": "p@x.com", "rol": rol, "token": "t7"}),
            ),
        );
        let transport = FakeTransport::new(replies);
        let session = Arc::new(SessionStore::open(Box::new(Memory::new())).await);
        let pipeline = transport.pipeline(Arc::clone(&session));
        let form = LoginForm::new("p@x.com", SecretString::new("secreto".to_owned())).unwrap();
        _ = session.login(&pipeline, form).await.unwrap();
        (transport, pipeline)
    }

    fn search(codigo: &str) -> Command {
        Command {
            code: Some(codigo.to_owned()),
            ..Command::default()
        }
    }

    #[tokio::test]
    async fn found_saw_gets_its_sharpening_recorded() {
        let (transport, pipeline) = signed_in_as(
            "OPERARIO",
            vec![
                Reply::json(200, json!([saw(3, "S-0003")])),
                Reply::json(200, json!({"id": 40, "tipo_afilado": "LOMO"})),
            ],
        )
        .await;
        let prompt = Scripted::new(&[]);
        let ctx = Context {
            pipeline: &pipeline,
            prompt: &prompt,
            interactive: false,
        };

        let nav = Command {
            kind: Some(SharpeningKind::Lomo),
            ..search("S-0003")
        }
        .render(&ctx)
        .await
        .unwrap();

        assert_eq!(nav, Navigation::Done);
        let sent = transport.sent();
        assert_eq!(sent[1].url.path(), "/api/busqueda/sierras");
        assert_eq!(sent[1].url.query(), Some("codigo=S-0003"));
        assert_eq!((sent[2].method.clone(), sent[2].url.path()), (Method::POST, "/api/historial"));
        let body = sent[2].body.clone().unwrap();
        assert_eq!(body["sierra_id"], json!(3));
        assert_eq!(body["tipo_afilado"], json!("LOMO"));
        assert_eq!(body["usuario_id"], json!(7));
    }

    #[tokio::test]
    async fn without_a_kind_nothing_is_recorded_unattended() {
        let (transport, pipeline) =
            signed_in_as("OPERARIO", vec![Reply::json(200, json!([saw(3, "S-0003")]))]).await;
        let prompt = Scripted::new(&[]);
        let ctx = Context {
            pipeline: &pipeline,
            prompt: &prompt,
            interactive: false,
        };

        _ = search("S-0003").render(&ctx).await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn unknown_code_registers_the_saw_for_managers() {
        let (transport, pipeline) = signed_in_as(
            "GERENTE",
            vec![
                Reply::json(200, json!([])),
                Reply::json(200, saw(11, "S-0100")),
                Reply::json(200, json!({"id": 41, "tipo_afilado": "PECHO"})),
            ],
        )
        .await;
        let prompt = Scripted::new(&[]);
        let ctx = Context {
            pipeline: &pipeline,
            prompt: &prompt,
            interactive: false,
        };

        _ = Command {
            kind: Some(SharpeningKind::Pecho),
            tipo: Some(2),
            cliente: Some(5),
            ..search("S-0100")
        }
        .render(&ctx)
        .await
        .unwrap();

        let sent = transport.sent();
        assert_eq!((sent[2].method.clone(), sent[2].url.path()), (Method::POST, "/api/sierras"));
        assert_eq!(
            sent[2].body,
            Some(json!({"codigo": "S-0100", "tipo_sierra_id": 2, "cliente_id": 5, "estado": true}))
        );
        assert_eq!(sent[3].url.path(), "/api/historial");
        assert_eq!(sent[3].body.as_ref().map(|b| b["sierra_id"].clone()), Some(json!(11)));
    }

    #[tokio::test]
    async fn operators_cannot_register_unknown_saws() {
        let (transport, pipeline) = signed_in_as("OPERARIO", vec![Reply::json(200, json!([]))]).await;
        let prompt = Scripted::new(&[]);
        let ctx = Context {
            pipeline: &pipeline,
            prompt: &prompt,
            interactive: false,
        };

        let nav = Command {
            kind: Some(SharpeningKind::Lomo),
            tipo: Some(2),
            cliente: Some(5),
            ..search("S-0100")
        }
        .render(&ctx)
        .await
        .unwrap();

        assert_eq!(nav, Navigation::Done);
        assert_eq!(transport.calls(), 2);
    }

    #[test]
    fn exact_code_wins_among_several_matches() {
        let found: Vec<Saw> =
            serde_json::from_value(json!([saw(1, "S-01"), saw(2, "S-010"), saw(3, "s-0")])).unwrap();

        assert_eq!(pick(found.clone(), "S-010").map(|s| s.map(|s| s.id)), Ok(Some(2)));
        assert_eq!(pick(found.clone(), "S-0").map(|s| s.map(|s| s.id)), Ok(Some(3)));
        assert!(pick(found, "S").is_err());
        assert_eq!(pick(vec![], "S"), Ok(None));
    }
}
