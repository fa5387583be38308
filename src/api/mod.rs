// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Every backend call goes through [`Pipeline::call`], which attaches the
//! session credential, classifies failures, and tears the session down when
//! the backend rejects the credential.

pub(crate) mod auth;
pub(crate) mod clients;
pub(crate) mod history;
pub(crate) mod reports;
pub(crate) mod saws;
pub(crate) mod users;

mod transport;

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, trace, warn};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub(crate) use transport::Http;

use crate::{
    error::{self, Result},
    session::{Credential, SessionStore},
};

/// A backend call before the credential is attached.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Request {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
    public: bool,
}

impl Request {
    fn new<P: Into<String>>(method: Method, path: P, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            query: vec![],
            body,
            public: false,
        }
    }

    pub(crate) fn get<P: Into<String>>(path: P) -> Self {
        Self::new(Method::GET, path, None)
    }

    pub(crate) fn post<P: Into<String>>(path: P, body: Value) -> Self {
        Self::new(Method::POST, path, Some(body))
    }

    pub(crate) fn put<P: Into<String>>(path: P, body: Value) -> Self {
        Self::new(Method::PUT, path, Some(body))
    }

    pub(crate) fn patch<P: Into<String>>(path: P, body: Value) -> Self {
        Self::new(Method::PATCH, path, Some(body))
    }

    pub(crate) fn delete<P: Into<String>>(path: P) -> Self {
        Self::new(Method::DELETE, path, None)
    }

    pub(crate) fn with_query<V: ToString>(mut self, key: &'static str, value: V) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Sent without a credential, and a 401 is not treated as the session
    /// expiring.
    pub(crate) fn public(mut self) -> Self {
        self.public = true;
        self
    }
}

/// What actually goes over the wire.
#[derive(Clone, Debug)]
pub(crate) struct Outbound {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) bearer: Option<Credential>,
    pub(crate) body: Option<Value>,
}

#[derive(Clone, Debug)]
pub(crate) struct Inbound {
    pub(crate) status: StatusCode,
    pub(crate) body: String,
}

#[async_trait]
pub(crate) trait Transport: Send + Sync {
    async fn send(&self, req: Outbound) -> Result<Inbound>;
}

pub(crate) struct Pipeline {
    base: Url,
    transport: Box<dyn Transport>,
    session: Arc<SessionStore>,
}

impl Pipeline {
    pub(crate) fn new(base: Url, transport: Box<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self {
            base,
            transport,
            session,
        }
    }

    pub(crate) fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, req: &Request) -> Url {
        let mut url = self.base.clone();
        let path = format!("{}{}", self.base.path().trim_end_matches('/'), req.path);
        url.set_path(&path);
        if !req.query.is_empty() {
            _ = url
                .query_pairs_mut()
                .extend_pairs(req.query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url
    }

    pub(crate) async fn call<T: for<'de> Deserialize<'de>>(&self, req: Request) -> Result<T> {
        let (generation, bearer) = if req.public {
            (None, None)
        } else {
            let (generation, bearer) = self.session.snapshot().await;
            (Some(generation), bearer)
        };

        let url = self.url(&req);
        debug!(
            "{} {} ({})",
            req.method,
            url,
            if bearer.is_some() { "authenticated" } else { "anonymous" }
        );

        let inbound = self
            .transport
            .send(Outbound {
                method: req.method.clone(),
                url,
                bearer,
                body: req.body,
            })
            .await
            .map_err(|e| {
                debug!("{} {} failed in transit: {}", req.method, req.path, e);
                e
            })?;
        trace!("{} {} -> {}: {}", req.method, req.path, inbound.status, inbound.body);

        if inbound.status.is_success() {
            return decode(&inbound.body);
        }

        let message = message(inbound.status, &inbound.body);
        debug!("{} {} was refused with {}: {}", req.method, req.path, inbound.status, message);
        Err(match inbound.status {
            StatusCode::UNAUTHORIZED => {
                if let Some(generation) = generation {
                    if self.session.teardown_if(generation).await {
                        warn!("The backend rejected the session credential, so we signed out");
                    }
                }
                error::Api::Unauthenticated
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                error::Api::Validation { message }
            }
            StatusCode::FORBIDDEN => error::Api::Forbidden { message },
            StatusCode::NOT_FOUND => error::Api::NotFound { message },
            StatusCode::CONFLICT => error::Api::Conflict { message },
            status => error::Api::Server { status, message },
        }
        .into())
    }
}

fn decode<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T> {
    if body.trim().is_empty() {
        Ok(serde_json::from_value(Value::Null)?)
    } else {
        Ok(serde_json::from_str(body)?)
    }
}

/// The human-readable reason the backend gave, if any.
fn message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(s)) = fields.get(key) {
                return s.clone();
            }
        }
    }

    match body.trim() {
        "" => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_owned(),
        text => text.to_owned(),
    }
}

#[async_trait]
pub(crate) trait Executor {
    type Response: Send;

    async fn execute(self, pipeline: &Pipeline) -> Result<Self::Response>
    where
        Self: TryInto<Request> + Send,
        error::Error: From<<Self as TryInto<Request>>::Error>,
        Self::Response: for<'de> Deserialize<'de>,
    {
        let req = self.try_into()?;
        pipeline.call(req).await
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde::de::IgnoredAny;
    use serde_json::json;

    use super::{testing::*, *};
    use crate::{
        error::Error,
        session::{Data, SessionState},
        storage::Memory,
    };

    async fn signed_in() -> Arc<SessionStore> {
        let mut memory = Memory::new();
        crate::storage::Storage::update(&mut memory, &Data::new(Credential::new("t1"), None))
            .await
            .unwrap();
        Arc::new(SessionStore::open(Box::new(memory)).await)
    }

    async fn anonymous() -> Arc<SessionStore> {
        Arc::new(SessionStore::open(Box::new(Memory::new())).await)
    }

    #[tokio::test]
    async fn bearer_attached_only_with_a_credential() {
        let transport = FakeTransport::new(vec![Reply::json(200, json!([])), Reply::json(200, json!([]))]);

        let with = transport.pipeline(signed_in().await);
        let _: Vec<IgnoredAny> = with.call(Request::get("/api/clientes")).await.unwrap();
        let without = transport.pipeline(anonymous().await);
        let _: Vec<IgnoredAny> = without.call(Request::get("/api/clientes")).await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].bearer, Some(Credential::new("t1")));
        assert_eq!(sent[1].bearer, None);
    }

    #[tokio::test]
    async fn public_requests_never_carry_the_credential() {
        let transport = FakeTransport::new(vec![Reply::json(200, json!({}))]);
        let pipeline = transport.pipeline(signed_in().await);

        let _: IgnoredAny = pipeline
            .call(Request::post("/api/auth/login", json!({})).public())
            .await
            .unwrap();
        assert_eq!(transport.sent()[0].bearer, None);
    }

    #[tokio::test]
    async fn rejected_credential_tears_the_session_down() {
        let session = signed_in().await;
        let transport = FakeTransport::new(vec![Reply::json(401, json!({"message": "Token inválido"}))]);
        let pipeline = transport.pipeline(Arc::clone(&session));

        let err = pipeline
            .call::<IgnoredAny>(Request::get("/api/sierras"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Api(error::Api::Unauthenticated)));
        assert!(matches!(session.state().await, SessionState::Anonymous));
    }

    #[tokio::test]
    async fn other_failures_leave_the_session_intact() {
        let session = signed_in().await;
        let transport = FakeTransport::new(vec![
            Reply::json(400, json!({"message": "Código duplicado"})),
            Reply::json(403, json!({"error": "Acceso denegado"})),
            Reply::json(404, json!({"message": "Sierra no encontrada"})),
            Reply::json(409, json!({"message": "Tiene registros asociados"})),
            Reply::Respond(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_owned()),
        ]);
        let pipeline = transport.pipeline(Arc::clone(&session));

        let mut errors = vec![];
        for _ in 0..5 {
            errors.push(
                pipeline
                    .call::<IgnoredAny>(Request::delete("/api/sierras/9"))
                    .await
                    .unwrap_err(),
            );
        }

        assert!(matches!(errors[0], Error::Api(error::Api::Validation { ref message }) if message == "Código duplicado"));
        assert!(matches!(errors[1], Error::Api(error::Api::Forbidden { ref message }) if message == "Acceso denegado"));
        assert!(matches!(errors[2], Error::Api(error::Api::NotFound { .. })));
        assert!(matches!(errors[3], Error::Api(error::Api::Conflict { .. })));
        assert!(matches!(
            errors[4],
            Error::Api(error::Api::Server { status: StatusCode::INTERNAL_SERVER_ERROR, ref message }) if message == "boom"
        ));
        assert_eq!(session.credential().await, Some(Credential::new("t1")));
    }

    #[tokio::test]
    async fn server_errors_surface_the_backend_message() {
        let transport = FakeTransport::new(vec![Reply::json(
            500,
            json!({"message": "No se puede eliminar: la sierra tiene historial"}),
        )]);
        let pipeline = transport.pipeline(signed_in().await);

        let err = pipeline
            .call::<IgnoredAny>(Request::delete("/api/sierras/9"))
            .await
            .unwrap_err();

        assert_eq!(
            err.banner(),
            "Error del servidor: No se puede eliminar: la sierra tiene historial"
        );
    }

    #[tokio::test]
    async fn transport_failures_keep_the_session() {
        let session = signed_in().await;
        let transport = FakeTransport::new(vec![Reply::Unreachable]);
        let pipeline = transport.pipeline(Arc::clone(&session));

        assert!(pipeline
            .call::<IgnoredAny>(Request::get("/api/historial"))
            .await
            .is_err());
        assert!(session.credential().await.is_some());
    }

    #[tokio::test]
    async fn empty_success_body_decodes() {
        let transport = FakeTransport::new(vec![Reply::empty(204)]);
        let pipeline = transport.pipeline(signed_in().await);

        let _: IgnoredAny = pipeline.call(Request::delete("/api/clientes/3")).await.unwrap();
        assert_eq!(transport.sent()[0].method, Method::DELETE);
    }

    #[tokio::test]
    async fn query_values_are_encoded_and_prefix_kept() {
        let transport = FakeTransport::new(vec![Reply::json(200, json!([]))]);
        let pipeline = Pipeline::new(
            Url::parse("https://backend.test/v1/").unwrap(),
            Box::new(transport.clone()),
            anonymous().await,
        );

        let _: Vec<IgnoredAny> = pipeline
            .call(Request::get("/api/busqueda/clientes").with_query("nombre", "Maderas & Hijos"))
            .await
            .unwrap();

        let url = &transport.sent()[0].url;
        assert_eq!(url.path(), "/v1/api/busqueda/clientes");
        assert_eq!(
            url.query_pairs().collect::<Vec<_>>(),
            vec![("nombre".into(), "Maderas & Hijos".into())]
        );
    }
}
