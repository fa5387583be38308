// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! The single source of truth for who is signed in.
//!
//! A session moves between three states. It starts [`SessionState::Anonymous`]
//! or, when a credential survived from an earlier run,
//! [`SessionState::Resolving`] until the profile endpoint confirms whose it
//! is. Every transition replaces the whole state in one step and bumps a
//! generation counter, so work started against an older state can tell that
//! it lost the race and must not write its outcome.

use std::fmt;

use log::{debug, info, warn};
use secrecy::{ExposeSecret, SecretString};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use tokio::sync::{Mutex, RwLock};

use crate::{
    api::{self, Executor, Pipeline},
    error::{Error, Result},
    model::Identity,
    route::Route,
    storage::Storage,
    validation::LoginForm,
};

/// The opaque bearer token issued by the backend.
#[derive(Clone)]
pub(crate) struct Credential(SecretString);

impl Credential {
    pub(crate) fn new<S: Into<String>>(token: S) -> Self {
        Self(SecretString::new(token.into()))
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Serialize for Credential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

impl<'de> Deserialize<'de> for Credential {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        if token.is_empty() {
            return Err(de::Error::invalid_length(0, &"a non-empty token"));
        }
        Ok(Self::new(token))
    }
}

/// What survives between runs. The identity is kept for display only; it is
/// never trusted until the profile endpoint confirms it again.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct Data {
    token: Credential,
    #[serde(default)]
    identity: Option<Identity>,
}

impl Data {
    pub(crate) const fn new(token: Credential, identity: Option<Identity>) -> Self {
        Self { token, identity }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum SessionState {
    Anonymous,
    /// A credential exists but nobody has confirmed whose it is yet.
    Resolving(Credential),
    Authenticated {
        credential: Credential,
        identity: Identity,
    },
}

impl SessionState {
    pub(crate) const fn credential(&self) -> Option<&Credential> {
        match *self {
            Self::Anonymous => None,
            Self::Resolving(ref credential) | Self::Authenticated { ref credential, .. } => {
                Some(credential)
            }
        }
    }

    pub(crate) const fn identity(&self) -> Option<&Identity> {
        match *self {
            Self::Authenticated { ref identity, .. } => Some(identity),
            Self::Anonymous | Self::Resolving(_) => None,
        }
    }
}

struct Current {
    generation: u64,
    state: SessionState,
}

pub(crate) struct SessionStore {
    current: RwLock<Current>,
    /// Held for the duration of a profile fetch so concurrent callers share
    /// one request.
    resolving: Mutex<()>,
    storage: Mutex<Box<dyn Storage<Data>>>,
}

impl SessionStore {
    /// Restores whatever credential the storage holds. A credential that
    /// cannot be read back is discarded and the session starts anonymous.
    pub(crate) async fn open(mut storage: Box<dyn Storage<Data>>) -> Self {
        let state = match storage.get().await {
            Ok(Some(data)) => {
                debug!("Found a stored credential; its identity is unconfirmed");
                SessionState::Resolving(data.token)
            }
            Ok(None) => SessionState::Anonymous,
            Err(e) => {
                warn!("We could not read the stored session, so we are starting without one: {}", e);
                if let Err(e) = storage.clear().await {
                    warn!("We could not discard the unreadable session: {}", e);
                }
                SessionState::Anonymous
            }
        };

        Self {
            current: RwLock::new(Current {
                generation: 0,
                state,
            }),
            resolving: Mutex::new(()),
            storage: Mutex::new(storage),
        }
    }

    pub(crate) async fn state(&self) -> SessionState {
        self.current.read().await.state.clone()
    }

    pub(crate) async fn credential(&self) -> Option<Credential> {
        self.current.read().await.state.credential().cloned()
    }

    /// The credential together with the generation it belongs to.
    pub(crate) async fn snapshot(&self) -> (u64, Option<Credential>) {
        let current = self.current.read().await;
        (current.generation, current.state.credential().cloned())
    }

    pub(crate) async fn is_persistent(&self) -> bool {
        self.storage.lock().await.is_persistent()
    }

    /// Exchanges the form for a credential. On success the session becomes
    /// authenticated in one step and the caller should go to the returned
    /// route. Any failure leaves the session exactly as it was.
    pub(crate) async fn login(&self, pipeline: &Pipeline, form: LoginForm) -> Result<Route> {
        let email = form.email().to_owned();
        let response = match api::auth::Login(form).execute(pipeline).await {
            Ok(response) => response,
            Err(e) => {
                debug!("Login for {} was rejected: {}", email, e);
                return Err(Error::InvalidCredentials);
            }
        };

        let api::auth::LoginResponse { identity, token } = response;
        let data = Data::new(token.clone(), Some(identity.clone()));
        self.replace(SessionState::Authenticated {
            credential: token,
            identity,
        })
        .await;
        info!("Signed in as {}", email);

        if let Err(e) = self.storage.lock().await.update(&data).await {
            warn!("The session will not outlive this process because we could not store it: {}", e);
        }

        Ok(Route::Home)
    }

    /// Confirms the identity behind the current credential.
    ///
    /// Returns immediately without touching the network when there is no
    /// credential. Concurrent callers wait on the same fetch and observe its
    /// outcome. A fetch that fails for any reason signs the session out.
    pub(crate) async fn resolve_identity(&self, pipeline: &Pipeline) -> Option<Identity> {
        let _guard = self.resolving.lock().await;

        let generation = {
            let current = self.current.read().await;
            match current.state {
                SessionState::Anonymous => return None,
                SessionState::Authenticated { ref identity, .. } => return Some(identity.clone()),
                SessionState::Resolving(_) => current.generation,
            }
        };

        match api::auth::Profile.execute(pipeline).await {
            Ok(identity) => {
                let mut current = self.current.write().await;
                if current.generation != generation {
                    debug!("Discarding a profile that arrived after the session changed");
                    return current.state.identity().cloned();
                }
                let Some(credential) = current.state.credential().cloned() else {
                    return None;
                };
                current.generation += 1;
                current.state = SessionState::Authenticated {
                    credential: credential.clone(),
                    identity: identity.clone(),
                };
                drop(current);

                let data = Data::new(credential, Some(identity.clone()));
                if let Err(e) = self.storage.lock().await.update(&data).await {
                    warn!("We could not store the confirmed identity: {}", e);
                }
                Some(identity)
            }
            Err(e) => {
                warn!("We could not confirm the stored session, so we are signing out: {}", e);
                self.teardown_if(generation).await;
                None
            }
        }
    }

    /// Signs out locally. Always succeeds, even if the stored copy cannot be
    /// removed.
    pub(crate) async fn logout(&self) -> Route {
        self.teardown().await;
        Route::Login
    }

    pub(crate) async fn teardown(&self) {
        self.replace(SessionState::Anonymous).await;
        self.forget().await;
    }

    /// Tears the session down only if it is still the one the caller saw.
    /// Returns whether anything changed.
    pub(crate) async fn teardown_if(&self, generation: u64) -> bool {
        {
            let mut current = self.current.write().await;
            if current.generation != generation {
                debug!("Ignoring a stale rejection of an earlier session");
                return false;
            }
            current.generation += 1;
            current.state = SessionState::Anonymous;
        }
        self.forget().await;
        true
    }

    async fn replace(&self, state: SessionState) {
        let mut current = self.current.write().await;
        current.generation += 1;
        current.state = state;
    }

    async fn forget(&self) {
        if let Err(e) = self.storage.lock().await.clear().await {
            warn!("We could not remove the stored session: {}", e);
        }
    }
}
