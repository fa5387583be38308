// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretVec};
use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Result},
    metadata,
};

use super::{IsPersistent, Storage};

/// Keeps the session record in the desktop keyring, one item per backend URL.
pub(crate) struct SecretService {
    keyring: oo7::Keyring,
    attributes: HashMap<String, String>,
}

impl SecretService {
    async fn item(&self) -> Result<Option<oo7::Item>> {
        Ok(self
            .keyring
            .search_items(self.lookup())
            .await
            .map_err(error::Storage::from)?
            .into_iter()
            .next())
    }

    fn lookup(&self) -> HashMap<&str, &str> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }

    pub(crate) async fn new(url: &url::Url) -> Result<Self> {
        Ok(Self {
            keyring: oo7::Keyring::new().await.map_err(error::Storage::from)?,
            attributes: attributes(url),
        })
    }
}

/// The attributes that identify the session item for one backend.
fn attributes(url: &url::Url) -> HashMap<String, String> {
    HashMap::from([
        (format!("{}.kind", *metadata::CLIENT_TYPE_ID), "session".to_owned()),
        (
            format!("{}.backend", *metadata::CLIENT_TYPE_ID),
            url.as_str().to_owned(),
        ),
    ])
}

impl IsPersistent for SecretService {
    fn is_persistent(&self) -> bool {
        true
    }
}

#[async_trait]
impl<T: for<'de> Deserialize<'de> + Send + Serialize + Sync> Storage<T> for SecretService {
    async fn get(&mut self) -> Result<Option<T>> {
        Ok(match self.item().await? {
            Some(item) => {
                let secret = item.secret().await.map_err(error::Storage::from)?;
                Some(serde_json::from_slice(&secret)?)
            }
            None => None,
        })
    }

    async fn update(&mut self, data: &T) -> Result<()> {
        let label = format!("{} session", *metadata::CLIENT_DISPLAY_NAME);
        self.keyring
            .create_item(
                &label,
                self.lookup(),
                SecretVec::new(serde_json::to_vec(data)?).expose_secret(),
                true,
            )
            .await
            .map_err(error::Storage::from)?;
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        if let Some(item) = self.item().await? {
            item.delete().await.map_err(error::Storage::from)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    #[test]
    fn items_are_keyed_by_backend() {
        let production = attributes(&Url::parse("https://taller.example/").unwrap());
        let staging = attributes(&Url::parse("https://pruebas.taller.example/").unwrap());

        assert_eq!(production.get("afilado.kind").map(String::as_str), Some("session"));
        assert_eq!(
            production.get("afilado.backend").map(String::as_str),
            Some("https://taller.example/")
        );
        assert_ne!(production, staging);
    }
}
