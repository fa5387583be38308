// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use secrecy::{ExposeSecret as _, SecretVec};
use security_framework::os::macos::keychain::{SecKeychain, SecPreferencesDomain};
use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Result},
    metadata,
};

use super::{IsPersistent, Storage};

// errSecItemNotFound
const ITEM_NOT_FOUND: i32 = -25300_i32;

/// Keeps the session record as a generic password in the login keychain. The
/// account is the backend URL so sessions against different servers do not
/// collide.
pub(crate) struct Keychain {
    delegate: SecKeychain,
    service: String,
    account: String,
}

impl Keychain {
    pub(crate) fn new(url: &url::Url) -> Result<Self> {
        Ok(Self {
            delegate: SecKeychain::default_for_domain(SecPreferencesDomain::User)
                .map_err(Into::<error::Storage>::into)?,
            service: metadata::PROJECT_DIRS
                .as_ref()
                .map(|dirs| dirs.project_path().as_os_str())
                .ok_or(error::Storage::NoProjectDirs)?
                .to_string_lossy()
                .into_owned(),
            account: url.to_string(),
        })
    }
}

impl IsPersistent for Keychain {
    fn is_persistent(&self) -> bool {
        true
    }
}

#[async_trait]
impl<T: for<'de> Deserialize<'de> + Send + Serialize + Sync> Storage<T> for Keychain {
    async fn get(&mut self) -> Result<Option<T>> {
        match self
            .delegate
            .find_generic_password(&self.service, &self.account)
        {
            Ok((record, _)) => Ok(Some(serde_json::from_slice(&record)?)),
            Err(err) if err.code() == ITEM_NOT_FOUND => Ok(None),
            Err(err) => Err(Into::<error::Storage>::into(err).into()),
        }
    }

    async fn update(&mut self, data: &T) -> Result<()> {
        self.delegate
            .set_generic_password(
                &self.service,
                &self.account,
                SecretVec::new(serde_json::to_vec(data)?).expose_secret(),
            )
            .map_err(Into::<error::Storage>::into)?;
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        match self
            .delegate
            .find_generic_password(&self.service, &self.account)
        {
            Ok((_, item)) => item.delete(),
            Err(err) if err.code() == ITEM_NOT_FOUND => {}
            Err(err) => return Err(Into::<error::Storage>::into(err).into()),
        };
        Ok(())
    }
}
