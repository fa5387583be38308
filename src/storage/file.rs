// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    error::{self, Result},
    metadata,
};

use super::{IsPersistent, Storage};

/// Stores the value as JSON in a file under the platform data directory.
pub(crate) struct File {
    path: PathBuf,
}

impl File {
    pub(crate) fn new<P: AsRef<Path>>(file: P) -> Result<Self> {
        metadata::PROJECT_DIRS
            .as_ref()
            .map(|dirs| Self::at(dirs.data_dir().join(file)))
            .ok_or_else(|| error::Storage::NoProjectDirs.into())
    }

    pub(crate) fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl IsPersistent for File {
    fn is_persistent(&self) -> bool {
        true
    }
}

#[async_trait]
impl<T: Send + Serialize + Sync + for<'de> Deserialize<'de>> Storage<T> for File {
    async fn get(&mut self) -> Result<Option<T>> {
        match fs::File::open(&self.path) {
            Ok(fp) => Ok(Some(serde_json::from_reader::<fs::File, T>(fp)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&mut self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Readers must see either the old record or the new one.
        let staging = self.path.with_extension("tmp");
        let file = fs::File::create(&staging)?;
        serde_json::to_writer(file, data)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn survives_reopening() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("session.json");

        let mut first = File::at(&path);
        Storage::<Vec<u32>>::update(&mut first, &vec![1, 2, 3]).await?;

        let mut second = File::at(&path);
        assert_eq!(Storage::<Vec<u32>>::get(&mut second).await?, Some(vec![1, 2, 3]));
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty_and_clears_cleanly() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut storage = File::at(dir.path().join("session.json"));

        assert_eq!(Storage::<String>::get(&mut storage).await?, None);
        Storage::<String>::clear(&mut storage).await?;
        Ok(())
    }
}
