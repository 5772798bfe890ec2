//! Key/value persistence for settings and high scores
//!
//! Values are stored as JSON:
//! - Native: one `<key>.json` file per key in a data directory, written to a
//!   `.tmp` file first and renamed into place
//! - Web: one LocalStorage entry per key, namespaced by a prefix

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

use crate::error::Result;

/// JSON key/value store
#[derive(Debug, Clone)]
pub struct Store {
    #[cfg(not(target_arch = "wasm32"))]
    dir: PathBuf,
    #[cfg(target_arch = "wasm32")]
    prefix: String,
}

impl Store {
    /// Read and decode `key`. A missing key is `Ok(None)`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_raw(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Encode and store `value` under `key`
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.write_raw(key, &json)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Store {
    /// Open (creating if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        log::debug!("Store opened at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn read_raw(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn write_raw(&self, key: &str, data: &str) -> Result<()> {
        let path = self.path(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
impl Store {
    /// Open a LocalStorage-backed store whose keys start with `prefix`
    pub fn open(prefix: impl Into<String>) -> Result<Self> {
        let store = Self {
            prefix: prefix.into(),
        };
        Self::storage()?;
        Ok(store)
    }

    fn storage() -> Result<web_sys::Storage> {
        use crate::error::Error;

        web_sys::window()
            .ok_or_else(|| Error::Storage("no window".into()))?
            .local_storage()
            .map_err(|_| Error::Storage("LocalStorage access denied".into()))?
            .ok_or_else(|| Error::Storage("LocalStorage unavailable".into()))
    }

    fn item_key(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key)
    }

    pub fn read_raw(&self, key: &str) -> Result<Option<String>> {
        use crate::error::Error;

        Self::storage()?
            .get_item(&self.item_key(key))
            .map_err(|_| Error::Storage(format!("failed to read {key}")))
    }

    pub fn write_raw(&self, key: &str, data: &str) -> Result<()> {
        use crate::error::Error;

        Self::storage()?
            .set_item(&self.item_key(key), data)
            .map_err(|_| Error::Storage(format!("failed to write {key}")))
    }
}
