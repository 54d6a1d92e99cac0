//! Language code to display name lookup

use crate::error::{common, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Read-only map from ISO-style language code to human-readable name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTable {
    names: HashMap<String, String>,
}

impl LanguageTable {
    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(common::input_not_found(path));
        }
        let content = std::fs::read_to_string(path).map_err(|e| common::read_failed(path, e))?;
        let table = Self::from_json(&content).map_err(|e| common::invalid_json(path, e))?;
        debug!("Loaded {} language names from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn name(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for LanguageTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
