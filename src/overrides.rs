//! Override and friend document loading
//!
//! Both documents are optional JSON files re-read on every request. A missing
//! file degrades to empty data; a file that exists but does not parse is an
//! error the caller must surface.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{PreviewError, Result};

const MODEL_FIELDS_KEY: &str = "modelFieldsMap";
const VALUE_KEY: &str = "value";
const NAME_KEYS: [&str; 3] = ["fullName", "showName", "nickName"];

/// Read a JSON object from disk.
///
/// Returns an empty map when `path` does not exist. Fails with
/// [`PreviewError::Parse`] when the file is present but is not a JSON object.
pub async fn load_json(path: &Path) -> Result<Map<String, Value>> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Data file not found, using empty data: {}", path.display());
            return Ok(Map::new());
        },
        Err(source) => {
            return Err(PreviewError::Io {
                path: path.to_path_buf(),
                source,
            })
        },
    };

    serde_json::from_str(&text).map_err(|source| PreviewError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Persisted per-field value overrides, keyed by module code then field code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideDocument {
    modules: IndexMap<String, IndexMap<String, Value>>,
}

impl OverrideDocument {
    /// Extract `modelFieldsMap` from a raw document.
    ///
    /// Entries of the wrong shape are skipped: a module that is not an object,
    /// a field that is not an object, or a field without a `value` key.
    pub fn from_json(document: &Map<String, Value>) -> Self {
        let Some(Value::Object(model_fields)) = document.get(MODEL_FIELDS_KEY) else {
            return Self::default();
        };

        let modules = model_fields
            .iter()
            .filter_map(|(module_code, fields)| {
                let fields = fields.as_object()?;
                let values: IndexMap<String, Value> = fields
                    .iter()
                    .filter_map(|(field_code, entry)| {
                        let value = entry.as_object()?.get(VALUE_KEY)?;
                        Some((field_code.clone(), value.clone()))
                    })
                    .collect();
                Some((module_code.clone(), values))
            })
            .collect();

        Self { modules }
    }

    /// Add or replace a single override.
    pub fn with_value(
        mut self,
        module_code: impl Into<String>,
        field_code: impl Into<String>,
        value: Value,
    ) -> Self {
        self.modules
            .entry(module_code.into())
            .or_default()
            .insert(field_code.into(), value);
        self
    }

    /// Override values for one module, if any are configured.
    pub fn module(&self, module_code: &str) -> Option<&IndexMap<String, Value>> {
        self.modules.get(module_code)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.values().all(|fields| fields.is_empty())
    }
}

/// A contact offered to list-selection fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendRecord {
    pub id: String,
    pub name: String,
}

/// Turn a `{ userId: { fullName?, showName?, nickName? } }` document into
/// friend records, keeping document order.
///
/// The display name is the first non-empty of `fullName`, `showName` and
/// `nickName`, falling back to the user id.
pub fn friends_from_json(document: &Map<String, Value>) -> Vec<FriendRecord> {
    document
        .iter()
        .map(|(user_id, info)| {
            let name = NAME_KEYS
                .iter()
                .filter_map(|key| info.get(*key).and_then(Value::as_str))
                .find(|name| !name.is_empty())
                .unwrap_or(user_id.as_str());
            FriendRecord {
                id: user_id.clone(),
                name: name.to_string(),
            }
        })
        .collect()
}

/// Locations of the two on-disk documents.
#[derive(Debug, Clone)]
pub struct OverrideLoader {
    config_file: PathBuf,
    friend_file: PathBuf,
}

impl OverrideLoader {
    pub fn new(config_file: impl Into<PathBuf>, friend_file: impl Into<PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
            friend_file: friend_file.into(),
        }
    }

    pub async fn load_overrides(&self) -> Result<OverrideDocument> {
        let document = load_json(&self.config_file).await?;
        Ok(OverrideDocument::from_json(&document))
    }

    pub async fn load_friends(&self) -> Result<Vec<FriendRecord>> {
        let document = load_json(&self.friend_file).await?;
        Ok(friends_from_json(&document))
    }
}
