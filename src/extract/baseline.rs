use crate::error::ConfigError;
use serde_derive::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Deserialize, Debug)]
struct BaselineFile {
    version: String,
    selection: HashMap<String, i64>,
}

/// Initial selection percentage per asset, for one versioned asset set.
///
/// Loaded from a JSON file such as
/// `{"version": "2022", "selection": {"1": 31, "7": 12}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionBaseline {
    version: String,
    selection: HashMap<i64, i64>,
}

impl SelectionBaseline {
    pub fn new(version: impl Into<String>, selection: HashMap<i64, i64>) -> Self {
        Self {
            version: version.into(),
            selection,
        }
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let file: BaselineFile = serde_json::from_str(content)
            .map_err(|e| ConfigError::invalid("baseline_file", e.to_string()))?;

        let mut selection = HashMap::with_capacity(file.selection.len());
        for (key, pct) in file.selection {
            let id = key.trim().parse::<i64>().map_err(|_| {
                ConfigError::invalid("baseline_file", format!("asset id '{}' is not an integer", key))
            })?;
            selection.insert(id, pct);
        }

        Ok(Self::new(file.version, selection))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::invalid("baseline_file", format!("{}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn get(&self, id: i64) -> Option<i64> {
        self.selection.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.selection.len()
    }
}
