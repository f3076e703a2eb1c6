use crate::core::thermo::term::Thermodynamics;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Unsupported parameter file format for '{path}'; expected a .toml or .csv file")]
    UnknownFormat { path: String },
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
struct Entry {
    enthalpy: f64,
    entropy: f64,
}

#[derive(Debug, Deserialize)]
struct TableFile {
    parameters: HashMap<String, Entry>,
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    key: String,
    enthalpy: f64,
    entropy: f64,
}

/// Thermodynamic parameters keyed by category-qualified canonical strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterTable {
    entries: HashMap<String, Thermodynamics>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Thermodynamics)>,
        K: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Thermodynamics> {
        self.entries.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies every entry of `other` into this table; existing keys are overwritten.
    pub fn merge(&mut self, other: &ParameterTable) {
        self.entries
            .extend(other.entries.iter().map(|(k, v)| (k.clone(), *v)));
    }

    /// Loads a table, picking the parser from the file extension.
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::load_toml(path),
            Some("csv") => Self::load_csv(path),
            _ => Err(ParamLoadError::UnknownFormat {
                path: path.to_string_lossy().to_string(),
            }),
        }
    }

    fn load_toml(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: TableFile = toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(Self::from_entries(file.parameters.into_iter().map(
            |(key, entry)| (key, Thermodynamics::new(entry.enthalpy, entry.entropy)),
        )))
    }

    fn load_csv(path: &Path) -> Result<Self, ParamLoadError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| ParamLoadError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let mut entries = HashMap::new();
        for result in reader.deserialize::<CsvRecord>() {
            let record = result.map_err(|e| ParamLoadError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            entries.insert(
                record.key,
                Thermodynamics::new(record.enthalpy, record.entropy),
            );
        }
        Ok(Self { entries })
    }
}
