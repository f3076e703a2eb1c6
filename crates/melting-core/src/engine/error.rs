use thiserror::Error;

use super::config::ConfigError;
use crate::core::params::table::ParamLoadError;
use crate::core::sequences::SequenceError;

#[derive(Debug, Error)]
pub enum MeltingError {
    #[error("Sequence error: {0}")]
    Sequence(#[from] SequenceError),

    #[error("Missing thermodynamic parameter '{key}' for the model {model}")]
    MissingParameter { model: String, key: String },

    #[error("The model {model} is not applicable: {reason}")]
    MethodNotApplicable { model: String, reason: String },

    #[error("No method covers the structure between positions {pos1} and {pos2}: {reason}")]
    NoMethod {
        pos1: usize,
        pos2: usize,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Parameter loading failed: {source}")]
    ParamLoad {
        #[from]
        source: ParamLoadError,
    },
}

impl From<ConfigError> for MeltingError {
    fn from(error: ConfigError) -> Self {
        MeltingError::Configuration(error.to_string())
    }
}

impl MeltingError {
    pub(crate) fn not_applicable(model: &str, reason: impl Into<String>) -> Self {
        MeltingError::MethodNotApplicable {
            model: model.to_string(),
            reason: reason.into(),
        }
    }
}
