use thiserror::Error;

use crate::retrieval::RetrievalError;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("stage '{stage}' failed: {source}")]
    Retrieval {
        stage: String,
        #[source]
        source: RetrievalError,
    },

    #[error("unknown stage '{name}' (known stages: {known})")]
    UnknownStage { name: String, known: String },

    #[error("duplicate stage name '{name}'")]
    DuplicateStage { name: String },
}

impl ClassifierError {
    /// Name of the stage the error is about.
    pub fn stage(&self) -> &str {
        match self {
            ClassifierError::Retrieval { stage, .. } => stage,
            ClassifierError::UnknownStage { name, .. }
            | ClassifierError::DuplicateStage { name } => name,
        }
    }
}
