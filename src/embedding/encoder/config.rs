use std::path::PathBuf;

use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN};
use crate::embedding::error::EmbeddingError;

#[derive(Debug, Clone)]
/// Configuration for [`BertEmbedder`](super::BertEmbedder).
pub struct EmbedderConfig {
    /// Model directory with `config.json`, `model.safetensors` and `tokenizer.json`.
    /// `None` runs the deterministic stub.
    pub model_path: Option<PathBuf>,
    /// Max tokens to consider.
    pub max_seq_len: usize,
    /// Output dimension in stub mode (a loaded model uses its hidden size).
    pub stub_dim: usize,
    /// Prepended to queries (not snippets) before encoding.
    pub query_instruction: Option<String>,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            stub_dim: DEFAULT_EMBEDDING_DIM,
            query_instruction: None,
        }
    }
}

impl EmbedderConfig {
    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self::default()
    }

    /// Sets the instruction prepended to queries.
    pub fn with_query_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.query_instruction = Some(instruction.into());
        self
    }

    /// Validates the sizes and the model path (when given).
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be greater than zero".to_string(),
            });
        }

        if self.stub_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "stub_dim must be greater than zero".to_string(),
            });
        }

        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_path cannot be empty when provided".to_string(),
            });
        }

        Ok(())
    }
}
