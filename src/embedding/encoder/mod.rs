//! Bi-encoder embedder (BERT, CLS pooling, L2-normalized).
//!
//! Use [`EmbedderConfig::stub`] for tests and local runs without model files.

/// Embedder configuration.
pub mod config;


pub use config::EmbedderConfig;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::TextEncoder;
use crate::embedding::bert::BertEncoder;
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::{check_model_dir, load_tokenizer};

enum EmbedderBackend {
    Model {
        encoder: BertEncoder,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

/// Embedding generator for the distance retriever (supports stub mode).
pub struct BertEmbedder {
    backend: EmbedderBackend,
    config: EmbedderConfig,
}

impl std::fmt::Debug for BertEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.embedding_dim())
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl BertEmbedder {
    /// Loads the embedder from a config (stub mode when no model path is set).
    pub fn load(config: EmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let Some(model_path) = config.model_path.clone() else {
            warn!("No embedder model path configured, running in STUB mode");
            return Ok(Self {
                backend: EmbedderBackend::Stub,
                config,
            });
        };

        check_model_dir(&model_path)?;

        let device = select_device("embedder");
        debug!(?device, "Selected compute device for embedder");

        info!(model_path = %model_path.display(), "Loading embedder model");

        let encoder = BertEncoder::load(&model_path, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT encoder: {}", e),
            }
        })?;
        let tokenizer = load_tokenizer(&model_path, config.max_seq_len)?;

        info!(
            hidden_size = encoder.hidden_size(),
            max_seq_len = config.max_seq_len,
            "Embedder model loaded successfully"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                encoder,
                tokenizer,
                device,
            },
            config,
        })
    }

    /// Shorthand for `load(EmbedderConfig::stub())`.
    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(EmbedderConfig::stub())
    }

    /// Generates an embedding for a single string.
    pub fn embed(&self, text: &str, is_query: bool) -> Result<Vec<f32>, EmbeddingError> {
        let input = self.prepare_input(text, is_query);

        match &self.backend {
            EmbedderBackend::Model {
                encoder,
                tokenizer,
                device,
            } => self.embed_with_model(&input, encoder, tokenizer, device),
            EmbedderBackend::Stub => Ok(self.embed_stub(&input)),
        }
    }

    fn prepare_input(&self, text: &str, is_query: bool) -> String {
        match (&self.config.query_instruction, is_query) {
            (Some(instruction), true) => format!("{} {}", instruction, text),
            _ => text.to_string(),
        }
    }

    fn embed_with_model(
        &self,
        text: &str,
        encoder: &BertEncoder,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let tokens =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        debug!(
            text_len = text.len(),
            token_count = tokens.get_ids().len(),
            "Generating embedding (BERT forward pass)"
        );

        let input_ids = Tensor::new(tokens.get_ids(), device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(tokens.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(tokens.get_attention_mask(), device)?.unsqueeze(0)?;

        let embedding = encoder
            .forward_cls(&input_ids, &type_ids, Some(&attention_mask))
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("BERT forward pass failed: {}", e),
            })?
            .to_vec1::<f32>()?;

        Ok(normalize(embedding))
    }

    fn embed_stub(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        debug!(text_len = text.len(), "Generating stub embedding");

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let mut embedding = Vec::with_capacity(self.config.stub_dim);
        for _ in 0..self.config.stub_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        normalize(embedding)
    }

    /// Returns the output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        match &self.backend {
            EmbedderBackend::Model { encoder, .. } => encoder.hidden_size(),
            EmbedderBackend::Stub => self.config.stub_dim,
        }
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub)
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &EmbedderConfig {
        &self.config
    }
}

impl TextEncoder for BertEmbedder {
    fn encode(&self, text: &str, is_query: bool) -> Result<Vec<f32>, EmbeddingError> {
        self.embed(text, is_query)
    }
}

fn normalize(mut embedding: Vec<f32>) -> Vec<f32> {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in &mut embedding {
            *x /= norm;
        }
    }

    embedding
}
