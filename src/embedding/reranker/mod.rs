pub mod config;
pub mod error;


pub use config::{MAX_SEQ_LEN, RerankerConfig};
pub use error::RerankerError;

use crate::embedding::PairScorer;
use crate::embedding::bert::BertClassifier;
use candle_core::Tensor;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::device::select_device;
use crate::embedding::utils::{check_model_dir, load_tokenizer};

/// Lowest and highest pseudo-logit the stub scorer produces; real cross-encoders
/// mostly land in the same band.
const STUB_LOGIT_RANGE: (f32, f32) = (-10.0, 2.0);

pub struct Reranker {
    device: candle_core::Device,
    config: RerankerConfig,
    model: Option<BertClassifier>,
    tokenizer: Option<Tokenizer>,
}

impl std::fmt::Debug for Reranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reranker")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .finish()
    }
}

impl Reranker {
    pub fn load(config: RerankerConfig) -> Result<Self, RerankerError> {
        if let Err(msg) = config.validate() {
            return Err(RerankerError::InvalidConfig { reason: msg });
        }

        let device = select_device("reranker");
        debug!(?device, "Selected compute device for reranker");

        let Some(model_path) = config.model_path.clone() else {
            warn!("No reranker model path configured, operating in stub mode");
            return Ok(Self {
                device,
                config,
                model: None,
                tokenizer: None,
            });
        };

        check_model_dir(&model_path)?;

        info!(model_path = %model_path.display(), "Loading reranker model");

        let model = BertClassifier::load(&model_path, &device).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {}", e),
            }
        })?;

        let tokenizer = load_tokenizer(&model_path, config.max_seq_len)?;

        info!(max_seq_len = config.max_seq_len, "Reranker model loaded successfully");

        Ok(Self {
            device,
            config,
            model: Some(model),
            tokenizer: Some(tokenizer),
        })
    }

    pub fn stub() -> Result<Self, RerankerError> {
        Self::load(RerankerConfig::stub())
    }

    /// Raw cross-encoder logit for the pair; higher means more related.
    pub fn score(&self, query: &str, snippet: &str) -> Result<f32, RerankerError> {
        debug!(
            query_len = query.len(),
            snippet_len = snippet.len(),
            model_loaded = self.is_model_loaded(),
            "Scoring query-snippet pair"
        );

        if let (Some(model), Some(tokenizer)) = (&self.model, &self.tokenizer) {
            let tokens = tokenizer.encode((query, snippet), true).map_err(|e| {
                RerankerError::TokenizationFailed {
                    reason: e.to_string(),
                }
            })?;

            let token_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;
            let type_ids = Tensor::new(tokens.get_type_ids(), &self.device)?.unsqueeze(0)?;
            let attention_mask =
                Tensor::new(tokens.get_attention_mask(), &self.device)?.unsqueeze(0)?;

            let logits = model
                .forward(&token_ids, &type_ids, Some(&attention_mask))
                .map_err(|e| RerankerError::InferenceFailed {
                    reason: e.to_string(),
                })?;

            let logits = logits.flatten_all()?.to_vec1::<f32>()?;
            return logits
                .first()
                .copied()
                .ok_or_else(|| RerankerError::InferenceFailed {
                    reason: "classifier produced no logits".to_string(),
                });
        }

        let score = self.compute_placeholder_score(query, snippet);

        debug!(score = score, "Computed score (stub)");

        Ok(score)
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn config(&self) -> &RerankerConfig {
        &self.config
    }

    pub fn device(&self) -> &candle_core::Device {
        &self.device
    }

    /// Lexical-overlap stand-in for the model, spread over [`STUB_LOGIT_RANGE`].
    fn compute_placeholder_score(&self, query: &str, snippet: &str) -> f32 {
        use std::collections::HashSet;

        let stop_words: HashSet<&str> = [
            "a", "an", "the", "is", "are", "was", "were", "be", "been", "have", "has", "had",
            "do", "does", "did", "will", "would", "could", "should", "can", "to", "of", "in",
            "for", "on", "with", "at", "by", "from", "as", "into", "how", "what", "which", "who",
            "and", "but", "if", "or", "not", "this", "that", "these", "those", "it", "its",
        ]
        .into_iter()
        .collect();

        let query_lower = query.to_lowercase();
        let query_words: HashSet<&str> = query_lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty() && !stop_words.contains(w))
            .collect();

        let snippet_lower = snippet.to_lowercase();
        let snippet_words: HashSet<&str> = snippet_lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty() && !stop_words.contains(w))
            .collect();

        let (low, high) = STUB_LOGIT_RANGE;

        if query_words.is_empty() {
            return low;
        }

        let matches = query_words.intersection(&snippet_words).count();
        let recall = matches as f32 / query_words.len() as f32;

        let union = query_words.union(&snippet_words).count();
        let jaccard = if union > 0 {
            matches as f32 / union as f32
        } else {
            0.0
        };

        let base_score = (0.6 * recall + 0.4 * jaccard).clamp(0.0, 1.0);

        low + (high - low) * base_score
    }
}

impl PairScorer for Reranker {
    fn score(&self, query: &str, snippet: &str) -> Result<f32, RerankerError> {
        Reranker::score(self, query, snippet)
    }
}
