use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};

use super::error::EmbeddingError;

/// Loads `tokenizer.json` from a model directory with truncation at `max_len` tokens.
///
/// Over-long inputs are truncated rather than rejected; both BERT models have a fixed
/// position-embedding table.
pub fn load_tokenizer(model_dir: &Path, max_len: usize) -> Result<Tokenizer, EmbeddingError> {
    let tokenizer_path = model_dir.join("tokenizer.json");
    if !tokenizer_path.exists() {
        return Err(EmbeddingError::ModelNotFound {
            path: tokenizer_path,
        });
    }

    let mut tokenizer =
        Tokenizer::from_file(&tokenizer_path).map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("Failed to load tokenizer: {}", e),
        })?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("Failed to configure truncation: {}", e),
        })?;

    Ok(tokenizer)
}

/// Checks that `model_dir` holds the files a candle BERT checkpoint needs.
pub fn check_model_dir(model_dir: &Path) -> Result<(), EmbeddingError> {
    if !model_dir.exists() {
        return Err(EmbeddingError::ModelNotFound {
            path: model_dir.to_path_buf(),
        });
    }

    for file in ["config.json", "model.safetensors", "tokenizer.json"] {
        if !model_dir.join(file).exists() {
            return Err(EmbeddingError::ModelLoadFailed {
                reason: format!("Missing {} in {}", file, model_dir.display()),
            });
        }
    }

    Ok(())
}
