use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;
use std::sync::Arc;

/// Checkpoints exported from `*ForSequenceClassification` nest the encoder under a prefix.
fn load_bert(vb: VarBuilder, config: &Config) -> Result<BertModel> {
    if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
        BertModel::load(vb.pp("bert"), config)
    } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
        BertModel::load(vb.pp("roberta"), config)
    } else {
        BertModel::load(vb, config)
    }
}

fn open_checkpoint(model_dir: &Path, device: &Device) -> Result<(VarBuilder<'static>, Config)> {
    let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
    let config: Config = serde_json::from_str(&config_content)
        .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

    let weights_path = model_dir.join("model.safetensors");
    let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

    Ok((vb, config))
}

struct BertForSequenceClassificationImpl {
    bert: BertModel,
    classifier: Linear,
}

impl BertForSequenceClassificationImpl {
    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;
        self.classifier.forward(&cls_token)
    }
}

/// Cross-encoder head: one relevance logit per input pair.
#[derive(Clone)]
pub struct BertClassifier(Arc<BertForSequenceClassificationImpl>);

impl BertClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let (vb, config) = open_checkpoint(model_dir.as_ref(), device)?;

        let bert = load_bert(vb.clone(), &config)?;
        let classifier = candle_nn::linear(config.hidden_size, 1, vb.pp("classifier"))?;

        Ok(Self(Arc::new(BertForSequenceClassificationImpl {
            bert,
            classifier,
        })))
    }

    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        self.0.forward(input_ids, token_type_ids, attention_mask)
    }
}

/// Bi-encoder: the CLS hidden state of the last layer is the sentence embedding.
#[derive(Clone)]
pub struct BertEncoder {
    bert: Arc<BertModel>,
    hidden_size: usize,
}

impl BertEncoder {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let (vb, config) = open_checkpoint(model_dir.as_ref(), device)?;
        let hidden_size = config.hidden_size;
        let bert = load_bert(vb, &config)?;

        Ok(Self {
            bert: Arc::new(bert),
            hidden_size,
        })
    }

    /// Returns the `[hidden_size]` CLS vector for a single-sequence batch.
    pub fn forward_cls(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        output.i((0, 0))
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }
}
