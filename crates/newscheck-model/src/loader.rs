//! Candle-backed model construction from a cached artifact set.

use async_trait::async_trait;
use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use newscheck_core::{ClassificationRaw, Error, RawLabel, Result};
use std::path::Path;
use std::sync::Arc;
use tokenizers::Tokenizer;

/// Device to run inference on
#[derive(Debug, Clone, Copy)]
pub enum DeviceType {
    /// CPU inference (always available)
    Cpu,
    /// CUDA GPU inference (if available)
    Cuda(usize),
    /// Metal (Apple Silicon)
    Metal(usize),
}

fn create_device(device_type: DeviceType) -> Result<Device> {
    match device_type {
        DeviceType::Cpu => Ok(Device::Cpu),
        DeviceType::Cuda(idx) => Device::new_cuda(idx)
            .map_err(|e| Error::classifier(format!("failed to create CUDA device: {e}"))),
        DeviceType::Metal(idx) => Device::new_metal(idx)
            .map_err(|e| Error::classifier(format!("failed to create Metal device: {e}"))),
    }
}

/// Pluggable inference backend.
///
/// The forward-pass math lives behind this seam so the lifecycle manager
/// and inference engine never couple to a specific architecture. `predict`
/// is synchronous by contract; callers run it on a blocking pool.
pub trait ClassifierBackend: Send + Sync {
    /// Classify normalized text, returning the predicted label and the
    /// probability mass the model assigned to that label.
    fn predict(&self, text: &str) -> Result<ClassificationRaw>;
}

/// Constructs a [`ClassifierBackend`] from a local artifact directory.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, dir: &Path) -> Result<Arc<dyn ClassifierBackend>>;
}

/// Fine-tuned BERT sequence classifier loaded with Candle.
pub struct VeracityModel {
    bert: BertModel,
    pooler: Linear,
    classifier: Linear,
    tokenizer: Tokenizer,
    device: Device,
    max_seq_len: usize,
}

impl VeracityModel {
    /// Binary head: class 0 = Fake, class 1 = Real
    const NUM_LABELS: usize = 2;

    /// Build the model from `config.json`, `tokenizer.json`, and the
    /// weight file in `dir`.
    pub fn from_dir(dir: &Path, device_type: DeviceType) -> Result<Self> {
        let config_path = dir.join("config.json");
        let config_str = std::fs::read_to_string(&config_path).map_err(|e| {
            Error::artifact(format!("failed to read {}: {e}", config_path.display()))
        })?;
        let config: BertConfig = serde_json::from_str(&config_str)
            .map_err(|e| Error::artifact(format!("failed to parse model config: {e}")))?;

        let tokenizer_path = dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::artifact(format!("failed to load tokenizer: {e}")))?;

        let safetensors = dir.join("model.safetensors");
        let pytorch_bin = dir.join("pytorch_model.bin");
        let device = create_device(device_type)?;

        let vb = if safetensors.exists() {
            unsafe {
                VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, &device)
                    .map_err(|e| Error::artifact(format!("failed to load SafeTensors: {e}")))?
            }
        } else if pytorch_bin.exists() {
            VarBuilder::from_pth(&pytorch_bin, DType::F32, &device)
                .map_err(|e| Error::artifact(format!("failed to load PyTorch weights: {e}")))?
        } else {
            return Err(Error::artifact(format!(
                "no model weights found under {}",
                dir.display()
            )));
        };

        let bert = BertModel::load(vb.pp("bert"), &config)
            .map_err(|e| Error::classifier(format!("failed to build BERT graph: {e}")))?;
        let pooler = candle_nn::linear(
            config.hidden_size,
            config.hidden_size,
            vb.pp("bert").pp("pooler").pp("dense"),
        )
        .map_err(|e| Error::classifier(format!("failed to load pooler weights: {e}")))?;
        let classifier =
            candle_nn::linear(config.hidden_size, Self::NUM_LABELS, vb.pp("classifier"))
                .map_err(|e| Error::classifier(format!("failed to load classifier head: {e}")))?;

        let max_seq_len = config.max_position_embeddings;

        Ok(Self {
            bert,
            pooler,
            classifier,
            tokenizer,
            device,
            max_seq_len,
        })
    }
}

fn forward_err(e: candle_core::Error) -> Error {
    Error::classifier(format!("forward pass failed: {e}"))
}

impl ClassifierBackend for VeracityModel {
    fn predict(&self, text: &str) -> Result<ClassificationRaw> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::classifier(format!("tokenization failed: {e}")))?;

        // Truncate from the end: article-length overflow is routine and
        // must not reject the request.
        let mut ids = encoding.get_ids().to_vec();
        ids.truncate(self.max_seq_len);
        let mut type_ids = encoding.get_type_ids().to_vec();
        type_ids.truncate(self.max_seq_len);
        let mut attention = encoding.get_attention_mask().to_vec();
        attention.truncate(self.max_seq_len);

        let input_ids = Tensor::new(&ids[..], &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(forward_err)?;
        let token_type_ids = Tensor::new(&type_ids[..], &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(forward_err)?;
        let attention_mask = Tensor::new(&attention[..], &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(forward_err)?;

        // BERT -> pooler (CLS token, tanh) -> classification head -> softmax
        let sequence_output = self
            .bert
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(forward_err)?;
        let cls_token = sequence_output.i((.., 0)).map_err(forward_err)?;
        let pooled = self
            .pooler
            .forward(&cls_token)
            .and_then(|t| t.tanh())
            .map_err(forward_err)?;
        let logits = self.classifier.forward(&pooled).map_err(forward_err)?;
        let probabilities = candle_nn::ops::softmax(&logits, 1)
            .and_then(|t| t.squeeze(0))
            .map_err(forward_err)?;
        let probabilities = probabilities.to_vec1::<f32>().map_err(forward_err)?;

        let (class_index, probability) = probabilities
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or_else(|| Error::classifier("model produced no class probabilities"))?;

        let label = RawLabel::from_class_index(class_index)
            .ok_or_else(|| Error::classifier(format!("unexpected class index {class_index}")))?;

        Ok(ClassificationRaw::new(label, probability))
    }
}

/// Loads the Candle backend off the async runtime, on the blocking pool.
pub struct CandleModelLoader {
    device: DeviceType,
}

impl CandleModelLoader {
    pub fn new(device: DeviceType) -> Self {
        Self { device }
    }
}

#[async_trait]
impl ModelLoader for CandleModelLoader {
    async fn load(&self, dir: &Path) -> Result<Arc<dyn ClassifierBackend>> {
        let dir = dir.to_path_buf();
        let device = self.device;
        let model = tokio::task::spawn_blocking(move || VeracityModel::from_dir(&dir, device))
            .await
            .map_err(|e| Error::classifier(format!("model load task failed: {e}")))??;
        Ok(Arc::new(model))
    }
}
