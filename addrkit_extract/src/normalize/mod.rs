//! Per-backend conversion of raw model output into [`AddressRecord`]s.
//!
//! Every backend has its own output shape. A [`ResultNormalizer`] for each is
//! registered under the model id in a [`NormalizerRegistry`]; request
//! handling only ever looks normalizers up by id.

mod geo;
mod ner;
mod structured;

use std::collections::HashMap;
use std::sync::Arc;

use addrkit_core::record::REASON_FAILURE;
use addrkit_core::{EntityMappingConfig, Error, ResultNormalizer};
use serde_json::Value;

pub use geo::{GeoScheme, GeoTagNormalizer};
pub use ner::NerNormalizer;
pub use structured::StructuredNormalizer;

use crate::models;

/// Normalizers keyed by model id.
#[derive(Clone, Default)]
pub struct NormalizerRegistry {
    normalizers: HashMap<String, Arc<dyn ResultNormalizer>>,
}

impl NormalizerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry covering every built-in model. `mapping` drives the NER
    /// classifier.
    #[must_use]
    pub fn with_defaults(mapping: EntityMappingConfig) -> Self {
        let ner: Arc<dyn ResultNormalizer> = Arc::new(NerNormalizer::new(mapping));
        let mut registry = Self::new();
        registry.register(models::QWEN_FLASH, Arc::new(StructuredNormalizer));
        registry.register(models::MACBERT, Arc::clone(&ner));
        registry.register(models::SIAMESE_UIE, ner);
        registry.register(
            models::MGEO_COMPOSITION,
            Arc::new(GeoTagNormalizer::new(GeoScheme::Composition)),
        );
        registry.register(
            models::MGEO_TAGGING,
            Arc::new(GeoTagNormalizer::new(GeoScheme::Tagging)),
        );
        registry
    }

    pub fn register(&mut self, model: impl Into<String>, normalizer: Arc<dyn ResultNormalizer>) {
        self.normalizers.insert(model.into(), normalizer);
    }

    #[must_use]
    pub fn get(&self, model: &str) -> Option<Arc<dyn ResultNormalizer>> {
        self.normalizers.get(model).cloned()
    }

    #[must_use]
    pub fn contains(&self, model: &str) -> bool {
        self.normalizers.contains_key(model)
    }

    /// Registered model ids, sorted.
    #[must_use]
    pub fn models(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.normalizers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

/// Backend output with any response envelope removed.
pub(crate) struct Unwrapped<'a> {
    pub payload: &'a Value,
    /// Text span offsets refer to: the request text, or the output's own
    /// `text` field when the request text is blank.
    pub text: &'a str,
}

/// Strip an `{EBusinessID, Data, ...}` envelope and surface backend errors.
///
/// An `error` key or `Success: false` is reported as [`Error::Backend`].
pub(crate) fn unwrap_output<'a>(
    output: &'a Value,
    request_text: &'a str,
) -> addrkit_core::Result<Unwrapped<'a>> {
    if !output.is_object() {
        return Err(Error::MalformedOutput(format!(
            "expected a JSON object, got {output}"
        )));
    }

    if let Some(error) = output.get("error") {
        let message = error
            .as_str()
            .map_or_else(|| error.to_string(), ToString::to_string);
        return Err(Error::Backend(anyhow::anyhow!(message)));
    }

    let payload = match (output.get("EBusinessID"), output.get("Data")) {
        (Some(_), Some(data)) => {
            if output.get("Success").and_then(Value::as_bool) == Some(false) {
                let reason = output
                    .get("Reason")
                    .and_then(Value::as_str)
                    .unwrap_or(REASON_FAILURE);
                return Err(Error::Backend(anyhow::anyhow!(reason.to_string())));
            }
            data
        }
        _ => output,
    };

    let text = if request_text.trim().is_empty() {
        payload.get("text").and_then(Value::as_str).unwrap_or(request_text)
    } else {
        request_text
    };

    Ok(Unwrapped { payload, text })
}
