use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use addrkit_core::record::{REASON_EMPTY_INPUT, REASON_FAILURE, REASON_NO_ADDRESS};
use addrkit_core::{
    AddressRecord, EntityBackend, Error, ExtractResponse, RegionStore, ResultCode,
};
use addrkit_region::AddressCompleter;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::models::DEFAULT_MODEL;
use crate::normalize::NormalizerRegistry;

/// End-to-end extraction: backend inference, normalization, region
/// reconciliation and the response envelope.
///
/// All collaborators are handed in at construction; the pipeline holds no
/// mutable state and can serve concurrent requests.
pub struct ExtractionPipeline {
    backends: HashMap<String, Arc<dyn EntityBackend>>,
    normalizers: NormalizerRegistry,
    completer: Option<AddressCompleter<Arc<dyn RegionStore>>>,
    default_model: String,
}

impl ExtractionPipeline {
    #[must_use]
    pub fn new(normalizers: NormalizerRegistry) -> Self {
        Self {
            backends: HashMap::new(),
            normalizers,
            completer: None,
            default_model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Register a backend under its own model id.
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn EntityBackend>) -> Self {
        self.backends.insert(backend.model_id().to_string(), backend);
        self
    }

    #[must_use]
    pub fn with_completer(mut self, completer: AddressCompleter<Arc<dyn RegionStore>>) -> Self {
        self.completer = Some(completer);
        self
    }

    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    #[must_use]
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Model ids that have both a backend and a normalizer, sorted.
    #[must_use]
    pub fn models(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .backends
            .keys()
            .map(String::as_str)
            .filter(|id| self.normalizers.contains(id))
            .collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub const fn has_completer(&self) -> bool {
        self.completer.is_some()
    }

    /// Extract a structured address from `text`.
    ///
    /// Input and backend problems are reported inside the envelope (codes
    /// 101, 102 and 103). Only a model without a backend or normalizer is
    /// returned as `Err`.
    pub async fn extract(
        &self,
        text: &str,
        model: Option<&str>,
        schema: Option<&Value>,
    ) -> addrkit_core::Result<ExtractResponse> {
        let model = model.unwrap_or(self.default_model.as_str());

        if text.trim().is_empty() {
            return Ok(ExtractResponse::failure(
                ResultCode::EmptyInput,
                REASON_EMPTY_INPUT,
                AddressRecord::default(),
            ));
        }

        let (Some(backend), Some(normalizer)) =
            (self.backends.get(model), self.normalizers.get(model))
        else {
            return Err(Error::UnsupportedModel(model.to_string()));
        };

        let text_chars = text.chars().count();
        let started = Instant::now();
        let output = match backend.infer(text, schema).await {
            Ok(output) => {
                info!(
                    "Inference done: model={model} chars={text_chars} duration_ms={}",
                    started.elapsed().as_millis()
                );
                output
            }
            Err(e) => {
                error!(
                    "Inference failed: model={model} chars={text_chars} duration_ms={} error={e:#}",
                    started.elapsed().as_millis()
                );
                return Ok(internal_error(&Error::Backend(e)));
            }
        };

        let record = match normalizer.normalize(&output, text) {
            Ok(record) => record,
            Err(e) => {
                error!("Failed to normalize {model} output: {e}");
                return Ok(internal_error(&e));
            }
        };
        debug!("Normalized record: {record:?}");

        if record.has_no_address() {
            return Ok(ExtractResponse::failure(
                ResultCode::NoAddress,
                REASON_NO_ADDRESS,
                record,
            ));
        }

        let record = match &self.completer {
            Some(completer) => completer.complete(&record).await,
            None => record,
        };

        Ok(ExtractResponse::success(record))
    }
}

fn internal_error(err: &Error) -> ExtractResponse {
    ExtractResponse::failure(
        ResultCode::InternalError,
        format!("{REASON_FAILURE}: {err}"),
        AddressRecord::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use addrkit_core::EntityMappingConfig;
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedBackend {
        model: &'static str,
        output: anyhow::Result<Value>,
    }

    #[async_trait]
    impl EntityBackend for FixedBackend {
        async fn infer(&self, _text: &str, _schema: Option<&Value>) -> anyhow::Result<Value> {
            match &self.output {
                Ok(value) => Ok(value.clone()),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }

        fn model_id(&self) -> &str {
            self.model
        }
    }

    fn pipeline(output: anyhow::Result<Value>) -> ExtractionPipeline {
        ExtractionPipeline::new(NormalizerRegistry::with_defaults(
            EntityMappingConfig::default(),
        ))
        .with_backend(Arc::new(FixedBackend {
            model: "qwen-flash",
            output,
        }))
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_empty_input_is_101() {
        let resp = pipeline(Ok(json!({})))
            .extract("  ", None, None)
            .await
            .expect("pipeline should respond");
        assert!(!resp.success);
        assert_eq!(resp.result_code, "101");
        assert_eq!(resp.data, AddressRecord::default());
    }

    #[tokio::test]
    async fn test_unknown_model_is_error() {
        let result = pipeline(Ok(json!({})))
            .extract("广东省", Some("chinese-macbert-base"), None)
            .await;
        assert!(matches!(result, Err(Error::UnsupportedModel(m)) if m == "chinese-macbert-base"));
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_backend_failure_is_103() {
        let resp = pipeline(Err(anyhow::anyhow!("timeout")))
            .extract("广东省深圳市", None, None)
            .await
            .expect("pipeline should respond");
        assert_eq!(resp.result_code, "103");
        assert!(resp.reason.contains("timeout"));
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_contact_only_is_102() {
        let resp = pipeline(Ok(json!({"Mobile": "18273778575", "Name": "黄大大"})))
            .extract("黄大大 18273778575", None, None)
            .await
            .expect("pipeline should respond");
        assert_eq!(resp.result_code, "102");
        assert_eq!(resp.data.mobile, "18273778575");
        assert_eq!(resp.data.name, "黄大大");
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_success_envelope() {
        let resp = pipeline(Ok(json!({"ProvinceName": "广东省", "CityName": "深圳市"})))
            .extract("广东省深圳市", None, None)
            .await
            .expect("pipeline should respond");
        assert!(resp.success);
        assert_eq!(resp.result_code, "100");
        assert_eq!(resp.data.city_name, "深圳市");
    }

    #[test]
    fn test_models_need_backend_and_normalizer() {
        let p = pipeline(Ok(json!({})));
        assert_eq!(p.models(), vec!["qwen-flash"]);
        assert!(!p.has_completer());
    }
}
