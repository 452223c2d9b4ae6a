use std::time::Duration;

use addrkit_core::EntityBackend;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for a model-serving endpoint hosting one NER or geographic
/// tagging model.
///
/// The endpoint receives `{"text", "model", "schema"?}` and its JSON reply is
/// handed to the matching normalizer unchanged.
pub struct HttpTaggerBackend {
    client: Client,
    endpoint: String,
    model: String,
}

impl HttpTaggerBackend {
    pub fn new(model: impl Into<String>, endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let model = model.into();
        let endpoint = endpoint.into();
        info!("Creating HttpTaggerBackend: model={model} endpoint={endpoint}");
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint,
            model,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn request_body(model: &str, text: &str, schema: Option<&Value>) -> Value {
    let mut body = json!({
        "text": text,
        "model": model,
    });
    if let Some(schema) = schema {
        body["schema"] = schema.clone();
    }
    body
}

#[async_trait]
impl EntityBackend for HttpTaggerBackend {
    async fn infer(&self, text: &str, schema: Option<&Value>) -> anyhow::Result<Value> {
        let body = request_body(&self.model, text, schema);
        debug!("Posting to tagger {}: {body}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(response)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_without_schema() {
        let body = request_body("chinese-macbert-base", "广东省深圳市", None);
        assert_eq!(body["text"], "广东省深圳市");
        assert_eq!(body["model"], "chinese-macbert-base");
        assert!(body.get("schema").is_none());
    }

    #[test]
    fn body_forwards_schema() {
        let schema = json!({"地理位置": null, "人物": null});
        let body = request_body("nlp_structbert_siamese-uie_chinese-base", "黄大大", Some(&schema));
        assert_eq!(body["schema"], schema);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn backend_serves_its_model() {
        let backend = HttpTaggerBackend::new("chinese-macbert-base", "http://127.0.0.1:9000/ner")
            .expect("client should build");
        assert_eq!(backend.model_id(), "chinese-macbert-base");
        assert_eq!(backend.endpoint(), "http://127.0.0.1:9000/ner");
    }
}
