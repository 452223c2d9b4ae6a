use std::sync::Arc;

use addrkit_core::{AddressRecord, ChatMessage, EntityBackend, LLMProvider};
use addrkit_extract::decompose;
use addrkit_extract::models::QWEN_FLASH;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

const CORRECTION_PROMPT: &str = "你是中文快递地址校对助手。请修正用户给出的地址中的错别字、\
同音字和明显的书写错误，保持原有的行政区划和门牌信息不变。\
只输出修正后的地址本身，不要添加任何解释、标点包裹或前缀。";

const COMPLETION_PROMPT: &str = "你是中文地址结构化助手。请把用户给出的地址拆分为省、市、区县、\
街道乡镇和详细地址，并根据常识补全缺失的上级行政区。\
只输出一个 JSON 对象，键为 ProvinceName、CityName、ExpAreaName、StreetName、Address，\
无法确定的字段填空字符串，不要输出其他内容。";

/// Extraction backend driven by a chat model.
///
/// The phone and name are cut out locally; only the address part is sent to
/// the model, first for correction and then for structured completion. The
/// output uses the record's own field names.
pub struct LlmAddressBackend {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

impl LlmAddressBackend {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        let model = provider.get_default_model().to_string();
        Self { provider, model }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn ask(&self, system: &str, user: &str) -> anyhow::Result<String> {
        let messages = [ChatMessage::system(system), ChatMessage::user(user)];
        let response = self.provider.chat(&messages, &self.model).await?;
        if let Some(usage) = &response.usage {
            debug!(
                "LLM usage: prompt={} completion={} total={}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }
        Ok(response.content)
    }

    /// Corrected address, or the input itself when the model fails or
    /// returns nothing.
    async fn correct(&self, address: &str) -> String {
        match self.ask(CORRECTION_PROMPT, address).await {
            Ok(reply) => {
                let reply = reply.trim();
                if reply.is_empty() {
                    warn!("Empty correction reply, keeping original address");
                    address.to_string()
                } else {
                    if reply != address {
                        info!("Address corrected: {address} -> {reply}");
                    }
                    reply.to_string()
                }
            }
            Err(e) => {
                warn!("Address correction failed, keeping original: {e:#}");
                address.to_string()
            }
        }
    }

    /// Structured address block; empty when the model fails or its reply
    /// holds no JSON object.
    async fn complete(&self, address: &str) -> AddressRecord {
        let reply = match self.ask(COMPLETION_PROMPT, address).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Address completion failed: {e:#}");
                return AddressRecord::default();
            }
        };

        let Some(value) = extract_json_object(&reply) else {
            warn!("No JSON object in completion reply: {reply}");
            return AddressRecord::default();
        };

        match serde_json::from_value::<AddressRecord>(value) {
            Ok(record) => record,
            Err(e) => {
                warn!("Unusable completion reply: {e}");
                AddressRecord::default()
            }
        }
    }
}

#[async_trait]
impl EntityBackend for LlmAddressBackend {
    async fn infer(&self, text: &str, _schema: Option<&Value>) -> anyhow::Result<Value> {
        let parts = decompose(text);

        let mut record = if parts.address.is_empty() {
            debug!("No address part in input");
            AddressRecord::default()
        } else {
            let corrected = self.correct(&parts.address).await;
            self.complete(&corrected).await
        };

        record.mobile = parts.phone;
        record.name = parts.person_name;
        Ok(serde_json::to_value(record)?)
    }

    fn model_id(&self) -> &str {
        QWEN_FLASH
    }
}

/// Pull a JSON object out of a chat reply.
///
/// The whole reply is tried first; otherwise the text between the first `{`
/// and the last `}` is parsed, which covers fenced code blocks and leading
/// prose.
#[must_use]
pub fn extract_json_object(reply: &str) -> Option<Value> {
    let reply = reply.trim();
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(reply) {
        return Some(value);
    }

    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&reply[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use addrkit_core::LLMResponse;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays scripted replies in order.
    struct ScriptedProvider {
        replies: Mutex<VecDeque<anyhow::Result<String>>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<anyhow::Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn chat(&self, _messages: &[ChatMessage], _model: &str) -> anyhow::Result<LLMResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.replies.lock().ok().and_then(|mut q| q.pop_front());
            let content = next.unwrap_or_else(|| Err(anyhow::anyhow!("no scripted reply")))?;
            Ok(LLMResponse {
                content,
                usage: None,
            })
        }

        fn get_default_model(&self) -> &str {
            "qwen-flash"
        }
    }

    const INPUT: &str = "广东省深圳市龙岗区坂田街道长坑路西2巷2号202 黄大大 18273778575";

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn corrected_and_completed_address() {
        let provider = ScriptedProvider::new(vec![
            Ok("广东省深圳市龙岗区坂田街道长坑路西2巷2号202".to_string()),
            Ok("```json\n{\"ProvinceName\": \"广东省\", \"CityName\": \"深圳市\", \
                \"ExpAreaName\": \"龙岗区\", \"StreetName\": \"坂田街道\", \
                \"Address\": \"长坑路西2巷2号202\"}\n```"
                .to_string()),
        ]);
        let backend = LlmAddressBackend::new(provider.clone());

        let output = backend.infer(INPUT, None).await.expect("infer should succeed");

        assert_eq!(output["ProvinceName"], "广东省");
        assert_eq!(output["StreetName"], "坂田街道");
        assert_eq!(output["Mobile"], "18273778575");
        assert_eq!(output["Name"], "黄大大");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn failures_degrade_to_contact_only() {
        let provider = ScriptedProvider::new(vec![
            Err(anyhow::anyhow!("timeout")),
            Ok("抱歉，我无法处理".to_string()),
        ]);
        let backend = LlmAddressBackend::new(provider);

        let output = backend.infer(INPUT, None).await.expect("infer should succeed");

        assert_eq!(output["ProvinceName"], "");
        assert_eq!(output["Address"], "");
        assert_eq!(output["Mobile"], "18273778575");
        assert_eq!(output["Name"], "黄大大");
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn no_address_skips_the_model() {
        let provider = ScriptedProvider::new(vec![]);
        let backend = LlmAddressBackend::new(provider.clone());

        let output = backend
            .infer("黄大大 18273778575", None)
            .await
            .expect("infer should succeed");

        assert_eq!(output["Mobile"], "18273778575");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn json_object_extraction() {
        assert!(extract_json_object("{\"CityName\": \"深圳市\"}").is_some());
        assert_eq!(
            extract_json_object("结果如下：{\"CityName\": \"深圳市\"} 以上")
                .and_then(|v| v["CityName"].as_str().map(ToString::to_string)),
            Some("深圳市".to_string())
        );
        assert!(extract_json_object("[1, 2]").is_none());
        assert!(extract_json_object("} 没有 {").is_none());
        assert!(extract_json_object("").is_none());
    }
}
