//! Text-generation collaborator
//!
//! The classifier only needs "instruction in, text out". Preparation is a
//! separate fallible step so the classifier can run it exactly once before
//! dispatching any request.

use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ClassifyError;

pub(crate) const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub(crate) const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub(crate) const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub(crate) const DEFAULT_MAX_TOKENS: u32 = 4096;
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A ready-to-use handle, shared by all in-flight requests
pub(crate) trait TextGenerator: Send + Sync {
    fn generate(&self, instruction: &str) -> Result<String, ClassifyError>;
}

/// One-time setup producing a `TextGenerator`
pub(crate) trait GeneratorProvider: Send + Sync {
    fn prepare(&self) -> Result<Arc<dyn TextGenerator>, ClassifyError>;
}

#[derive(Debug, Clone)]
pub(crate) struct ProviderSettings {
    pub(crate) model: String,
    pub(crate) base_url: String,
    /// Name of the environment variable holding the API key
    pub(crate) api_key_env: String,
    pub(crate) timeout: Duration,
    pub(crate) max_tokens: u32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Anthropic Messages API over a blocking `ureq` agent
pub(crate) struct AnthropicProvider {
    settings: ProviderSettings,
}

impl AnthropicProvider {
    pub(crate) fn new(settings: ProviderSettings) -> Self {
        Self { settings }
    }
}

impl GeneratorProvider for AnthropicProvider {
    fn prepare(&self) -> Result<Arc<dyn TextGenerator>, ClassifyError> {
        let s = &self.settings;
        let api_key = std::env::var(&s.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ClassifyError::Setup(format!("environment variable {} is not set", s.api_key_env))
            })?;

        let base_url = s.base_url.trim_end_matches('/');
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(ClassifyError::Setup(format!(
                "invalid base URL \"{}\"",
                s.base_url
            )));
        }
        if s.model.trim().is_empty() {
            return Err(ClassifyError::Setup("no model configured".to_string()));
        }

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(s.timeout))
            .http_status_as_error(false)
            .build()
            .into();

        tracing::debug!(model = %s.model, %base_url, "classifier provider prepared");

        Ok(Arc::new(AnthropicClient {
            agent,
            api_key,
            url: format!("{base_url}/v1/messages"),
            model: s.model.clone(),
            max_tokens: s.max_tokens,
        }))
    }
}

struct AnthropicClient {
    agent: ureq::Agent,
    api_key: String,
    url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    fn request_body(&self, instruction: &str) -> Value {
        json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{ "role": "user", "content": instruction }],
        })
    }
}

impl TextGenerator for AnthropicClient {
    fn generate(&self, instruction: &str) -> Result<String, ClassifyError> {
        let mut response = self
            .agent
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send_json(self.request_body(instruction))
            .map_err(|e| ClassifyError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(ClassifyError::Request(format!("HTTP {status}: {body}")));
        }

        let reply: Value = response
            .body_mut()
            .read_json()
            .map_err(|e| ClassifyError::Request(format!("failed to read response: {e}")))?;
        Ok(reply_text(&reply))
    }
}

/// Concatenated `text` blocks of a Messages API reply
fn reply_text(reply: &Value) -> String {
    reply
        .get("content")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}
