use crate::error::TranslationError;
use anyhow::{bail, Result};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Endpoints tried in order when no `TRANSLATE_ENDPOINTS` override is set
pub const DEFAULT_ENDPOINTS: &[&str] = &[
    "https://translate.googleapis.com/translate_a/single?client=gtx&sl={sl}&tl={tl}&dt=t&q={q}",
    "https://clients5.google.com/translate_a/single?client=dict-chrome-ex&sl={sl}&tl={tl}&dt=t&q={q}",
    "https://translate.google.com/translate_a/single?client=webapp&sl={sl}&tl={tl}&dt=t&q={q}",
];

/// The public endpoints reject requests without a recognizable browser signature
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// A remote translation endpoint described by a URL template.
///
/// The template carries `{sl}`, `{tl}` and `{q}` placeholders for the source
/// language, target language and percent-encoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    template: String,
}

impl ProviderEndpoint {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        let template = template.trim();
        if !template.starts_with("http://") && !template.starts_with("https://") {
            bail!("Endpoint template must be an http(s) URL: {}", template);
        }
        if !template.contains("{q}") {
            bail!("Endpoint template is missing the {{q}} placeholder: {}", template);
        }
        Ok(Self {
            template: template.to_string(),
        })
    }

    pub fn defaults() -> Vec<ProviderEndpoint> {
        DEFAULT_ENDPOINTS
            .iter()
            .map(|t| ProviderEndpoint {
                template: (*t).to_string(),
            })
            .collect()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Short label for logs: scheme, host and path without the query
    pub fn label(&self) -> &str {
        self.template
            .split_once('?')
            .map(|(base, _)| base)
            .unwrap_or(&self.template)
    }

    pub fn build_url(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        self.template
            .replace("{sl}", &urlencoding::encode(source_lang))
            .replace("{tl}", &urlencoding::encode(target_lang))
            .replace("{q}", &urlencoding::encode(text))
    }
}

/// Settings shared by every endpoint request
#[derive(Debug, Clone)]
pub struct RequestSettings {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Issue a single GET against one endpoint and extract the translated text.
///
/// No retries: the caller moves on to the next endpoint on any error.
pub async fn fetch_translation(
    client: &reqwest::Client,
    endpoint: &ProviderEndpoint,
    settings: &RequestSettings,
    text: &str,
    source_lang: &str,
    target_lang: &str,
) -> Result<String, TranslationError> {
    let url = endpoint.build_url(text, source_lang, target_lang);
    debug!("Requesting translation from {}", endpoint.label());

    let transport = |source| TranslationError::Transport {
        endpoint: endpoint.label().to_string(),
        source,
    };

    let response = client
        .get(&url)
        .header(reqwest::header::USER_AGENT, &settings.user_agent)
        .timeout(settings.timeout)
        .send()
        .await
        .map_err(transport)?;

    if !response.status().is_success() {
        return Err(TranslationError::HttpStatus {
            endpoint: endpoint.label().to_string(),
            status: response.status(),
        });
    }

    let body = response.text().await.map_err(transport)?;
    extract_translation(endpoint.label(), &body)
}

/// Concatenate the segment texts of a `[[["seg", ...], ...], ...]` response.
///
/// Every segment must be a non-empty array whose first item is a string;
/// anything else makes the whole response invalid.
pub fn extract_translation(endpoint: &str, body: &str) -> Result<String, TranslationError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| TranslationError::malformed(endpoint, format!("invalid JSON: {}", e)))?;

    let segments = json
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::malformed(endpoint, "missing segment array at index 0"))?;

    if segments.is_empty() {
        return Err(TranslationError::malformed(endpoint, "segment array is empty"));
    }

    let mut translated = String::new();
    for (i, segment) in segments.iter().enumerate() {
        let piece = segment
            .as_array()
            .and_then(|items| items.first())
            .and_then(Value::as_str)
            .ok_or_else(|| {
                TranslationError::malformed(endpoint, format!("segment {} has no text", i))
            })?;
        translated.push_str(piece);
    }

    Ok(translated)
}
