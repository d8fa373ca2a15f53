use crate::config::Config;
use crate::dictionary::Dictionary;
use crate::error::TranslationError;
use crate::provider::{self, ProviderEndpoint, RequestSettings};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A single translation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    /// ISO code or "auto"
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }
}

/// Where a translation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationSource {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
    pub source: TranslationSource,
}

impl TranslationResult {
    fn remote(text: String) -> Self {
        Self {
            text,
            source: TranslationSource::Remote,
        }
    }

    fn fallback(text: String) -> Self {
        Self {
            text,
            source: TranslationSource::Fallback,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.source == TranslationSource::Remote
    }
}

/// Text returned when nothing could translate the input
pub fn untranslated_marker(text: &str, target_lang: &str) -> String {
    format!("[{}] {}", target_lang.to_uppercase(), text)
}

/// Bounded random delay applied before the dictionary fallback answers.
///
/// Keeps a loading indicator visible for roughly as long as a real remote
/// call would take. A zero range disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackDelay {
    pub min: Duration,
    pub max: Duration,
}

impl FallbackDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Pick a delay in `[min, max]`
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
    }

    async fn wait(&self, cancel: &CancellationToken) -> Result<(), TranslationError> {
        let delay = self.sample();
        if delay.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = cancel.cancelled() => Err(TranslationError::Cancelled),
            _ = sleep(delay) => Ok(()),
        }
    }
}

impl Default for FallbackDelay {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_millis(1500))
    }
}

/// Steps of a single resolution.
///
/// `Trying(i)` moves to `Succeeded` on the first valid response or to
/// `Trying(i + 1)`; running out of endpoints leads into the fallback tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ResolutionState {
    Trying(usize),
    Succeeded(String),
    ExhaustedRemote,
    FallbackExact,
    FallbackSubstitute,
    FallbackMarker,
}

/// Resolves translation requests: remote endpoints first, then the
/// dictionary, then the untranslated marker.
///
/// Holds only read-only configuration, so one instance can serve any number
/// of concurrent requests.
#[derive(Debug, Clone)]
pub struct Resolver {
    client: reqwest::Client,
    endpoints: Vec<ProviderEndpoint>,
    settings: RequestSettings,
    dictionary: Arc<Dictionary>,
    fallback_delay: FallbackDelay,
}

impl Resolver {
    pub fn new(client: reqwest::Client, endpoints: Vec<ProviderEndpoint>) -> Self {
        Self {
            client,
            endpoints,
            settings: RequestSettings::default(),
            dictionary: Dictionary::builtin(),
            fallback_delay: FallbackDelay::default(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(client, config.provider_endpoints.clone())
            .with_settings(RequestSettings {
                user_agent: config.user_agent.clone(),
                timeout: config.provider_timeout,
            })
            .with_fallback_delay(config.fallback_delay)
    }

    pub fn with_settings(mut self, settings: RequestSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_dictionary(mut self, dictionary: Arc<Dictionary>) -> Self {
        self.dictionary = dictionary;
        self
    }

    pub fn with_fallback_delay(mut self, delay: FallbackDelay) -> Self {
        self.fallback_delay = delay;
        self
    }

    pub fn endpoints(&self) -> &[ProviderEndpoint] {
        &self.endpoints
    }

    /// Translate `text`, always producing a result.
    ///
    /// # Panics
    /// Panics if `target_lang` is blank.
    pub async fn resolve(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult {
        let request = TranslationRequest::new(text, source_lang, target_lang);
        let never = CancellationToken::new();
        match self.resolve_with_cancel(&request, &never).await {
            Ok(result) => result,
            // The token above is never cancelled
            Err(_) => TranslationResult::fallback(untranslated_marker(text, target_lang)),
        }
    }

    /// Translate a request, giving up early if `cancel` fires.
    ///
    /// The token is checked between endpoints and between tiers, and raced
    /// against in-flight requests and the fallback delay. Cancellation is the
    /// only error this returns.
    ///
    /// # Panics
    /// Panics if `request.target_lang` is blank.
    pub async fn resolve_with_cancel(
        &self,
        request: &TranslationRequest,
        cancel: &CancellationToken,
    ) -> Result<TranslationResult, TranslationError> {
        assert!(
            !request.target_lang.trim().is_empty(),
            "TranslationRequest.target_lang must not be blank"
        );

        let text = request.text.as_str();
        let target = request.target_lang.as_str();
        let mut state = ResolutionState::Trying(0);

        loop {
            if cancel.is_cancelled() {
                debug!("Resolution cancelled in state {:?}", state);
                return Err(TranslationError::Cancelled);
            }

            state = match state {
                ResolutionState::Trying(i) => match self.endpoints.get(i) {
                    Some(endpoint) => {
                        let attempt = provider::fetch_translation(
                            &self.client,
                            endpoint,
                            &self.settings,
                            text,
                            &request.source_lang,
                            target,
                        );
                        let outcome = tokio::select! {
                            _ = cancel.cancelled() => return Err(TranslationError::Cancelled),
                            outcome = attempt => outcome,
                        };
                        match outcome {
                            Ok(translated) => ResolutionState::Succeeded(translated),
                            Err(e) => {
                                warn!(
                                    "Endpoint {}/{} failed, trying next: {}",
                                    i + 1,
                                    self.endpoints.len(),
                                    e
                                );
                                ResolutionState::Trying(i + 1)
                            }
                        }
                    }
                    None => ResolutionState::ExhaustedRemote,
                },

                ResolutionState::Succeeded(translated) => {
                    debug!("Translation to {} served by remote endpoint", target);
                    return Ok(TranslationResult::remote(translated));
                }

                ResolutionState::ExhaustedRemote => {
                    if !self.endpoints.is_empty() {
                        info!(
                            "All {} endpoints failed, using dictionary fallback for {}",
                            self.endpoints.len(),
                            target
                        );
                    }
                    self.fallback_delay.wait(cancel).await?;
                    ResolutionState::FallbackExact
                }

                ResolutionState::FallbackExact => match self.dictionary.exact(target, text) {
                    Some(translated) => {
                        debug!("Exact dictionary match for {}", target);
                        return Ok(TranslationResult::fallback(translated.to_string()));
                    }
                    None => ResolutionState::FallbackSubstitute,
                },

                ResolutionState::FallbackSubstitute => {
                    match self.dictionary.substitute(target, text) {
                        Ok(translated) => {
                            debug!("Partial dictionary substitution for {}", target);
                            return Ok(TranslationResult::fallback(translated));
                        }
                        Err(e) => {
                            debug!("{}", e);
                            ResolutionState::FallbackMarker
                        }
                    }
                }

                ResolutionState::FallbackMarker => {
                    return Ok(TranslationResult::fallback(untranslated_marker(text, target)));
                }
            };
        }
    }
}
