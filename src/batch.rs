//! Line-by-line translation of multi-line input such as uploaded files.
//!
//! Lines are translated strictly in sequence, one resolver call per
//! non-blank line, with a short pause every few lines so the remote
//! endpoints are not flooded.

use crate::error::TranslationError;
use crate::resolver::{Resolver, TranslationRequest};
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Pacing between lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Pause after every line whose index is a multiple of this (0 disables)
    pub pace_every: usize,
    pub pace_delay: Duration,
}

impl BatchOptions {
    pub fn unpaced() -> Self {
        Self {
            pace_every: 0,
            pace_delay: Duration::ZERO,
        }
    }

    fn pauses_after(&self, index: usize) -> bool {
        self.pace_every > 0 && !self.pace_delay.is_zero() && index % self.pace_every == 0
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            pace_every: 5,
            pace_delay: Duration::from_millis(200),
        }
    }
}

/// Translate each line independently, preserving order and blank lines.
///
/// Lines are trimmed before translation; blank lines come back as empty
/// strings. Either every line is translated or the whole batch fails, and
/// the only possible failure is cancellation.
pub async fn translate_lines<S: AsRef<str>>(
    resolver: &Resolver,
    lines: &[S],
    source_lang: &str,
    target_lang: &str,
    options: &BatchOptions,
    cancel: &CancellationToken,
) -> Result<Vec<String>, TranslationError> {
    let mut translated = Vec::with_capacity(lines.len());
    let mut remote = 0usize;

    for (i, line) in lines.iter().enumerate() {
        if cancel.is_cancelled() {
            debug!("Batch cancelled after {}/{} lines", i, lines.len());
            return Err(TranslationError::Cancelled);
        }

        let line = line.as_ref().trim();
        if line.is_empty() {
            translated.push(String::new());
        } else {
            let request = TranslationRequest::new(line, source_lang, target_lang);
            let result = resolver.resolve_with_cancel(&request, cancel).await?;
            if result.is_remote() {
                remote += 1;
            }
            translated.push(result.text);
        }

        if options.pauses_after(i) {
            tokio::select! {
                _ = cancel.cancelled() => return Err(TranslationError::Cancelled),
                _ = sleep(options.pace_delay) => {}
            }
        }
    }

    info!(
        "Translated {} lines to {} ({} via remote endpoints)",
        lines.len(),
        target_lang,
        remote
    );
    Ok(translated)
}

/// Character count of the longest trimmed line, the unit each resolver call sees
pub fn longest_line_chars(content: &str) -> usize {
    content
        .split('\n')
        .map(|line| line.trim().chars().count())
        .max()
        .unwrap_or(0)
}

/// Translate a whole document line by line and join the result with `\n`.
pub async fn translate_document(
    resolver: &Resolver,
    content: &str,
    source_lang: &str,
    target_lang: &str,
    options: &BatchOptions,
    cancel: &CancellationToken,
) -> Result<String, TranslationError> {
    let lines: Vec<&str> = content.split('\n').collect();
    let translated =
        translate_lines(resolver, &lines, source_lang, target_lang, options, cancel).await?;
    Ok(translated.join("\n"))
}
