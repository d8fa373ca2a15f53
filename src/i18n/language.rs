//! Source/target language selection.

use crate::i18n::LanguageRegistry;
use anyhow::{bail, Context, Result};

/// Code for automatic source-language detection
pub const AUTO_DETECT: &str = "auto";

/// A validated source/target language pair.
///
/// Replaces per-tab mutable language state: callers build a pair from their
/// own input and pass it down explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguagePair {
    source: &'static str,
    target: &'static str,
}

impl LanguagePair {
    /// Validate both codes against the registry.
    ///
    /// # Returns
    /// * `Err` if either code is unknown, or if the target is "auto"
    pub fn new(source: &str, target: &str) -> Result<LanguagePair> {
        let registry = LanguageRegistry::get();

        if !registry.is_valid_source(source) {
            bail!("Unknown source language code: '{}'", source);
        }
        if !registry.is_valid_target(target) {
            if registry.is_valid_source(target) {
                bail!("'{}' can only be used as a source language", target);
            }
            bail!("Unknown target language code: '{}'", target);
        }

        Ok(LanguagePair {
            source: canonical_code(registry, source)?,
            target: canonical_code(registry, target)?,
        })
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn target_name(&self) -> &'static str {
        LanguageRegistry::get()
            .name_of(self.target)
            .unwrap_or(self.target)
    }

    /// Exchange source and target.
    ///
    /// Returns `None` while the source is auto-detected, since "auto" is not
    /// a valid target.
    pub fn swapped(&self) -> Option<LanguagePair> {
        if self.source == AUTO_DETECT {
            return None;
        }
        Some(LanguagePair {
            source: self.target,
            target: self.source,
        })
    }
}

/// The registry's spelling of a code (`"ZH-CN"` -> `"zh-cn"`)
fn canonical_code(registry: &LanguageRegistry, code: &str) -> Result<&'static str> {
    registry
        .get_by_code(code)
        .map(|lang| lang.code)
        .with_context(|| format!("Unknown language code: '{}'", code))
}

impl Default for LanguagePair {
    fn default() -> Self {
        LanguagePair {
            source: AUTO_DETECT,
            target: "es",
        }
    }
}
