//! Language registry: single source of truth for all supported languages.
//!
//! Uses a singleton built with `OnceLock` so lookups are lock-free after the
//! first access.

use serde::Serialize;
use std::sync::OnceLock;

/// Metadata for one supported language.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageConfig {
    /// Code understood by the translation endpoints (e.g. "en", "zh-cn")
    pub code: &'static str,

    /// English display name (e.g. "Spanish")
    pub name: &'static str,

    /// Only valid as a source language ("auto")
    pub source_only: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Look up a language by code, case-insensitively.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages
            .iter()
            .find(|lang| lang.code.eq_ignore_ascii_case(code.trim()))
    }

    /// All languages, in display order.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    pub fn is_valid_source(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    pub fn is_valid_target(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|lang| !lang.source_only)
            .unwrap_or(false)
    }

    /// Display name for a code, or `None` if unsupported.
    pub fn name_of(&self, code: &str) -> Option<&'static str> {
        self.get_by_code(code).map(|lang| lang.name)
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    const LANGUAGES: &[(&str, &str)] = &[
        ("en", "English"),
        ("es", "Spanish"),
        ("fr", "French"),
        ("de", "German"),
        ("it", "Italian"),
        ("pt", "Portuguese"),
        ("ru", "Russian"),
        ("ja", "Japanese"),
        ("ko", "Korean"),
        ("zh-cn", "Chinese"),
        ("hi", "Hindi"),
        ("ar", "Arabic"),
        ("nl", "Dutch"),
        ("sv", "Swedish"),
    ];

    let mut languages = vec![LanguageConfig {
        code: "auto",
        name: "Auto-detect",
        source_only: true,
    }];
    languages.extend(LANGUAGES.iter().map(|&(code, name)| LanguageConfig {
        code,
        name,
        source_only: false,
    }));
    languages
}
