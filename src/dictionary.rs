//! Fallback dictionary used when every remote endpoint fails.
//!
//! Each target language maps lowercase phrases and words to a translation.
//! Lookups come in two flavours: an exact match of the whole normalized
//! input, and a single-pass substitution of every whole-word occurrence of
//! any key inside the original text.

use crate::error::TranslationError;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

const SPANISH: &[(&str, &str)] = &[
    ("hello", "hola"),
    ("how are you", "cómo estás"),
    ("good morning", "buenos días"),
    ("good afternoon", "buenas tardes"),
    ("good evening", "buenas noches"),
    ("thank you", "gracias"),
    ("please", "por favor"),
    ("goodbye", "adiós"),
    ("welcome", "bienvenido"),
    ("beautiful", "hermoso"),
    ("today", "hoy"),
    ("tomorrow", "mañana"),
    ("yesterday", "ayer"),
    ("professional", "profesional"),
    ("service", "servicio"),
    ("translation", "traducción"),
    ("application", "aplicación"),
    ("technology", "tecnología"),
    ("communication", "comunicación"),
    ("language", "idioma"),
    ("learning", "aprendizaje"),
    ("the weather is beautiful today", "el clima está hermoso hoy"),
    (
        "technology makes communication easier",
        "la tecnología facilita la comunicación",
    ),
    (
        "learning new languages opens doors",
        "aprender nuevos idiomas abre puertas",
    ),
    (
        "welcome to our professional translation service",
        "bienvenido a nuestro servicio de traducción profesional",
    ),
];

const FRENCH: &[(&str, &str)] = &[
    ("hello", "bonjour"),
    ("how are you", "comment allez-vous"),
    ("good morning", "bonjour"),
    ("good afternoon", "bonsoir"),
    ("good evening", "bonsoir"),
    ("thank you", "merci"),
    ("please", "s'il vous plaît"),
    ("goodbye", "au revoir"),
    ("welcome", "bienvenue"),
    ("beautiful", "beau"),
    ("today", "aujourd'hui"),
    ("professional", "professionnel"),
    ("service", "service"),
    ("translation", "traduction"),
    ("technology", "technologie"),
    ("language", "langue"),
];

const GERMAN: &[(&str, &str)] = &[
    ("hello", "hallo"),
    ("how are you", "wie geht es dir"),
    ("good morning", "guten Morgen"),
    ("thank you", "danke"),
    ("please", "bitte"),
    ("goodbye", "auf Wiedersehen"),
    ("welcome", "willkommen"),
    ("beautiful", "schön"),
    ("today", "heute"),
    ("professional", "professionell"),
    ("service", "Service"),
    ("translation", "Übersetzung"),
    ("technology", "Technologie"),
    ("language", "Sprache"),
];

static BUILTIN: OnceLock<Arc<Dictionary>> = OnceLock::new();

/// Lowercase and trim, the normalization applied to keys and exact lookups
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Phrase table for one target language.
#[derive(Debug)]
pub struct LanguageDictionary {
    /// Insertion order is preserved; it breaks ties between equal-length keys
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
    /// `None` when the table is empty
    pattern: Option<Regex>,
}

impl LanguageDictionary {
    /// Build a table from `(key, translation)` pairs.
    ///
    /// Keys are normalized; a repeated key keeps its first position and takes
    /// the last translation.
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, regex::Error>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (key, value) in pairs {
            let key = normalize(key.as_ref());
            if key.is_empty() {
                continue;
            }
            let value = value.into();
            match index.get(&key) {
                Some(&i) => entries[i].1 = value,
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push((key, value));
                }
            }
        }

        let pattern = build_pattern(&entries)?;
        Ok(Self {
            entries,
            index,
            pattern,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whole-input lookup after normalization
    pub fn exact(&self, text: &str) -> Option<&str> {
        self.get(&normalize(text))
    }

    /// Replace every case-insensitive whole-word occurrence of a key.
    ///
    /// One pass over the original text, so replacement values are never
    /// matched again. Where keys overlap the longest one wins.
    pub fn substitute(&self, text: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };

        pattern
            .replace_all(text, |caps: &Captures| {
                let matched = &caps[0];
                match self.get(&matched.to_lowercase()) {
                    Some(value) => value.to_string(),
                    // (?i) folding can match forms that lowercase differently
                    None => matched.to_string(),
                }
            })
            .into_owned()
    }
}

/// Builds `(?i)\b(?:key1|key2|...)\b` with keys escaped, longest first.
fn build_pattern(entries: &[(String, String)]) -> Result<Option<Regex>, regex::Error> {
    if entries.is_empty() {
        return Ok(None);
    }

    let mut keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
    // Stable sort keeps insertion order among equal lengths
    keys.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    let alternation = keys
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).map(Some)
}

/// Read-only fallback tables for every supported target language.
#[derive(Debug, Default)]
pub struct Dictionary {
    languages: HashMap<String, LanguageDictionary>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in tables, compiled once per process and shared.
    pub fn builtin() -> Arc<Dictionary> {
        BUILTIN
            .get_or_init(|| {
                let mut dictionary = Dictionary::new();
                for (code, pairs) in [("es", SPANISH), ("fr", FRENCH), ("de", GERMAN)] {
                    let table = LanguageDictionary::new(pairs.iter().copied())
                        .expect("Built-in dictionary patterns should always compile");
                    dictionary.insert(code, table);
                }
                Arc::new(dictionary)
            })
            .clone()
    }

    pub fn insert(&mut self, target_lang: &str, table: LanguageDictionary) {
        self.languages.insert(target_lang.to_string(), table);
    }

    pub fn with_language<K, V>(
        mut self,
        target_lang: &str,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, regex::Error>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        self.insert(target_lang, LanguageDictionary::new(pairs)?);
        Ok(self)
    }

    pub fn language(&self, target_lang: &str) -> Option<&LanguageDictionary> {
        self.languages.get(target_lang)
    }

    /// Exact whole-phrase translation. Unknown languages never match.
    pub fn exact(&self, target_lang: &str, text: &str) -> Option<&str> {
        self.language(target_lang)?.exact(text)
    }

    /// Word and phrase substitution over `text`.
    ///
    /// Returns `NoMatchFound` when the output would be identical to the
    /// input, including for languages without a table.
    pub fn substitute(&self, target_lang: &str, text: &str) -> Result<String, TranslationError> {
        let no_match = || TranslationError::NoMatchFound {
            target_lang: target_lang.to_string(),
        };

        let table = self.language(target_lang).ok_or_else(no_match)?;
        let substituted = table.substitute(text);
        if substituted == text {
            return Err(no_match());
        }
        Ok(substituted)
    }
}
