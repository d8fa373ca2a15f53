//! Supported languages and language-pair handling.
//!
//! # Architecture
//!
//! - `registry`: single source of truth for language codes and display names
//! - `language`: the source/target pair chosen by a caller, with swap rules
//!
//! # Example
//!
//! ```rust,ignore
//! use wiso_translator::i18n::{LanguagePair, LanguageRegistry};
//!
//! let name = LanguageRegistry::get().name_of("es");
//! let pair = LanguagePair::new("en", "fr")?.swapped();
//! ```

mod language;
mod registry;

pub use language::{LanguagePair, AUTO_DETECT};
pub use registry::{LanguageConfig, LanguageRegistry};
