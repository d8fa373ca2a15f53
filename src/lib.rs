//! Translate text through public translation endpoints, falling back to a
//! small built-in dictionary when none of them answers.

pub mod batch;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod files;
pub mod i18n;
pub mod provider;
pub mod resolver;
pub mod samples;
pub mod server;

pub use error::TranslationError;
pub use resolver::{Resolver, TranslationRequest, TranslationResult, TranslationSource};
