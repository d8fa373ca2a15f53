//! Naming and I/O for translated files.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// File name used when saving a plain text translation
pub const TEXT_OUTPUT_NAME: &str = "translated_text.txt";

/// `notes.txt` -> `notes_translated.txt`; names without an extension
/// (including dotfiles like `.env`) get the suffix appended.
pub fn translated_file_name(name: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}_translated{}", &name[..dot], &name[dot..]),
        _ => format!("{}_translated", name),
    }
}

/// Sibling path for the translated version of `input`
pub fn translated_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    input.with_file_name(translated_file_name(&name))
}

/// Where a plain text translation goes: `out` itself, or
/// `out/translated_text.txt` when `out` is an existing directory
pub fn text_output_path(out: &Path) -> PathBuf {
    if out.is_dir() {
        out.join(TEXT_OUTPUT_NAME)
    } else {
        out.to_path_buf()
    }
}

pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file {}", path.display()))
}

pub fn write_translation(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write translation to {}", path.display()))
}
