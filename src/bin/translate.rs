//! Command-line translator - translates text or a file and prints/saves the result
//!
//! Usage:
//!   cargo run --bin translate -- --to fr "Good morning"
//!   cargo run --bin translate -- --from en --to de --swap "guten Morgen"
//!   cargo run --bin translate -- --sample --to es
//!   cargo run --bin translate -- --file notes.txt --to es   # writes notes_translated.txt
//!   cargo run --bin translate -- --to de --out . "thank you"   # writes ./translated_text.txt
//!
//! Options:
//!   --from LANG   source language (defaults to auto)
//!   --to LANG     target language (defaults to es)
//!   --swap        exchange source and target (not allowed with auto)
//!   --sample      translate a random sample sentence when no text is given
//!   --file PATH   translate a file line by line
//!   --out PATH    where to write the translation; for text, a directory
//!                 gets translated_text.txt inside it
//!
//! Endpoints, timeouts and delays come from the same environment variables
//! as the server (see .env).

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;
use wiso_translator::{
    batch, config::Config, files, i18n::LanguagePair, samples, Resolver, TranslationRequest,
};

/// Parsed command line
#[derive(Debug, Default)]
struct CliArgs {
    from: Option<String>,
    to: Option<String>,
    swap: bool,
    sample: bool,
    file: Option<PathBuf>,
    out: Option<PathBuf>,
    text: Vec<String>,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = CliArgs::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--from" => {
                    parsed.from = Some(args.next().context("--from needs a language code")?)
                }
                "--to" => parsed.to = Some(args.next().context("--to needs a language code")?),
                "--swap" => parsed.swap = true,
                "--sample" => parsed.sample = true,
                "--file" => {
                    parsed.file = Some(args.next().context("--file needs a path")?.into())
                }
                "--out" => parsed.out = Some(args.next().context("--out needs a path")?.into()),
                "--" => parsed.text.extend(args.by_ref()),
                flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
                other => parsed.text.push(other.to_string()),
            }
        }

        Ok(parsed)
    }

    fn language_pair(&self) -> Result<LanguagePair> {
        let defaults = LanguagePair::default();
        let pair = LanguagePair::new(
            self.from.as_deref().unwrap_or(defaults.source()),
            self.to.as_deref().unwrap_or(defaults.target()),
        )?;

        if !self.swap {
            return Ok(pair);
        }
        match pair.swapped() {
            Some(swapped) => Ok(swapped),
            None => bail!("Cannot swap languages while the source is auto-detected"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so stdout carries only the translation)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wiso_translator=warn".parse()?),
        )
        .init();

    // Load environment from .env file
    dotenvy::dotenv().ok();

    let args = CliArgs::parse(std::env::args().skip(1))?;
    let pair = args.language_pair()?;
    let config = Config::from_env()?;
    let resolver = Resolver::from_config(reqwest::Client::new(), &config);

    // Ctrl-C stops between lines instead of killing a half-written file
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    if let Some(input) = &args.file {
        let content = files::read_source(input)?;
        let longest = batch::longest_line_chars(&content);
        if longest > config.max_text_chars {
            bail!(
                "{} has a {} character line; the limit is {}",
                input.display(),
                longest,
                config.max_text_chars
            );
        }
        let translated = batch::translate_document(
            &resolver,
            &content,
            pair.source(),
            pair.target(),
            &config.batch_options(),
            &cancel,
        )
        .await
        .context("File translation failed")?;

        let output = args
            .out
            .clone()
            .unwrap_or_else(|| files::translated_path(input));
        files::write_translation(&output, &translated)?;
        info!("Saved translation to {}", output.display());
        println!("{}", output.display());
        return Ok(());
    }

    let text = if !args.text.is_empty() {
        args.text.join(" ")
    } else if args.sample {
        samples::random_sample().to_string()
    } else {
        bail!("Please enter text to translate (or pass --sample or --file)");
    };

    let text = text.trim();
    if text.is_empty() {
        bail!("Please enter text to translate");
    }
    if text.chars().count() > config.max_text_chars {
        bail!(
            "Text is longer than {} characters; use --file for long documents",
            config.max_text_chars
        );
    }

    let request = TranslationRequest::new(text, pair.source(), pair.target());
    let result = resolver
        .resolve_with_cancel(&request, &cancel)
        .await
        .context("Translation failed")?;

    info!(
        "Translated to {} via {:?}",
        pair.target_name(),
        result.source
    );

    if let Some(out) = &args.out {
        let output = files::text_output_path(out);
        files::write_translation(&output, &result.text)?;
        info!("Saved translation to {}", output.display());
    }
    println!("{}", result.text);

    Ok(())
}
