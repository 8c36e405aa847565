use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use formlink::FormKind;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` overrides the `-v` level.
pub fn init_tracing(verbose: u8, quiet_level: &str) {
    let level = match verbose {
        0 => quiet_level,
        1 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()),
        ))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialise JSON output")?;
    println!("{text}");
    Ok(())
}

pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// `clap` value parser for form tags.
pub fn parse_form_kind(tag: &str) -> Result<FormKind, String> {
    FormKind::from_tag(tag).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_tags_parse() {
        assert_eq!(parse_form_kind("options").unwrap(), FormKind::Options);
        let err = parse_form_kind("settings").unwrap_err();
        assert!(err.contains("settings"), "{err}");
    }
}
