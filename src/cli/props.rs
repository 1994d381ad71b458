//! `scanstage props` - Write, read and delete the build properties handoff

use anyhow::{Context, Result};
use scanstage::{BuildRecord, Config, Properties};
use std::io::Write;
use std::path::Path;

/// Output format for `props read`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ReadFormat {
    #[default]
    Text,
    Json,
}

/// Parses a `KEY=VALUE` argument
pub fn parse_entry(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("empty key in '{raw}'")),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

pub fn write(config: &Config, build_dir: &Path, entries: Vec<(String, String)>) -> Result<()> {
    let properties: Properties = entries.into_iter().collect();
    let build = BuildRecord::new(build_dir);
    config
        .properties_store()
        .write(&build, &properties, &mut std::io::stderr())
        .with_context(|| format!("Failed to write build properties for {build}"))
}

/// Reads (and consumes) the handoff file, rendering it into `out`
pub fn read(config: &Config, build_dir: &Path, format: ReadFormat, out: &mut impl Write) -> Result<()> {
    let build = BuildRecord::new(build_dir);
    let properties = config.properties_store().read(&build, &mut std::io::stderr());

    match (format, properties) {
        (ReadFormat::Json, properties) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&properties)?)?;
        }
        (ReadFormat::Text, Some(properties)) => {
            for (key, value) in properties.iter() {
                writeln!(out, "{key}={value}")?;
            }
        }
        (ReadFormat::Text, None) => {
            tracing::info!(build = %build, "No build properties found");
        }
    }
    Ok(())
}

pub fn delete(config: &Config, build_dir: &Path) -> Result<()> {
    let build = BuildRecord::new(build_dir);
    config
        .properties_store()
        .delete(&build, &mut std::io::stderr())
        .with_context(|| format!("Failed to delete build properties for {build}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build_dir(jobs: &TempDir) -> std::path::PathBuf {
        let dir = jobs.path().join("app/builds/42");
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_entry() {
        assert_eq!(
            parse_entry("scan_name=demo=1").unwrap(),
            ("scan_name".to_string(), "demo=1".to_string())
        );
        assert_eq!(parse_entry("empty=").unwrap().1, "");
        assert!(parse_entry("novalue").is_err());
        assert!(parse_entry("=x").is_err());
    }

    #[test]
    fn test_write_read_roundtrip_via_cli() {
        let jobs = TempDir::new().unwrap();
        let dir = build_dir(&jobs);
        let config = Config::default();

        write(
            &config,
            &dir,
            vec![
                ("build_id".to_string(), "42".to_string()),
                ("scan_name".to_string(), "demo".to_string()),
            ],
        )
        .unwrap();

        let mut out = Vec::new();
        read(&config, &dir, ReadFormat::Text, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "build_id=42\nscan_name=demo\n");

        let mut out = Vec::new();
        read(&config, &dir, ReadFormat::Json, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "null");
    }

    #[test]
    fn test_delete_without_file() {
        let jobs = TempDir::new().unwrap();
        let dir = build_dir(&jobs);
        delete(&Config::default(), &dir).unwrap();
    }
}
