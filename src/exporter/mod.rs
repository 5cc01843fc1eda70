//! Record export
//!
//! Writes validated records to disk as JSON or YAML. Only records that
//! passed validation should reach this point; the exporter itself does not
//! re-check them.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::models::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => anyhow::bail!("Output format must be 'json' or 'yaml', got '{other}'"),
        }
    }
}

pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Serialize a record and write it under the output directory,
    /// returning the written path. The format's extension is appended when
    /// the filename doesn't already carry it.
    pub fn export(
        &self,
        record: &Record,
        format: OutputFormat,
        filename: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output_dir.display()
            )
        })?;

        let filename = ensure_extension(filename, format.extension());
        let output_path = self.output_dir.join(filename);

        let serialized = match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(record).context("Failed to serialize record as JSON")?
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(record).context("Failed to serialize record as YAML")?
            }
        };

        fs::write(&output_path, serialized)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        info!("✓ Record exported to {}", output_path.display());
        Ok(output_path)
    }
}

fn ensure_extension(filename: &str, extension: &str) -> String {
    if Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == extension)
    {
        filename.to_string()
    } else {
        format!("{filename}.{extension}")
    }
}
