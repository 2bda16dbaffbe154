pub mod cluster;
pub mod detail;
pub mod stress;

use clap::ValueEnum;
use color_eyre::eyre::{Result, WrapErr};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How results are written to stdout
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Render a value to stdout in the requested format
pub fn print<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

/// Read every manifest in a YAML or JSON file
///
/// Files may hold several `---` separated documents, and a `kind: *List`
/// document (as printed by `kubectl get -o yaml`) is expanded into its items.
/// Empty documents are skipped.
pub fn load_manifests(path: &Path) -> Result<Vec<serde_yaml::Value>> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

    let mut manifests = Vec::new();
    for document in serde_yaml::Deserializer::from_str(&text) {
        let value = serde_yaml::Value::deserialize(document)
            .wrap_err_with(|| format!("Failed to parse {}", path.display()))?;
        if value.is_null() {
            continue;
        }
        match value.get("items").and_then(|items| items.as_sequence()) {
            Some(items) if is_list(&value) => manifests.extend(items.iter().cloned()),
            _ => manifests.push(value),
        }
    }
    Ok(manifests)
}

/// Decode a manifest into a resource type
pub fn decode<T: DeserializeOwned>(manifest: serde_yaml::Value, path: &Path) -> Result<T> {
    serde_yaml::from_value(manifest)
        .wrap_err_with(|| format!("Invalid manifest in {}", path.display()))
}

fn is_list(value: &serde_yaml::Value) -> bool {
    value
        .get("kind")
        .and_then(|kind| kind.as_str())
        .map(|kind| kind.ends_with("List"))
        .unwrap_or(false)
}

/// Kind of a manifest, empty when it has none
pub fn kind_of(value: &serde_yaml::Value) -> &str {
    value
        .get("kind")
        .and_then(|kind| kind.as_str())
        .unwrap_or_default()
}
