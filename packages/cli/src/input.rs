//! Reading parcel batches and configuration from disk.

use std::path::{Path, PathBuf};

use parcel_map_parcel_models::Parcel;
use parcel_map_search::{SearchError, SearchResponse};
use parcel_map_viewport::{ConfigError, ViewportConfig};
use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading an input or output file failed.
    #[error("{path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The input file is neither a parcel array nor a search response.
    #[error("{path}: not a parcel batch: {source}")]
    Batch {
        /// The input file.
        path: PathBuf,
        /// Why neither shape parsed.
        source: serde_json::Error,
    },

    /// Serializing output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The viewport config could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A search turn failed.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// `--select` named a key that is not in the batch.
    #[error("No parcel with key '{0}' (try one of the keys listed by `render`)")]
    UnknownKey(String),
}

/// Either shape a batch file can take.
#[derive(Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Parcels(Vec<Parcel>),
    Response(SearchResponse),
}

/// Parses a batch from JSON text: a bare parcel array, or a saved search
/// response whose parcels are taken as-is.
///
/// # Errors
///
/// Returns the parse error if the text is neither shape.
pub fn parse_batch(json: &str) -> Result<Vec<Parcel>, serde_json::Error> {
    Ok(match serde_json::from_str(json)? {
        BatchFile::Parcels(parcels) => parcels,
        BatchFile::Response(response) => {
            if let Some(summary) = &response.summary {
                log::info!("Search summary: {summary}");
            }
            response.parcels
        }
    })
}

/// Reads a batch file.
///
/// # Errors
///
/// Returns [`CliError::Io`] or [`CliError::Batch`].
pub fn load_batch(path: &Path) -> Result<Vec<Parcel>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parcels = parse_batch(&text).map_err(|source| CliError::Batch {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Loaded {} parcels from {}", parcels.len(), path.display());
    Ok(parcels)
}

/// Loads the viewport config, or the defaults when no file is given.
///
/// # Errors
///
/// Returns [`CliError::Config`] if the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<ViewportConfig, CliError> {
    Ok(match path {
        Some(path) => ViewportConfig::load(path)?,
        None => ViewportConfig::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_array() {
        let parcels = parse_batch(r#"[{"address": "12 Farm Rd"}, {}]"#).unwrap();
        assert_eq!(parcels.len(), 2);
        assert_eq!(parcels[0].address, "12 Farm Rd");
    }

    #[test]
    fn accepts_search_response() {
        let parcels = parse_batch(
            r#"{"parcels": [{"address": "9 Orchard Ln"}], "summary": "Found 1", "session_id": "s"}"#,
        )
        .unwrap();
        assert_eq!(parcels[0].address, "9 Orchard Ln");
    }

    #[test]
    fn rejects_other_json() {
        assert!(parse_batch("42").is_err());
    }

    #[test]
    fn batch_error_names_the_file() {
        let path = std::env::temp_dir().join("parcel_map_not_a_batch.json");
        std::fs::write(&path, "42").unwrap();

        let err = load_batch(&path).unwrap_err();
        assert!(matches!(err, CliError::Batch { .. }));
        assert!(err.to_string().contains("parcel_map_not_a_batch.json: not a parcel batch"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/viewport.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::Io(_))));
    }
}
