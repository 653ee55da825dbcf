//! Defaults and the optional JSON config file.
//!
//! Precedence: command-line flag > config file > built-in default.
use std::path::{Path, PathBuf};
use serde::Deserialize;
use crate::error::ConfigError;

pub const DEFAULT_URI: &str = "mongodb://localhost:27017/";
pub const DEFAULT_OUT: &str = "generated_models.py";
pub const DEFAULT_SAMPLE_SIZE: usize = 100;
pub const PREVIEW_SAMPLE_SIZE: usize = 10;
pub const MAX_SAMPLE_SIZE: usize = 10_000;
pub const MAX_PREVIEW_SAMPLE_SIZE: usize = 1_000;

/// Contents of `--config <file>`. Every key is optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub uri: Option<String>,
    pub db: Option<String>,
    pub sample_size: Option<usize>,
    pub collections: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub out: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        Self::parse(&src).map_err(|(at, message)| ConfigError::Parse {
            path: path.to_owned(),
            at,
            message,
        })
    }

    /// Deserialize with the JSON path of the offending key in the error.
    fn parse(src: &str) -> Result<Self, (String, String)> {
        let de = &mut serde_json::Deserializer::from_str(src);
        serde_path_to_error::deserialize(de)
            .map_err(|err| (err.path().to_string(), err.into_inner().to_string()))
    }
}

pub fn check_sample_size(size: usize, max: usize) -> Result<usize, ConfigError> {
    if (1..=max).contains(&size) {
        Ok(size)
    } else {
        Err(ConfigError::SampleSize { got: size, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_config() {
        let cfg = FileConfig::parse(r#"{"db": "shop", "sample_size": 50, "exclude": ["logs"]}"#).unwrap();
        assert_eq!(cfg.db.as_deref(), Some("shop"));
        assert_eq!(cfg.sample_size, Some(50));
        assert_eq!(cfg.exclude, Some(vec!["logs".to_owned()]));
        assert!(cfg.uri.is_none());
    }

    #[test]
    fn errors_name_the_offending_path() {
        let (at, _) = FileConfig::parse(r#"{"collections": ["a", 3]}"#).unwrap_err();
        assert_eq!(at, "collections[1]");
        let (_, message) = FileConfig::parse(r#"{"dbname": "x"}"#).unwrap_err();
        assert!(message.contains("unknown field"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = FileConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn sample_size_bounds() {
        assert!(check_sample_size(1, MAX_SAMPLE_SIZE).is_ok());
        assert!(check_sample_size(MAX_SAMPLE_SIZE, MAX_SAMPLE_SIZE).is_ok());
        assert!(check_sample_size(0, MAX_SAMPLE_SIZE).is_err());
        assert!(check_sample_size(MAX_PREVIEW_SAMPLE_SIZE + 1, MAX_PREVIEW_SAMPLE_SIZE).is_err());
    }
}
