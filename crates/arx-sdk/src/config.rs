use std::fs;
use std::path::{Path, PathBuf};

use arx_store::PayloadNaming;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

/// Where the catalog keeps its data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// The flat-file database.
    pub database: PathBuf,
    /// Directory holding one payload file per article.
    pub articles_dir: PathBuf,
    /// Extension of payload files, without the dot.
    pub payload_extension: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("articulos_db.txt"),
            articles_dir: PathBuf::from("articles"),
            payload_extension: "txt".into(),
        }
    }
}

impl CatalogConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> CatalogResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| CatalogError::Config(e.to_string()))?;
        config.payload_naming()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> CatalogResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// The configuration at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> CatalogResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// The payload naming policy for `payload_extension`.
    pub fn payload_naming(&self) -> CatalogResult<PayloadNaming> {
        PayloadNaming::new(self.payload_extension.as_str())
            .map_err(|e| CatalogError::Config(e.to_string()))
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> CatalogResult<String> {
        toml::to_string(self).map_err(|e| CatalogError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = CatalogConfig::default();
        assert_eq!(c.database, PathBuf::from("articulos_db.txt"));
        assert_eq!(c.articles_dir, PathBuf::from("articles"));
        assert_eq!(c.payload_extension, "txt");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = CatalogConfig::from_toml("database = \"/srv/arx/db.txt\"\n").unwrap();
        assert_eq!(c.database, PathBuf::from("/srv/arx/db.txt"));
        assert_eq!(c.articles_dir, PathBuf::from("articles"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CatalogConfig::from_toml("databse = \"typo.txt\"\n").unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let c = CatalogConfig {
            database: "db.txt".into(),
            articles_dir: "blobs".into(),
            payload_extension: "pdf".into(),
        };
        assert_eq!(CatalogConfig::from_toml(&c.to_toml().unwrap()).unwrap(), c);
    }

    #[test]
    fn payload_extension_must_be_safe_in_keys_and_lines() {
        for text in [
            "payload_extension = \"t|xt\"\n",
            "payload_extension = \"t\\nxt\"\n",
            "payload_extension = \"sub/txt\"\n",
        ] {
            let err = CatalogConfig::from_toml(text).unwrap_err();
            assert!(matches!(err, CatalogError::Config(_)), "{text:?} should be rejected");
        }
        let c = CatalogConfig::from_toml("payload_extension = \".md\"\n").unwrap();
        assert_eq!(c.payload_naming().unwrap().extension(), "md");
    }

    #[test]
    fn load_without_path_is_default() {
        assert_eq!(CatalogConfig::load(None).unwrap(), CatalogConfig::default());
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CatalogConfig::load(Some(&dir.path().join("arx.toml"))).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
