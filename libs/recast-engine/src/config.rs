use serde::Deserialize;

use crate::error::MapperError;

/// Mapper behaviour switches, parsed from TOML.
///
/// ```toml
/// strict = false
/// log_unmapped = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapperConfig {
    /// Fail with `MapperError::Unmapped` when no converter supports a field,
    /// instead of leaving the destination field unchanged.
    #[serde(default)]
    pub strict: bool,

    /// Emit a `warn` event for every field skipped because no converter
    /// supports it. Ignored in strict mode.
    #[serde(default)]
    pub log_unmapped: bool,
}

impl MapperConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, MapperError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| MapperError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, MapperError> {
        toml::from_str(toml_str).map_err(|e| MapperError::Config(e.to_string()))
    }

    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = MapperConfig::parse("").unwrap();
        assert_eq!(cfg, MapperConfig::default());
        assert!(!cfg.strict);
        assert!(!cfg.log_unmapped);
    }

    #[test]
    fn parses_flags() {
        let cfg = MapperConfig::parse("strict = true\nlog_unmapped = true\n").unwrap();
        assert!(cfg.strict);
        assert!(cfg.log_unmapped);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = MapperConfig::parse("stricts = true").unwrap_err();
        assert!(matches!(err, MapperError::Config(_)));
    }

    #[test]
    fn load_reads_file_and_prefixes_path_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "strict = true").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        assert!(MapperConfig::load(&path).unwrap().strict);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "strict = \"yes\"").unwrap();
        let bad_path = bad.path().to_str().unwrap().to_string();
        match MapperConfig::load(&bad_path) {
            Err(MapperError::Config(msg)) => assert!(msg.starts_with(&bad_path)),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = MapperConfig::load("/nonexistent/recast.toml").unwrap_err();
        assert!(matches!(err, MapperError::Config(_)));
    }
}
