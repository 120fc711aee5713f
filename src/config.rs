//! Filer configuration
//!
//! The submission header identifies the reporting institution (the
//! "filer"). That identity does not live in the data files; it comes from
//! a small TOML file:
//!
//! ```toml
//! [filer]
//! tax_code = "09876543210"
//! name = "ESEMPIO SGR SPA"
//! city = "MILANO"
//! province = "MI"
//! ```
//!
//! Field widths are validated at load time against the header's column
//! plan, so rendering never has to truncate filer identity.

use crate::types::ReportError;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

/// Identity of the reporting institution, as printed in the header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FilerConfig {
    pub tax_code: String,
    pub name: String,
    pub city: String,
    pub province: String,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    filer: FilerConfig,
}

impl FilerConfig {
    /// Read and validate the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ReportError::file_not_found(path.display().to_string())
            } else {
                ReportError::io(format!("failed to read '{}': {}", path.display(), e))
            }
        })?;
        Self::from_toml(&text)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ReportError> {
        let parsed: ConfigFile =
            toml::from_str(text).map_err(|e| ReportError::config(e.to_string()))?;
        parsed.filer.validate()
    }

    fn validate(self) -> Result<Self, ReportError> {
        if self.tax_code.trim().is_empty() {
            return Err(ReportError::config("filer tax_code must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(ReportError::config("filer name must not be empty"));
        }
        ensure_width("tax_code", &self.tax_code, 16)?;
        ensure_width("name", &self.name, 70)?;
        ensure_width("city", &self.city, 40)?;
        ensure_width("province", &self.province, 2)?;
        Ok(self)
    }
}

fn ensure_width(field: &str, value: &str, max: usize) -> Result<(), ReportError> {
    let len = value.chars().count();
    if len > max {
        return Err(ReportError::config(format!(
            "filer {} is {} characters; the header column holds {}",
            field, len, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID: &str = r#"
[filer]
tax_code = "09876543210"
name = "ESEMPIO SGR SPA"
city = "MILANO"
province = "MI"
"#;

    #[test]
    fn test_from_toml_parses_filer_identity() {
        let config = FilerConfig::from_toml(VALID).unwrap();
        assert_eq!(config.tax_code, "09876543210");
        assert_eq!(config.name, "ESEMPIO SGR SPA");
        assert_eq!(config.city, "MILANO");
        assert_eq!(config.province, "MI");
    }

    #[test]
    fn test_from_toml_rejects_missing_section() {
        let err = FilerConfig::from_toml("tax_code = \"X\"").unwrap_err();
        assert!(matches!(err, ReportError::Config { .. }));
    }

    #[test]
    fn test_from_toml_rejects_missing_field() {
        let err = FilerConfig::from_toml("[filer]\ntax_code = \"X\"").unwrap_err();
        assert!(matches!(err, ReportError::Config { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_tax_code() {
        let toml = VALID.replace("09876543210", "  ");
        let err = FilerConfig::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("tax_code"));
    }

    #[test]
    fn test_validate_rejects_oversized_fields() {
        let toml = VALID.replace("MILANO", &"M".repeat(41));
        let err = FilerConfig::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("city"));
        assert!(err.to_string().contains("40"));
    }

    #[test]
    fn test_province_is_capped_at_two_characters() {
        let toml = VALID.replace("\"MI\"", "\"MIL\"");
        assert!(FilerConfig::from_toml(&toml).is_err());
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(VALID.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");

        let config = FilerConfig::load(file.path()).unwrap();
        assert_eq!(config.province, "MI");
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = FilerConfig::load(Path::new("nonexistent.toml")).unwrap_err();
        assert!(matches!(err, ReportError::FileNotFound { .. }));
    }
}
