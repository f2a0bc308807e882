use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::id::IdKind;
use crate::Result;

pub const CONFIG_FILE_NAME: &str = ".jsonrpcclient.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Abbreviate long values in logged requests and responses.
    pub trim_log_values: bool,
    /// Check responses against the JSON-RPC 2.0 response schema.
    pub validate_against_schema: bool,
    /// Which generator produces request ids.
    pub id_generator: IdKind,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            trim_log_values: false,
            validate_against_schema: true,
            id_generator: IdKind::Decimal,
        }
    }
}

impl ClientConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read `paths` in order, skipping those that don't exist.
    ///
    /// A key set by a later file overrides the same key from an earlier one;
    /// unset keys keep their defaults.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut merged = toml::Table::new();
        for path in paths {
            let text = match std::fs::read_to_string(path.as_ref()) {
                Ok(text) => text,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            tracing::debug!("loading client config from {}", path.as_ref().display());
            let table: toml::Table = toml::from_str(&text)?;
            for (key, value) in table {
                merged.insert(key, value);
            }
        }
        Ok(toml::Value::Table(merged).try_into()?)
    }

    /// The working directory's config file, then the one in `$HOME`.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(home) = std::env::var_os("HOME") {
            paths.push(PathBuf::from(home).join(CONFIG_FILE_NAME));
        }
        paths
    }

    pub fn load_default() -> Result<Self> {
        Self::load(&Self::default_paths())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "jsonrpc-yet-{}-{}.toml",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert!(!config.trim_log_values);
        assert!(config.validate_against_schema);
        assert_eq!(config.id_generator, IdKind::Decimal);
        assert_eq!(ClientConfig::from_toml("").unwrap(), config);
    }

    #[test]
    fn from_toml_overrides_some_keys() {
        let config = ClientConfig::from_toml(
            r#"
            validate_against_schema = false
            id_generator = "hexadecimal"
            "#,
        )
        .unwrap();
        assert!(!config.trim_log_values);
        assert!(!config.validate_against_schema);
        assert_eq!(config.id_generator, IdKind::Hexadecimal);
    }

    #[test]
    fn rejects_unknown_generator_and_keys() {
        assert!(matches!(
            ClientConfig::from_toml(r#"id_generator = "sequential""#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ClientConfig::from_toml("basic_logging = true"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn later_files_win() {
        let first = temp_file("first", "trim_log_values = true\nid_generator = \"random\"\n");
        let second = temp_file("second", "id_generator = \"uuid\"\n");
        let missing = std::env::temp_dir().join("jsonrpc-yet-does-not-exist.toml");

        let config = ClientConfig::load(&[&first, &missing, &second]).unwrap();
        assert!(config.trim_log_values);
        assert!(config.validate_against_schema);
        assert_eq!(config.id_generator, IdKind::Uuid);

        std::fs::remove_file(first).unwrap();
        std::fs::remove_file(second).unwrap();
    }

    #[test]
    fn nothing_to_load_gives_defaults() {
        let missing = std::env::temp_dir().join("jsonrpc-yet-also-missing.toml");
        assert_eq!(ClientConfig::load(&[missing]).unwrap(), ClientConfig::default());
    }
}
