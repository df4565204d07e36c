//! Layered configuration for lensmerge.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults (the stock card catalogue layout);
//! 2. a TOML file, either given explicitly or found in the platform
//!    configuration directory;
//! 3. environment variables prefixed `LENSMERGE_`, with `__` separating
//!    nested keys (e.g. `LENSMERGE_SCANNED__TABLE=scans`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use lensmerge_core::{ArchiveLoader, Pipeline, StandaloneLoader};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "LENSMERGE_";
const CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub scanned: ScannedConfig,
}

/// Where the card catalogue lives inside the archive, and how to read it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Suffix of the embedded database entry. Matched case-sensitively.
    pub suffix: String,
    /// Query projecting `(id, name)` from the embedded database.
    pub names_query: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            suffix: lensmerge_core::DEFAULT_SUFFIX.to_string(),
            names_query: lensmerge_core::DEFAULT_NAMES_QUERY.to_string(),
        }
    }
}

/// Layout of the standalone scan export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannedConfig {
    pub table: String,
    pub key_column: String,
}

impl Default for ScannedConfig {
    fn default() -> Self {
        Self {
            table: lensmerge_core::DEFAULT_TABLE.to_string(),
            key_column: lensmerge_core::DEFAULT_KEY_COLUMN.to_string(),
        }
    }
}

impl Config {
    /// Load and validate configuration.
    ///
    /// An explicit `path` must exist. Without one, the platform default
    /// location is used if a file is present there.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) if !path.is_file() => {
                exn::bail!(ErrorKind::Invalid(format!("configuration file {} does not exist", path.display())));
            },
            Some(path) => Some(path.to_path_buf()),
            None => default_path().filter(|path| path.is_file()),
        };
        match &file {
            Some(file) => tracing::debug!(path = %file.display(), "loading configuration file"),
            None => tracing::debug!("no configuration file; using defaults and environment"),
        }
        let config: Self = Self::figment(file.as_deref()).extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    /// The merged provider stack, before extraction.
    pub fn figment(file: Option<&Path>) -> Figment {
        Self::figment_with_prefix(file, ENV_PREFIX)
    }

    fn figment_with_prefix(file: Option<&Path>, prefix: &str) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(prefix).split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("archive.suffix", &self.archive.suffix),
            ("archive.names_query", &self.archive.names_query),
            ("scanned.table", &self.scanned.table),
            ("scanned.key_column", &self.scanned.key_column),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                exn::bail!(ErrorKind::Invalid(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }

    /// Build a pipeline from these settings.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(
            ArchiveLoader::new(&self.archive.suffix, &self.archive.names_query),
            StandaloneLoader::new(&self.scanned.table, &self.scanned.key_column),
        )
    }
}

/// `config.toml` in the platform configuration directory, if one can be
/// determined for the current user.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "lensmerge").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_catalogue_layout() {
        let config = Config::default();
        assert_eq!(config.archive.suffix, ".db");
        assert_eq!(config.scanned.table, "cards");
        assert_eq!(config.scanned.key_column, "card");
        assert_eq!(config.pipeline(), Pipeline::default());
        config.validate().unwrap();
    }

    #[test]
    fn file_overrides_defaults() {
        let file = toml_file("[archive]\nsuffix = \".sqlite\"\n\n[scanned]\ntable = \"scans\"\n");
        let config: Config = Config::figment(Some(file.path())).extract().unwrap();
        assert_eq!(config.archive.suffix, ".sqlite");
        assert_eq!(config.archive.names_query, lensmerge_core::DEFAULT_NAMES_QUERY);
        assert_eq!(config.scanned.table, "scans");
        assert_eq!(config.scanned.key_column, "card");
    }

    #[test]
    fn load_explicit_file() {
        let file = toml_file("[scanned]\nkey_column = \"card_id\"\n");
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.scanned.key_column, "card_id");
        assert_eq!(
            config.pipeline(),
            Pipeline::new(ArchiveLoader::default(), StandaloneLoader::new("cards", "card_id"))
        );
    }

    #[test]
    fn load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(message) if message.contains("absent.toml")));
    }

    #[test]
    fn load_malformed_file() {
        let file = toml_file("[archive\nsuffix = ");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert_eq!(*err, ErrorKind::Load);
    }

    #[rstest]
    #[case("[archive]\nsuffix = \"\"\n", "archive.suffix must not be empty")]
    #[case("[archive]\nnames_query = \"  \"\n", "archive.names_query must not be empty")]
    #[case("[scanned]\ntable = \"\"\n", "scanned.table must not be empty")]
    #[case("[scanned]\nkey_column = \"\"\n", "scanned.key_column must not be empty")]
    fn load_rejects_empty_values(#[case] contents: &str, #[case] expected: &str) {
        let file = toml_file(contents);
        let err = Config::load(Some(file.path())).unwrap_err();
        assert_eq!(*err, ErrorKind::Invalid(expected.to_string()));
    }

    #[test]
    fn environment_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("lensmerge.toml", "[scanned]\ntable = \"scans\"\nkey_column = \"card_id\"\n")?;
            // A separate prefix keeps these variables away from tests running in parallel.
            jail.set_env("LENSMERGE_JAIL_SCANNED__TABLE", "exports");
            jail.set_env("LENSMERGE_JAIL_ARCHIVE__SUFFIX", ".sqlite");
            let file = Some(Path::new("lensmerge.toml"));
            let config: Config = Config::figment_with_prefix(file, "LENSMERGE_JAIL_").extract()?;
            assert_eq!(config.scanned.table, "exports");
            assert_eq!(config.scanned.key_column, "card_id");
            assert_eq!(config.archive.suffix, ".sqlite");
            Ok(())
        });
    }

    #[test]
    fn default_path_ends_with_config_file() {
        if let Some(path) = default_path() {
            assert!(path.ends_with(CONFIG_FILE));
        }
    }
}
