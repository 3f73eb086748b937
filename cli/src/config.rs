//! Optional YAML configuration for `cmdtree`.
//!
//! # Example YAML
//!
//! ```yaml
//! tree: commands.yaml
//! program: findhelp
//! handler_root: handlers
//! ```
//!
//! Relative `tree` paths are resolved against the configuration file's
//! directory. Command-line flags take precedence over every field.

use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Program name used in help output when nothing else is configured.
pub const DEFAULT_PROGRAM: &str = "cmdtree";

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Tree document (`.json`, `.yaml` or `.yml`).
    pub tree: Option<PathBuf>,
    /// Program name shown in the usage line.
    pub program: Option<String>,
    /// Root prepended to derived handler locations.
    pub handler_root: Option<String>,
}

impl CliConfig {
    /// Loads configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let file = std::fs::File::open(path)
            .map_err(|err| format!("Failed to open config '{}': {err}", path.display()))?;
        let mut config: Self = serde_yaml::from_reader(BufReader::new(file))
            .map_err(|err| format!("Failed to parse config '{}': {err}", path.display()))?;

        if let (Some(tree), Some(dir)) = (&config.tree, path.parent()) {
            if tree.is_relative() {
                config.tree = Some(dir.join(tree));
            }
        }
        Ok(config)
    }
}

/// Effective settings after merging flags over the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tree: PathBuf,
    pub program: String,
    pub handler_root: String,
}

impl Settings {
    /// Merges command-line values over an optional configuration file.
    pub fn resolve(
        config_path: Option<&Path>,
        tree: Option<PathBuf>,
        program: Option<String>,
        handler_root: Option<String>,
    ) -> Result<Self, String> {
        let config = match config_path {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        let tree = tree.or(config.tree).ok_or_else(|| {
            "No tree document given: pass --tree or set `tree` in the config file".to_string()
        })?;

        Ok(Self {
            tree,
            program: program
                .or(config.program)
                .unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
            handler_root: handler_root.or(config.handler_root).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmdtree.yaml");
        std::fs::write(&path, "tree: tree.yaml\nprogram: apps\nhandler_root: handlers\n").unwrap();

        let from_file = Settings::resolve(Some(&path), None, None, None).unwrap();
        assert_eq!(from_file.tree, dir.path().join("tree.yaml"));
        assert_eq!(from_file.program, "apps");
        assert_eq!(from_file.handler_root, "handlers");

        let overridden = Settings::resolve(
            Some(&path),
            Some(PathBuf::from("/other.json")),
            Some("other".into()),
            None,
        )
        .unwrap();
        assert_eq!(overridden.tree, PathBuf::from("/other.json"));
        assert_eq!(overridden.program, "other");
        assert_eq!(overridden.handler_root, "handlers");
    }

    #[test]
    fn test_tree_is_required() {
        let err = Settings::resolve(None, None, None, None).unwrap_err();
        assert!(err.contains("--tree"));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(None, Some("t.yml".into()), None, None).unwrap();
        assert_eq!(settings.program, DEFAULT_PROGRAM);
        assert_eq!(settings.handler_root, "");
    }
}
