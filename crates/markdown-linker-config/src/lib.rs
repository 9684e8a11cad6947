use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_SCHEME: &str = "mdlink";
pub const DEFAULT_CHANNEL: &str = "mdlink";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Workspace opened when none is given on the command line
    pub workspace_path: PathBuf,
    #[serde(default)]
    pub links: LinkConfig,
}

/// The `[links]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// URI scheme the preview interceptor recognizes
    pub scheme: String,
    /// Message channel between the preview and the host
    pub channel: String,
    /// Search library code as well as project code for classes and symbols
    pub include_libraries: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            channel: DEFAULT_CHANNEL.to_string(),
            include_libraries: false,
        }
    }
}

impl Config {
    pub fn new(workspace_path: impl Into<PathBuf>) -> Self {
        Self {
            workspace_path: workspace_path.into(),
            links: LinkConfig::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.workspace_path =
            Self::expand_path(&config.workspace_path).unwrap_or(config.workspace_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-linker");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Expand `~` and `$VAR` references; `None` if a variable is unset
    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        shellexpand::full(&path_str)
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/markdown-linker/config.toml"));
    }

    #[test]
    fn test_links_table_defaults_when_missing() {
        let config: Config = toml::from_str(r#"workspace_path = "/src/project""#).unwrap();

        assert_eq!(config.links, LinkConfig::default());
        assert_eq!(config.links.scheme, "mdlink");
        assert_eq!(config.links.channel, "mdlink");
        assert!(!config.links.include_libraries);
    }

    #[test]
    fn test_partial_links_table() {
        let config_content = r#"
workspace_path = "/src/project"

[links]
include_libraries = true
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert!(config.links.include_libraries);
        assert_eq!(config.links.scheme, DEFAULT_SCHEME);
        assert_eq!(config.links.channel, DEFAULT_CHANNEL);
    }

    #[test]
    fn test_missing_workspace_path_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[links]\nscheme = \"ide\"\n").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(Path::new("~/test/path")).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("MDLINK_TEST_VAR", "/test/env/path");
        }

        let expanded = Config::expand_path(Path::new("$MDLINK_TEST_VAR/subdir"));

        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/subdir")));

        unsafe {
            env::remove_var("MDLINK_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_unset_var() {
        assert_eq!(
            Config::expand_path(Path::new("$MDLINK_DEFINITELY_UNSET_VAR/x")),
            None
        );
    }

    #[test]
    fn test_expand_path_leaves_plain_paths() {
        for path in ["/absolute/path", "relative/path"] {
            assert_eq!(Config::expand_path(Path::new(path)), Some(PathBuf::from(path)));
        }
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();

        let result = Config::load_from_path(temp_dir.path().join("nonexistent.toml")).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_links_table() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "workspace_path = \"/tmp/test-project\"\n\n[links]\nscheme = \"ide\"\ninclude_libraries = true\n",
        )
        .unwrap();

        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();

        let mut expected = Config::new("/tmp/test-project");
        expected.links.scheme = "ide".to_string();
        expected.links.include_libraries = true;
        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_load_expands_workspace_path() {
        unsafe {
            env::set_var("MDLINK_PROJECTS", "/custom/projects");
        }
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "workspace_path = \"$MDLINK_PROJECTS/linker\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.workspace_path, PathBuf::from("/custom/projects/linker"));

        unsafe {
            env::remove_var("MDLINK_PROJECTS");
        }
    }
}
