//! Configuration loading and discovery.
//!
//! Configuration is layered with figment, lowest precedence first:
//! 1. Built-in defaults
//! 2. User config from the platform config directory
//! 3. Project config found by walking up from a search root
//! 4. Explicit files added with [`ConfigLoader::with_file`]
//! 5. `PART_DISCOVERY_*` environment variables
//!
//! # Supported formats
//!
//! - TOML (`.toml`)
//! - YAML (`.yaml`, `.yml`)
//! - JSON (`.json`)
//!
//! # Config file locations
//! - `part-discovery.<ext>` in current directory or any parent
//! - `.part-discovery.<ext>` in current directory or any parent
//! - `~/.config/part-discovery/config.<ext>` (user config)
//!
//! When multiple files exist in the same directory, all are merged.
//! Later extensions override earlier: toml < yaml < yml < json.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use part_discovery::config::ConfigLoader;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! println!("tie break: {}", config.tie_break);
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::counts::TieBreak;
use crate::error::{ConfigError, ConfigResult};

/// The configuration for part-discovery.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// How ties for the most frequent word are resolved.
    pub tie_break: TieBreak,
    /// Words removed from the counts before ranking and scoring.
    pub stop_words: Vec<String>,
}

/// Which configuration files were merged, for callers that report them.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Project config files from the closest matching directory, low→high precedence.
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file from the platform config directory.
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files loaded.
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .or_else(|| self.project_files.last())
            .or(self.user_file.as_ref())
            .map(Utf8PathBuf::as_path)
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for directory lookup and config file names.
const APP_NAME: &str = "part-discovery";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "PART_DISCOVERY_";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Starting directory for project config search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include user config.
    include_user_config: bool,
    /// Stop the upward search at a repository root (a directory holding `.git`).
    stop_at_repo_root: bool,
    /// Explicit config files to load.
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            stop_at_repo_root: true,
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/part-discovery/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Keep searching past repository roots, up to the filesystem root.
    pub const fn without_repo_boundary(mut self) -> Self {
        self.stop_at_repo_root = false;
        self
    }

    /// Add an explicit config file to load.
    ///
    /// Files are loaded in order, with later files taking precedence.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = find_user_config()
        {
            figment = merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // PART_DISCOVERY_TIE_BREAK=lexicographic overrides every file.
        figment = figment.merge(Env::prefixed(ENV_PREFIX).lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            tie_break = config.tie_break.as_str(),
            stop_words = config.stop_words.len(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Load configuration, returning an error if no config file is found.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !self.find_project_configs(root).is_empty());
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Find project config files by walking up from the given directory.
    ///
    /// Only the closest directory with any match contributes. Dotfiles come
    /// before regular files so the regular file wins on conflicts.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let mut found = Vec::new();

            for prefix in [".", ""] {
                for ext in CONFIG_EXTENSIONS {
                    let candidate = dir.join(format!("{prefix}{APP_NAME}.{ext}"));
                    if candidate.is_file() {
                        found.push(candidate);
                    }
                }
            }

            if !found.is_empty() {
                return found;
            }

            // A config next to `.git` still counts; only parents above it are skipped.
            if self.stop_at_repo_root && dir != start && dir.join(".git").exists() {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }
}

/// Find user config in the platform config directory.
fn find_user_config() -> Option<Utf8PathBuf> {
    let config_dir = user_config_dir()?;
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| config_dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

/// Merge a config file into the figment, detecting format from extension.
fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
    match path.extension() {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
        Some("json") => figment.merge(Json::file_exact(path.as_str())),
        _ => figment.merge(Toml::file_exact(path.as_str())),
    }
}

/// Get the user config directory path.
///
/// Returns `~/.config/part-discovery/` on Linux, `~/Library/Application Support/part-discovery/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::TempDir;

    /// Serializes every test that reads or writes `PART_DISCOVERY_*` variables.
    /// `load()` merges the environment last, so a variable set by one test
    /// would override file values in another running concurrently.
    static TEST_ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::try_from(path.to_path_buf()).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tie_break, TieBreak::FirstSeen);
        assert!(config.stop_words.is_empty());
    }

    #[test]
    fn test_loader_builds_with_defaults() {
        let _lock = env_lock();
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_repo_boundary()
            .load()
            .unwrap();

        assert_eq!(config, Config::default());
        assert!(sources.primary_file().is_none());
    }

    #[test]
    fn test_single_file_overrides_default() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"tie_break = "lexicographic"
stop_words = ["the", "and"]
"#,
        )
        .unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&config_path))
            .load()
            .unwrap();

        assert_eq!(config.tie_break, TieBreak::Lexicographic);
        assert_eq!(config.stop_words, ["the", "and"]);
        assert_eq!(sources.primary_file(), Some(utf8(&config_path).as_path()));
    }

    #[test]
    fn test_later_file_overrides_earlier() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();

        let base_config = tmp.path().join("base.toml");
        fs::write(&base_config, "stop_words = [\"for\"]\n").unwrap();

        let override_config = tmp.path().join("override.json");
        fs::write(&override_config, r#"{"stop_words": ["with"]}"#).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&base_config))
            .with_file(utf8(&override_config))
            .load()
            .unwrap();

        assert_eq!(config.stop_words, ["with"]);
        assert_eq!(sources.explicit_files.len(), 2);
        assert_eq!(sources.primary_file(), Some(utf8(&override_config).as_path()));
    }

    #[test]
    fn test_project_config_discovery() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("project");
        let sub_dir = project_dir.join("catalogs").join("2024");
        fs::create_dir_all(&sub_dir).unwrap();

        fs::write(
            project_dir.join(".part-discovery.yaml"),
            "stop_words:\n  - for\n  - with\n",
        )
        .unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_repo_boundary()
            .with_project_search(utf8(&sub_dir))
            .load()
            .unwrap();

        assert_eq!(config.stop_words, ["for", "with"]);
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn test_repo_root_stops_search() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("parent");
        let child = parent.join("child");
        let work = child.join("work");
        fs::create_dir_all(&work).unwrap();

        fs::write(
            parent.join(".part-discovery.toml"),
            r#"tie_break = "lexicographic""#,
        )
        .unwrap();
        fs::create_dir(child.join(".git")).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_project_search(utf8(&work))
            .load()
            .unwrap();

        assert_eq!(config.tie_break, TieBreak::FirstSeen);
        assert!(sources.project_files.is_empty());
    }

    #[test]
    fn config_next_to_repo_root_is_found() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let work = tmp.path().join("work");
        fs::create_dir_all(&work).unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        fs::write(
            tmp.path().join("part-discovery.toml"),
            r#"tie_break = "lexicographic""#,
        )
        .unwrap();

        let (config, _sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_project_search(utf8(&work))
            .load()
            .unwrap();

        assert_eq!(config.tie_break, TieBreak::Lexicographic);
    }

    #[test]
    fn regular_file_overrides_dotfile() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".part-discovery.toml"),
            r#"tie_break = "lexicographic""#,
        )
        .unwrap();
        fs::write(
            tmp.path().join("part-discovery.toml"),
            r#"tie_break = "first-seen""#,
        )
        .unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_repo_boundary()
            .with_project_search(utf8(tmp.path()))
            .load()
            .unwrap();

        assert_eq!(config.tie_break, TieBreak::FirstSeen);
        assert_eq!(sources.project_files.len(), 2);
    }

    #[test]
    fn only_closest_directory_contributes() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let parent = tmp.path().join("parent");
        let child = parent.join("child");
        fs::create_dir_all(&child).unwrap();

        fs::write(parent.join("part-discovery.toml"), r#"tie_break = "lexicographic""#).unwrap();
        fs::write(child.join(".part-discovery.toml"), "stop_words = [\"kit\"]\n").unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_repo_boundary()
            .with_project_search(utf8(&child))
            .load()
            .unwrap();

        assert_eq!(config.stop_words, ["kit"]);
        assert_eq!(config.tie_break, TieBreak::FirstSeen);
        assert_eq!(sources.project_files.len(), 1);
    }

    #[test]
    fn invalid_tie_break_is_rejected() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, r#"tie_break = "random""#).unwrap();

        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&config_path))
            .load();

        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn test_load_or_error_fails_when_no_config() {
        let _lock = env_lock();
        let result = ConfigLoader::new()
            .with_user_config(false)
            .without_repo_boundary()
            .load_or_error();

        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_load_or_error_succeeds_with_explicit_file() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yml");
        fs::write(&config_path, "tie_break: lexicographic\n").unwrap();

        let (config, _sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&config_path))
            .load_or_error()
            .unwrap();

        assert_eq!(config.tie_break, TieBreak::Lexicographic);
    }

    #[test]
    fn tie_break_deserializes_from_yaml() {
        let config: Config = serde_yaml::from_str("tie_break: first-seen\n").unwrap();
        assert_eq!(config.tie_break, TieBreak::FirstSeen);
        let config: Config = serde_yaml::from_str("tie_break: lexicographic\n").unwrap();
        assert_eq!(config.tie_break, TieBreak::Lexicographic);
    }

    #[test]
    fn test_user_config_dir() {
        if let Some(path) = user_config_dir() {
            assert!(path.as_str().contains("part-discovery"));
        }
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_env_var_overrides_file_config() {
        let _lock = env_lock();

        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, r#"tie_break = "first-seen""#).unwrap();

        // SAFETY: Test environment — mutex serializes env access across tests.
        unsafe {
            std::env::set_var("PART_DISCOVERY_TIE_BREAK", "lexicographic");
        }

        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&config_path))
            .load();

        // SAFETY: Cleanup after test.
        unsafe {
            std::env::remove_var("PART_DISCOVERY_TIE_BREAK");
        }

        let (config, _sources) = result.unwrap();
        assert_eq!(config.tie_break, TieBreak::Lexicographic);
    }

    #[test]
    #[allow(unsafe_code)]
    fn env_var_masks_invalid_file_value() {
        let _lock = env_lock();

        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, r#"tie_break = "random""#).unwrap();

        // SAFETY: Test environment — mutex serializes env access across tests.
        unsafe {
            std::env::set_var("PART_DISCOVERY_TIE_BREAK", "lexicographic");
        }

        let masked = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&config_path))
            .load();

        // SAFETY: Cleanup after test.
        unsafe {
            std::env::remove_var("PART_DISCOVERY_TIE_BREAK");
        }

        let unmasked = ConfigLoader::new()
            .with_user_config(false)
            .with_file(utf8(&config_path))
            .load();

        assert_eq!(masked.unwrap().0.tie_break, TieBreak::Lexicographic);
        assert!(matches!(unmasked, Err(ConfigError::Deserialize(_))));
    }
}
