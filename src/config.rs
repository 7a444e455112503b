//! Configuration loading and persistence.
//!
//! Everything lives in the config directory (see
//! [`paths::default_config_dir`]):
//!
//! - `sources.yaml` lists registered tool directories.
//! - `settings.yaml` holds optional interpreter overrides.
//!
//! Intents are not stored there. Each registered source may keep a
//! `state.yaml` in its parent directory, and all of them are merged.

use std::{
    collections::BTreeMap,
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    diagnostics::Diagnostics,
    error::{Error, Result},
    paths,
};

/// File listing registered sources.
pub const SOURCES_FILE: &str = "sources.yaml";
/// File holding global settings.
pub const SETTINGS_FILE: &str = "settings.yaml";
/// Per-project file holding intents, next to a source directory.
pub const STATE_FILE: &str = "state.yaml";

/// A registered tool directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Absolute, normalized directory path.
    pub path: PathBuf,
    /// Short name used to refer to the source.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// When the source was registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<DateTime<Utc>>,
}

/// Global settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Interpreter command for Python tools, e.g. `python3.12` or `uv run python`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,
}

/// A named group of artifacts or other intents, ensured together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Human description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Artifact or intent names, ensured in order.
    #[serde(default)]
    pub includes: Vec<String>,
}

/// On-disk layout of `sources.yaml`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SourcesFile {
    /// Registered sources in registration order.
    #[serde(default)]
    sources: Vec<Source>,
}

/// On-disk layout of `state.yaml`.
#[derive(Debug, Default, Deserialize)]
struct StateFile {
    /// Intents keyed by name.
    #[serde(default)]
    intents: BTreeMap<String, Intent>,
}

/// Loaded configuration for one CLI run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the configuration was loaded from.
    dir: PathBuf,
    /// Registered sources in registration order.
    sources: Vec<Source>,
    /// Global settings.
    settings: Settings,
    /// Intents merged from every source's state file.
    intents: BTreeMap<String, Intent>,
}

impl Config {
    /// Load the configuration from the default directory.
    pub(crate) fn load(diagnostics: &mut Diagnostics) -> Result<Self> {
        let dir = paths::default_config_dir()?;
        Self::load_from(&dir, diagnostics)
    }

    /// Load the configuration from an explicit directory.
    ///
    /// Missing files mean "nothing configured". Unreadable or invalid
    /// source and settings files are errors; a bad `state.yaml` is only a
    /// warning.
    pub(crate) fn load_from(dir: &Path, diagnostics: &mut Diagnostics) -> Result<Self> {
        let sources: SourcesFile = read_yaml(&dir.join(SOURCES_FILE))?;
        let settings: Settings = read_yaml(&dir.join(SETTINGS_FILE))?;
        let intents = load_intents(&sources.sources, diagnostics);

        Ok(Self {
            dir: dir.to_path_buf(),
            sources: sources.sources,
            settings,
            intents,
        })
    }

    /// Directory holding the configuration files.
    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    /// Registered sources in registration order.
    pub(crate) fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Paths of all registered sources, in registration order.
    pub(crate) fn source_paths(&self) -> Vec<PathBuf> {
        self.sources.iter().map(|source| source.path.clone()).collect()
    }

    /// Find a source by its name.
    pub(crate) fn find_source(&self, name: &str) -> Option<&Source> {
        self.sources.iter().find(|source| source.name == name)
    }

    /// Global settings.
    pub(crate) fn settings(&self) -> &Settings {
        &self.settings
    }

    /// All known intents.
    pub(crate) fn intents(&self) -> &BTreeMap<String, Intent> {
        &self.intents
    }

    /// Register a directory as a source and persist the change.
    ///
    /// Relative paths are resolved against the current directory. The name
    /// defaults to the directory's base name.
    pub(crate) fn add_source(&mut self, raw_path: &str, name: Option<&str>) -> Result<&Source> {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let path = paths::expand_path(raw_path, &cwd)?;

        if !path.exists() {
            return Err(Error::PathMissing { path });
        }
        if !path.is_dir() {
            return Err(Error::NotADirectory { path });
        }
        if self.sources.iter().any(|source| source.path == path) {
            return Err(Error::SourceRegistered { path });
        }

        let name = match name {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default(),
        };
        if !name.is_empty()
            && let Some(existing) = self.find_source(&name)
        {
            return Err(Error::SourceNameTaken {
                name,
                path: existing.path.clone(),
            });
        }

        self.sources.push(Source {
            path,
            name,
            added: Some(Utc::now()),
        });
        self.save()?;
        let index = self.sources.len() - 1;
        Ok(&self.sources[index])
    }

    /// Unregister every source matching a path or name and persist the change.
    pub(crate) fn remove_source(&mut self, path_or_name: &str) -> Result<Vec<Source>> {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let path = paths::expand_path(path_or_name, &cwd).ok();

        let (removed, kept): (Vec<_>, Vec<_>) = self.sources.drain(..).partition(|source| {
            source.name == path_or_name || path.as_ref() == Some(&source.path)
        });
        self.sources = kept;

        if removed.is_empty() {
            return Err(Error::SourceNotRegistered {
                name: path_or_name.to_string(),
            });
        }
        self.save()?;
        Ok(removed)
    }

    /// Write `sources.yaml`, creating the config directory if needed.
    fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|error| Error::ConfigWrite {
            path: self.dir.clone(),
            source: error,
        })?;

        let path = self.dir.join(SOURCES_FILE);
        let file = SourcesFile {
            sources: self.sources.clone(),
        };
        let contents =
            serde_yaml::to_string(&file).map_err(|error| Error::ConfigSerialize { source: error })?;
        fs::write(&path, contents).map_err(|error| Error::ConfigWrite { path, source: error })
    }
}

/// Read a YAML file, returning the default value when it does not exist.
fn read_yaml<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(error) => {
            return Err(Error::ConfigRead {
                path: path.to_path_buf(),
                source: error,
            });
        }
    };
    if contents.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(&contents).map_err(|error| Error::ConfigParse {
        path: path.to_path_buf(),
        source: error,
    })
}

/// Merge intents from the `state.yaml` beside each source, later sources winning.
fn load_intents(sources: &[Source], diagnostics: &mut Diagnostics) -> BTreeMap<String, Intent> {
    let mut intents = BTreeMap::new();
    for source in sources {
        let Some(project) = source.path.parent() else {
            continue;
        };
        let state_path = project.join(STATE_FILE);
        match read_yaml::<StateFile>(&state_path) {
            Ok(state) => intents.extend(state.intents),
            Err(error) => diagnostics.warn(format!("ignoring intents: {error}")),
        }
    }
    intents
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{Config, SOURCES_FILE, STATE_FILE};
    use crate::{diagnostics::Diagnostics, error::Error, paths::normalize_path};

    #[test]
    fn empty_directory_has_no_sources() {
        let dir = tempdir().expect("tempdir");
        let config =
            Config::load_from(&dir.path().join("missing"), &mut Diagnostics::silent()).expect("config");
        assert!(config.sources().is_empty());
        assert!(config.intents().is_empty());
        assert!(config.settings().python.is_none());
    }

    #[test]
    fn adds_and_removes_sources() {
        let dir = tempdir().expect("tempdir");
        let config_dir = dir.path().join("config");
        let tools = dir.path().join("project").join("tools");
        fs::create_dir_all(&tools).expect("mkdir");
        let tools_str = tools.to_string_lossy().to_string();

        let mut config = Config::load_from(&config_dir, &mut Diagnostics::silent()).expect("config");
        let added = config.add_source(&tools_str, None).expect("add");
        assert_eq!(added.name, "tools");
        assert_eq!(added.path, normalize_path(&tools));

        let error = config.add_source(&tools_str, Some("other")).expect_err("duplicate");
        assert!(matches!(error, Error::SourceRegistered { .. }));

        let reloaded = Config::load_from(&config_dir, &mut Diagnostics::silent()).expect("reload");
        assert_eq!(reloaded.sources().len(), 1);
        assert!(reloaded.find_source("tools").is_some());

        let mut config = reloaded;
        let removed = config.remove_source("tools").expect("remove");
        assert_eq!(removed.len(), 1);
        let error = config.remove_source("tools").expect_err("already removed");
        assert!(matches!(error, Error::SourceNotRegistered { .. }));

        let reloaded = Config::load_from(&config_dir, &mut Diagnostics::silent()).expect("reload");
        assert!(reloaded.sources().is_empty());
    }

    #[test]
    fn rejects_missing_and_non_directory_sources() {
        let dir = tempdir().expect("tempdir");
        let file = dir.path().join("file.py");
        fs::write(&file, "").expect("write");

        let mut config = Config::load_from(&dir.path().join("config"), &mut Diagnostics::silent())
            .expect("config");
        let error = config
            .add_source(&file.to_string_lossy(), None)
            .expect_err("file");
        assert!(matches!(error, Error::NotADirectory { .. }));

        let missing = dir.path().join("nope");
        let error = config
            .add_source(&missing.to_string_lossy(), None)
            .expect_err("missing");
        assert!(matches!(error, Error::PathMissing { .. }));
    }

    #[test]
    fn loads_intents_beside_sources() {
        let dir = tempdir().expect("tempdir");
        let config_dir = dir.path().join("config");
        let tools = dir.path().join("project").join("tools");
        fs::create_dir_all(&tools).expect("mkdir");
        fs::write(
            dir.path().join("project").join(STATE_FILE),
            "intents:\n  morning:\n    description: Daily refresh\n    includes: [prices, news]\n",
        )
        .expect("write state");

        let mut config = Config::load_from(&config_dir, &mut Diagnostics::silent()).expect("config");
        config.add_source(&tools.to_string_lossy(), None).expect("add");

        let config = Config::load_from(&config_dir, &mut Diagnostics::silent()).expect("reload");
        let intent = &config.intents()["morning"];
        assert_eq!(intent.description, "Daily refresh");
        assert_eq!(intent.includes, vec!["prices", "news"]);
    }

    #[test]
    fn bad_state_file_is_a_warning() {
        let dir = tempdir().expect("tempdir");
        let config_dir = dir.path().join("config");
        let tools = dir.path().join("project").join("tools");
        fs::create_dir_all(&tools).expect("mkdir");
        fs::create_dir_all(&config_dir).expect("mkdir");
        fs::write(dir.path().join("project").join(STATE_FILE), "intents: [").expect("write");
        fs::write(
            config_dir.join(SOURCES_FILE),
            format!("sources:\n  - path: {}\n    name: tools\n", tools.display()),
        )
        .expect("write sources");

        let mut diagnostics = Diagnostics::silent();
        let config = Config::load_from(&config_dir, &mut diagnostics).expect("config");
        assert_eq!(config.sources().len(), 1);
        assert!(config.intents().is_empty());
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    #[test]
    fn invalid_sources_file_is_an_error() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join(SOURCES_FILE), "sources: {").expect("write");
        let error = Config::load_from(dir.path(), &mut Diagnostics::silent()).expect_err("parse");
        assert!(matches!(error, Error::ConfigParse { .. }));
    }
}
