//! The composition root shared by commands: config, languages, and scanned tools.

use crate::{
    config::{Config, Source},
    diagnostics::Diagnostics,
    error::{Error, Result},
    language::Languages,
    scanner::Scan,
    tool::Tool,
};

/// Configuration plus the tools found in every registered source.
pub struct Catalog {
    /// Loaded configuration.
    pub(crate) config: Config,
    /// Language handlers built from the settings.
    pub(crate) languages: Languages,
    /// Scan of every registered source.
    pub(crate) scan: Scan,
}

impl Catalog {
    /// Load configuration and scan every source, reporting scan findings as warnings.
    pub(crate) fn load(diagnostics: &mut Diagnostics) -> Result<Self> {
        let config = Config::load(diagnostics)?;
        Ok(Self::from_config(config, diagnostics))
    }

    /// Scan the sources of an already loaded configuration.
    pub(crate) fn from_config(config: Config, diagnostics: &mut Diagnostics) -> Self {
        let languages = Languages::builtin(config.settings());
        let scan = languages.scan_directories(&config.source_paths());
        scan.report(diagnostics);
        Self {
            config,
            languages,
            scan,
        }
    }

    /// Return true when no source is registered.
    pub(crate) fn has_no_sources(&self) -> bool {
        self.config.sources().is_empty()
    }

    /// Look up a tool by name.
    pub(crate) fn tool(&self, name: &str) -> Result<&Tool> {
        self.scan
            .registry
            .get(name)
            .ok_or_else(|| Error::ToolNotFound {
                name: name.to_string(),
            })
    }

    /// Tools whose file lives under `source`, in name order.
    pub(crate) fn tools_in<'a>(&'a self, source: &'a Source) -> impl Iterator<Item = &'a Tool> {
        self.scan
            .registry
            .all()
            .filter(move |tool| tool.file.starts_with(&source.path))
    }
}
