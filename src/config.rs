//! Catalog configuration.
//!
//! [`CatalogConfig`] decides where message templates come from and which
//! locales a [`MessageResolver`] renders in. It is read from TOML:
//!
//! ```toml
//! base_name = "platform_messages"
//! directory = "/etc/platform/messages"
//! cache = true
//! canonical_locale = "en_US"
//! display_locale = "de_DE"
//! ```
//!
//! or from the environment with [`CatalogConfig::from_env`]. Every field is
//! optional; the defaults resolve against the catalog shipped in this crate.

use crate::catalog::{
    BUILTIN_BASE_NAME, CachedCatalog, CatalogError, DirectoryCatalog, MessageCatalog, NoCatalog,
    StaticCatalog,
};
use crate::locale::{Locale, LocaleError};
use crate::resolve::MessageResolver;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the catalog directory.
pub const ENV_CATALOG_DIR: &str = "PLATFORM_ERRORS_CATALOG_DIR";
/// Environment variable naming the display locale.
pub const ENV_LOCALE: &str = "PLATFORM_ERRORS_LOCALE";
/// Environment variable switching the bundle cache on or off.
pub const ENV_CACHE: &str = "PLATFORM_ERRORS_CACHE";
/// Environment variable overriding the bundle base name.
pub const ENV_BASE_NAME: &str = "PLATFORM_ERRORS_BASE_NAME";

/// Errors produced while loading or applying a [`CatalogConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document is malformed or has unknown fields.
    #[error("invalid catalog configuration")]
    Parse(#[from] toml::de::Error),
    /// A locale field does not parse.
    #[error("invalid {field} '{value}'")]
    Locale {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        #[source]
        source: LocaleError,
    },
    /// An environment variable holds an unusable value.
    #[error("invalid value '{value}' for {var}")]
    Env {
        /// Variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
    /// The configured catalog directory does not exist.
    #[error("catalog directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),
    /// The built-in catalog failed to load.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Where templates come from and which locales messages render in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Bundle base name; files are `<base_name>[_<tag>].toml`.
    pub base_name: String,
    /// Directory holding bundle files. Takes precedence over `builtin`.
    pub directory: Option<PathBuf>,
    /// Keep loaded bundles in memory until invalidated.
    pub cache: bool,
    /// Use the catalog shipped with the crate when no directory is set.
    pub builtin: bool,
    /// Locale for programmatic messages.
    pub canonical_locale: String,
    /// Locale for human display; the process locale when unset.
    pub display_locale: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_name: BUILTIN_BASE_NAME.to_owned(),
            directory: None,
            cache: false,
            builtin: true,
            canonical_locale: Locale::US.tag(),
            display_locale: None,
        }
    }
}

impl CatalogConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Defaults overridden by the `PLATFORM_ERRORS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    ///
    /// [`from_env`](Self::from_env) passes the process environment; tests
    /// pass a map.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        if let Some(dir) = lookup(ENV_CATALOG_DIR) {
            self.directory = Some(PathBuf::from(dir));
        }
        if let Some(base_name) = lookup(ENV_BASE_NAME) {
            self.base_name = base_name;
        }
        if let Some(locale) = lookup(ENV_LOCALE) {
            self.display_locale = Some(locale);
        }
        if let Some(cache) = lookup(ENV_CACHE) {
            self.cache = parse_flag(&cache).ok_or(ConfigError::Env {
                var: ENV_CACHE,
                value: cache,
            })?;
        }
        Ok(self)
    }

    /// Parsed canonical locale.
    pub fn canonical_locale(&self) -> Result<Locale, ConfigError> {
        parse_locale("canonical_locale", &self.canonical_locale)
    }

    /// Parsed display locale, or the process locale when unset.
    pub fn display_locale(&self) -> Result<Locale, ConfigError> {
        match &self.display_locale {
            Some(tag) => parse_locale("display_locale", tag),
            None => Ok(Locale::system_default()),
        }
    }

    /// Build the configured catalog.
    ///
    /// A directory wins over the built-in catalog; with neither, the result
    /// is [`NoCatalog`] and every message takes the generic form.
    pub fn build_catalog(&self) -> Result<Arc<dyn MessageCatalog>, ConfigError> {
        if let Some(dir) = &self.directory {
            if !dir.is_dir() {
                return Err(ConfigError::MissingDirectory(dir.clone()));
            }
            debug!(dir = %dir.display(), base_name = %self.base_name, cache = self.cache, "using directory catalog");
            let catalog = DirectoryCatalog::new(dir.clone(), self.base_name.clone());
            let catalog: Arc<dyn MessageCatalog> = if self.cache {
                Arc::new(CachedCatalog::new(catalog))
            } else {
                Arc::new(catalog)
            };
            return Ok(catalog);
        }

        if self.builtin {
            debug!("using built-in catalog");
            return Ok(Arc::new(StaticCatalog::builtin()?));
        }

        debug!("no catalog configured");
        Ok(Arc::new(NoCatalog))
    }

    /// Build a resolver from this configuration.
    pub fn build_resolver(&self) -> Result<MessageResolver, ConfigError> {
        let canonical = self.canonical_locale()?;
        let display = self.display_locale()?;
        Ok(MessageResolver::from_shared(self.build_catalog()?)
            .with_canonical_locale(canonical)
            .with_display_locale(display))
    }
}

fn parse_locale(field: &'static str, value: &str) -> Result<Locale, ConfigError> {
    Locale::parse(value).map_err(|source| ConfigError::Locale {
        field,
        value: value.to_owned(),
        source,
    })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
