//! Message catalogs: locale-indexed templates keyed by error code name.
//!
//! A catalog is an external collaborator of message resolution. Resolution
//! only needs one thing from it: given a locale, produce the bundle of
//! templates for that locale, or fail. Failures are never surfaced to the
//! caller of `message()`; they turn into the generic template instead.
//!
//! # Bundle selection
//!
//! Every implementation here follows the same search chain, from
//! [`Locale::candidates`]: `lang_COUNTRY_variant`, `lang_COUNTRY`, `lang`,
//! then the root bundle. All bundles found along the chain are merged, the
//! more specific ones overriding the less specific. Loading fails with
//! [`CatalogError::NotFound`] only if no bundle exists anywhere on the chain.
//!
//! # Bundle files
//!
//! [`DirectoryCatalog`] reads TOML files with one string per code name:
//!
//! ```toml
//! # platform_messages_de.toml
//! CONNECTION_FAILED = "Verbindung zu {0} fehlgeschlagen"
//! TIMED_OUT = "Zeitüberschreitung nach {0} ms"
//! ```
//!
//! The root bundle is `<base_name>.toml`, locale bundles are
//! `<base_name>_<tag>.toml` where `<tag>` is [`Locale::tag`].
//!
//! # Caching
//!
//! [`DirectoryCatalog`] reads the disk on every load, so edits are visible
//! immediately. Wrap it in [`CachedCatalog`] to pay that cost once per
//! locale; the cache then serves the first successful load until
//! [`CachedCatalog::invalidate`] is called.

use crate::Locale;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tracing::debug;

/// Base name of the bundles shipped with this crate.
pub const BUILTIN_BASE_NAME: &str = "platform_messages";

const BUILTIN_BUNDLES: &[(&str, &str)] = &[
    ("", include_str!("../catalog/platform_messages.toml")),
    ("de", include_str!("../catalog/platform_messages_de.toml")),
    ("it", include_str!("../catalog/platform_messages_it.toml")),
];

/// Errors produced while loading a bundle.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No bundle exists for the locale or any of its fallbacks.
    #[error("no message bundle for locale {locale}")]
    NotFound {
        /// The requested locale.
        locale: Locale,
    },
    /// A bundle file exists but could not be read.
    #[error("failed to read message bundle {}", .path.display())]
    Io {
        /// The bundle file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A bundle file is not a flat table of strings.
    #[error("failed to parse message bundle {}", .path.display())]
    Parse {
        /// The bundle file, or the bundle's name for in-memory sources.
        path: PathBuf,
        /// Underlying TOML failure.
        #[source]
        source: toml::de::Error,
    },
}

/// Templates for one locale, merged along its fallback chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBundle {
    locale: Option<Locale>,
    entries: HashMap<String, String>,
}

impl MessageBundle {
    /// Build a bundle from key/template pairs.
    pub fn new<K, V>(locale: Locale, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            locale: Some(locale),
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The locale this bundle was loaded for.
    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    /// Template stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bundle holds no templates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, template)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Source of message bundles.
///
/// Implementations must be safe for concurrent reads; resolution may call
/// [`load`](Self::load) from any thread, on every message request.
pub trait MessageCatalog: Send + Sync {
    /// Load the merged bundle for `locale`.
    fn load(&self, locale: &Locale) -> Result<Arc<MessageBundle>, CatalogError>;

    /// Template for `key` in `locale`, or `None` if the bundle or key is missing.
    fn lookup(&self, locale: &Locale, key: &str) -> Option<String> {
        self.load(locale).ok()?.get(key).map(str::to_owned)
    }
}

impl<C: MessageCatalog + ?Sized> MessageCatalog for &C {
    fn load(&self, locale: &Locale) -> Result<Arc<MessageBundle>, CatalogError> {
        (**self).load(locale)
    }
}

impl<C: MessageCatalog + ?Sized> MessageCatalog for Arc<C> {
    fn load(&self, locale: &Locale) -> Result<Arc<MessageBundle>, CatalogError> {
        (**self).load(locale)
    }
}

impl<C: MessageCatalog + ?Sized> MessageCatalog for Box<C> {
    fn load(&self, locale: &Locale) -> Result<Arc<MessageBundle>, CatalogError> {
        (**self).load(locale)
    }
}

/// Walk the candidate chain from root to most specific, merging what `fetch` finds.
fn merge_chain<F>(locale: &Locale, mut fetch: F) -> Result<MessageBundle, CatalogError>
where
    F: FnMut(&Locale) -> Result<Option<HashMap<String, String>>, CatalogError>,
{
    let mut merged: Option<HashMap<String, String>> = None;
    for candidate in locale.candidates().iter().rev() {
        if let Some(entries) = fetch(candidate)? {
            merged.get_or_insert_with(HashMap::new).extend(entries);
        }
    }

    match merged {
        Some(entries) => Ok(MessageBundle {
            locale: Some(locale.clone()),
            entries,
        }),
        None => Err(CatalogError::NotFound {
            locale: locale.clone(),
        }),
    }
}

fn parse_bundle(text: &str, path: &Path) -> Result<HashMap<String, String>, CatalogError> {
    toml::from_str(text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// NoCatalog
// ============================================================================

/// A catalog with no bundles at all; every message uses the generic template.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCatalog;

impl MessageCatalog for NoCatalog {
    fn load(&self, locale: &Locale) -> Result<Arc<MessageBundle>, CatalogError> {
        Err(CatalogError::NotFound {
            locale: locale.clone(),
        })
    }
}

// ============================================================================
// StaticCatalog
// ============================================================================

/// In-memory bundles, assembled up front.
///
/// ```rust
/// use platform_errors::{Locale, MessageCatalog, StaticCatalog};
///
/// let catalog = StaticCatalog::new()
///     .with_entry(Locale::ROOT, "TIMED_OUT", "Timed out after {0} ms")
///     .with_entry(Locale::GERMANY, "TIMED_OUT", "Zeitüberschreitung nach {0} ms");
///
/// assert_eq!(
///     catalog.lookup(&Locale::GERMANY, "TIMED_OUT").as_deref(),
///     Some("Zeitüberschreitung nach {0} ms")
/// );
/// // en_US falls back to the root bundle.
/// assert_eq!(
///     catalog.lookup(&Locale::US, "TIMED_OUT").as_deref(),
///     Some("Timed out after {0} ms")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    bundles: HashMap<Locale, HashMap<String, String>>,
}

impl StaticCatalog {
    /// An empty catalog. Every load fails until a bundle is added.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundles shipped under `catalog/` (root, German, Italian).
    pub fn builtin() -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for (tag, text) in BUILTIN_BUNDLES {
            let name = if tag.is_empty() {
                format!("{BUILTIN_BASE_NAME}.toml")
            } else {
                format!("{BUILTIN_BASE_NAME}_{tag}.toml")
            };
            let entries = parse_bundle(text, Path::new(&name))?;
            let locale = if tag.is_empty() {
                Locale::ROOT
            } else {
                Locale::new(tag, "")
            };
            catalog = catalog.with_bundle(locale, entries);
        }
        Ok(catalog)
    }

    /// Add templates for `locale`, replacing existing keys.
    #[must_use]
    pub fn with_bundle<K, V>(mut self, locale: Locale, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.bundles
            .entry(locale)
            .or_default()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add one template for `locale`.
    #[must_use]
    pub fn with_entry(self, locale: Locale, key: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.with_bundle(locale, [(key.into(), pattern.into())])
    }

    /// Locales that have a bundle of their own.
    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.bundles.keys()
    }
}

impl MessageCatalog for StaticCatalog {
    fn load(&self, locale: &Locale) -> Result<Arc<MessageBundle>, CatalogError> {
        merge_chain(locale, |candidate| Ok(self.bundles.get(candidate).cloned())).map(Arc::new)
    }
}

// ============================================================================
// DirectoryCatalog
// ============================================================================

/// Bundles read from TOML files in a directory, on every load.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    dir: PathBuf,
    base_name: String,
}

impl DirectoryCatalog {
    /// Catalog reading `<dir>/<base_name>[_<tag>].toml`.
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
        }
    }

    /// Directory holding the bundle files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name prefix shared by all bundles.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Path of the bundle file for exactly `locale` (no fallback).
    pub fn bundle_path(&self, locale: &Locale) -> PathBuf {
        if locale.is_root() {
            self.dir.join(format!("{}.toml", self.base_name))
        } else {
            self.dir.join(format!("{}_{}.toml", self.base_name, locale.tag()))
        }
    }

    fn read_bundle(&self, locale: &Locale) -> Result<Option<HashMap<String, String>>, CatalogError> {
        // Hand-built locales can carry any text; only plain tags name a file.
        let tag = locale.tag();
        if !tag.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            debug!(%tag, "locale tag cannot name a bundle file");
            return Ok(None);
        }
        let path = self.bundle_path(locale);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CatalogError::Io { path, source }),
        };
        let entries = parse_bundle(&text, &path)?;
        debug!(path = %path.display(), entries = entries.len(), "loaded message bundle");
        Ok(Some(entries))
    }
}

impl MessageCatalog for DirectoryCatalog {
    fn load(&self, locale: &Locale) -> Result<Arc<MessageBundle>, CatalogError> {
        merge_chain(locale, |candidate| self.read_bundle(candidate)).map(Arc::new)
    }
}

// ============================================================================
// CachedCatalog
// ============================================================================

/// Per-locale cache in front of another catalog.
///
/// Only successful loads are cached, so a locale whose bundle appears later
/// is picked up on the next request. A cached bundle is served unchanged
/// until [`invalidate`](Self::invalidate) or
/// [`invalidate_locale`](Self::invalidate_locale) drops it.
///
/// There is no eviction: the cache holds one entry per distinct locale that
/// loaded successfully, so its size is bounded only by the set of locales
/// callers pass in. That set is small when locales come from configuration.
/// When they come from request input, normalize them to a known list first
/// or call [`invalidate`](Self::invalidate) periodically.
#[derive(Debug)]
pub struct CachedCatalog<C> {
    inner: C,
    cache: RwLock<HashMap<Locale, Arc<MessageBundle>>>,
}

impl<C: MessageCatalog> CachedCatalog<C> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The wrapped catalog.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Drop every cached bundle; the next load of each locale hits `inner`.
    pub fn invalidate(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Drop the cached bundle for `locale` only.
    pub fn invalidate_locale(&self, locale: &Locale) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(locale);
    }

    /// Number of locales currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<C: MessageCatalog> MessageCatalog for CachedCatalog<C> {
    fn load(&self, locale: &Locale) -> Result<Arc<MessageBundle>, CatalogError> {
        if let Some(bundle) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(locale)
        {
            return Ok(Arc::clone(bundle));
        }

        let bundle = self.inner.load(locale)?;
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(locale.clone())
            .or_insert_with(|| Arc::clone(&bundle));
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn no_catalog_never_loads() {
        assert!(matches!(
            NoCatalog.load(&Locale::US),
            Err(CatalogError::NotFound { .. })
        ));
        assert_eq!(NoCatalog.lookup(&Locale::US, "TIMED_OUT"), None);
    }

    #[test]
    fn static_catalog_merges_fallback_chain() {
        let catalog = StaticCatalog::new()
            .with_bundle(Locale::ROOT, [("A", "root a"), ("B", "root b")])
            .with_entry(Locale::new("en", ""), "B", "en b")
            .with_entry(Locale::US, "C", "en_US c");

        let bundle = catalog.load(&Locale::US).unwrap();
        assert_eq!(bundle.get("A"), Some("root a"));
        assert_eq!(bundle.get("B"), Some("en b"));
        assert_eq!(bundle.get("C"), Some("en_US c"));
        assert_eq!(bundle.len(), 3);
        assert_eq!(bundle.locale(), Some(&Locale::US));
    }

    #[test]
    fn static_catalog_without_matching_chain_is_not_found() {
        let catalog = StaticCatalog::new().with_entry(Locale::GERMANY, "A", "a");
        assert!(matches!(
            catalog.load(&Locale::FRANCE),
            Err(CatalogError::NotFound { .. })
        ));
    }

    #[test]
    fn builtin_catalog_parses_and_covers_internal_error() {
        let catalog = StaticCatalog::builtin().unwrap();
        let root = catalog.load(&Locale::ROOT).unwrap();
        for code in ErrorCode::ALL {
            assert!(root.get(code.name()).is_some(), "missing template for {code}");
        }
        assert!(catalog.lookup(&Locale::GERMANY, "INTERNAL_ERROR").is_some());
    }

    #[test]
    fn builtin_templates_are_valid_patterns() {
        let catalog = StaticCatalog::builtin().unwrap();
        for locale in catalog.locales() {
            let bundle = catalog.load(locale).unwrap();
            for (key, pattern) in bundle.iter() {
                assert!(
                    crate::MessagePattern::parse(pattern).is_ok(),
                    "{locale} {key}: invalid pattern {pattern:?}"
                );
            }
        }
    }

    #[test]
    fn directory_catalog_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("msgs.toml"), "A = \"root a\"\nB = \"root b\"\n").unwrap();
        fs::write(dir.path().join("msgs_de.toml"), "B = \"de b\"\n").unwrap();

        let catalog = DirectoryCatalog::new(dir.path(), "msgs");
        let bundle = catalog.load(&Locale::GERMANY).unwrap();
        assert_eq!(bundle.get("A"), Some("root a"));
        assert_eq!(bundle.get("B"), Some("de b"));
    }

    #[test]
    fn directory_catalog_sees_edits_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msgs.toml");
        fs::write(&path, "A = \"first\"\n").unwrap();

        let catalog = DirectoryCatalog::new(dir.path(), "msgs");
        assert_eq!(catalog.lookup(&Locale::US, "A").as_deref(), Some("first"));

        fs::write(&path, "A = \"second\"\n").unwrap();
        assert_eq!(catalog.lookup(&Locale::US, "A").as_deref(), Some("second"));
    }

    #[test]
    fn directory_catalog_reports_missing_and_malformed_bundles() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = DirectoryCatalog::new(dir.path(), "msgs");
        assert!(matches!(
            catalog.load(&Locale::US),
            Err(CatalogError::NotFound { .. })
        ));

        fs::write(dir.path().join("msgs.toml"), "A = 42\n").unwrap();
        let err = catalog.load(&Locale::US).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
        assert!(err.to_string().contains("msgs.toml"));
    }

    #[test]
    fn bundle_paths_use_locale_tags() {
        let catalog = DirectoryCatalog::new("/etc/platform", "messages");
        assert_eq!(catalog.bundle_path(&Locale::ROOT), Path::new("/etc/platform/messages.toml"));
        assert_eq!(catalog.bundle_path(&Locale::US), Path::new("/etc/platform/messages_en_US.toml"));
    }

    struct CountingCatalog {
        inner: StaticCatalog,
        loads: AtomicUsize,
    }

    impl MessageCatalog for CountingCatalog {
        fn load(&self, locale: &Locale) -> Result<Arc<MessageBundle>, CatalogError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.inner.load(locale)
        }
    }

    #[test]
    fn cached_catalog_loads_once_until_invalidated() {
        let cached = CachedCatalog::new(CountingCatalog {
            inner: StaticCatalog::new().with_entry(Locale::ROOT, "A", "a"),
            loads: AtomicUsize::new(0),
        });

        for _ in 0..3 {
            assert_eq!(cached.lookup(&Locale::US, "A").as_deref(), Some("a"));
        }
        assert_eq!(cached.inner().loads.load(Ordering::SeqCst), 1);
        assert_eq!(cached.cached_len(), 1);

        cached.invalidate();
        assert_eq!(cached.cached_len(), 0);
        cached.load(&Locale::US).unwrap();
        assert_eq!(cached.inner().loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cached_catalog_grows_one_entry_per_distinct_locale() {
        let cached = CachedCatalog::new(StaticCatalog::new().with_entry(Locale::ROOT, "A", "a"));
        let locales = [Locale::US, Locale::UK, Locale::GERMANY, Locale::FRANCE, Locale::ROOT];

        for (i, locale) in locales.iter().enumerate() {
            cached.load(locale).unwrap();
            cached.load(locale).unwrap();
            assert_eq!(cached.cached_len(), i + 1);
        }

        cached.invalidate_locale(&Locale::UK);
        assert_eq!(cached.cached_len(), locales.len() - 1);
        cached.invalidate();
        assert_eq!(cached.cached_len(), 0);
    }

    #[test]
    fn directory_catalog_ignores_tags_that_are_not_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let bundles = dir.path().join("bundles");
        fs::create_dir_all(bundles.join("msgs_en_US_x")).unwrap();
        fs::write(bundles.join("msgs.toml"), "A = \"root\"\n").unwrap();
        fs::write(dir.path().join("leak.toml"), "A = \"leaked\"\n").unwrap();

        let catalog = DirectoryCatalog::new(bundles.as_path(), "msgs");
        let crafted = Locale::US.with_variant("x/../../leak");
        assert_eq!(catalog.lookup(&crafted, "A").as_deref(), Some("root"));
    }

    #[test]
    fn cached_catalog_serves_stale_bundle_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msgs.toml");
        fs::write(&path, "A = \"first\"\n").unwrap();

        let cached = CachedCatalog::new(DirectoryCatalog::new(dir.path(), "msgs"));
        assert_eq!(cached.lookup(&Locale::US, "A").as_deref(), Some("first"));

        fs::write(&path, "A = \"second\"\n").unwrap();
        assert_eq!(cached.lookup(&Locale::US, "A").as_deref(), Some("first"));

        cached.invalidate_locale(&Locale::US);
        assert_eq!(cached.lookup(&Locale::US, "A").as_deref(), Some("second"));
    }

    #[test]
    fn cached_catalog_does_not_cache_failures() {
        let dir = tempfile::tempdir().unwrap();
        let cached = CachedCatalog::new(DirectoryCatalog::new(dir.path(), "msgs"));
        assert!(cached.load(&Locale::US).is_err());
        assert_eq!(cached.cached_len(), 0);

        fs::write(dir.path().join("msgs.toml"), "A = \"late\"\n").unwrap();
        assert_eq!(cached.lookup(&Locale::US, "A").as_deref(), Some("late"));
    }
}
