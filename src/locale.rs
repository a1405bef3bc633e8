//! Locale identifiers for message resolution.
//!
//! A [`Locale`] names a language, optionally narrowed by country and
//! variant. It decides two things: which catalog bundle supplies the message
//! template, and how numeric and date arguments are rendered into it.
//!
//! Two locales are fixed entry points of the resolution API:
//!
//! - [`Locale::US`] is the canonical locale for programmatic consumers, so
//!   API responses and log lines do not depend on the host configuration.
//! - [`Locale::system_default`] is the ambient locale for human display,
//!   read from the POSIX locale environment.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use unic_langid::LanguageIdentifier;

/// Errors produced when parsing a locale tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    /// The tag was empty after stripping codeset and modifier.
    #[error("empty locale tag")]
    Empty,
    /// The tag is not a well-formed language identifier.
    #[error("invalid locale tag '{tag}': {reason}")]
    Invalid {
        /// The tag as given, without codeset and modifier.
        tag: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// A language, optionally narrowed by country and variant.
///
/// Subtags are normalized on construction: language lowercase, country
/// uppercase, variant kept as given. An empty language denotes
/// [`Locale::ROOT`], the locale of the base bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    language: Cow<'static, str>,
    country: Cow<'static, str>,
    variant: Cow<'static, str>,
}

impl Locale {
    /// The root locale: no language, selects only the base bundle.
    pub const ROOT: Locale = Locale::from_static("", "");

    /// English, United States. Canonical locale for programmatic messages.
    pub const US: Locale = Locale::from_static("en", "US");

    /// English, United Kingdom.
    pub const UK: Locale = Locale::from_static("en", "GB");

    /// German, Germany.
    pub const GERMANY: Locale = Locale::from_static("de", "DE");

    /// French, France.
    pub const FRANCE: Locale = Locale::from_static("fr", "FR");

    /// Italian, Italy.
    pub const ITALY: Locale = Locale::from_static("it", "IT");

    /// Japanese, Japan.
    pub const JAPAN: Locale = Locale::from_static("ja", "JP");

    const fn from_static(language: &'static str, country: &'static str) -> Self {
        Self {
            language: Cow::Borrowed(language),
            country: Cow::Borrowed(country),
            variant: Cow::Borrowed(""),
        }
    }

    /// Build a locale from a language and an optional country (may be empty).
    pub fn new(language: &str, country: &str) -> Self {
        Self {
            language: Cow::Owned(language.to_ascii_lowercase()),
            country: Cow::Owned(country.to_ascii_uppercase()),
            variant: Cow::Borrowed(""),
        }
    }

    /// Narrow this locale with a variant.
    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Cow::Owned(variant.into());
        self
    }

    /// Parse a POSIX or BCP-47 style tag.
    ///
    /// Accepts `en`, `en_US`, `en-US`, `en_US.UTF-8`, `de_DE@euro` and
    /// `ca_ES_valencia`. `C` and `POSIX` map to [`Locale::ROOT`].
    ///
    /// The subtags are validated by [`unic_langid`]: variants must be
    /// alphanumeric, so a parsed locale is always safe to embed in a bundle
    /// file name. A script subtag (`sr_Latn_RS`) is accepted and dropped;
    /// bundles are keyed by language, country and variant only.
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        // Codeset and modifier do not affect message selection.
        let tag = tag.split(['.', '@']).next().unwrap_or_default().trim();
        if tag.is_empty() {
            return Err(LocaleError::Empty);
        }
        if tag == "C" || tag == "POSIX" {
            return Ok(Self::ROOT);
        }

        let invalid = |reason: String| LocaleError::Invalid {
            tag: tag.to_owned(),
            reason,
        };
        let langid: LanguageIdentifier = tag.parse().map_err(|err| invalid(format!("{err}")))?;

        let language = langid.language.as_str();
        if language == "und" {
            return Err(invalid("undetermined language".to_owned()));
        }
        let country = langid.region.as_ref().map_or("", |region| region.as_str());
        let variant = langid
            .variants()
            .map(|variant| variant.as_str())
            .collect::<Vec<_>>()
            .join("_");

        let locale = Self::new(language, country);
        Ok(if variant.is_empty() {
            locale
        } else {
            locale.with_variant(variant)
        })
    }

    /// The ambient locale of the running process, for human display.
    ///
    /// Reads `LC_ALL`, then `LC_MESSAGES`, then `LANG`, taking the first
    /// variable that is set and non-empty. Falls back to [`Locale::US`] when
    /// none is set or the value does not parse.
    pub fn system_default() -> Self {
        let raw = ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty());

        match raw {
            Some(value) => Self::parse(&value).unwrap_or(Self::US),
            None => Self::US,
        }
    }

    /// Lowercase language subtag, empty for [`Locale::ROOT`].
    #[inline]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Uppercase country subtag, possibly empty.
    #[inline]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Variant subtag, possibly empty.
    #[inline]
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Whether this is [`Locale::ROOT`].
    #[inline]
    pub fn is_root(&self) -> bool {
        self.language.is_empty()
    }

    /// Underscore-joined tag (`en_US`, `ca_ES_valencia`), empty for root.
    ///
    /// This is the suffix used in bundle file names.
    pub fn tag(&self) -> String {
        let mut tag = self.language.to_string();
        if !self.country.is_empty() {
            tag.push('_');
            tag.push_str(&self.country);
        }
        if !self.variant.is_empty() {
            tag.push('_');
            tag.push_str(&self.variant);
        }
        tag
    }

    /// Bundle search chain, most specific first, always ending in root.
    ///
    /// `ca_ES_valencia` yields `[ca_ES_valencia, ca_ES, ca, ROOT]`.
    pub fn candidates(&self) -> Vec<Locale> {
        let mut chain = Vec::with_capacity(4);
        if !self.is_root() {
            if !self.variant.is_empty() {
                chain.push(self.clone());
            }
            if !self.country.is_empty() {
                chain.push(Locale {
                    language: self.language.clone(),
                    country: self.country.clone(),
                    variant: Cow::Borrowed(""),
                });
            }
            chain.push(Locale {
                language: self.language.clone(),
                country: Cow::Borrowed(""),
                variant: Cow::Borrowed(""),
            });
        }
        chain.push(Self::ROOT);
        chain
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::US
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("root")
        } else {
            f.write_str(&self.tag())
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
