//! # Platform Errors
//!
//! Platform-wide error taxonomy with stable codes and locale-aware messages.
//!
//! ## Design Philosophy
//!
//! 1. **Every failure carries a code** from a closed registry ([`ErrorCode`])
//! 2. **Messages are resolved on demand**, for whichever locale the consumer needs
//! 3. **Resolution always produces text**, falling back to a generic template
//! 4. **Resolution is pure**: no hidden mutation, safe from any thread
//! 5. **No global state**: catalogs are injected through [`MessageResolver`]
//!
//! ## Anatomy of an error
//!
//! A [`PlatformError`] holds:
//!
//! - a **code**, the stable identifier used as the catalog key
//! - an optional **cause**, the underlying failure, exposed through
//!   [`std::error::Error::source`]
//! - positional **arguments** ([`MessageArg`]) substituted into the template
//!
//! The human-readable text is not stored. It is computed from the code, the
//! arguments, a [`MessageCatalog`] and a [`Locale`] each time it is asked
//! for; see [`resolve`] for the exact algorithm.
//!
//! ## Quick Start
//!
//! ```rust
//! use platform_errors::{ErrorCode, Locale, MessageResolver, PlatformError, Result, StaticCatalog};
//!
//! fn connect(host: &str) -> Result<()> {
//!     Err(PlatformError::with_args(ErrorCode::ConnectionFailed, [host]))
//! }
//!
//! let catalog = StaticCatalog::new()
//!     .with_entry(Locale::ROOT, "CONNECTION_FAILED", "Failed to connect to {0}")
//!     .with_entry(Locale::GERMANY, "CONNECTION_FAILED", "Verbindung zu {0} fehlgeschlagen");
//! let resolver = MessageResolver::new(catalog).with_display_locale(Locale::GERMANY);
//!
//! let err = connect("10.0.0.1").unwrap_err();
//! assert_eq!(err.code(), Some(ErrorCode::ConnectionFailed));
//!
//! // Canonical locale, for APIs and logs:
//! assert_eq!(resolver.message(&err), "Failed to connect to 10.0.0.1");
//! // Display locale, for people:
//! assert_eq!(resolver.localized_message(&err), "Verbindung zu 10.0.0.1 fehlgeschlagen");
//! ```
//!
//! ## Without a catalog
//!
//! `Display` resolves against no catalog at all, so it always prints the
//! generic form:
//!
//! ```rust
//! use platform_errors::PlatformError;
//!
//! let err = PlatformError::internal("disk full").with_arg("retry later");
//! assert_eq!(err.to_string(), "Generic Error - INTERNAL_ERROR: disk full - retry later");
//! ```
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]. A locale without a bundle is
//! reported at `debug`, other catalog misses at `warn`;
//! [`ErrorRecord::emit`] writes a whole error at `error`. `Display` never
//! consults a catalog and logs nothing. No subscriber is installed here.

#![warn(missing_docs)]
#![warn(clippy::all)]

use smallvec::SmallVec;
use std::error::Error;
use std::fmt;
use std::result;
use zeroize::Zeroize;

pub mod catalog;
pub mod codes;
pub mod config;
pub mod convenience;
pub mod definitions;
pub mod deployment;
pub mod format;
pub mod locale;
pub mod logging;
pub mod resolve;

pub use catalog::*;
pub use codes::*;
pub use config::*;
pub use definitions::*;
pub use deployment::*;
pub use format::*;
pub use locale::*;
pub use logging::*;
pub use resolve::*;

/// Type alias for Results using our error type.
pub type Result<T> = result::Result<T, PlatformError>;

/// Boxed cause accepted by the constructors.
pub type BoxError = Box<dyn Error + Send + Sync>;

// ============================================================================
// Arguments
// ============================================================================

/// Positional message arguments, zeroized on drop.
struct Arguments(SmallVec<[MessageArg; 4]>);

impl Arguments {
    fn collect<I, A>(args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<MessageArg>,
    {
        Self(args.into_iter().map(Into::into).collect())
    }
}

impl Zeroize for Arguments {
    fn zeroize(&mut self) {
        for arg in self.0.iter_mut() {
            arg.zeroize();
        }
        self.0.clear();
    }
}

impl Drop for Arguments {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// ============================================================================
// PlatformError
// ============================================================================

/// The platform's error carrier: a code, an optional cause, and arguments.
///
/// # Construction
///
/// Prefer a specific [`ErrorCode`]:
///
/// - [`new`](Self::new): code only
/// - [`with_args`](Self::with_args): code and arguments
/// - [`with_cause`](Self::with_cause): code, underlying failure, arguments
///
/// The `internal*` factories exist for call sites with no applicable code.
/// They produce [`ErrorCode::InternalError`] with the message as the single
/// argument. Every use is a gap in the registry; keep them rare.
///
/// # Propagation
///
/// The error owns its cause and is moved up the call chain. When wrapping
/// it in another failure, pass it as that failure's cause so the chain
/// stays intact.
///
/// # Messages
///
/// The message is resolved lazily and never stored; see [`resolve`] and
/// [`MessageResolver`]. Resolution does not mutate the error, so a shared
/// `&PlatformError` can be rendered from any number of threads.
#[must_use = "errors should be handled or logged"]
pub struct PlatformError {
    code: Option<ErrorCode>,
    arguments: Arguments,
    source: Option<BoxError>,
}

impl PlatformError {
    /// Error with a code and nothing else.
    #[inline]
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code: Some(code),
            arguments: Arguments(SmallVec::new()),
            source: None,
        }
    }

    /// Error with a code and positional arguments.
    ///
    /// ```rust
    /// use platform_errors::{ErrorCode, MessageArg, PlatformError};
    ///
    /// let err = PlatformError::with_args(ErrorCode::InvalidParameter, ["timeout", "-5"]);
    /// assert_eq!(err.arguments(), &[MessageArg::from("timeout"), MessageArg::from("-5")]);
    /// ```
    pub fn with_args<I, A>(code: ErrorCode, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<MessageArg>,
    {
        Self {
            code: Some(code),
            arguments: Arguments::collect(args),
            source: None,
        }
    }

    /// Error with a code, the failure that caused it, and arguments.
    pub fn with_cause<E, I, A>(code: ErrorCode, cause: E, args: I) -> Self
    where
        E: Into<BoxError>,
        I: IntoIterator<Item = A>,
        A: Into<MessageArg>,
    {
        Self {
            code: Some(code),
            arguments: Arguments::collect(args),
            source: Some(cause.into()),
        }
    }

    /// Error without any code. Resolves like [`ErrorCode::InternalError`]
    /// but is labeled `Unknown` in the generic template.
    pub fn uncoded<I, A>(args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<MessageArg>,
    {
        Self {
            code: None,
            arguments: Arguments::collect(args),
            source: None,
        }
    }

    /// [`ErrorCode::InternalError`] carrying only a message.
    ///
    /// Use a specific code whenever one applies.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_args(ErrorCode::InternalError, [message.into()])
    }

    /// [`ErrorCode::InternalError`] carrying a cause and a message.
    ///
    /// Use a specific code whenever one applies.
    pub fn internal_with_cause(cause: impl Into<BoxError>, message: impl Into<String>) -> Self {
        Self::with_cause(ErrorCode::InternalError, cause, [message.into()])
    }

    /// [`ErrorCode::InternalError`] carrying only a cause; the message is empty.
    ///
    /// Use a specific code whenever one applies.
    pub fn internal_from(cause: impl Into<BoxError>) -> Self {
        Self::internal_with_cause(cause, String::new())
    }

    /// Append one argument.
    #[inline]
    pub fn with_arg(mut self, arg: impl Into<MessageArg>) -> Self {
        self.arguments.0.push(arg.into());
        self
    }

    /// Attach or replace the cause.
    #[inline]
    pub fn with_source(mut self, cause: impl Into<BoxError>) -> Self {
        self.source = Some(cause.into());
        self
    }

    /// The error code, `None` only for [`uncoded`](Self::uncoded) errors.
    #[inline]
    pub const fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Whether this error resolves through the internal/generic rules.
    #[inline]
    pub fn is_internal(&self) -> bool {
        self.code.is_none_or(ErrorCode::is_internal)
    }

    /// Positional arguments, in order.
    #[inline]
    pub fn arguments(&self) -> &[MessageArg] {
        &self.arguments.0
    }

    /// Take the cause out of the error.
    pub fn into_source(mut self) -> Option<BoxError> {
        self.source.take()
    }

    /// Resolve the message against `catalog` in `locale`.
    ///
    /// Never fails: missing bundles, entries and malformed templates all
    /// degrade to the generic template.
    pub fn message_in(&self, catalog: &dyn MessageCatalog, locale: &Locale) -> String {
        resolve::resolve_message(self.code, self.arguments(), catalog, locale)
    }

    /// Borrowed view for structured logging.
    ///
    /// The record cannot outlive the error.
    #[inline]
    pub fn record(&self) -> ErrorRecord<'_> {
        ErrorRecord::new(self.code, self.arguments(), self.source())
    }

    /// Callback-style access to [`record`](Self::record).
    #[inline]
    pub fn with_record<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ErrorRecord<'_>) -> R,
    {
        f(&self.record())
    }
}

impl fmt::Debug for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformError")
            .field("code", &self.code)
            .field("arguments", &self.arguments())
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for PlatformError {
    /// Canonical-locale message without a catalog, i.e. the generic form:
    /// `Generic Error - {CODE}: {arguments}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&resolve::generic_message(self.code, self.arguments(), &Locale::US))
    }
}

impl Error for PlatformError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}
