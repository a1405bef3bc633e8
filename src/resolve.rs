//! Message resolution: `(code, arguments, locale) -> text`.
//!
//! # Algorithm
//!
//! 1. Load the catalog bundle for the locale and take the template stored
//!    under the code's name.
//! 2. If there is one, substitute the arguments into it. When the code is
//!    absent or [`ErrorCode::InternalError`] and there are two or more
//!    arguments, they are first collapsed into a single argument, their
//!    plain text forms joined by `" - "`, because the internal template
//!    has a single free-text slot.
//! 3. If anything in step 1 fails (no bundle, no code, no entry, template
//!    does not parse), use the generic template
//!    `"Generic Error - {0}: {1}"`, formatted in two passes: first with the
//!    code name (or `"Unknown"`), which leaves `{1}` in place, then with the
//!    arguments filling `{1}`.
//!
//! Resolution never fails and never mutates the error; the collapsed
//! argument list is computed per call. A locale with no bundle is logged
//! at `debug`; unreadable bundles, missing entries and malformed templates
//! are logged at `warn`. Either way the problem is otherwise swallowed.
//!
//! # Entry points
//!
//! [`MessageResolver`] pins a catalog and two locales: the canonical one
//! for programmatic consumers ([`message`](MessageResolver::message)) and
//! the display one for humans
//! ([`localized_message`](MessageResolver::localized_message)). Build one at
//! the composition root and pass it to whatever renders errors.

use crate::catalog::{CatalogError, MessageCatalog, NoCatalog};
use crate::format::{MessageArg, MessagePattern};
use crate::{ErrorCode, Locale, PlatformError};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Template used when no catalog entry resolves.
pub const GENERIC_MESSAGE_PATTERN: &str = "Generic Error - {0}: {1}";

/// Label embedded in the generic template when the error has no code.
pub const UNKNOWN_CODE_LABEL: &str = "Unknown";

/// Separator placed between collapsed arguments.
pub const ARGUMENT_SEPARATOR: &str = " - ";

/// Resolve the message for `code` and `args` in `locale`.
///
/// This is the whole algorithm; [`PlatformError::message_in`] and
/// [`MessageResolver`] delegate here.
pub fn resolve_message(
    code: Option<ErrorCode>,
    args: &[MessageArg],
    catalog: &dyn MessageCatalog,
    locale: &Locale,
) -> String {
    match catalog_pattern(catalog, locale, code) {
        Some(pattern) => pattern.format(&effective_arguments(code, args), locale),
        None => generic_message(code, args, locale),
    }
}

/// Plain text forms of `args` joined by [`ARGUMENT_SEPARATOR`].
pub fn join_arguments(args: &[MessageArg]) -> String {
    let mut joined = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            joined.push_str(ARGUMENT_SEPARATOR);
        }
        joined.push_str(&arg.to_string());
    }
    joined
}

/// Arguments as substituted into a catalog template.
///
/// Absent and internal codes with more than one argument get a single
/// collapsed argument; everything else is passed through untouched.
pub fn effective_arguments(code: Option<ErrorCode>, args: &[MessageArg]) -> Cow<'_, [MessageArg]> {
    if code.is_none_or(ErrorCode::is_internal) && args.len() > 1 {
        Cow::Owned(vec![MessageArg::Text(join_arguments(args))])
    } else {
        Cow::Borrowed(args)
    }
}

fn catalog_pattern(
    catalog: &dyn MessageCatalog,
    locale: &Locale,
    code: Option<ErrorCode>,
) -> Option<MessagePattern> {
    let code = code?;
    let bundle = match catalog.load(locale) {
        Ok(bundle) => bundle,
        Err(err @ CatalogError::NotFound { .. }) => {
            debug!(%locale, error = %err, "no error message bundle");
            return None;
        }
        Err(err) => {
            warn!(%locale, error = %err, "could not load error message bundle");
            return None;
        }
    };
    let Some(template) = bundle.get(code.name()) else {
        warn!(%locale, code = code.name(), "no error message for code");
        return None;
    };
    match MessagePattern::parse(template) {
        Ok(pattern) => Some(pattern),
        Err(err) => {
            warn!(%locale, code = code.name(), error = %err, "malformed error message template");
            None
        }
    }
}

/// The generic template filled for `code` and `args`, no catalog involved.
pub(crate) fn generic_message(code: Option<ErrorCode>, args: &[MessageArg], locale: &Locale) -> String {
    let label = code.map_or(UNKNOWN_CODE_LABEL, ErrorCode::name);
    let free_text = match args {
        [single] => single.clone(),
        _ => MessageArg::Text(join_arguments(args)),
    };

    // Pass 1 embeds the label and leaves `{1}` for pass 2.
    let first_pass = match MessagePattern::parse(GENERIC_MESSAGE_PATTERN) {
        Ok(pattern) => pattern.format(&[MessageArg::from(label)], locale),
        Err(_) => return format!("Generic Error - {label}: {free_text}"),
    };
    match MessagePattern::parse(&first_pass) {
        Ok(pattern) => pattern.format(&[MessageArg::from(label), free_text], locale),
        Err(_) => format!("Generic Error - {label}: {free_text}"),
    }
}

// ============================================================================
// MessageResolver
// ============================================================================

/// A catalog paired with the canonical and display locales.
///
/// Cheap to clone; the catalog is shared.
///
/// ```rust
/// use platform_errors::{ErrorCode, Locale, MessageResolver, PlatformError, StaticCatalog};
///
/// let catalog = StaticCatalog::new()
///     .with_entry(Locale::ROOT, "CONNECTION_FAILED", "Failed to connect to {0}");
/// let resolver = MessageResolver::new(catalog).with_display_locale(Locale::GERMANY);
///
/// let err = PlatformError::with_args(ErrorCode::ConnectionFailed, ["10.0.0.1"]);
/// assert_eq!(resolver.message(&err), "Failed to connect to 10.0.0.1");
/// ```
#[derive(Clone)]
pub struct MessageResolver {
    catalog: Arc<dyn MessageCatalog>,
    canonical: Locale,
    display: Locale,
}

impl MessageResolver {
    /// Resolver over `catalog`, canonical locale [`Locale::US`], display
    /// locale [`Locale::system_default`].
    pub fn new(catalog: impl MessageCatalog + 'static) -> Self {
        Self::from_shared(Arc::new(catalog))
    }

    /// Resolver over an already shared catalog.
    pub fn from_shared(catalog: Arc<dyn MessageCatalog>) -> Self {
        Self {
            catalog,
            canonical: Locale::US,
            display: Locale::system_default(),
        }
    }

    /// Replace the canonical locale used by [`message`](Self::message).
    #[must_use]
    pub fn with_canonical_locale(mut self, locale: Locale) -> Self {
        self.canonical = locale;
        self
    }

    /// Replace the display locale used by
    /// [`localized_message`](Self::localized_message).
    #[must_use]
    pub fn with_display_locale(mut self, locale: Locale) -> Self {
        self.display = locale;
        self
    }

    /// The catalog consulted on every resolution.
    pub fn catalog(&self) -> &dyn MessageCatalog {
        self.catalog.as_ref()
    }

    /// Locale of [`message`](Self::message).
    pub fn canonical_locale(&self) -> &Locale {
        &self.canonical
    }

    /// Locale of [`localized_message`](Self::localized_message).
    pub fn display_locale(&self) -> &Locale {
        &self.display
    }

    /// Message in the canonical locale, for APIs and logs.
    pub fn message(&self, err: &PlatformError) -> String {
        self.message_in(err, &self.canonical)
    }

    /// Message in the display locale, for people.
    pub fn localized_message(&self, err: &PlatformError) -> String {
        self.message_in(err, &self.display)
    }

    /// Message in an explicit locale.
    pub fn message_in(&self, err: &PlatformError, locale: &Locale) -> String {
        err.message_in(self.catalog.as_ref(), locale)
    }

    /// `Display` adapter printing the localized message.
    pub fn display<'a>(&'a self, err: &'a PlatformError) -> Localized<'a> {
        Localized { resolver: self, err }
    }
}

impl Default for MessageResolver {
    /// Resolver without a catalog: every message is generic.
    fn default() -> Self {
        Self::new(NoCatalog)
    }
}

impl fmt::Debug for MessageResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageResolver")
            .field("canonical", &self.canonical)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

/// Prints an error's message in the resolver's display locale.
#[derive(Debug)]
pub struct Localized<'a> {
    resolver: &'a MessageResolver,
    err: &'a PlatformError,
}

impl fmt::Display for Localized<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolver.localized_message(self.err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Metadata, Subscriber};

    /// Counts `warn` and `debug` events seen while installed.
    #[derive(Clone, Default)]
    struct LevelCounter {
        warnings: Arc<AtomicUsize>,
        debugs: Arc<AtomicUsize>,
    }

    impl LevelCounter {
        fn warnings(&self) -> usize {
            self.warnings.load(Ordering::SeqCst)
        }

        fn debugs(&self) -> usize {
            self.debugs.load(Ordering::SeqCst)
        }
    }

    impl Subscriber for LevelCounter {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &Attributes<'_>) -> Id {
            Id::from_u64(1)
        }

        fn record(&self, _: &Id, _: &Record<'_>) {}

        fn record_follows_from(&self, _: &Id, _: &Id) {}

        fn event(&self, event: &Event<'_>) {
            match *event.metadata().level() {
                Level::WARN => self.warnings.fetch_add(1, Ordering::SeqCst),
                Level::DEBUG => self.debugs.fetch_add(1, Ordering::SeqCst),
                _ => 0,
            };
        }

        fn enter(&self, _: &Id) {}

        fn exit(&self, _: &Id) {}
    }

    fn count_events(f: impl FnOnce()) -> LevelCounter {
        let counter = LevelCounter::default();
        tracing::subscriber::with_default(counter.clone(), f);
        counter
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with_entry(Locale::ROOT, "CONNECTION_FAILED", "Failed to connect to {0}")
            .with_entry(Locale::ROOT, "INTERNAL_ERROR", "Internal error: {0}")
            .with_entry(Locale::ROOT, "TIMED_OUT", "Timed out after {0} ms")
            .with_entry(Locale::GERMANY, "TIMED_OUT", "Zeitüberschreitung nach {0} ms")
            .with_entry(Locale::ROOT, "BAD_REQUEST", "Bad request {0")
    }

    #[test]
    fn generic_pattern_parses() {
        assert!(MessagePattern::parse(GENERIC_MESSAGE_PATTERN).is_ok());
    }

    #[test]
    fn catalog_entry_is_substituted() {
        let msg = resolve_message(
            Some(ErrorCode::ConnectionFailed),
            &["10.0.0.1".into()],
            &catalog(),
            &Locale::US,
        );
        assert_eq!(msg, "Failed to connect to 10.0.0.1");
    }

    #[test]
    fn numbers_follow_the_requested_locale() {
        let args = [MessageArg::from(15000)];
        let catalog = catalog();
        assert_eq!(
            resolve_message(Some(ErrorCode::TimedOut), &args, &catalog, &Locale::US),
            "Timed out after 15,000 ms"
        );
        assert_eq!(
            resolve_message(Some(ErrorCode::TimedOut), &args, &catalog, &Locale::GERMANY),
            "Zeitüberschreitung nach 15.000 ms"
        );
    }

    #[test]
    fn internal_arguments_collapse_into_catalog_template() {
        let msg = resolve_message(
            Some(ErrorCode::InternalError),
            &["disk full".into(), "retry later".into()],
            &catalog(),
            &Locale::US,
        );
        assert_eq!(msg, "Internal error: disk full - retry later");
    }

    #[test]
    fn specific_codes_never_collapse() {
        let msg = resolve_message(
            Some(ErrorCode::ConnectionFailed),
            &["10.0.0.1".into(), "ignored".into()],
            &catalog(),
            &Locale::US,
        );
        assert_eq!(msg, "Failed to connect to 10.0.0.1");
    }

    #[test]
    fn missing_entry_uses_generic_template() {
        let msg = resolve_message(
            Some(ErrorCode::StoreError),
            &["db locked".into()],
            &catalog(),
            &Locale::US,
        );
        assert_eq!(msg, "Generic Error - STORE_ERROR: db locked");
    }

    #[test]
    fn generic_template_joins_multiple_arguments() {
        let msg = resolve_message(
            Some(ErrorCode::StoreError),
            &["a".into(), MessageArg::from(2), "c".into()],
            &NoCatalog,
            &Locale::US,
        );
        assert_eq!(msg, "Generic Error - STORE_ERROR: a - 2 - c");
    }

    #[test]
    fn generic_template_without_arguments_has_empty_slot() {
        let msg = resolve_message(Some(ErrorCode::NotConnected), &[], &NoCatalog, &Locale::US);
        assert_eq!(msg, "Generic Error - NOT_CONNECTED: ");
    }

    #[test]
    fn generic_template_localizes_single_numeric_argument() {
        let msg = resolve_message(
            Some(ErrorCode::TooManyInflightMessages),
            &[MessageArg::from(12500)],
            &NoCatalog,
            &Locale::GERMANY,
        );
        assert_eq!(msg, "Generic Error - TOO_MANY_INFLIGHT_MESSAGES: 12.500");
    }

    #[test]
    fn absent_code_is_unknown_and_collapses() {
        let msg = resolve_message(None, &["x".into(), "y".into()], &catalog(), &Locale::US);
        assert_eq!(msg, "Generic Error - Unknown: x - y");
    }

    #[test]
    fn malformed_template_degrades_to_generic() {
        let msg = resolve_message(
            Some(ErrorCode::BadRequest),
            &["payload".into()],
            &catalog(),
            &Locale::US,
        );
        assert_eq!(msg, "Generic Error - BAD_REQUEST: payload");
    }

    #[test]
    fn effective_arguments_borrow_when_not_collapsing() {
        let args = [MessageArg::from("only")];
        assert!(matches!(
            effective_arguments(Some(ErrorCode::InternalError), &args),
            Cow::Borrowed(_)
        ));
        let two = [MessageArg::from("a"), MessageArg::from("b")];
        assert!(matches!(effective_arguments(None, &two), Cow::Owned(_)));
        assert!(matches!(
            effective_arguments(Some(ErrorCode::TimedOut), &two),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn resolver_uses_two_fixed_locales() {
        let resolver = MessageResolver::new(catalog())
            .with_canonical_locale(Locale::US)
            .with_display_locale(Locale::GERMANY);
        let err = PlatformError::with_args(ErrorCode::TimedOut, [1500]);

        assert_eq!(resolver.message(&err), "Timed out after 1,500 ms");
        assert_eq!(resolver.localized_message(&err), "Zeitüberschreitung nach 1.500 ms");
        assert_eq!(resolver.display(&err).to_string(), resolver.localized_message(&err));
        assert_eq!(
            resolver.message_in(&err, &Locale::GERMANY),
            resolver.localized_message(&err)
        );
    }

    #[test]
    fn same_locale_gives_same_output_on_both_entry_points() {
        let resolver = MessageResolver::new(catalog())
            .with_canonical_locale(Locale::GERMANY)
            .with_display_locale(Locale::GERMANY);
        let err = PlatformError::with_args(ErrorCode::TimedOut, [1500]);
        assert_eq!(resolver.message(&err), resolver.localized_message(&err));
    }

    #[test]
    fn display_logs_nothing() {
        let inner = PlatformError::with_args(ErrorCode::SerialPortNotExisting, ["/dev/ttyS3"]);
        let outer = PlatformError::with_cause(ErrorCode::UnableToObtainConnection, inner, ["modem"]);

        let counter = count_events(|| {
            for _ in 0..3 {
                assert_eq!(
                    outer.to_string(),
                    "Generic Error - UNABLE_TO_OBTAIN_CONNECTION: modem"
                );
                let line = outer.record().to_string();
                assert!(line.contains("Generic Error - SERIAL_PORT_NOT_EXISTING: /dev/ttyS3"));
            }
        });
        assert_eq!(counter.warnings(), 0);
        assert_eq!(counter.debugs(), 0);
    }

    #[test]
    fn missing_bundle_is_logged_at_debug() {
        let err = PlatformError::with_args(ErrorCode::ConnectionFailed, ["host"]);
        let counter = count_events(|| {
            assert_eq!(
                err.message_in(&NoCatalog, &Locale::US),
                "Generic Error - CONNECTION_FAILED: host"
            );
        });
        assert_eq!(counter.warnings(), 0);
        assert_eq!(counter.debugs(), 1);
    }

    #[test]
    fn malformed_template_is_logged_at_warn() {
        let err = PlatformError::with_args(ErrorCode::BadRequest, ["x"]);
        let counter = count_events(|| {
            assert_eq!(
                err.message_in(&catalog(), &Locale::US),
                "Generic Error - BAD_REQUEST: x"
            );
        });
        assert_eq!(counter.warnings(), 1);
    }

    #[test]
    fn default_resolver_is_generic() {
        let err = PlatformError::with_args(ErrorCode::ConnectionFailed, ["host"]);
        assert_eq!(
            MessageResolver::default().message(&err),
            "Generic Error - CONNECTION_FAILED: host"
        );
    }
}
