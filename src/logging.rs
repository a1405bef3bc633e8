//! Structured log records for platform errors.
//!
//! An [`ErrorRecord`] borrows from a [`PlatformError`](crate::PlatformError)
//! and cannot outlive it. It exposes the code, the arguments and the cause
//! chain as separate fields so a log pipeline can serialize them however it
//! likes, and offers a bounded single-line rendering for plain-text sinks.
//!
//! Every rendered field is capped at [`MAX_FIELD_OUTPUT_LEN`] bytes; longer
//! values are cut at a character boundary and marked with
//! [`TRUNCATION_INDICATOR`].

use crate::resolve::{self, MessageResolver, UNKNOWN_CODE_LABEL};
use crate::{ErrorCode, MessageArg};
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::iter;

/// Maximum length for any individual field in formatted output.
pub const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Truncation indicator appended to truncated fields.
pub const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Maximum number of causes rendered by [`ErrorRecord::write_to`].
pub const MAX_CAUSE_DEPTH: usize = 16;

/// Borrowed, structured view of a platform error.
///
/// ```rust
/// use platform_errors::{ErrorCode, PlatformError};
///
/// let err = PlatformError::with_args(ErrorCode::PortInUse, ["/dev/ttyS0"]);
/// let mut line = String::new();
/// err.record().write_to(&mut line).unwrap();
/// assert_eq!(line, "[PORT_IN_USE] arguments=['/dev/ttyS0']");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ErrorRecord<'a> {
    code: Option<ErrorCode>,
    arguments: &'a [MessageArg],
    source: Option<&'a (dyn Error + 'static)>,
}

impl<'a> ErrorRecord<'a> {
    pub(crate) fn new(
        code: Option<ErrorCode>,
        arguments: &'a [MessageArg],
        source: Option<&'a (dyn Error + 'static)>,
    ) -> Self {
        Self {
            code,
            arguments,
            source,
        }
    }

    /// Error code, `None` for uncoded errors.
    #[inline]
    pub const fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Code name, or `Unknown` for uncoded errors.
    #[inline]
    pub fn code_label(&self) -> &'static str {
        self.code.map_or(UNKNOWN_CODE_LABEL, ErrorCode::name)
    }

    /// Positional arguments. Not truncated.
    #[inline]
    pub const fn arguments(&self) -> &'a [MessageArg] {
        self.arguments
    }

    /// The cause chain, nearest first. Not truncated.
    ///
    /// ```rust
    /// use platform_errors::{ErrorCode, PlatformError};
    /// use std::io;
    ///
    /// let inner = PlatformError::with_cause(ErrorCode::IoError, io::Error::other("eof"), ["/dev/sda"]);
    /// let err = PlatformError::with_cause(ErrorCode::StoreError, inner, ["snapshot"]);
    ///
    /// let chain: Vec<String> = err.record().causes().map(|cause| cause.to_string()).collect();
    /// assert_eq!(chain, ["Generic Error - IO_ERROR: /dev/sda", "eof"]);
    /// ```
    pub fn causes(&self) -> impl Iterator<Item = &'a (dyn Error + 'static)> + 'a {
        iter::successors(self.source, |&err| err.source())
    }

    /// Write a single-line rendering with every field bounded.
    ///
    /// `[CODE] arguments=['a', 'b'] cause='...' caused_by='...'`
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "[{}]", self.code_label())?;

        if !self.arguments.is_empty() {
            f.write_str(" arguments=[")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                let text = arg.to_string();
                write!(f, "'{}'", truncate_with_indicator(&text))?;
            }
            f.write_str("]")?;
        }

        let mut causes = self.causes();
        for (depth, cause) in causes.by_ref().take(MAX_CAUSE_DEPTH).enumerate() {
            let key = if depth == 0 { "cause" } else { "caused_by" };
            let text = cause.to_string();
            write!(f, " {key}='{}'", truncate_with_indicator(&text))?;
        }
        if causes.next().is_some() {
            f.write_str(" caused_by='...'")?;
        }

        Ok(())
    }

    /// Log this record at `error` level, with the message resolved in the
    /// resolver's canonical locale.
    pub fn emit(&self, resolver: &MessageResolver) {
        let message = resolve::resolve_message(
            self.code,
            self.arguments,
            resolver.catalog(),
            resolver.canonical_locale(),
        );
        tracing::error!(
            code = self.code_label(),
            record = %self,
            "{}",
            truncate_with_indicator(&message)
        );
    }
}

impl fmt::Display for ErrorRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

/// Cap `s` at [`MAX_FIELD_OUTPUT_LEN`] bytes, marking the cut.
///
/// Borrows when no truncation is needed.
pub fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let max_content_len = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());

    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}
