//! Convenience macros for building and raising platform errors.
//!
//! ```rust
//! use platform_errors::{ensure_code, platform_err, ErrorCode, Result};
//!
//! fn open_port(port: u16, in_use: bool) -> Result<()> {
//!     ensure_code!(port != 0, ErrorCode::InvalidParameter, "port", port);
//!     ensure_code!(!in_use, ErrorCode::PortInUse, port);
//!     Ok(())
//! }
//!
//! let err = open_port(8080, true).unwrap_err();
//! assert_eq!(err.code(), Some(ErrorCode::PortInUse));
//!
//! let err = platform_err!(ErrorCode::TimedOut, 1500);
//! assert_eq!(err.to_string(), "Generic Error - TIMED_OUT: 1,500");
//! ```
//!
//! Arguments may be of different types; each one goes through
//! [`MessageArg::from`](crate::MessageArg).

// ============================================================================
// Error Creation Macros
// ============================================================================

/// Build a [`PlatformError`](crate::PlatformError) from a code and
/// heterogeneous arguments.
///
/// - `platform_err!(code)`
/// - `platform_err!(code, arg, ...)`
/// - `platform_err!(code, cause = err, arg, ...)`
///
/// ```rust
/// use platform_errors::{platform_err, ErrorCode, MessageArg};
/// use std::io;
///
/// let err = platform_err!(ErrorCode::OsCommandError, "ifup wwan0", 3);
/// assert_eq!(err.arguments(), &[MessageArg::from("ifup wwan0"), MessageArg::Int(3)]);
///
/// let err = platform_err!(
///     ErrorCode::ConnectionFailed,
///     cause = io::Error::other("refused"),
///     "broker",
/// );
/// assert!(std::error::Error::source(&err).is_some());
/// ```
#[macro_export]
macro_rules! platform_err {
    ($code:expr $(,)?) => {
        $crate::PlatformError::new($code)
    };
    ($code:expr, cause = $cause:expr $(, $arg:expr)* $(,)?) => {{
        let args: ::std::vec::Vec<$crate::MessageArg> =
            ::std::vec![$($crate::MessageArg::from($arg)),*];
        $crate::PlatformError::with_cause($code, $cause, args)
    }};
    ($code:expr $(, $arg:expr)+ $(,)?) => {
        $crate::PlatformError::with_args(
            $code,
            ::std::vec![$($crate::MessageArg::from($arg)),+],
        )
    };
}

/// Build an [`ErrorCode::InternalError`](crate::ErrorCode) from a format
/// string.
///
/// Reach for a specific code first; this is for the leftovers.
///
/// ```rust
/// use platform_errors::{internal_err, ErrorCode};
///
/// let err = internal_err!("queue {} overflowed", "telemetry");
/// assert_eq!(err.code(), Some(ErrorCode::InternalError));
/// assert_eq!(err.to_string(), "Generic Error - INTERNAL_ERROR: queue telemetry overflowed");
/// ```
#[macro_export]
macro_rules! internal_err {
    ($($fmt:tt)+) => {
        $crate::PlatformError::internal(::std::format!($($fmt)+))
    };
}

// ============================================================================
// Control Flow Macros
// ============================================================================

/// Return early with a [`PlatformError`](crate::PlatformError) unless a
/// condition holds.
///
/// Everything after the condition is passed to [`platform_err!`].
#[macro_export]
macro_rules! ensure_code {
    ($cond:expr, $($err:tt)+) => {
        if !$cond {
            return ::std::result::Result::Err($crate::platform_err!($($err)+));
        }
    };
}

/// Return early with a [`PlatformError`](crate::PlatformError)
/// unconditionally.
#[macro_export]
macro_rules! bail_code {
    ($($err:tt)+) => {
        return ::std::result::Result::Err($crate::platform_err!($($err)+))
    };
}
