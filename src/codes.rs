//! Error code registry machinery.
//!
//! Every failure the platform reports carries one [`ErrorCode`](crate::ErrorCode). A code is a
//! stable identifier: its [`name`](crate::ErrorCode::name) is the key under which
//! message catalogs store the localized template, and it is also the label
//! printed when no template can be found.
//!
//! # Governance
//!
//! The registry is closed. Codes are declared once, in
//! [`definitions`](crate::definitions), through the [`define_error_codes!`]
//! macro, which generates the enum together with its name table. Nothing can
//! create a code at runtime; the only runtime entry point is parsing an
//! existing name back into its code.
//!
//! # Example
//!
//! ```rust
//! use platform_errors::ErrorCode;
//!
//! let code: ErrorCode = "TIMED_OUT".parse().unwrap();
//! assert_eq!(code, ErrorCode::TimedOut);
//! assert_eq!(code.name(), "TIMED_OUT");
//! assert_eq!(code.to_string(), "TIMED_OUT");
//! ```

use thiserror::Error;

/// Returned when parsing a name that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error code '{name}'")]
pub struct UnknownErrorCode {
    /// The rejected name.
    pub name: String,
}

/// Declare the closed error code registry.
///
/// Generates a `Copy` enum whose variants map one-to-one onto stable
/// catalog names, plus:
///
/// - `ErrorCode::ALL`, every code in declaration order
/// - `ErrorCode::name()`, the stable catalog key
/// - `Display` (writes the name) and `FromStr` (exact name match)
///
/// ```rust
/// mod registry {
///     platform_errors::define_error_codes! {
///         /// Disk is full.
///         DiskFull => "DISK_FULL",
///         /// Something else.
///         Other => "OTHER",
///     }
/// }
///
/// assert_eq!(registry::ErrorCode::DiskFull.name(), "DISK_FULL");
/// assert_eq!(registry::ErrorCode::ALL.len(), 2);
/// ```
#[macro_export]
macro_rules! define_error_codes {
    ($( $(#[$meta:meta])* $variant:ident => $name:literal ),+ $(,)?) => {
        /// Stable identifier for a class of platform failure.
        ///
        /// Generated by `define_error_codes!`; see the variant docs for the
        /// condition each code denotes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum ErrorCode {
            $( $(#[$meta])* $variant, )+
        }

        impl ErrorCode {
            /// Every registered code, in declaration order.
            pub const ALL: &'static [ErrorCode] = &[ $( ErrorCode::$variant, )+ ];

            /// Stable name, used as the catalog key and as the fallback label.
            #[inline]
            pub const fn name(self) -> &'static str {
                match self {
                    $( ErrorCode::$variant => $name, )+
                }
            }
        }

        impl ::std::fmt::Display for ErrorCode {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl ::std::str::FromStr for ErrorCode {
            type Err = $crate::codes::UnknownErrorCode;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(ErrorCode::$variant), )+
                    _ => Err($crate::codes::UnknownErrorCode { name: s.to_owned() }),
                }
            }
        }
    };
}
