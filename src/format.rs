//! Positional message templates.
//!
//! Catalog templates use numbered placeholders that are filled from an
//! error's arguments:
//!
//! | Element | Renders |
//! |---|---|
//! | `{0}` | argument 0 in its natural form (numbers and dates localized) |
//! | `{0,number}` | a number with locale grouping, up to 3 fraction digits |
//! | `{0,number,integer}` | a number rounded half-even to an integer |
//! | `{0,number,percent}` | a number times 100, rounded, with a percent sign |
//! | `{0,date}` / `{0,time}` | the date or the time part of a date-time (`,short` allowed) |
//!
//! A single quote starts or ends literal text (`'{0}'` prints `{0}`), and
//! two single quotes print one. A `}` outside an element is literal.
//!
//! An element whose argument is missing is printed back verbatim, e.g.
//! `{1}`. Message resolution relies on this to format a template in two
//! passes.

use crate::Locale;
use chrono::NaiveDateTime;
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;
use zeroize::Zeroize;

/// Errors produced while parsing a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A `{` was never closed, or an element contained another `{`.
    #[error("unmatched brace at byte {offset}")]
    UnmatchedBrace {
        /// Byte offset of the opening brace.
        offset: usize,
    },
    /// The element index is not a non-negative integer.
    #[error("invalid argument index '{text}'")]
    InvalidIndex {
        /// The offending index text.
        text: String,
    },
    /// The element names a format type other than `number`, `date`, `time`.
    #[error("unknown format type '{format_type}'")]
    UnknownFormatType {
        /// The offending type.
        format_type: String,
    },
    /// The element names a style its type does not support.
    #[error("unknown format style '{style}'")]
    UnknownFormatStyle {
        /// The offending style.
        style: String,
    },
}

// ============================================================================
// Arguments
// ============================================================================

/// One positional value substituted into a message template.
///
/// Numbers and date-times are rendered according to the target locale when
/// they fill an element directly. The [`Display`](fmt::Display) form is
/// locale-neutral; it is what argument collapsing concatenates.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageArg {
    /// Free text, printed as is.
    Text(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Boolean, printed as `true` / `false`.
    Bool(bool),
    /// Local date and time.
    DateTime(NaiveDateTime),
}

impl MessageArg {
    /// Wrap any printable value as text.
    pub fn display(value: impl fmt::Display) -> Self {
        Self::Text(value.to_string())
    }

    /// Borrow the text, if this is a text argument.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    fn render(&self, style: ArgStyle, locale: &Locale, out: &mut String) {
        match (self, style) {
            (Self::Int(v), ArgStyle::Plain | ArgStyle::Number | ArgStyle::Integer) => {
                push_integer(out, *v < 0, v.unsigned_abs(), locale)
            }
            (Self::UInt(v), ArgStyle::Plain | ArgStyle::Number | ArgStyle::Integer) => {
                push_integer(out, false, *v, locale)
            }
            (Self::Float(v), ArgStyle::Plain | ArgStyle::Number) => push_float(out, *v, 3, locale),
            (Self::Float(v), ArgStyle::Integer) => push_float(out, *v, 0, locale),
            (Self::Int(v), ArgStyle::Percent) => push_percent(out, *v as f64, locale),
            (Self::UInt(v), ArgStyle::Percent) => push_percent(out, *v as f64, locale),
            (Self::Float(v), ArgStyle::Percent) => push_percent(out, *v, locale),
            (Self::DateTime(dt), ArgStyle::Plain) => {
                let styles = DateStyles::for_locale(locale);
                out.push_str(&dt.format(styles.date).to_string());
                out.push_str(styles.joiner);
                out.push_str(&dt.format(styles.time).to_string());
            }
            (Self::DateTime(dt), ArgStyle::Date) => {
                out.push_str(&dt.format(DateStyles::for_locale(locale).date).to_string())
            }
            (Self::DateTime(dt), ArgStyle::Time) => {
                out.push_str(&dt.format(DateStyles::for_locale(locale).time).to_string())
            }
            // Mismatched kinds fall back to the plain form.
            (other, _) => {
                use fmt::Write;
                let _ = write!(out, "{other}");
            }
        }
    }
}

impl fmt::Display for MessageArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl Zeroize for MessageArg {
    fn zeroize(&mut self) {
        match self {
            Self::Text(s) => s.zeroize(),
            Self::Int(v) => v.zeroize(),
            Self::UInt(v) => v.zeroize(),
            Self::Float(v) => v.zeroize(),
            Self::Bool(v) => *v = false,
            Self::DateTime(_) => {}
        }
    }
}

impl From<&str> for MessageArg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for MessageArg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for MessageArg {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<Cow<'_, str>> for MessageArg {
    fn from(value: Cow<'_, str>) -> Self {
        Self::Text(value.into_owned())
    }
}

impl From<char> for MessageArg {
    fn from(value: char) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for MessageArg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDateTime> for MessageArg {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

macro_rules! impl_from_number {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for MessageArg {
                fn from(value: $source) -> Self {
                    Self::$variant(value as $target)
                }
            }
        )+
    };
}

impl_from_number!(Int as i64: i8, i16, i32, i64, isize);
impl_from_number!(UInt as u64: u8, u16, u32, u64, usize);
impl_from_number!(Float as f64: f32, f64);

// ============================================================================
// Locale data
// ============================================================================

struct NumberSymbols {
    grouping: &'static str,
    decimal: char,
    percent_prefix: &'static str,
}

impl NumberSymbols {
    fn for_locale(locale: &Locale) -> Self {
        let (grouping, decimal, percent_prefix) = match (locale.language(), locale.country()) {
            ("de", "CH") => ("\u{2019}", '.', ""),
            ("de" | "es" | "it" | "nl" | "pt" | "id" | "tr" | "da" | "el", _) => {
                (".", ',', if locale.language() == "de" { "\u{a0}" } else { "" })
            }
            ("fr", _) => ("\u{202f}", ',', "\u{a0}"),
            ("ru" | "pl" | "cs" | "sk" | "sv" | "fi" | "nb" | "no" | "uk", _) => ("\u{a0}", ',', "\u{a0}"),
            _ => (",", '.', ""),
        };
        Self {
            grouping,
            decimal,
            percent_prefix,
        }
    }
}

struct DateStyles {
    date: &'static str,
    time: &'static str,
    joiner: &'static str,
}

impl DateStyles {
    fn for_locale(locale: &Locale) -> Self {
        let (date, time, joiner) = match (locale.language(), locale.country()) {
            ("en", "" | "US") => ("%-m/%-d/%y", "%-I:%M %p", ", "),
            ("en", _) => ("%d/%m/%Y", "%H:%M", ", "),
            ("de", _) => ("%d.%m.%y", "%H:%M", ", "),
            ("fr", _) => ("%d/%m/%Y", "%H:%M", " "),
            ("it", _) => ("%d/%m/%y", "%H:%M", ", "),
            ("ja" | "zh", _) => ("%Y/%m/%d", "%H:%M", " "),
            _ => ("%Y-%m-%d", "%H:%M", " "),
        };
        Self { date, time, joiner }
    }
}

fn push_grouped(out: &mut String, digits: &str, grouping: &str) {
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(grouping);
        }
        out.push(ch);
    }
}

fn push_integer(out: &mut String, negative: bool, magnitude: u64, locale: &Locale) {
    if negative {
        out.push('-');
    }
    push_grouped(out, &magnitude.to_string(), NumberSymbols::for_locale(locale).grouping);
}

fn push_float(out: &mut String, value: f64, max_fraction: usize, locale: &Locale) {
    if value.is_nan() {
        out.push_str("NaN");
        return;
    }
    if value.is_infinite() {
        out.push_str(if value < 0.0 { "-\u{221e}" } else { "\u{221e}" });
        return;
    }

    let symbols = NumberSymbols::for_locale(locale);
    let rounded = if max_fraction == 0 {
        format!("{:.0}", value.abs().round_ties_even())
    } else {
        format!("{:.*}", max_fraction, value.abs())
    };
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (rounded.as_str(), ""),
    };

    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    push_grouped(out, int_part, symbols.grouping);
    if !frac_part.is_empty() {
        out.push(symbols.decimal);
        out.push_str(frac_part);
    }
}

fn push_percent(out: &mut String, value: f64, locale: &Locale) {
    push_float(out, value * 100.0, 0, locale);
    out.push_str(NumberSymbols::for_locale(locale).percent_prefix);
    out.push('%');
}

// ============================================================================
// Templates
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgStyle {
    Plain,
    Number,
    Integer,
    Percent,
    Date,
    Time,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Argument { index: usize, style: ArgStyle },
}

/// A parsed positional template.
///
/// ```rust
/// use platform_errors::{Locale, MessageArg, MessagePattern};
///
/// let pattern = MessagePattern::parse("Failed to connect to {0} after {1} attempts").unwrap();
/// let args = [MessageArg::from("10.0.0.1"), MessageArg::from(1200)];
/// assert_eq!(
///     pattern.format(&args, &Locale::US),
///     "Failed to connect to 10.0.0.1 after 1,200 attempts"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePattern {
    segments: Vec<Segment>,
}

impl MessagePattern {
    /// Parse a template.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut in_quote = false;
        let mut chars = pattern.char_indices().peekable();

        while let Some((offset, ch)) = chars.next() {
            match ch {
                '\'' => {
                    if matches!(chars.peek(), Some((_, '\''))) {
                        chars.next();
                        literal.push('\'');
                    } else {
                        in_quote = !in_quote;
                    }
                }
                '{' if !in_quote => {
                    let mut body = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        match c {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(PatternError::UnmatchedBrace { offset }),
                            _ => body.push(c),
                        }
                    }
                    if !closed {
                        return Err(PatternError::UnmatchedBrace { offset });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_element(&body)?);
                }
                _ => literal.push(ch),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// Substitute `args` positionally, rendering numbers and dates for `locale`.
    ///
    /// Elements without a matching argument are emitted as `{n}`.
    pub fn format(&self, args: &[MessageArg], locale: &Locale) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Argument { index, style } => match args.get(*index) {
                    Some(arg) => arg.render(*style, locale, &mut out),
                    None => {
                        out.push('{');
                        out.push_str(&index.to_string());
                        out.push('}');
                    }
                },
            }
        }
        out
    }

    /// Highest argument index referenced, if any element exists.
    pub fn max_index(&self) -> Option<usize> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Argument { index, .. } => Some(*index),
                Segment::Literal(_) => None,
            })
            .max()
    }
}

fn parse_element(body: &str) -> Result<Segment, PatternError> {
    let mut parts = body.splitn(3, ',').map(str::trim);
    let index_text = parts.next().unwrap_or_default();
    let index = index_text
        .parse::<usize>()
        .map_err(|_| PatternError::InvalidIndex {
            text: index_text.to_owned(),
        })?;

    let format_type = parts.next().unwrap_or_default();
    let style = parts.next().unwrap_or_default();
    let unknown_style = || PatternError::UnknownFormatStyle {
        style: style.to_owned(),
    };

    let style = match format_type {
        "" => ArgStyle::Plain,
        "number" => match style {
            "" => ArgStyle::Number,
            "integer" => ArgStyle::Integer,
            "percent" => ArgStyle::Percent,
            _ => return Err(unknown_style()),
        },
        "date" | "time" => match style {
            "" | "short" if format_type == "date" => ArgStyle::Date,
            "" | "short" => ArgStyle::Time,
            _ => return Err(unknown_style()),
        },
        other => {
            return Err(PatternError::UnknownFormatType {
                format_type: other.to_owned(),
            });
        }
    };

    Ok(Segment::Argument { index, style })
}

/// Parse `pattern` and format it in one step.
pub fn format_message(
    pattern: &str,
    args: &[MessageArg],
    locale: &Locale,
) -> Result<String, PatternError> {
    Ok(MessagePattern::parse(pattern)?.format(args, locale))
}
