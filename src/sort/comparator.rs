//! Field comparators
//!
//! A comparator answers "does `a` precede `b`" for two string fields.
//! Numeric comparators parse both sides as `f64` and report a parse failure
//! instead of guessing. A literal whose magnitude overflows `f64` is a
//! failure too; only an explicit `inf`/`infinity` parses as infinite.

use thiserror::Error;

/// Caller-supplied ordering over two fields
pub type LessFn = fn(&str, &str) -> bool;

/// A field that cannot be used as a number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    /// Not a float literal at all
    #[error("not a number: {0:?}")]
    Malformed(String),

    /// A finite literal beyond the range of `f64`
    #[error("number out of range: {0:?}")]
    OutOfRange(String),
}

/// Parses a field as `f64`, rejecting finite literals that overflow
pub fn parse_number(field: &str) -> Result<f64, NumberError> {
    let value: f64 = field
        .parse()
        .map_err(|_| NumberError::Malformed(field.to_string()))?;
    if value.is_infinite() && !is_infinity_literal(field) {
        return Err(NumberError::OutOfRange(field.to_string()));
    }
    Ok(value)
}

fn is_infinity_literal(field: &str) -> bool {
    let unsigned = field.strip_prefix(['+', '-']).unwrap_or(field);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Lexicographic ascending
pub fn less_string_asc(a: &str, b: &str) -> bool {
    a < b
}

/// Lexicographic descending
pub fn less_string_desc(a: &str, b: &str) -> bool {
    a > b
}

/// Numeric ascending
pub fn less_float_asc(a: &str, b: &str) -> Result<bool, NumberError> {
    Ok(parse_number(a)? < parse_number(b)?)
}

/// Numeric "descending": the negation of [`less_float_asc`].
///
/// Equal values report `true` in both directions.
pub fn less_float_desc(a: &str, b: &str) -> Result<bool, NumberError> {
    less_float_asc(a, b).map(|less| !less)
}

/// Ordering applied to one column
#[derive(Debug, Clone, Copy, Default)]
pub enum Comparator {
    /// `a < b` on the raw strings
    #[default]
    StringAsc,
    /// `a > b` on the raw strings
    StringDesc,
    /// `a < b` on the parsed floats
    FloatAsc,
    /// `!(a < b)` on the parsed floats
    FloatDesc,
    /// Caller-supplied function on the raw strings
    Custom(LessFn),
}

impl Comparator {
    /// True if fields must parse as numbers under this comparator
    pub fn is_numeric(&self) -> bool {
        matches!(self, Comparator::FloatAsc | Comparator::FloatDesc)
    }

    /// Compares two raw fields
    pub fn less(&self, a: &str, b: &str) -> Result<bool, NumberError> {
        match self {
            Comparator::StringAsc => Ok(less_string_asc(a, b)),
            Comparator::StringDesc => Ok(less_string_desc(a, b)),
            Comparator::FloatAsc => less_float_asc(a, b),
            Comparator::FloatDesc => less_float_desc(a, b),
            Comparator::Custom(f) => Ok(f(a, b)),
        }
    }

    /// Compares two raw fields under a non-numeric comparator.
    ///
    /// Numeric comparators fall back to `StringAsc`; callers route numeric
    /// columns through [`Comparator::less_parsed`] instead.
    pub(crate) fn less_text(&self, a: &str, b: &str) -> bool {
        match self {
            Comparator::StringDesc => less_string_desc(a, b),
            Comparator::Custom(f) => f(a, b),
            _ => less_string_asc(a, b),
        }
    }

    /// Compares two already-parsed numeric fields
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub(crate) fn less_parsed(&self, a: f64, b: f64) -> bool {
        match self {
            Comparator::FloatDesc => !(a < b),
            _ => a < b,
        }
    }
}
