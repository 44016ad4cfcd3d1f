//! String-to-typed-value coercion.
//!
//! Coercion never fails: text that does not parse as the requested type is
//! returned unchanged as a string. Callers and configurations rely on this,
//! so a bad `integer` field degrades to its original text instead of
//! aborting the transform.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use regex::Regex;
use serde_json::{Number, Value};

/// Decimal literal: sign, integer digits, fraction, exponent.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DECIMAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-])?(\d*)(?:\.(\d*))?(?:[eE]([+-]?\d+))?$").expect("valid regex")
});

/// Integer literal with optional sign.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static INTEGER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])?(\d+)$").expect("valid regex"));

/// Zone suffix accepted after ISO dates and date-times (ignored).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ZONE_SUFFIX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Z|[+-]\d{2}:\d{2}(:\d{2})?)(\[[A-Za-z0-9_/+-]+\])?$").expect("valid regex")
});

/// Target type of a coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    #[default]
    String,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    Double,
    /// Arbitrary-precision decimal.
    BigDecimal,
    /// Arbitrary-precision integer.
    BigInteger,
    Boolean,
    /// ISO-8601 calendar date.
    Date,
    /// ISO-8601 local date-time.
    DateTime,
}

impl DataType {
    /// Parse a data type name, case-insensitively.
    ///
    /// Unknown or empty names fall back to [`DataType::String`].
    ///
    /// # Examples
    /// ```
    /// use xml_mapper::coerce::DataType;
    ///
    /// assert_eq!(DataType::parse("INT"), DataType::Integer);
    /// assert_eq!(DataType::parse("float"), DataType::Double);
    /// assert_eq!(DataType::parse("uuid"), DataType::String);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "integer" | "int" => Self::Integer,
            "long" => Self::Long,
            "double" | "float" => Self::Double,
            "bigdecimal" => Self::BigDecimal,
            "biginteger" => Self::BigInteger,
            "boolean" | "bool" => Self::Boolean,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            _ => Self::String,
        }
    }

    /// Canonical configuration name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Double => "double",
            Self::BigDecimal => "bigdecimal",
            Self::BigInteger => "biginteger",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
        }
    }
}

/// A coerced scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    String(String),
    Integer(i32),
    Long(i64),
    Double(f64),
    BigDecimal(Number),
    BigInteger(Number),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl From<TypedValue> for Value {
    fn from(value: TypedValue) -> Self {
        match value {
            TypedValue::String(s) => Value::String(s),
            TypedValue::Integer(i) => Value::from(i),
            TypedValue::Long(l) => Value::from(l),
            TypedValue::Double(d) => Value::from(d),
            TypedValue::BigDecimal(n) | TypedValue::BigInteger(n) => Value::Number(n),
            TypedValue::Boolean(b) => Value::Bool(b),
            TypedValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            TypedValue::DateTime(dt) => Value::String(format_datetime(&dt)),
        }
    }
}

/// ISO local date-time; seconds are left out when they and the fraction are zero.
fn format_datetime(dt: &NaiveDateTime) -> String {
    let format = if dt.second() == 0 && dt.nanosecond() == 0 {
        "%Y-%m-%dT%H:%M"
    } else {
        "%Y-%m-%dT%H:%M:%S%.f"
    };
    dt.format(format).to_string()
}

/// Coerce raw text into a typed value.
///
/// Input is not trimmed. On any parse failure the original text is returned
/// as [`TypedValue::String`]; for [`DataType::Boolean`] anything other than
/// a case-insensitive `true` is `false`.
///
/// # Examples
/// ```
/// use xml_mapper::coerce::{coerce, DataType, TypedValue};
///
/// assert_eq!(coerce("30", DataType::Integer), TypedValue::Integer(30));
/// assert_eq!(
///     coerce("thirty", DataType::Integer),
///     TypedValue::String("thirty".to_string())
/// );
/// ```
#[must_use]
pub fn coerce(raw: &str, data_type: DataType) -> TypedValue {
    let coerced = match data_type {
        DataType::String => return TypedValue::String(raw.to_string()),
        DataType::Boolean => return TypedValue::Boolean(raw.eq_ignore_ascii_case("true")),
        DataType::Integer => raw.parse().ok().map(TypedValue::Integer),
        DataType::Long => raw.parse().ok().map(TypedValue::Long),
        DataType::Double => raw
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite())
            .map(TypedValue::Double),
        DataType::BigDecimal => parse_big_decimal(raw).map(TypedValue::BigDecimal),
        DataType::BigInteger => parse_big_integer(raw).map(TypedValue::BigInteger),
        DataType::Date => parse_iso_date(raw).map(TypedValue::Date),
        DataType::DateTime => parse_iso_datetime(raw).map(TypedValue::DateTime),
    };

    coerced.unwrap_or_else(|| {
        tracing::debug!(
            value = raw,
            data_type = data_type.as_str(),
            "Coercion failed, keeping original text"
        );
        TypedValue::String(raw.to_string())
    })
}

/// Coerce raw text straight into an output value.
#[must_use]
pub fn coerce_value(raw: &str, data_type: DataType) -> Value {
    coerce(raw, data_type).into()
}

fn parse_big_decimal(raw: &str) -> Option<Number> {
    let caps = DECIMAL_PATTERN.captures(raw)?;
    let int_part = caps.get(2).map_or("", |m| m.as_str());
    let frac_part = caps.get(3).map_or("", |m| m.as_str());
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut literal = String::new();
    if caps.get(1).is_some_and(|m| m.as_str() == "-") {
        literal.push('-');
    }
    literal.push_str(strip_leading_zeros(int_part));
    if !frac_part.is_empty() {
        literal.push('.');
        literal.push_str(frac_part);
    }
    if let Some(exp) = caps.get(4) {
        literal.push('e');
        literal.push_str(exp.as_str());
    }

    Number::from_str(&literal).ok()
}

fn parse_big_integer(raw: &str) -> Option<Number> {
    let caps = INTEGER_PATTERN.captures(raw)?;
    let digits = strip_leading_zeros(caps.get(2).map_or("", |m| m.as_str()));
    let negative = caps.get(1).is_some_and(|m| m.as_str() == "-") && digits != "0";

    let literal = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    Number::from_str(&literal).ok()
}

fn strip_leading_zeros(digits: &str) -> &str {
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() {
        "0"
    } else {
        stripped
    }
}

fn is_zone_suffix(rest: &str) -> bool {
    rest.is_empty() || ZONE_SUFFIX_PATTERN.is_match(rest)
}

fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let (date, rest) = NaiveDate::parse_and_remainder(raw, "%Y-%m-%d").ok()?;
    is_zone_suffix(rest).then_some(date)
}

fn parse_iso_datetime(raw: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| {
            let (datetime, rest) = NaiveDateTime::parse_and_remainder(raw, format).ok()?;
            is_zone_suffix(rest).then_some(datetime)
        })
}
