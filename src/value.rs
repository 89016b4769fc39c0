//! Coerced contract arguments

use num_bigint::BigInt;
use serde_json::Value as Json;
use std::fmt;
use std::str::FromStr;

/// An argument coerced to the shape a script backend binds by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Arbitrary-precision integer
    Int(BigInt),
    Bool(bool),
    /// Canonical lowercase hex, possibly empty
    Bytes(String),
    Array(Vec<Arg>),
    /// No value was supplied
    Null,
    /// Supplied value passed through without coercion
    Raw(Json),
}

impl Arg {
    /// Integer zero, the default for omitted `int` parameters
    #[must_use]
    pub fn zero() -> Self {
        Self::Int(BigInt::from(0))
    }

    /// Wrap a supplied value without coercing it
    ///
    /// JSON booleans and arrays keep their structure; everything else is
    /// carried as [`Arg::Raw`].
    #[must_use]
    pub fn passthrough(value: &Json) -> Self {
        match value {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(*b),
            Json::Array(items) => Self::Array(items.iter().map(Self::passthrough).collect()),
            other => Self::Raw(other.clone()),
        }
    }

    /// Borrow the integer, if this is one
    #[must_use]
    pub const fn as_int(&self) -> Option<&BigInt> {
        match self {
            Self::Int(n) => Some(n),
            _ => None,
        }
    }

    /// Render as JSON, with integers as decimal strings
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Self::Int(n) => Json::String(n.to_string()),
            Self::Bool(b) => Json::Bool(*b),
            Self::Bytes(hex) => Json::String(hex.clone()),
            Self::Array(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Null => Json::Null,
            Self::Raw(value) => value.clone(),
        }
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Self::Int(BigInt::from(n))
    }
}

impl From<BigInt> for Arg {
    fn from(n: BigInt) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Bytes(hex) => write!(f, "b'{hex}'"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Null => write!(f, "undefined"),
            Self::Raw(value) => write!(f, "{value}"),
        }
    }
}

/// Read a supplied value as an arbitrary-precision integer
///
/// JSON numbers of any size are accepted when their value is integral, so
/// `1.0` and `1e3` read as `1` and `1000`. Decimal strings (the JSON spelling
/// of a big integer) are accepted too. Fractional values, exponents beyond
/// [`MAX_EXPONENT`] and every other JSON shape yield `None`.
///
/// # Examples
///
/// ```
/// use preflight::value::parse_int;
/// use serde_json::json;
///
/// assert_eq!(parse_int(&json!(7)).unwrap().to_string(), "7");
/// assert_eq!(
///     parse_int(&json!("123456789012345678901234567890")).unwrap().to_string(),
///     "123456789012345678901234567890"
/// );
/// assert_eq!(parse_int(&json!(1e3)).unwrap().to_string(), "1000");
/// assert!(parse_int(&json!(1.5)).is_none());
/// assert!(parse_int(&json!("0a")).is_none());
/// ```
#[must_use]
pub fn parse_int(value: &Json) -> Option<BigInt> {
    match value {
        Json::Number(n) => parse_number(&n.to_string()),
        Json::String(s) => {
            let digits = s.strip_prefix('-').unwrap_or(s);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            BigInt::from_str(s).ok()
        }
        _ => None,
    }
}

/// Largest decimal exponent honoured when reading a JSON number
pub const MAX_EXPONENT: u32 = 1024;

fn parse_number(text: &str) -> Option<BigInt> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i64>().ok()?),
        None => (unsigned, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{whole}{fraction}");
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let scale = exponent.checked_sub(i64::try_from(fraction.len()).ok()?)?;
    let magnitude = if scale >= 0 {
        let scale = u32::try_from(scale).ok().filter(|s| *s <= MAX_EXPONENT)?;
        BigInt::from_str(&digits).ok()? * BigInt::from(10u32).pow(scale)
    } else {
        let cut = usize::try_from(scale.unsigned_abs()).ok()?;
        let keep = digits.len().saturating_sub(cut);
        let (head, tail) = digits.split_at(keep);
        if !tail.bytes().all(|b| b == b'0') {
            return None;
        }
        if head.is_empty() {
            BigInt::from(0)
        } else {
            BigInt::from_str(head).ok()?
        }
    };

    Some(if negative { -magnitude } else { magnitude })
}
