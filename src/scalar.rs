use crate::util::parse_eight_digits;
use std::error;
use std::fmt;

/// An error that can occur when converting value text into the requested type.
///
/// These never escape [`PropertyType::parse`](crate::PropertyType::parse),
/// which reports malformed text as `None` and leaves it to the caller to
/// decide if that is fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarError {
    /// The given string did not contain only numbers
    AllDigits(String),

    /// The given string caused an overflow when calculating its numerical value
    Overflow(String),

    /// The given string was not a recognized boolean value
    InvalidBool(String),

    /// The given string was not a recognized floating point value
    InvalidFloat(String),

    /// A sign was given for an unsigned value
    Sign(String),
}

impl fmt::Display for ScalarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScalarError::AllDigits(x) => write!(f, "did not contain all digits: {}", x),
            ScalarError::InvalidBool(x) => write!(f, "is not a valid bool: {}", x),
            ScalarError::Overflow(x) => write!(f, "caused an overflow: {}", x),
            ScalarError::InvalidFloat(x) => write!(f, "is not a valid float: {}", x),
            ScalarError::Sign(x) => write!(f, "unsigned value has a sign: {}", x),
        }
    }
}

impl error::Error for ScalarError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

#[inline]
fn owned(d: &str) -> String {
    d.to_string()
}

/// `True` / `False`, case insensitive
#[inline]
pub(crate) fn to_bool(d: &str) -> Result<bool, ScalarError> {
    let d = d.trim();
    if d.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if d.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ScalarError::InvalidBool(owned(d)))
    }
}

#[inline]
pub(crate) fn to_i32(d: &str) -> Result<i32, ScalarError> {
    let t = d.trim();
    let (negative, digits) = match t.as_bytes().first() {
        Some(b'-') => (true, &t[1..]),
        Some(b'+') => (false, &t[1..]),
        _ => (false, t),
    };

    let magnitude = to_u64(digits.as_bytes()).map_err(|e| relabel(e, t))?;
    let value = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };

    value
        .and_then(|x| i32::try_from(x).ok())
        .ok_or_else(|| ScalarError::Overflow(owned(t)))
}

#[inline]
pub(crate) fn to_u32(d: &str) -> Result<u32, ScalarError> {
    let val = to_unsigned(d)?;
    u32::try_from(val).map_err(|_| ScalarError::Overflow(owned(d.trim())))
}

#[inline]
pub(crate) fn to_unsigned(d: &str) -> Result<u64, ScalarError> {
    let t = d.trim();
    match t.as_bytes().first() {
        Some(b'-') | Some(b'+') => Err(ScalarError::Sign(owned(t))),
        _ => to_u64(t.as_bytes()).map_err(|e| relabel(e, t)),
    }
}

/// Decimal or exponential notation with an optional sign, optional `,`
/// group separators in the integral part, and the non-finite spellings
/// `NaN`, `Infinity`, `-Infinity`.
pub(crate) fn to_f32(d: &str) -> Result<f32, ScalarError> {
    let t = d.trim();
    let (sign, body) = match t.as_bytes().first() {
        Some(b'-') => (-1.0f32, &t[1..]),
        Some(b'+') => (1.0f32, &t[1..]),
        _ => (1.0f32, t),
    };

    if body.eq_ignore_ascii_case("nan") {
        return Ok(f32::NAN);
    } else if body.eq_ignore_ascii_case("infinity") || body.eq_ignore_ascii_case("inf") {
        return Ok(sign * f32::INFINITY);
    }

    let integral_end = body
        .find(|c: char| c == '.' || c == 'e' || c == 'E')
        .unwrap_or(body.len());
    let (integral, rest) = body.split_at(integral_end);

    // group separators may only appear between digits of the integral part
    if integral.starts_with(',') || integral.ends_with(',') || integral.contains(",,") {
        return Err(ScalarError::InvalidFloat(owned(t)));
    }

    let mut normalized = String::with_capacity(body.len());
    normalized.extend(integral.chars().filter(|&c| c != ','));
    normalized.push_str(rest);

    let valid = !normalized.is_empty()
        && !normalized.starts_with(|c| c == '+' || c == '-')
        && normalized.bytes().all(|c| {
            c.is_ascii_digit() || matches!(c, b'.' | b'e' | b'E' | b'+' | b'-')
        })
        && normalized.bytes().any(|c| c.is_ascii_digit());
    if !valid {
        return Err(ScalarError::InvalidFloat(owned(t)));
    }

    normalized
        .parse::<f32>()
        .map(|x| sign * x)
        .map_err(|_| ScalarError::InvalidFloat(owned(t)))
}

fn relabel(err: ScalarError, d: &str) -> ScalarError {
    match err {
        ScalarError::AllDigits(_) => ScalarError::AllDigits(owned(d)),
        ScalarError::Overflow(_) => ScalarError::Overflow(owned(d)),
        x => x,
    }
}

fn is_digits(d: &[u8]) -> bool {
    !d.iter().any(|&x| !x.is_ascii_digit())
}

#[inline]
fn to_u64(d: &[u8]) -> Result<u64, ScalarError> {
    const POWER10: [u64; 8] = [10_000_000, 1_000_000, 100_000, 10_000, 1_000, 100, 10, 1];
    let text = || String::from_utf8_lossy(d).into_owned();

    if d.is_empty() {
        return Err(ScalarError::AllDigits(text()));
    }

    let chunks = d.chunks_exact(8);
    let remainder = chunks.remainder();
    if !is_digits(remainder) {
        return Err(ScalarError::AllDigits(text()));
    }

    let mut result: u64 = 0;
    for chunk in chunks {
        let digits = parse_eight_digits(chunk).ok_or_else(|| ScalarError::AllDigits(text()))?;
        result = result
            .checked_mul(100_000_000)
            .and_then(|x| x.checked_add(digits))
            .ok_or_else(|| ScalarError::Overflow(text()))?;
    }

    if result != 0 {
        result = 10_u64
            .checked_pow(remainder.len() as u32)
            .and_then(|x| result.checked_mul(x))
            .ok_or_else(|| ScalarError::Overflow(text()))?;
    }

    let maxxed = 8 - remainder.len();
    for (i, &x) in remainder.iter().enumerate() {
        result = result
            .checked_add(u64::from(x - b'0') * POWER10[maxxed + i])
            .ok_or_else(|| ScalarError::Overflow(text()))?;
    }

    Ok(result)
}
