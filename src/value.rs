use crate::errors::UnsupportedKind;
use crate::scalar;
use crate::Error;
use std::fmt;
use std::str::FromStr;

/// The kind of data a property holds.
///
/// The discriminant is the tag written to the binary format.
///
/// ```
/// use fsgsave::PropertyType;
///
/// assert_eq!(PropertyType::from_code(0x05), Some(PropertyType::Uint64));
/// assert_eq!("Float".parse::<PropertyType>().unwrap(), PropertyType::Float);
/// assert_eq!(PropertyType::Int.width(), Some(4));
/// assert_eq!(PropertyType::Collection.width(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum PropertyType {
    Bool = 0x01,
    Int = 0x02,
    Uint = 0x03,
    Uint64 = 0x05,
    Float = 0x06,

    /// Marker for array properties. Never the kind of a stored value.
    Collection = 0x0C,
}

impl PropertyType {
    /// Every kind that can be stored as a value, in wire code order
    pub const VALUE_TYPES: [PropertyType; 5] = [
        PropertyType::Bool,
        PropertyType::Int,
        PropertyType::Uint,
        PropertyType::Uint64,
        PropertyType::Float,
    ];

    /// Look up a kind from its binary tag
    pub fn from_code(code: i32) -> Option<PropertyType> {
        match code {
            0x01 => Some(PropertyType::Bool),
            0x02 => Some(PropertyType::Int),
            0x03 => Some(PropertyType::Uint),
            0x05 => Some(PropertyType::Uint64),
            0x06 => Some(PropertyType::Float),
            0x0C => Some(PropertyType::Collection),
            _ => None,
        }
    }

    /// The binary tag of this kind
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// The textual name used in the xml format
    pub fn name(&self) -> &'static str {
        match self {
            PropertyType::Bool => "Bool",
            PropertyType::Int => "Int",
            PropertyType::Uint => "Uint",
            PropertyType::Uint64 => "Uint64",
            PropertyType::Float => "Float",
            PropertyType::Collection => "Collection",
        }
    }

    /// Number of bytes a value of this kind occupies in the binary format
    pub fn width(&self) -> Option<usize> {
        match self {
            PropertyType::Bool => Some(1),
            PropertyType::Int | PropertyType::Uint | PropertyType::Float => Some(4),
            PropertyType::Uint64 => Some(8),
            PropertyType::Collection => None,
        }
    }

    /// Returns true for every kind except [`PropertyType::Collection`]
    pub fn is_value(&self) -> bool {
        !matches!(self, PropertyType::Collection)
    }

    /// The value used when a value of this kind is structurally absent
    ///
    /// ```
    /// use fsgsave::{PropertyType, Value};
    ///
    /// assert_eq!(PropertyType::Uint64.default_value().unwrap(), Value::Uint64(0));
    /// assert!(PropertyType::Collection.default_value().is_err());
    /// ```
    pub fn default_value(&self) -> Result<Value, Error> {
        match self {
            PropertyType::Bool => Ok(Value::Bool(false)),
            PropertyType::Int => Ok(Value::Int(0)),
            PropertyType::Uint => Ok(Value::Uint(0)),
            PropertyType::Uint64 => Ok(Value::Uint64(0)),
            PropertyType::Float => Ok(Value::Float(0.0)),
            PropertyType::Collection => Err(self.unsupported()),
        }
    }

    /// Parse text as a value of this kind.
    ///
    /// Malformed text is not an error: `Ok(None)` is returned and the caller
    /// decides if that is fatal.
    ///
    /// ```
    /// use fsgsave::{PropertyType, Value};
    ///
    /// assert_eq!(PropertyType::Bool.parse("true").unwrap(), Some(Value::Bool(true)));
    /// assert_eq!(PropertyType::Uint.parse("-1").unwrap(), None);
    /// assert!(PropertyType::Collection.parse("1").is_err());
    /// ```
    pub fn parse(&self, text: &str) -> Result<Option<Value>, Error> {
        let value = match self {
            PropertyType::Bool => scalar::to_bool(text).map(Value::Bool),
            PropertyType::Int => scalar::to_i32(text).map(Value::Int),
            PropertyType::Uint => scalar::to_u32(text).map(Value::Uint),
            PropertyType::Uint64 => scalar::to_unsigned(text).map(Value::Uint64),
            PropertyType::Float => scalar::to_f32(text).map(Value::Float),
            PropertyType::Collection => return Err(self.unsupported()),
        };

        Ok(value.ok())
    }

    /// Format a value as text through this kind.
    ///
    /// Fails when the kind is a collection or doesn't match the value.
    pub fn format(&self, value: &Value) -> Result<String, Error> {
        if value.kind() != *self {
            return Err(self.unsupported());
        }

        Ok(value.to_text())
    }

    pub(crate) fn unsupported(&self) -> Error {
        Error::unsupported_kind(UnsupportedKind::Known(*self))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the textual name of a kind (case sensitive) or its decimal code
impl FromStr for PropertyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let by_name = match s {
            "Bool" => Some(PropertyType::Bool),
            "Int" => Some(PropertyType::Int),
            "Uint" => Some(PropertyType::Uint),
            "Uint64" => Some(PropertyType::Uint64),
            "Float" => Some(PropertyType::Float),
            "Collection" => Some(PropertyType::Collection),
            _ => None,
        };

        by_name
            .or_else(|| scalar::to_i32(s).ok().and_then(PropertyType::from_code))
            .ok_or_else(|| Error::invalid_format(format!("unknown property type: {:?}", s)))
    }
}

/// A single typed value
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Bool(bool),
    Int(i32),
    Uint(u32),
    Uint64(u64),
    Float(f32),
}

impl Value {
    /// The kind of this value. Never [`PropertyType::Collection`].
    pub fn kind(&self) -> PropertyType {
        match self {
            Value::Bool(_) => PropertyType::Bool,
            Value::Int(_) => PropertyType::Int,
            Value::Uint(_) => PropertyType::Uint,
            Value::Uint64(_) => PropertyType::Uint64,
            Value::Float(_) => PropertyType::Float,
        }
    }

    /// Culture invariant text for the value
    ///
    /// ```
    /// use fsgsave::Value;
    ///
    /// assert_eq!(Value::Bool(true).to_text(), "True");
    /// assert_eq!(Value::Uint64(u64::MAX).to_text(), "18446744073709551615");
    /// assert_eq!(Value::Float(-0.0).to_text(), "-0");
    /// assert_eq!(Value::Float(f32::NEG_INFINITY).to_text(), "-Infinity");
    /// ```
    pub fn to_text(&self) -> String {
        match *self {
            Value::Bool(true) => String::from("True"),
            Value::Bool(false) => String::from("False"),
            Value::Int(x) => format_int(x),
            Value::Uint(x) => format_int(x),
            Value::Uint64(x) => format_int(x),
            Value::Float(x) if x.is_nan() => String::from("NaN"),
            Value::Float(x) if x == f32::INFINITY => String::from("Infinity"),
            Value::Float(x) if x == f32::NEG_INFINITY => String::from("-Infinity"),
            Value::Float(x) => format!("{}", x),
        }
    }
}

#[cfg(feature = "faster_writer")]
#[inline]
fn format_int<I: itoa::Integer>(x: I) -> String {
    itoa::Buffer::new().format(x).to_owned()
}

#[cfg(not(feature = "faster_writer"))]
#[inline]
fn format_int<I: fmt::Display>(x: I) -> String {
    x.to_string()
}

/// Floats are equal when both are NaN or when they compare equal
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Uint64(a), Value::Uint64(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<bool> for Value {
    fn from(x: bool) -> Self {
        Value::Bool(x)
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Value::Int(x)
    }
}

impl From<u32> for Value {
    fn from(x: u32) -> Self {
        Value::Uint(x)
    }
}

impl From<u64> for Value {
    fn from(x: u64) -> Self {
        Value::Uint64(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use quickcheck_macros::quickcheck;
    use rstest::*;

    #[rstest]
    #[case(Value::Bool(true), "True")]
    #[case(Value::Bool(false), "False")]
    #[case(Value::Int(-2147483648), "-2147483648")]
    #[case(Value::Uint(4294967295), "4294967295")]
    #[case(Value::Uint64(18446744073709551615), "18446744073709551615")]
    #[case(Value::Float(-0.0), "-0")]
    #[case(Value::Float(1.5), "1.5")]
    #[case(Value::Float(0.1), "0.1")]
    fn value_text_round_trip(#[case] value: Value, #[case] text: &str) {
        assert_eq!(value.kind().format(&value).unwrap(), text);
        let parsed = value.kind().parse(text).unwrap().unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn negative_zero_keeps_sign() {
        let parsed = PropertyType::Float.parse("-0").unwrap().unwrap();
        match parsed {
            Value::Float(x) => assert!(x.is_sign_negative()),
            x => panic!("unexpected value {:?}", x),
        }
    }

    #[test]
    fn non_finite_float_text() {
        for x in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let text = Value::Float(x).to_text();
            let parsed = PropertyType::Float.parse(&text).unwrap().unwrap();
            assert_eq!(parsed, Value::Float(x));
        }
    }

    #[test]
    fn collection_is_unsupported() {
        let kind = PropertyType::Collection;
        for err in [
            kind.default_value().unwrap_err(),
            kind.parse("True").unwrap_err(),
            kind.format(&Value::Bool(true)).unwrap_err(),
        ] {
            assert!(matches!(
                err.kind(),
                ErrorKind::UnsupportedKind {
                    kind: UnsupportedKind::Known(PropertyType::Collection)
                }
            ));
        }
    }

    #[test]
    fn format_rejects_mismatched_kind() {
        let err = PropertyType::Int.format(&Value::Uint(1)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnsupportedKind { .. }));
    }

    #[test]
    fn default_values() {
        for kind in PropertyType::VALUE_TYPES {
            let value = kind.default_value().unwrap();
            assert_eq!(value.kind(), kind);
            let text = kind.format(&value).unwrap();
            assert_eq!(kind.parse(&text).unwrap(), Some(value));
        }
    }

    #[rstest]
    #[case(PropertyType::Bool, "maybe")]
    #[case(PropertyType::Int, "1.0")]
    #[case(PropertyType::Uint, "-5")]
    #[case(PropertyType::Uint64, "")]
    #[case(PropertyType::Float, "one")]
    fn malformed_text_is_soft(#[case] kind: PropertyType, #[case] text: &str) {
        assert_eq!(kind.parse(text).unwrap(), None);
    }

    #[test]
    fn kind_codes() {
        for kind in PropertyType::VALUE_TYPES
            .iter()
            .copied()
            .chain(std::iter::once(PropertyType::Collection))
        {
            assert_eq!(PropertyType::from_code(kind.code()), Some(kind));
            assert_eq!(kind.name().parse::<PropertyType>().unwrap(), kind);
            assert_eq!(kind.code().to_string().parse::<PropertyType>().unwrap(), kind);
        }

        assert_eq!(PropertyType::from_code(0x04), None);
        assert!("bool".parse::<PropertyType>().is_err());
        assert!("4".parse::<PropertyType>().is_err());
    }

    #[quickcheck]
    fn float_text_round_trip(x: f32) -> bool {
        let value = Value::Float(x);
        PropertyType::Float.parse(&value.to_text()).unwrap() == Some(value)
    }
}
