use crate::PropertyType;
use std::fmt;

/// An error that can occur when encoding or decoding a save
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    pub(crate) fn invalid_format(msg: impl Into<String>) -> Error {
        Error::new(ErrorKind::InvalidFormat {
            msg: msg.into(),
            offset: None,
        })
    }

    pub(crate) fn invalid_format_at(msg: impl Into<String>, offset: usize) -> Error {
        Error::new(ErrorKind::InvalidFormat {
            msg: msg.into(),
            offset: Some(offset),
        })
    }

    pub(crate) fn missing_value(element: &'static str) -> Error {
        Error::new(ErrorKind::MissingValue { element })
    }

    pub(crate) fn unsupported_kind(kind: UnsupportedKind) -> Error {
        Error::new(ErrorKind::UnsupportedKind { kind })
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Consume the error and return the specific type of error
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns the byte offset that the error occurs (if available)
    pub fn offset(&self) -> Option<usize> {
        self.0.offset()
    }
}

/// The kind that an operation could not handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedKind {
    /// A known kind that can't be used here (ie: collection as a value)
    Known(PropertyType),

    /// A wire code outside of the property type enumeration
    Code(i32),
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnsupportedKind::Known(kind) => write!(f, "{}", kind),
            UnsupportedKind::Code(code) => write!(f, "0x{:02x}", code),
        }
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// Input did not follow the expected structure: bad magic, a fixed tag
    /// with the wrong value, unparseable kind or value text, or a declared
    /// count that the input does not satisfy
    InvalidFormat { msg: String, offset: Option<usize> },

    /// An xml element was closed before any text content was found
    MissingValue { element: &'static str },

    /// An operation that requires a concrete value kind received something else
    UnsupportedKind { kind: UnsupportedKind },

    /// Unexpected end of binary input
    Eof { offset: usize },

    /// The underlying stream failed
    Io(std::io::Error),

    /// The xml reader or writer failed
    Xml(quick_xml::Error),
}

impl ErrorKind {
    pub fn offset(&self) -> Option<usize> {
        match *self {
            ErrorKind::InvalidFormat { offset, .. } => offset,
            ErrorKind::Eof { offset } => Some(offset),
            _ => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::Io(ref err) => Some(err),
            ErrorKind::Xml(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::InvalidFormat {
                ref msg,
                offset: Some(offset),
            } => write!(f, "invalid format: {} (offset: {})", msg, offset),
            ErrorKind::InvalidFormat { ref msg, offset: None } => {
                write!(f, "invalid format: {}", msg)
            }
            ErrorKind::MissingValue { element } => {
                write!(f, "<{}> element closed before a value was found", element)
            }
            ErrorKind::UnsupportedKind { kind } => {
                write!(f, "unsupported property type: {}", kind)
            }
            ErrorKind::Eof { offset } => {
                write!(f, "unexpected end of file (offset: {})", offset)
            }
            ErrorKind::Io(ref err) => write!(f, "io error: {}", err),
            ErrorKind::Xml(ref err) => write!(f, "xml error: {}", err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::new(ErrorKind::Io(error))
    }
}

impl From<quick_xml::Error> for Error {
    fn from(error: quick_xml::Error) -> Self {
        Error::new(ErrorKind::Xml(error))
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        Error::new(ErrorKind::Xml(quick_xml::Error::InvalidAttr(error)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_offset() {
        let err = Error::invalid_format_at("bad magic", 12);
        assert_eq!(err.offset(), Some(12));
        assert_eq!(err.to_string(), "invalid format: bad magic (offset: 12)");
    }

    #[test]
    fn error_display_unsupported_kind() {
        let err = Error::unsupported_kind(UnsupportedKind::Known(PropertyType::Collection));
        assert_eq!(err.to_string(), "unsupported property type: Collection");

        let err = Error::unsupported_kind(UnsupportedKind::Code(0x42));
        assert_eq!(err.to_string(), "unsupported property type: 0x42");
        assert_eq!(err.offset(), None);
    }

    #[test]
    fn io_error_is_source() {
        use std::error::Error as _;
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(err.source().is_some());
        assert!(matches!(err.kind(), ErrorKind::Io(_)));
    }
}
