//! Error types for plist decoding.
//!
//! Every failure, whether it comes from the XML layer, from building the
//! value tree, or from binding that tree into a destination type, is reported
//! as a [`PlistError`]. Errors raised below a dictionary entry or an array
//! element are wrapped with the key or index so the message carries a path
//! back to the offending node. [`PlistError::kind`] looks through those
//! wrappers.

use std::fmt;

use serde::de;
use thiserror::Error;

/// Coarse classification of a [`PlistError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The XML is not well-formed or the root is not a `<plist>` container.
    MalformedDocument,
    /// An element outside the plist primitive set appeared in value position.
    UnsupportedElement,
    /// A `<dict>` body does not alternate `<key>` and value elements.
    MalformedDictPairing,
    /// The text of an `<integer>`, `<real>`, `<data>` or `<date>` did not parse.
    PrimitiveParse,
    /// The kind of a value is incompatible with the destination's shape.
    TypeMismatch,
    /// The destination type has no plist representation.
    InvalidDestination,
    /// Any other message reported through serde.
    Custom,
}

/// Errors produced while decoding a plist document.
#[derive(Error, Debug)]
pub enum PlistError {
    /// The underlying XML reader rejected the input.
    #[error("XML error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// The document is structurally not a plist.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// An element name outside the plist grammar.
    #[error("unsupported element <{name}>")]
    UnsupportedElement { name: String },

    /// A `<dict>` whose children do not pair up.
    #[error("malformed dict: {0}")]
    MalformedDictPairing(String),

    /// Primitive text that could not be parsed.
    #[error("invalid <{element}> value {text:?}: {reason}")]
    PrimitiveParse {
        element: &'static str,
        text: String,
        reason: String,
    },

    /// A value kind that the destination cannot accept.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A destination shape with no plist counterpart.
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    /// An error raised while binding the value of a dictionary entry.
    #[error("at key {key:?}: {source}")]
    AtKey {
        key: String,
        #[source]
        source: Box<PlistError>,
    },

    /// An error raised while binding an array element.
    #[error("at index {index}: {source}")]
    AtIndex {
        index: usize,
        #[source]
        source: Box<PlistError>,
    },

    /// Custom error message
    #[error("{0}")]
    Custom(String),
}

impl PlistError {
    /// Returns the classification of this error, ignoring key/index context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlistError::Xml { .. } | PlistError::MalformedDocument(_) => {
                ErrorKind::MalformedDocument
            }
            PlistError::UnsupportedElement { .. } => ErrorKind::UnsupportedElement,
            PlistError::MalformedDictPairing(_) => ErrorKind::MalformedDictPairing,
            PlistError::PrimitiveParse { .. } => ErrorKind::PrimitiveParse,
            PlistError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            PlistError::InvalidDestination(_) => ErrorKind::InvalidDestination,
            PlistError::AtKey { source, .. } | PlistError::AtIndex { source, .. } => source.kind(),
            PlistError::Custom(_) => ErrorKind::Custom,
        }
    }

    /// Wraps this error with the dictionary key being bound when it occurred.
    pub fn at_key(self, key: impl Into<String>) -> Self {
        PlistError::AtKey {
            key: key.into(),
            source: Box::new(self),
        }
    }

    /// Wraps this error with the array index being bound when it occurred.
    pub fn at_index(self, index: usize) -> Self {
        PlistError::AtIndex {
            index,
            source: Box::new(self),
        }
    }

    pub(crate) fn parse(element: &'static str, text: &str, reason: impl fmt::Display) -> Self {
        PlistError::PrimitiveParse {
            element,
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<String> for PlistError {
    fn from(msg: String) -> Self {
        PlistError::Custom(msg)
    }
}

impl From<&str> for PlistError {
    fn from(msg: &str) -> Self {
        PlistError::Custom(msg.to_string())
    }
}

impl de::Error for PlistError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        PlistError::Custom(msg.to_string())
    }

    fn invalid_type(unexp: de::Unexpected<'_>, exp: &dyn de::Expected) -> Self {
        PlistError::TypeMismatch {
            expected: exp.to_string(),
            found: unexp.to_string(),
        }
    }

    fn invalid_length(len: usize, exp: &dyn de::Expected) -> Self {
        PlistError::TypeMismatch {
            expected: exp.to_string(),
            found: format!("array of {} elements", len),
        }
    }
}

/// Result type alias for plist decoding operations
pub type Result<T> = std::result::Result<T, PlistError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::Error as _;

    #[test]
    fn test_kind_looks_through_context() {
        let err = PlistError::TypeMismatch {
            expected: "a string".to_string(),
            found: "integer `2`".to_string(),
        }
        .at_index(0)
        .at_key("excludes");

        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_context_display_builds_path() {
        let err = PlistError::parse("integer", "two", "invalid digit found in string")
            .at_key("type")
            .at_index(3);

        assert_eq!(
            err.to_string(),
            "at index 3: at key \"type\": invalid <integer> value \"two\": invalid digit found in string"
        );
    }

    #[test]
    fn test_invalid_type_maps_to_type_mismatch() {
        let err = PlistError::invalid_type(de::Unexpected::Map, &"a string");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.to_string(), "type mismatch: expected a string, found map");
    }

    #[test]
    fn test_custom_messages() {
        let err = PlistError::missing_field("BucketUUID");
        assert_eq!(err.kind(), ErrorKind::Custom);
        assert_eq!(err.to_string(), "missing field `BucketUUID`");

        let err: PlistError = "boom".into();
        assert_eq!(err.to_string(), "boom");
    }
}
