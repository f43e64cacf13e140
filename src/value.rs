//! The typed data model for XMP property values.
//!
//! XMP stores every property as text; this module defines the native Rust
//! shapes that text converts to and from: [`XmpType`] names the wire grammar
//! a property uses, [`XmpValue`] holds the parsed value, and
//! [`ConversionError`] is the single error kind both codec directions raise.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Error raised when text cannot be parsed into a typed value, or a typed
/// value cannot be rendered back to text for the requested type.
///
/// The codec never recovers from this internally; it always propagates to
/// the caller, and a failed conversion leaves no partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The raw text does not match the grammar of the requested type.
    #[error("malformed {xtype} value: {raw:?}")]
    Malformed { xtype: XmpType, raw: String },

    /// The typed value's shape does not fit the requested type
    /// (e.g. serializing a boolean as an Integer).
    #[error("cannot serialize {found} as {expected}")]
    WrongShape {
        expected: XmpType,
        found: &'static str,
    },

    /// A component of a typed value is outside its legal range
    /// (e.g. month 13 in a date).
    #[error("{what} out of range in {xtype} value")]
    OutOfRange { xtype: XmpType, what: &'static str },

    /// An XMP type name this codec does not handle.
    #[error("unsupported XMP type: {0:?}")]
    Unsupported(String),
}

/// The XMP value types this codec converts.
///
/// The set is closed: both codec directions match on it exhaustively, and
/// Exiv2 type names outside it are rejected by [`XmpType::from_name`] with
/// [`ConversionError::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum XmpType {
    /// `bag Text` — an unordered collection of plain text values.
    BagText,
    /// `Boolean` — the literals `True` / `False`.
    Boolean,
    /// `Date` — a date or date-time of variable precision.
    Date,
    /// `Integer` — a signed decimal integer.
    Integer,
    /// `Lang Alt` — language-keyed alternatives of the same text.
    LangAlt,
    /// `MIMEType` — a `type/subtype` media type.
    MimeType,
    /// `ProperName` — the name of a person or organization.
    ProperName,
    /// `Text` — plain text.
    Text,
    /// `URI` — a uniform resource identifier.
    Uri,
    /// `URL` — a uniform resource locator.
    Url,
}

impl XmpType {
    /// Resolve an Exiv2 type name (as found in the tag registry, e.g.
    /// `"bag Text"` or `"Lang Alt"`) into an [`XmpType`].
    ///
    /// Names outside the supported set (e.g. `"seq Text"`,
    /// `"GPSCoordinate"`) yield [`ConversionError::Unsupported`].
    pub fn from_name(name: &str) -> Result<Self, ConversionError> {
        match name {
            "bag Text" => Ok(Self::BagText),
            "Boolean" => Ok(Self::Boolean),
            "Date" => Ok(Self::Date),
            "Integer" => Ok(Self::Integer),
            "Lang Alt" => Ok(Self::LangAlt),
            "MIMEType" => Ok(Self::MimeType),
            "ProperName" => Ok(Self::ProperName),
            "Text" => Ok(Self::Text),
            "URI" => Ok(Self::Uri),
            "URL" => Ok(Self::Url),
            other => Err(ConversionError::Unsupported(other.to_string())),
        }
    }

    /// The Exiv2 name of this type, the inverse of [`XmpType::from_name`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::BagText => "bag Text",
            Self::Boolean => "Boolean",
            Self::Date => "Date",
            Self::Integer => "Integer",
            Self::LangAlt => "Lang Alt",
            Self::MimeType => "MIMEType",
            Self::ProperName => "ProperName",
            Self::Text => "Text",
            Self::Uri => "URI",
            Self::Url => "URL",
        }
    }
}

impl fmt::Display for XmpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A MIME media type split into its two components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimeType {
    #[serde(rename = "type")]
    pub type_: String,
    pub subtype: String,
}

impl MimeType {
    pub fn new(type_: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            subtype: subtype.into(),
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)
    }
}

/// A full date-time as written in XMP: calendar date, time of day down to
/// optional fractional seconds, and an optional offset from UTC.
///
/// `microsecond` is meaningful only when `second` is present; the wire
/// grammar has no fraction without seconds. `tz_minutes` is the offset east
/// of UTC in minutes; `Some(0)` renders as `Z`, `None` is a local
/// (zone-less) time and renders no designator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmpTimestamp {
    pub date: NaiveDate,
    pub hour: u32,
    pub minute: u32,
    pub second: Option<u32>,
    pub microsecond: u32,
    pub tz_minutes: Option<i32>,
}

/// A date value carrying only as much precision as its text form.
///
/// XMP dates range from a bare year (`1999`) to a microsecond timestamp
/// with UTC offset (`1999-10-13T05:03:54.721-06:00`); the variant records
/// which form the text used so serialization can reproduce the minimal
/// matching form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XmpDateTime {
    /// `YYYY`
    Year(i32),
    /// `YYYY-MM`
    YearMonth { year: i32, month: u32 },
    /// `YYYY-MM-DD`
    Date(NaiveDate),
    /// `YYYY-MM-DDThh:mm[:ss[.f…]](Z|±hh:mm)`
    DateTime(XmpTimestamp),
}

/// A parsed XMP property value, tagged by shape.
///
/// `Text` is shared by the four plain-string XMP types (ProperName, Text,
/// URI, URL) — on the wire they are all an identity passthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum XmpValue {
    /// An ordered sequence of text values (Bag-of-Text).
    Array(Vec<String>),
    Boolean(bool),
    Date(XmpDateTime),
    Integer(i64),
    /// Localized text keyed by language tag (`x-default` is the fallback).
    LangAlt(BTreeMap<String, String>),
    Mime(MimeType),
    Text(String),
}

impl XmpValue {
    /// Short noun for this value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Array(_) => "an array",
            Self::Boolean(_) => "a boolean",
            Self::Date(_) => "a date",
            Self::Integer(_) => "an integer",
            Self::LangAlt(_) => "a lang-alt map",
            Self::Mime(_) => "a MIME type",
            Self::Text(_) => "a string",
        }
    }
}
