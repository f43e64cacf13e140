//! # xmp-tag
//!
//! Typed codec for XMP metadata values: convert between the textual form a
//! property has inside an image file and a native Rust value — dates with
//! partial precision, language-keyed text alternatives, MIME type records,
//! text bags, booleans, and integers — with strict validation in both
//! directions.
//!
//! ## Quick Start
//!
//! The usual entry point is [`tag::XmpTag`], a handle for one property that
//! parses on read and serializes on write:
//!
//! ```rust
//! use xmp_tag::tag::XmpTag;
//! use xmp_tag::value::{XmpType, XmpValue};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut tag = XmpTag::new(
//!     "Xmp.dc.format",
//!     "format",
//!     "Format",
//!     "The file format, a MIME type.",
//!     XmpType::MimeType,
//!     Some("image/jpeg".to_string()),
//! );
//!
//! // Reading parses the stored text into a typed value.
//! let value = tag.get_value()?;
//! assert!(matches!(value, XmpValue::Mime(ref m) if m.subtype == "jpeg"));
//!
//! // Writing serializes the typed value back to text.
//! let png = xmp_tag::codec::parse_value("image/png", XmpType::MimeType)?;
//! tag.set_value(&png)?;
//! assert_eq!(tag.to_text()?, "image/png");
//! # Ok(())
//! # }
//! ```
//!
//! ## Lower-Level Usage
//!
//! The codec itself is a pair of pure functions, usable without a tag:
//!
//! ```rust
//! use xmp_tag::codec::{parse_value, serialize_value};
//! use xmp_tag::value::{XmpType, XmpValue};
//!
//! # fn main() -> anyhow::Result<()> {
//! let value = parse_value("Some, text, keyword", XmpType::BagText)?;
//! assert_eq!(
//!     value,
//!     XmpValue::Array(vec![
//!         "Some".to_string(),
//!         "text".to_string(),
//!         "keyword".to_string(),
//!     ])
//! );
//! assert_eq!(serialize_value(&value, XmpType::BagText)?, "Some, text, keyword");
//! # Ok(())
//! # }
//! ```
//!
//! Malformed input is rejected with a
//! [`ConversionError`](value::ConversionError), never coerced: `parse_value`
//! fails on anything outside the type's grammar, and `serialize_value` fails
//! on values whose shape or component ranges don't fit the target type. A
//! failed conversion has no observable side effect.
//!
//! Tags can be bound to a [`tag::MetadataStore`] — the narrow interface to
//! the surrounding metadata container — after which writes and deletes
//! propagate to it under the tag's key.
//!
//! ## Modules
//!
//! - [`value`] — the typed data model ([`XmpType`](value::XmpType),
//!   [`XmpValue`](value::XmpValue), dates, MIME types) and the error type
//! - [`codec`] — `parse_value` / `serialize_value`, the two codec halves
//! - [`tag`] — the [`XmpTag`](tag::XmpTag) handle and the store trait

pub mod codec;
pub mod tag;
pub mod value;
