//! Bidirectional conversion between XMP wire text and typed values.
//!
//! This module provides the two halves of the codec:
//!
//! - [`parse_value`] — interpret the raw text form of a property as a typed
//!   [`XmpValue`](crate::value::XmpValue)
//! - [`serialize_value`] — render a typed value back to its raw text form
//!
//! Both are pure functions dispatched exhaustively on
//! [`XmpType`](crate::value::XmpType): every supported type has a grammar in
//! each direction, and input that does not conform is rejected with a
//! [`ConversionError`](crate::value::ConversionError) rather than coerced.
//! A failed conversion has no side effects, so the pair is safe to call from
//! any number of threads without coordination.

mod parse;
mod serialize;

pub use parse::parse_value;
pub use serialize::serialize_value;
