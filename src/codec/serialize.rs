use chrono::Datelike;
use std::collections::BTreeMap;

use crate::value::{ConversionError, XmpDateTime, XmpTimestamp, XmpType, XmpValue};

/// Render a typed value back to the raw text form of an XMP property.
///
/// Validation is symmetric with parsing: a value whose shape does not match
/// `xtype` is rejected ([`ConversionError::WrongShape`]), and date
/// components outside their legal ranges are rejected
/// ([`ConversionError::OutOfRange`]) rather than rendered as unparseable
/// text.
pub fn serialize_value(value: &XmpValue, xtype: XmpType) -> Result<String, ConversionError> {
    match (xtype, value) {
        (XmpType::BagText, XmpValue::Array(items)) => Ok(items.join(", ")),
        (XmpType::Boolean, XmpValue::Boolean(flag)) => {
            Ok(if *flag { "True" } else { "False" }.to_string())
        }
        (XmpType::Date, XmpValue::Date(date)) => format_date(date),
        (XmpType::Integer, XmpValue::Integer(n)) => Ok(n.to_string()),
        (XmpType::LangAlt, XmpValue::LangAlt(map)) => format_lang_alt(map),
        (XmpType::MimeType, XmpValue::Mime(mime)) => Ok(mime.to_string()),
        (
            XmpType::ProperName | XmpType::Text | XmpType::Uri | XmpType::Url,
            XmpValue::Text(text),
        ) => Ok(text.clone()),
        (expected, value) => Err(ConversionError::WrongShape {
            expected,
            found: value.kind(),
        }),
    }
}

/// Render `x-default` first, then the remaining entries in ascending
/// language-tag order. An empty map has no wire form.
fn format_lang_alt(map: &BTreeMap<String, String>) -> Result<String, ConversionError> {
    if map.is_empty() {
        return Err(ConversionError::WrongShape {
            expected: XmpType::LangAlt,
            found: "an empty lang-alt map",
        });
    }
    let mut segments = Vec::with_capacity(map.len());
    if let Some(text) = map.get("x-default") {
        segments.push(format!("lang=\"x-default\" {text}"));
    }
    for (tag, text) in map {
        if tag != "x-default" {
            segments.push(format!("lang=\"{tag}\" {text}"));
        }
    }
    Ok(segments.join(", "))
}

/// Render the minimal text form matching the value's precision.
fn format_date(date: &XmpDateTime) -> Result<String, ConversionError> {
    match *date {
        XmpDateTime::Year(year) => {
            check_year(year)?;
            Ok(format!("{year:04}"))
        }
        XmpDateTime::YearMonth { year, month } => {
            check_year(year)?;
            if !(1..=12).contains(&month) {
                return Err(out_of_range("month"));
            }
            Ok(format!("{year:04}-{month:02}"))
        }
        XmpDateTime::Date(date) => {
            check_year(date.year())?;
            Ok(date.format("%Y-%m-%d").to_string())
        }
        XmpDateTime::DateTime(ref ts) => format_timestamp(ts),
    }
}

fn format_timestamp(ts: &XmpTimestamp) -> Result<String, ConversionError> {
    check_year(ts.date.year())?;
    if ts.hour > 23 {
        return Err(out_of_range("hour"));
    }
    if ts.minute > 59 {
        return Err(out_of_range("minute"));
    }
    if ts.second.is_some_and(|s| s > 59) {
        return Err(out_of_range("second"));
    }
    if ts.microsecond >= 1_000_000 {
        return Err(out_of_range("fractional seconds"));
    }
    if ts.second.is_none() && ts.microsecond != 0 {
        return Err(out_of_range("fractional seconds without seconds"));
    }
    if ts.tz_minutes.is_some_and(|tz| tz.abs() >= 24 * 60) {
        return Err(out_of_range("UTC offset"));
    }

    let mut out = format!(
        "{}T{:02}:{:02}",
        ts.date.format("%Y-%m-%d"),
        ts.hour,
        ts.minute
    );
    if let Some(second) = ts.second {
        out.push_str(&format!(":{second:02}"));
        if ts.microsecond > 0 {
            // Trimmed decimal: 124300 µs renders as ".1243".
            let digits = format!("{:06}", ts.microsecond);
            out.push('.');
            out.push_str(digits.trim_end_matches('0'));
        }
    }
    match ts.tz_minutes {
        None => {}
        Some(0) => out.push('Z'),
        Some(tz) => {
            let sign = if tz < 0 { '-' } else { '+' };
            let tz = tz.abs();
            out.push_str(&format!("{sign}{:02}:{:02}", tz / 60, tz % 60));
        }
    }
    Ok(out)
}

fn check_year(year: i32) -> Result<(), ConversionError> {
    if (0..=9999).contains(&year) {
        Ok(())
    } else {
        Err(out_of_range("year"))
    }
}

fn out_of_range(what: &'static str) -> ConversionError {
    ConversionError::OutOfRange {
        xtype: XmpType::Date,
        what,
    }
}
