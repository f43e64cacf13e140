use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::value::{ConversionError, MimeType, XmpDateTime, XmpTimestamp, XmpType, XmpValue};

/// Parse the raw text form of an XMP property into a typed value.
///
/// Empty input is an empty bag for [`XmpType::BagText`] and malformed for
/// every other type. Anything that does not match the type's grammar
/// (wrong literals, out-of-calendar dates, stray characters around an
/// integer) is rejected; nothing is coerced.
pub fn parse_value(raw: &str, xtype: XmpType) -> Result<XmpValue, ConversionError> {
    match xtype {
        XmpType::BagText => Ok(XmpValue::Array(parse_bag(raw))),
        XmpType::Boolean => match raw {
            "True" => Ok(XmpValue::Boolean(true)),
            "False" => Ok(XmpValue::Boolean(false)),
            _ => Err(malformed(raw, xtype)),
        },
        XmpType::Date => parse_date(raw)
            .map(XmpValue::Date)
            .ok_or_else(|| malformed(raw, xtype)),
        XmpType::Integer => raw
            .parse::<i64>()
            .map(XmpValue::Integer)
            .map_err(|_| malformed(raw, xtype)),
        XmpType::LangAlt => parse_lang_alt(raw)
            .map(XmpValue::LangAlt)
            .ok_or_else(|| malformed(raw, xtype)),
        XmpType::MimeType => match raw.split_once('/') {
            Some((type_, subtype)) => Ok(XmpValue::Mime(MimeType::new(type_, subtype))),
            None => Err(malformed(raw, xtype)),
        },
        XmpType::ProperName | XmpType::Text | XmpType::Uri | XmpType::Url => {
            if raw.is_empty() {
                Err(malformed(raw, xtype))
            } else {
                Ok(XmpValue::Text(raw.to_string()))
            }
        }
    }
}

fn malformed(raw: &str, xtype: XmpType) -> ConversionError {
    ConversionError::Malformed {
        xtype,
        raw: raw.to_string(),
    }
}

/// Split a bag on the `, ` delimiter. Empty input is an empty bag.
fn parse_bag(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(", ").map(str::to_string).collect()
}

/// Parse a sequence of `lang="<tag>" <text>` segments.
///
/// The raw text is split on the literal `lang="`; the fragment before the
/// first occurrence must be empty, and every non-final segment must end
/// (after right-trimming) with the `,` that separates it from the next.
/// Exactly one space after the closing quote is consumed; all other
/// whitespace belongs to the text. Text containing the delimiter pattern
/// itself mis-splits — the grammar defines no escaping.
fn parse_lang_alt(raw: &str) -> Option<BTreeMap<String, String>> {
    let mut fragments = raw.split("lang=\"");
    if !fragments.next()?.is_empty() {
        return None;
    }
    let segments: Vec<&str> = fragments.collect();
    if segments.is_empty() {
        return None;
    }

    let last = segments.len() - 1;
    let mut map = BTreeMap::new();
    for (i, segment) in segments.iter().enumerate() {
        let (tag, text) = segment.split_once('"')?;
        let text = if i < last {
            // Strip the separating comma and the whitespace run before the
            // next lang="..."; whitespace before the comma is text.
            text.trim_end().strip_suffix(',')?
        } else {
            text
        };
        let text = text.strip_prefix(' ').unwrap_or(text);
        map.insert(tag.to_string(), text.to_string());
    }
    Some(map)
}

/// Parse an XMP date at any of its defined precisions.
fn parse_date(raw: &str) -> Option<XmpDateTime> {
    match raw.split_once('T') {
        None => parse_calendar(raw),
        Some((date, time)) => {
            // A time of day requires a full calendar date.
            let XmpDateTime::Date(date) = parse_calendar(date)? else {
                return None;
            };
            parse_time(date, time).map(XmpDateTime::DateTime)
        }
    }
}

/// Parse `YYYY`, `YYYY-MM`, or `YYYY-MM-DD` with calendar validation.
fn parse_calendar(s: &str) -> Option<XmpDateTime> {
    let fields: Vec<&str> = s.split('-').collect();
    match fields.as_slice() {
        [y] => Some(XmpDateTime::Year(fixed_digits(y, 4)? as i32)),
        [y, m] => {
            let year = fixed_digits(y, 4)? as i32;
            let month = fixed_digits(m, 2)?;
            (1..=12)
                .contains(&month)
                .then_some(XmpDateTime::YearMonth { year, month })
        }
        [y, m, d] => {
            let year = fixed_digits(y, 4)? as i32;
            let month = fixed_digits(m, 2)?;
            let day = fixed_digits(d, 2)?;
            NaiveDate::from_ymd_opt(year, month, day).map(XmpDateTime::Date)
        }
        _ => None,
    }
}

/// Parse `hh:mm[:ss[.f…]]` followed by a mandatory `Z` or `±hh:mm`.
fn parse_time(date: NaiveDate, s: &str) -> Option<XmpTimestamp> {
    let (clock, tz_minutes) = split_time_zone(s)?;

    let fields: Vec<&str> = clock.split(':').collect();
    let (hour_field, minute_field, second_field) = match fields.as_slice() {
        [h, m] => (*h, *m, None),
        [h, m, s] => (*h, *m, Some(*s)),
        _ => return None,
    };

    let hour = fixed_digits(hour_field, 2).filter(|h| *h < 24)?;
    let minute = fixed_digits(minute_field, 2).filter(|m| *m < 60)?;

    let (second, microsecond) = match second_field {
        None => (None, 0),
        Some(field) => {
            let (whole, fraction) = match field.split_once('.') {
                None => (field, 0),
                Some((whole, digits)) => (whole, parse_fraction(digits)?),
            };
            let second = fixed_digits(whole, 2).filter(|s| *s < 60)?;
            (Some(second), fraction)
        }
    };

    Some(XmpTimestamp {
        date,
        hour,
        minute,
        second,
        microsecond,
        tz_minutes: Some(tz_minutes),
    })
}

/// Split the trailing time-zone designator off a time-of-day string.
/// The designator is mandatory; its absence is a parse failure.
fn split_time_zone(s: &str) -> Option<(&str, i32)> {
    if let Some(clock) = s.strip_suffix('Z') {
        return Some((clock, 0));
    }
    // The clock part contains only digits, ':' and '.', so the rightmost
    // sign character always starts the designator.
    let pos = s.rfind(['+', '-'])?;
    let (clock, designator) = s.split_at(pos);
    let (hours, minutes) = designator[1..].split_once(':')?;
    let hours = fixed_digits(hours, 2).filter(|h| *h < 24)?;
    let minutes = fixed_digits(minutes, 2).filter(|m| *m < 60)?;
    let offset = (hours * 60 + minutes) as i32;
    match designator.as_bytes()[0] {
        b'+' => Some((clock, offset)),
        _ => Some((clock, -offset)),
    }
}

/// Fold fractional-second digits into microseconds: first six digits,
/// right-padded with zeros. At least one digit is required.
fn parse_fraction(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut micros = 0u32;
    for b in digits.bytes().take(6) {
        micros = micros * 10 + (b - b'0') as u32;
    }
    Some(micros * 10u32.pow(6u32.saturating_sub(digits.len().min(6) as u32)))
}

/// Parse a zero-padded decimal field of an exact width.
fn fixed_digits(s: &str, width: usize) -> Option<u32> {
    if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
