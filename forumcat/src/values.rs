//! Loose value semantics for hash fields.
//!
//! Everything read back from a Redis hash is a string, while records produced by
//! hook listeners or in-memory stores may carry real numbers and booleans. These
//! helpers give both shapes one consistent meaning.

use serde_json::{Map, Number, Value};

/// Returns `true` when `name` passes the field filter (an empty filter allows everything).
pub fn field_requested<S: AsRef<str>>(fields: &[S], name: &str) -> bool {
    fields.is_empty() || fields.iter().any(|field| field.as_ref() == name)
}

/// Whether a value is usable as a number.
///
/// Finite numbers qualify. Strings qualify when, ignoring surrounding whitespace,
/// they are non-empty and coerce to a finite number (decimal with optional sign and
/// exponent, or a `0x`/`0o`/`0b` integer literal). Arrays are judged by their
/// joined string form, so `[1]` is numeric while `[]` and `[1, 2]` are not.
pub fn is_number(value: &Value) -> bool {
    match value {
        Value::Number(number) => number.as_f64().is_some_and(f64::is_finite),
        Value::String(raw) => coerce_number(raw).is_some_and(f64::is_finite),
        Value::Array(_) => coerce_number(&to_loose_string(value)).is_some_and(f64::is_finite),
        _ => false,
    }
}

fn trim_loose(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = trim_loose(raw);
    if trimmed.is_empty() {
        return None;
    }

    let radix_literal = |prefix: &[&str; 2], radix: u32| {
        prefix
            .iter()
            .find_map(|p| trimmed.strip_prefix(p))
            .map(|digits| {
                if digits.is_empty() {
                    return None;
                }
                // Accumulates in f64: long literals lose precision instead of failing.
                digits
                    .chars()
                    .try_fold(0.0_f64, |acc, c| c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d)))
            })
    };
    for (prefix, radix) in [(["0x", "0X"], 16), (["0o", "0O"], 8), (["0b", "0B"], 2)] {
        if let Some(parsed) = radix_literal(&prefix, radix) {
            return parsed;
        }
    }

    if !is_decimal_literal(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`
fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut idx = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        idx += 1;
    }

    let int_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    let mut mantissa_digits = idx - int_start;

    if idx < bytes.len() && bytes[idx] == b'.' {
        idx += 1;
        let frac_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        mantissa_digits += idx - frac_start;
    }
    if mantissa_digits == 0 {
        return false;
    }

    if idx < bytes.len() && matches!(bytes[idx], b'e' | b'E') {
        idx += 1;
        if matches!(bytes.get(idx), Some(b'+' | b'-')) {
            idx += 1;
        }
        let exp_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == exp_start {
            return false;
        }
    }

    idx == bytes.len()
}

/// Leading-integer parse of any value; unparsable input yields `0`.
///
/// `"12abc"` → 12, `"1.9"` → 1, `"  -4"` → -4, `""`/`"abc"`/`null` → 0.
pub fn parse_int(value: &Value) -> i64 {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return int;
            }
            match number.as_f64() {
                Some(float) if float.is_finite() && float.abs() < 1e21 => float.trunc() as i64,
                Some(float) if float.is_finite() => parse_int_str(&format!("{float:e}")),
                _ => 0,
            }
        }
        other => parse_int_str(&to_loose_string(other)),
    }
}

fn parse_int_str(raw: &str) -> i64 {
    let text = raw.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut acc: i64 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(byte - b'0');
        acc = if negative {
            acc.saturating_mul(10).saturating_sub(digit)
        } else {
            acc.saturating_mul(10).saturating_add(digit)
        };
    }
    acc
}

/// Falsy values are `null`, `false`, `0`, and the empty string.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String form of a value as it would be rendered into a page.
pub fn to_loose_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number_to_string(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_loose_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_to_string(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < 1e21 => format!("{}", float as i64),
        Some(float) => float.to_string(),
        None => number.to_string(),
    }
}

/// Coerces every present, requested field in `int_fields` to an integer in place.
pub fn parse_int_fields<S: AsRef<str>>(record: &mut Map<String, Value>, int_fields: &[&str], requested: &[S]) {
    for field in int_fields {
        if !field_requested(requested, field) {
            continue;
        }
        if let Some(value) = record.get_mut(*field) {
            *value = Value::from(parse_int(value));
        }
    }
}
