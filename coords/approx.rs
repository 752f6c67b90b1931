//! The linear approximation between UTM meters and geographic degrees.
//!
//! This is not a projection: one degree is taken to be [`METERS_PER_DEGREE`]
//! everywhere, whatever the latitude, zone or hemisphere.

/// Rough length of one degree of arc, in meters.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Number of fraction digits that covers the exact decimal expansion of any `f64`.
const EXACT_FRACTION_DIGITS: usize = 1100;

/// Values at or above this magnitude are printed in exponent form.
const EXPONENT_FORM_THRESHOLD: f64 = 1e21;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmPoint {
    pub easting: f64,
    pub northing: f64,
}

pub fn utm_to_geographic(easting: f64, northing: f64) -> GeographicPoint {
    GeographicPoint {
        latitude: northing / METERS_PER_DEGREE,
        longitude: easting / METERS_PER_DEGREE,
    }
}

pub fn geographic_to_utm(latitude: f64, longitude: f64) -> UtmPoint {
    UtmPoint {
        easting: longitude * METERS_PER_DEGREE,
        northing: latitude * METERS_PER_DEGREE,
    }
}

/// Parses the longest numeric prefix of `text`, after leading whitespace
/// (a byte order mark counts as whitespace).
///
/// Text without a numeric prefix yields NaN rather than an error, so
/// `"12.5m"` is 12.5 and `"abc"` is NaN.
pub fn parse_float(text: &str) -> f64 {
    let text = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if text[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let integer_digits = digits_from(end);
    end += integer_digits;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = digits_from(end + 1);
        if integer_digits + fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }
    if integer_digits + fraction_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = digits_from(exponent);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

/// Formats `value` with exactly `digits` fraction digits.
///
/// The exact binary value is rounded half away from zero. A negative value
/// keeps its sign even when it rounds to zero, negative zero does not.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    if magnitude.is_infinite() {
        return format!("{sign}Infinity");
    }
    if magnitude >= EXPONENT_FORM_THRESHOLD {
        return format!("{sign}{}", format!("{magnitude:e}").replacen('e', "e+", 1));
    }

    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, magnitude);
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let (kept, dropped) = fraction.split_at(digits.min(fraction.len()));

    let mut rounded: Vec<u8> = whole.bytes().chain(kept.bytes()).collect();
    if dropped.as_bytes().first().is_some_and(|digit| *digit >= b'5') {
        increment_decimal(&mut rounded);
    }

    let (whole, kept) = rounded.split_at(rounded.len() - kept.len());
    let mut fixed = String::with_capacity(sign.len() + rounded.len() + 1);
    fixed.push_str(sign);
    fixed.extend(whole.iter().map(|digit| char::from(*digit)));
    if !kept.is_empty() {
        fixed.push('.');
        fixed.extend(kept.iter().map(|digit| char::from(*digit)));
    }
    fixed
}

fn increment_decimal(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}
