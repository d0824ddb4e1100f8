//! ISO-8601 timestamps as Core Foundation absolute time.
//!
//! Property-list dates are stored as seconds relative to
//! 2001-01-01T00:00:00Z, so earlier instants are negative.

/// Seconds between the Unix epoch and 2001-01-01T00:00:00Z.
pub const UNIX_TO_ABSOLUTE: i64 = 978_307_200;

const SECONDS_PER_DAY: i64 = 86_400;

/// Years beyond this magnitude are rejected before any day arithmetic.
const MAX_YEAR: i64 = 1_000_000;

/// Parses `YYYY-MM-DDTHH:MM:SS[.fff][Z]` into seconds since 2001-01-01 UTC.
///
/// The time part may be omitted, in which case midnight is assumed. Returns
/// `None` for anything else, including out-of-range fields.
pub fn parse_iso8601(text: &str) -> Option<f64> {
    let text = text.trim();
    let text = text.strip_suffix('Z').unwrap_or(text);
    let (date, time) = match text.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (text, None),
    };

    let (year, rest) = split_signed_year(date)?;
    let mut parts = rest.split('-');
    let month = number(parts.next()?, 2)?;
    let day = number(parts.next()?, 2)?;
    if parts.next().is_some() || !(1..=12).contains(&month) {
        return None;
    }
    if day < 1 || day > days_in_month(year, month) {
        return None;
    }

    let mut seconds = 0.0;
    if let Some(time) = time {
        let mut parts = time.splitn(3, ':');
        let hour = number(parts.next()?, 2)?;
        let minute = number(parts.next()?, 2)?;
        let field = parts.next()?;
        let (second, fraction) = match field.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (field, None),
        };
        let second = number(second, 2)?;
        if hour > 23 || minute > 59 || second > 60 {
            return None;
        }
        seconds = (hour * 3600 + minute * 60 + second) as f64;
        if let Some(fraction) = fraction {
            if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            seconds += format!("0.{}", fraction).parse::<f64>().ok()?;
        }
    }

    let unix = days_from_civil(year, month, day).checked_mul(SECONDS_PER_DAY)?;
    Some(unix.checked_sub(UNIX_TO_ABSOLUTE)? as f64 + seconds)
}

fn split_signed_year(date: &str) -> Option<(i64, &str)> {
    let (negative, body) = match date.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, date.strip_prefix('+').unwrap_or(date)),
    };
    let (year, rest) = body.split_once('-')?;
    if year.len() < 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i64 = year.parse().ok()?;
    if year > MAX_YEAR {
        return None;
    }
    Some((if negative { -year } else { year }, rest))
}

fn number(field: &str, width: usize) -> Option<i64> {
    if field.len() != width || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

fn is_leap(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01 of a proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let month_index = (month + 9) % 12;
    let day_of_year = (153 * month_index + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}
