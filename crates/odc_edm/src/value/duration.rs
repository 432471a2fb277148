//! ISO 8601 day-time durations, e.g. `P1DT2H3M4.5S`.

use alloc::format;
use alloc::string::{String, ToString};

use chrono::TimeDelta;

const SECONDS_PER_DAY: u64 = 86_400;

/// Formats a duration in the `[-]PnDTnHnMn.nS` form.
///
/// Zero components are omitted; a zero duration is `PT0S`.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use odc_edm::value::format_duration;
///
/// let d = TimeDelta::days(1) + TimeDelta::minutes(3) + TimeDelta::milliseconds(500);
/// assert_eq!(format_duration(d), "P1DT3M0.5S");
/// assert_eq!(format_duration(-TimeDelta::hours(2)), "-PT2H");
/// assert_eq!(format_duration(TimeDelta::zero()), "PT0S");
/// ```
pub fn format_duration(value: TimeDelta) -> String {
    let negative = value < TimeDelta::zero();
    let secs = value.num_seconds().unsigned_abs();
    let nanos = value.subsec_nanos().unsigned_abs();

    let days = secs / SECONDS_PER_DAY;
    let hours = secs % SECONDS_PER_DAY / 3600;
    let minutes = secs % 3600 / 60;
    let seconds = secs % 60;

    let mut out = String::with_capacity(16);
    if negative {
        out.push('-');
    }
    out.push('P');
    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    if hours == 0 && minutes == 0 && seconds == 0 && nanos == 0 {
        if days == 0 {
            out.push_str("T0S");
        }
        return out;
    }
    out.push('T');
    if hours > 0 {
        out.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}M"));
    }
    if seconds > 0 || nanos > 0 {
        out.push_str(&seconds.to_string());
        if nanos > 0 {
            let frac = format!("{nanos:09}");
            out.push('.');
            out.push_str(frac.trim_end_matches('0'));
        }
        out.push('S');
    }
    out
}

/// Parses the `[-]PnDTnHnMn.nS` form.
///
/// Year and month designators are rejected: their length in days is not fixed.
pub fn parse_duration(text: &str) -> Result<TimeDelta, &'static str> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let rest = rest.strip_prefix('P').ok_or("missing `P` designator")?;

    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => {
            if time.is_empty() {
                return Err("empty time part");
            }
            (date, Some(time))
        }
        None => (rest, None),
    };

    let mut total: u64 = 0;
    let mut nanos: u32 = 0;
    let mut seen = false;

    if !date_part.is_empty() {
        let days = date_part
            .strip_suffix('D')
            .ok_or("only the day designator is allowed before `T`")?;
        total = parse_component(days)?
            .checked_mul(SECONDS_PER_DAY)
            .ok_or("duration overflow")?;
        seen = true;
    }

    if let Some(mut time) = time_part {
        for (designator, factor) in [('H', 3600_u64), ('M', 60)] {
            if let Some((value, tail)) = time.split_once(designator) {
                let secs = parse_component(value)?
                    .checked_mul(factor)
                    .ok_or("duration overflow")?;
                total = total.checked_add(secs).ok_or("duration overflow")?;
                time = tail;
                seen = true;
            }
        }
        if !time.is_empty() {
            let value = time.strip_suffix('S').ok_or("unexpected designator")?;
            let (whole, frac) = match value.split_once('.') {
                Some((whole, frac)) => (whole, Some(frac)),
                None => (value, None),
            };
            total = total
                .checked_add(parse_component(whole)?)
                .ok_or("duration overflow")?;
            if let Some(frac) = frac {
                nanos = parse_fraction(frac)?;
            }
            seen = true;
        }
    }

    if !seen {
        return Err("no duration components");
    }

    let secs = i64::try_from(total).map_err(|_| "duration overflow")?;
    let value = TimeDelta::new(secs, nanos).ok_or("duration overflow")?;
    Ok(if negative { -value } else { value })
}

fn parse_component(text: &str) -> Result<u64, &'static str> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err("invalid number");
    }
    text.parse().map_err(|_| "duration overflow")
}

// Digits past nanosecond precision are dropped.
fn parse_fraction(text: &str) -> Result<u32, &'static str> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err("invalid fraction");
    }
    let mut nanos = 0_u32;
    for (i, b) in text.bytes().take(9).enumerate() {
        nanos += (b - b'0') as u32 * 10_u32.pow(8 - i as u32);
    }
    Ok(nanos)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::{format_duration, parse_duration};

    #[test]
    fn parse_full_form() {
        let d = parse_duration("P2DT3H4M5.25S").unwrap();
        let expected = TimeDelta::days(2)
            + TimeDelta::hours(3)
            + TimeDelta::minutes(4)
            + TimeDelta::milliseconds(5250);
        assert_eq!(d, expected);
    }

    #[test]
    fn parse_partial_forms() {
        assert_eq!(parse_duration("PT0S").unwrap(), TimeDelta::zero());
        assert_eq!(parse_duration("P7D").unwrap(), TimeDelta::days(7));
        assert_eq!(parse_duration("-PT90M").unwrap(), -TimeDelta::minutes(90));
        assert_eq!(parse_duration("PT1.000000001S").unwrap(), TimeDelta::nanoseconds(1_000_000_001));
    }

    #[test]
    fn parse_rejects_invalid() {
        for text in ["", "P", "PT", "1D", "P1Y", "P1M", "PT1X", "PT-1S", "P1DT", "PTS"] {
            assert!(parse_duration(text).is_err(), "{text} should fail");
        }
    }

    #[test]
    fn format_is_parsed_back() {
        for d in [
            TimeDelta::zero(),
            TimeDelta::seconds(59),
            TimeDelta::days(400) + TimeDelta::microseconds(7),
            -(TimeDelta::hours(25) + TimeDelta::seconds(1)),
        ] {
            assert_eq!(parse_duration(&format_duration(d)).unwrap(), d);
        }
    }
}
