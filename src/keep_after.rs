//! Parsing of `--keep-after` date specifications.
//!
//! A specification is either an absolute date matching a strftime format, or
//! a relative offset back from now such as `4d`, `-12H` or `7dr`.

use std::sync::OnceLock;
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use regex::Regex;

use crate::error::{CleanupError, Result};

/// Used when neither a date nor a space target is given.
pub(crate) const DEFAULT_KEEP_AFTER: &str = "7dr";

pub(crate) const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Resolve a keep-after specification to the deletion cutoff.
///
/// Absolute dates are tried first with `format`, as a full date-time and then
/// as a bare date at local midnight. Otherwise the relative grammar
/// `-?N[X][r]` applies, where `X` is one of `M` (minutes), `H` (hours),
/// `d` (days, the default), `m` (30-day months) or `y` (365-day years) and a
/// trailing `r` rounds the result back to the previous local midnight.
pub(crate) fn parse_keep_after(
    spec: &str,
    format: &str,
    now: DateTime<Local>,
) -> Result<SystemTime> {
    let spec = spec.trim();

    if let Some(absolute) = parse_absolute(spec, format) {
        return local_instant(spec, &absolute);
    }

    parse_relative(spec, now)
}

fn parse_absolute(spec: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(spec, format).ok().or_else(|| {
        NaiveDate::parse_from_str(spec, format)
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN))
    })
}

fn parse_relative(spec: &str, now: DateTime<Local>) -> Result<SystemTime> {
    static RELATIVE_RE: OnceLock<Regex> = OnceLock::new();

    let re = RELATIVE_RE.get_or_init(|| {
        Regex::new(r"^-?(\d+)([a-zA-Z]?)([rR]?)$").expect("relative date regex should compile")
    });
    let captures = re.captures(spec).ok_or_else(|| {
        CleanupError::InvalidDate(spec.to_string(), "not a valid date specification".to_string())
    })?;

    let amount: i64 = captures[1].parse().map_err(|_| {
        CleanupError::InvalidDate(spec.to_string(), "offset is too large".to_string())
    })?;
    let unit = match &captures[2] {
        "M" => MINUTE,
        "H" => HOUR,
        "" | "d" => DAY,
        "m" => 30 * DAY,
        "y" => 365 * DAY,
        other => {
            return Err(CleanupError::InvalidDate(
                spec.to_string(),
                format!("unknown time scale '{other}'"),
            ));
        }
    };
    let round = !captures[3].is_empty();

    let target = amount
        .checked_mul(unit)
        .and_then(TimeDelta::try_seconds)
        .and_then(|offset| now.checked_sub_signed(offset))
        .ok_or_else(|| {
            CleanupError::InvalidDate(spec.to_string(), "offset is too large".to_string())
        })?;

    if round {
        return local_instant(spec, &target.date_naive().and_time(NaiveTime::MIN));
    }

    Ok(SystemTime::from(target))
}

fn local_instant(spec: &str, naive: &NaiveDateTime) -> Result<SystemTime> {
    Local
        .from_local_datetime(naive)
        .earliest()
        .map(SystemTime::from)
        .ok_or_else(|| {
            CleanupError::InvalidDate(
                spec.to_string(),
                "date does not exist in the local time zone".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Timelike;

    use super::*;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 7, 15, 14, 30, 0).unwrap()
    }

    fn as_local(time: SystemTime) -> DateTime<Local> {
        DateTime::<Local>::from(time)
    }

    #[test]
    fn test_relative_days() {
        let now = fixed_now();
        let cutoff = parse_keep_after("4d", DEFAULT_DATE_FORMAT, now).unwrap();
        assert_eq!(cutoff, SystemTime::from(now) - Duration::from_secs(4 * 86_400));

        // Leading minus and a missing scale mean the same thing
        assert_eq!(
            parse_keep_after("-4", DEFAULT_DATE_FORMAT, now).unwrap(),
            cutoff
        );
    }

    #[test]
    fn test_relative_scales() {
        let now = fixed_now();
        let base = SystemTime::from(now);
        let cases = [
            ("30M", 30 * 60),
            ("12H", 12 * 3600),
            ("2m", 2 * 30 * 86_400),
            ("1y", 365 * 86_400),
        ];

        for (spec, seconds) in cases {
            assert_eq!(
                parse_keep_after(spec, DEFAULT_DATE_FORMAT, now).unwrap(),
                base - Duration::from_secs(seconds),
                "spec {spec}"
            );
        }
    }

    #[test]
    fn test_relative_rounding_to_midnight() {
        let now = fixed_now();
        let cutoff =
            as_local(parse_keep_after(DEFAULT_KEEP_AFTER, DEFAULT_DATE_FORMAT, now).unwrap());

        assert_eq!(cutoff.date_naive(), NaiveDate::from_ymd_opt(2024, 7, 8).unwrap());
        assert_eq!((cutoff.hour(), cutoff.minute(), cutoff.second()), (0, 0, 0));

        let upper = as_local(parse_keep_after("3HR", DEFAULT_DATE_FORMAT, now).unwrap());
        assert_eq!(upper.date_naive(), NaiveDate::from_ymd_opt(2024, 7, 15).unwrap());
        assert_eq!(upper.hour(), 0);
    }

    #[test]
    fn test_absolute_dates() {
        let now = fixed_now();
        let cutoff = as_local(parse_keep_after("2024-01-02", DEFAULT_DATE_FORMAT, now).unwrap());
        assert_eq!(cutoff.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(cutoff.hour(), 0);

        let cutoff =
            as_local(parse_keep_after("02/01/2024 08:15", "%d/%m/%Y %H:%M", now).unwrap());
        assert_eq!(cutoff.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!((cutoff.hour(), cutoff.minute()), (8, 15));
    }

    #[test]
    fn test_invalid_specifications() {
        let now = fixed_now();
        for spec in ["", "abc", "5x", "7r", "4dd", "2024-13-45", "99999999999999999999d"] {
            let err = parse_keep_after(spec, DEFAULT_DATE_FORMAT, now).unwrap_err();
            assert!(
                matches!(err, CleanupError::InvalidDate(..)),
                "spec {spec:?} gave {err:?}"
            );
        }
    }
}
