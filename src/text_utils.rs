use std::ops::Index;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use lazy_static::lazy_static;
use regex::Regex;

#[cfg(windows)]
pub const NEWLINE: &str = "\r\n";
#[cfg(not(windows))]
pub const NEWLINE: &str = "\n";

/// A date-time literal as written in a metadata header. Literals without an
/// explicit offset are wall-clock times in whatever zone the caller resolves them in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateTimeLiteral {
    pub date_time: NaiveDateTime,
    pub offset: Option<FixedOffset>,
}

impl DateTimeLiteral {
    pub fn resolve(&self, local: &FixedOffset) -> DateTime<FixedOffset> {
        let offset = self.offset.unwrap_or(*local);
        // A fixed offset never makes a local time ambiguous
        match offset.from_local_datetime(&self.date_time).single() {
            Some(dt) => dt,
            None => offset.from_utc_datetime(&self.date_time),
        }
    }
}

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

fn parse_offset(buf: &str, date_str: &str) -> Result<FixedOffset, String> {
    if buf == "Z" {
        return FixedOffset::east_opt(0).ok_or_else(|| format!("Invalid offset in {}", date_str));
    }

    let sign = if buf.starts_with('-') { -1 } else { 1 };
    let digits: String = buf[1..].chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 4 {
        return Err(format!("Invalid offset {} in {}", buf, date_str));
    }
    let hours: i32 = to_int(&digits[0..2], date_str)?;
    let minutes: i32 = to_int(&digits[2..4], date_str)?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| format!("Invalid offset {} in {}", buf, date_str))
}

/// Accepts `YYYY-MM-DD`, optionally followed by ` HH:MM[:SS[.fff]]` (or with a `T`
/// separator) and an optional `Z` / `+HH:MM` offset.
pub fn parse_date_time(buf: &str) -> Result<DateTimeLiteral, String> {
    lazy_static! {
        static ref DATE_TIME_REGEX: Regex = Regex::new(
            r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[ T](\d{1,2}):(\d{1,2})(?::(\d{1,2}))?(?:\.\d+)?)?\s*(Z|[+-]\d{2}:?\d{2})?$"
        ).unwrap();
    }

    let buf = buf.trim();
    let Some(caps) = DATE_TIME_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date time {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);
    let opt_u32 = |idx: usize| match caps.get(idx) {
        Some(m) => to_u32(m.as_str()),
        None => Ok(0),
    };

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = opt_u32(4)?;
    let mn: u32 = opt_u32(5)?;
    let s: u32 = opt_u32(6)?;

    let date = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| format!("Date out of range in {}", buf))?;
    let time = NaiveTime::from_hms_opt(h, mn, s)
        .ok_or_else(|| format!("Time out of range in {}", buf))?;

    let offset = match caps.get(7) {
        Some(o) => Some(parse_offset(o.as_str(), buf)?),
        None => None,
    };

    Ok(DateTimeLiteral {
        date_time: NaiveDateTime::new(date, time),
        offset,
    })
}

pub fn format_date_time(date_time: &NaiveDateTime) -> String {
    date_time.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn parse_bool(buf: &str) -> Option<bool> {
    match buf.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_time() {
        let lit = parse_date_time("2017-09-10 10:42:32.123").unwrap();
        assert_eq!(format_date_time(&lit.date_time), "2017-09-10 10:42:32");
        assert_eq!(lit.offset, None);

        let lit = parse_date_time("2017-09-10T10:42:32").unwrap();
        assert_eq!(format_date_time(&lit.date_time), "2017-09-10 10:42:32");

        let lit = parse_date_time("2017-09-10 10:42").unwrap();
        assert_eq!(format_date_time(&lit.date_time), "2017-09-10 10:42:00");

        let lit = parse_date_time("2017-09-10").unwrap();
        assert_eq!(format_date_time(&lit.date_time), "2017-09-10 00:00:00");
    }

    #[test]
    fn test_parse_date_time_offset() {
        let lit = parse_date_time("2017-09-10T10:42:32Z").unwrap();
        assert_eq!(lit.offset, FixedOffset::east_opt(0));

        let lit = parse_date_time("2017-09-10T10:42:32-03:00").unwrap();
        assert_eq!(lit.offset, FixedOffset::west_opt(3 * 3600));

        let local = FixedOffset::east_opt(0).unwrap();
        let resolved = lit.resolve(&local);
        assert_eq!(resolved.naive_utc(), parse_date_time("2017-09-10 13:42:32").unwrap().date_time);
    }

    #[test]
    fn test_parse_date_time_invalid() {
        assert!(parse_date_time("yesterday").is_err());
        assert!(parse_date_time("2017-13-10").is_err());
        assert!(parse_date_time("2017-09-10 25:00:00").is_err());
        assert!(parse_date_time("").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" False "), Some(false));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool(""), None);
    }
}
