//! Token-based date formatting
//!
//! | Token  | Output                         |
//! |--------|--------------------------------|
//! | `d`    | day of month, `3`              |
//! | `dd`   | day of month, `03`             |
//! | `D`    | weekday, abbreviated           |
//! | `DD`   | weekday, full                  |
//! | `m`    | month number, `7`              |
//! | `mm`   | month number, `07`             |
//! | `M`    | month, abbreviated             |
//! | `MM`   | month, full                    |
//! | `yy`   | two-digit year                 |
//! | `yyyy` | four-digit year                |
//! | `H`    | hour, `9`                      |
//! | `HH`   | hour, `09`                     |
//! | `i`    | minutes, `05`                  |
//! | `s`    | seconds, `07`                  |
//!
//! Any other character is copied. A backslash copies the next character
//! verbatim, so `\d` prints a literal `d`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::{DateError, DateResult, Locale};

/// Formats tried by [`parse_date`] when the caller passes none
pub const DEFAULT_PARSE_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y",
];

/// Format a date and time with the tokens listed in the module docs
///
/// ```
/// use chrono::NaiveDate;
/// use helpkit_common::date::{format_date, Locale};
///
/// let dt = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap().and_hms_opt(9, 5, 0).unwrap();
/// assert_eq!(format_date(&dt, "DD d MM yyyy, HH:i", Locale::Fr), "lundi 3 mars 2025, 09:05");
/// assert_eq!(format_date(&dt, "D, M dd yy", Locale::En), "Mon, Mar 03 25");
/// ```
pub fn format_date(value: &NaiveDateTime, pattern: &str, locale: Locale) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            if let Some(&next) = chars.get(i + 1) {
                out.push(next);
            }
            i += 2;
            continue;
        }

        let max_run = match c {
            'd' | 'D' | 'm' | 'M' | 'H' => 2,
            'y' => 4,
            'i' | 's' => 1,
            _ => {
                out.push(c);
                i += 1;
                continue;
            }
        };
        let run = chars[i..].iter().take(max_run).take_while(|&&x| x == c).count();

        match (c, run) {
            ('d', 1) => out.push_str(&value.day().to_string()),
            ('d', _) => out.push_str(&format!("{:02}", value.day())),
            ('D', 1) => out.push_str(locale.weekday_abbr(value.weekday())),
            ('D', _) => out.push_str(locale.weekday_name(value.weekday())),
            ('m', 1) => out.push_str(&value.month().to_string()),
            ('m', _) => out.push_str(&format!("{:02}", value.month())),
            ('M', 1) => out.push_str(locale.month_abbr(value.month())),
            ('M', _) => out.push_str(locale.month_name(value.month())),
            ('y', 2) => out.push_str(&format!("{:02}", value.year().rem_euclid(100))),
            ('y', _) => out.push_str(&format!("{:04}", value.year())),
            ('H', 1) => out.push_str(&value.hour().to_string()),
            ('H', _) => out.push_str(&format!("{:02}", value.hour())),
            ('i', _) => out.push_str(&format!("{:02}", value.minute())),
            _ => out.push_str(&format!("{:02}", value.second())),
        }
        i += run;
    }

    out
}

/// [`format_date`] for a calendar day, at midnight
pub fn format_day(date: NaiveDate, pattern: &str, locale: Locale) -> String {
    format_date(&NaiveDateTime::new(date, NaiveTime::default()), pattern, locale)
}

/// Long written form: "lundi 3 mars 2025", "Monday, March 3, 2025"
///
/// French uses the ordinal "1er" for the first day of the month.
pub fn format_long(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::Fr => {
            let day = if date.day() == 1 { "1er".to_string() } else { date.day().to_string() };
            format!(
                "{} {} {} {}",
                locale.weekday_name(date.weekday()),
                day,
                locale.month_name(date.month()),
                date.year()
            )
        }
        Locale::En => format!(
            "{}, {} {}, {}",
            locale.weekday_name(date.weekday()),
            locale.month_name(date.month()),
            date.day(),
            date.year()
        ),
    }
}

/// Parse a date or date-time, trying RFC 3339 then each chrono format
///
/// Date-only formats yield midnight. An empty `formats` slice falls back to
/// [`DEFAULT_PARSE_FORMATS`].
///
/// # Errors
///
/// [`DateError::InvalidFormat`] when nothing matches.
pub fn parse_date(input: &str, formats: &[&str]) -> DateResult<NaiveDateTime> {
    let input = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.naive_local());
    }

    let formats = if formats.is_empty() { &DEFAULT_PARSE_FORMATS[..] } else { formats };
    for format in formats {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(parsed);
        }
        if let Ok(day) = NaiveDate::parse_from_str(input, format) {
            return Ok(NaiveDateTime::new(day, NaiveTime::default()));
        }
    }

    Err(DateError::InvalidFormat(input.to_string()))
}

#[cfg(test)]
mod tests {
    //! Unit tests for date::format.
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
    }

    /// Validates `format_date` for every token.
    ///
    /// Assertions:
    /// - Confirms padded and unpadded variants.
    /// - Confirms locale-dependent names.
    #[test]
    fn test_format_date_tokens() {
        let dt = at(2024, 2, 9, 7, 3, 4);

        assert_eq!(format_date(&dt, "d/m/yy", Locale::Fr), "9/2/24");
        assert_eq!(format_date(&dt, "dd/mm/yyyy HH:i:s", Locale::Fr), "09/02/2024 07:03:04");
        assert_eq!(format_date(&dt, "H\\hi", Locale::Fr), "7h03");
        assert_eq!(format_date(&dt, "D DD", Locale::Fr), "ven. vendredi");
        assert_eq!(format_date(&dt, "M MM", Locale::En), "Feb February");
    }

    #[test]
    fn test_format_date_literals_and_escapes() {
        let dt = at(2024, 12, 25, 18, 0, 0);
        assert_eq!(format_date(&dt, "\\d\\a\\y: d", Locale::En), "day: 25");
        assert_eq!(format_date(&dt, "[yyyy]", Locale::En), "[2024]");
        assert_eq!(format_date(&dt, "at\\", Locale::En), "at");
        // runs longer than a token split into tokens
        assert_eq!(format_date(&dt, "ddd", Locale::En), "2525");
    }

    #[test]
    fn test_format_day() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(format_day(day, "dd.mm.yyyy HH:i", Locale::En), "01.01.2025 00:00");
    }

    #[test]
    fn test_format_long() {
        let first = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let third = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();

        assert_eq!(format_long(first, Locale::Fr), "samedi 1er mars 2025");
        assert_eq!(format_long(third, Locale::Fr), "lundi 3 mars 2025");
        assert_eq!(format_long(third, Locale::En), "Monday, March 3, 2025");
    }

    #[test]
    fn test_parse_date_defaults() {
        assert_eq!(parse_date("2025-03-01", &[]).unwrap(), at(2025, 3, 1, 0, 0, 0));
        assert_eq!(parse_date("01/03/2025 14:30", &[]).unwrap(), at(2025, 3, 1, 14, 30, 0));
        assert_eq!(
            parse_date("2025-03-01T10:00:00+02:00", &[]).unwrap(),
            at(2025, 3, 1, 10, 0, 0)
        );
    }

    #[test]
    fn test_parse_date_custom_formats() {
        assert_eq!(parse_date("20250301", &["%Y%m%d"]).unwrap(), at(2025, 3, 1, 0, 0, 0));
        assert!(matches!(
            parse_date("2025-03-01", &["%Y%m%d"]),
            Err(DateError::InvalidFormat(_))
        ));
        assert!(parse_date("yesterday", &[]).is_err());
    }
}
