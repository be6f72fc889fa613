//! Relative dates, ages and calendars

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use super::{DateError, DateResult, Locale};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

#[derive(Clone, Copy)]
enum Unit {
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl Unit {
    fn label(self, count: i64, locale: Locale) -> &'static str {
        let plural = count > 1;
        match (locale, self, plural) {
            (Locale::En, Unit::Minute, false) => "minute",
            (Locale::En, Unit::Minute, true) => "minutes",
            (Locale::En, Unit::Hour, false) => "hour",
            (Locale::En, Unit::Hour, true) => "hours",
            (Locale::En, Unit::Day, false) => "day",
            (Locale::En, Unit::Day, true) => "days",
            (Locale::En, Unit::Month, false) => "month",
            (Locale::En, Unit::Month, true) => "months",
            (Locale::En, Unit::Year, false) => "year",
            (Locale::En, Unit::Year, true) => "years",
            (Locale::Fr, Unit::Minute, false) => "minute",
            (Locale::Fr, Unit::Minute, true) => "minutes",
            (Locale::Fr, Unit::Hour, false) => "heure",
            (Locale::Fr, Unit::Hour, true) => "heures",
            (Locale::Fr, Unit::Day, false) => "jour",
            (Locale::Fr, Unit::Day, true) => "jours",
            (Locale::Fr, Unit::Month, _) => "mois",
            (Locale::Fr, Unit::Year, false) => "an",
            (Locale::Fr, Unit::Year, true) => "ans",
        }
    }
}

/// Describe `date` relative to `reference`
///
/// Past dates read "3 days ago" / "il y a 3 jours", future ones "in 2 hours"
/// / "dans 2 heures". Anything within a minute is "just now" / "à
/// l'instant". Months count 30 days and years 365.
pub fn human_diff(date: NaiveDateTime, reference: NaiveDateTime, locale: Locale) -> String {
    let seconds = (date - reference).num_seconds();
    let distance = seconds.abs();

    if distance < MINUTE {
        return match locale {
            Locale::En => "just now".to_string(),
            Locale::Fr => "à l'instant".to_string(),
        };
    }

    let (count, unit) = [(YEAR, Unit::Year), (MONTH, Unit::Month), (DAY, Unit::Day), (HOUR, Unit::Hour)]
        .into_iter()
        .find(|(size, _)| distance >= *size)
        .map_or((distance / MINUTE, Unit::Minute), |(size, unit)| (distance / size, unit));
    let label = unit.label(count, locale);

    match (locale, seconds < 0) {
        (Locale::En, true) => format!("{count} {label} ago"),
        (Locale::En, false) => format!("in {count} {label}"),
        (Locale::Fr, true) => format!("il y a {count} {label}"),
        (Locale::Fr, false) => format!("dans {count} {label}"),
    }
}

/// Completed years between `birth` and `today`; `None` for a future birth date
pub fn age(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birth > today {
        return None;
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Compact duration label: "45 s", "12 min", "1h05"
pub fn format_seconds(seconds: u64) -> String {
    let seconds_per_hour = HOUR as u64;
    let seconds_per_minute = MINUTE as u64;

    if seconds < seconds_per_minute {
        format!("{seconds} s")
    } else if seconds < seconds_per_hour {
        format!("{} min", seconds / seconds_per_minute)
    } else {
        let hours = seconds / seconds_per_hour;
        let minutes = (seconds % seconds_per_hour) / seconds_per_minute;
        format!("{hours}h{minutes:02}")
    }
}

/// Convert a UTC instant to an IANA time zone such as `Europe/Paris`
///
/// # Errors
///
/// [`DateError::UnknownTimezone`] when the name is not in the tz database.
pub fn to_timezone(instant: DateTime<Utc>, zone: &str) -> DateResult<DateTime<Tz>> {
    let tz: Tz = zone.trim().parse().map_err(|_| DateError::UnknownTimezone(zone.to_string()))?;
    Ok(tz.from_utc_datetime(&instant.naive_utc()))
}

pub fn is_weekend(date: impl Datelike) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Weekdays in `[start, end)`; negative when `end` is before `start`
///
/// Public holidays are not taken into account.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let (from, to, sign) = if start <= end { (start, end, 1) } else { (end, start, -1) };

    let full_weeks = (to - from).num_days() / 7;
    let tail_start = from + Duration::days(full_weeks * 7);
    let tail = tail_start.iter_days().take_while(|day| *day < to).filter(|day| !is_weekend(*day)).count();

    sign * (full_weeks * 5 + tail as i64)
}

#[cfg(test)]
mod tests {
    //! Unit tests for date::diff.
    use chrono::Timelike;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        day(y, m, d).and_hms_opt(12, 0, 0).unwrap()
    }

    /// Validates `human_diff` in both directions and both locales.
    ///
    /// Assertions:
    /// - Confirms past and future phrasing.
    /// - Confirms singular and plural labels.
    /// - Confirms the "just now" threshold.
    #[test]
    fn test_human_diff() {
        let now = noon(2025, 3, 10);

        assert_eq!(human_diff(noon(2025, 3, 7), now, Locale::Fr), "il y a 3 jours");
        assert_eq!(human_diff(now + Duration::hours(2), now, Locale::En), "in 2 hours");
        assert_eq!(human_diff(now - Duration::minutes(1), now, Locale::En), "1 minute ago");
        assert_eq!(human_diff(now + Duration::seconds(30), now, Locale::Fr), "à l'instant");
        assert_eq!(human_diff(noon(2024, 12, 1), now, Locale::Fr), "il y a 3 mois");
        assert_eq!(human_diff(noon(2027, 3, 10), now, Locale::Fr), "dans 2 ans");
        assert_eq!(human_diff(noon(2026, 3, 10), now, Locale::Fr), "dans 1 an");
    }

    #[test]
    fn test_age() {
        assert_eq!(age(day(1990, 6, 15), day(2025, 6, 14)), Some(34));
        assert_eq!(age(day(1990, 6, 15), day(2025, 6, 15)), Some(35));
        assert_eq!(age(day(2000, 2, 29), day(2001, 2, 28)), Some(0));
        assert_eq!(age(day(2030, 1, 1), day(2025, 1, 1)), None);
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(45), "45 s");
        assert_eq!(format_seconds(720), "12 min");
        assert_eq!(format_seconds(3900), "1h05");
        assert_eq!(format_seconds(36_000), "10h00");
    }

    #[test]
    fn test_to_timezone() {
        let instant = Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap();
        let paris = to_timezone(instant, "Europe/Paris").unwrap();
        assert_eq!(paris.hour(), 12);

        let winter = to_timezone(Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap(), "Europe/Paris");
        assert_eq!(winter.unwrap().hour(), 11);

        assert_eq!(
            to_timezone(instant, "Mars/Olympus").unwrap_err(),
            DateError::UnknownTimezone("Mars/Olympus".into())
        );
    }

    #[test]
    fn test_business_days() {
        // Monday 2025-03-03 to Monday 2025-03-10
        assert_eq!(business_days_between(day(2025, 3, 3), day(2025, 3, 10)), 5);
        // Friday to Monday
        assert_eq!(business_days_between(day(2025, 3, 7), day(2025, 3, 10)), 1);
        assert_eq!(business_days_between(day(2025, 3, 10), day(2025, 3, 3)), -5);
        assert_eq!(business_days_between(day(2025, 3, 8), day(2025, 3, 8)), 0);
        assert_eq!(business_days_between(day(2025, 1, 1), day(2025, 12, 31)), 260);
    }

    #[test]
    fn test_is_weekend() {
        assert!(is_weekend(day(2025, 3, 8)));
        assert!(is_weekend(noon(2025, 3, 9)));
        assert!(!is_weekend(day(2025, 3, 10)));
    }
}
