//! Calendar names per locale

use chrono::Weekday;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Fr,
}

helpkit_domain::impl_domain_keyword_conversions!(Locale {
    En => "en",
    Fr => "fr",
});

const EN_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const EN_MONTHS_ABBR: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
const FR_MONTHS: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];
const FR_MONTHS_ABBR: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

const EN_WEEKDAYS: [&str; 7] =
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];
const EN_WEEKDAYS_ABBR: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const FR_WEEKDAYS: [&str; 7] = ["lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche"];
const FR_WEEKDAYS_ABBR: [&str; 7] = ["lun.", "mar.", "mer.", "jeu.", "ven.", "sam.", "dim."];

impl Locale {
    /// Full month name; `month` is 1-based and wraps modulo 12
    pub fn month_name(self, month: u32) -> &'static str {
        let table = match self {
            Self::En => &EN_MONTHS,
            Self::Fr => &FR_MONTHS,
        };
        table[month_index(month)]
    }

    pub fn month_abbr(self, month: u32) -> &'static str {
        let table = match self {
            Self::En => &EN_MONTHS_ABBR,
            Self::Fr => &FR_MONTHS_ABBR,
        };
        table[month_index(month)]
    }

    pub fn weekday_name(self, weekday: Weekday) -> &'static str {
        let table = match self {
            Self::En => &EN_WEEKDAYS,
            Self::Fr => &FR_WEEKDAYS,
        };
        table[weekday.num_days_from_monday() as usize]
    }

    pub fn weekday_abbr(self, weekday: Weekday) -> &'static str {
        let table = match self {
            Self::En => &EN_WEEKDAYS_ABBR,
            Self::Fr => &FR_WEEKDAYS_ABBR,
        };
        table[weekday.num_days_from_monday() as usize]
    }
}

fn month_index(month: u32) -> usize {
    (month.saturating_sub(1) % 12) as usize
}
