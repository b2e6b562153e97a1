//! Expiration date parsing and expiry checking.

use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref MDY_SLASH: Regex = Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})$").unwrap();
    static ref YMD_DASH: Regex = Regex::new(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})$").unwrap();
    static ref DMY_DASH: Regex = Regex::new(r"^([0-9]{1,2})-([0-9]{1,2})-([0-9]{4})$").unwrap();
    static ref DMY_SLASH: Regex = Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})$").unwrap();
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Calendar layouts accepted for expiration dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `MM/DD/YYYY` (US).
    MonthDayYear,
    /// `YYYY-MM-DD` (ISO).
    YearMonthDay,
    /// `DD-MM-YYYY` (European, dashes).
    DayMonthYearDash,
    /// `DD/MM/YYYY` (European, slashes).
    DayMonthYearSlash,
}

impl DateFormat {
    /// Formats in the order they are tried.
    pub const PRIORITY: [DateFormat; 4] = [
        DateFormat::MonthDayYear,
        DateFormat::YearMonthDay,
        DateFormat::DayMonthYearDash,
        DateFormat::DayMonthYearSlash,
    ];

    /// Parse `raw` in this layout. The whole string must match.
    pub fn parse(self, raw: &str) -> Option<NaiveDate> {
        let caps = self.regex().captures(raw)?;
        let (a, b, c) = (&caps[1], &caps[2], &caps[3]);

        let (year, month, day) = match self {
            DateFormat::MonthDayYear => (c, a, b),
            DateFormat::YearMonthDay => (a, b, c),
            DateFormat::DayMonthYearDash | DateFormat::DayMonthYearSlash => (c, b, a),
        };

        NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
    }

    fn regex(self) -> &'static Regex {
        match self {
            DateFormat::MonthDayYear => &MDY_SLASH,
            DateFormat::YearMonthDay => &YMD_DASH,
            DateFormat::DayMonthYearDash => &DMY_DASH,
            DateFormat::DayMonthYearSlash => &DMY_SLASH,
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = match self {
            DateFormat::MonthDayYear => "MM/DD/YYYY",
            DateFormat::YearMonthDay => "YYYY-MM-DD",
            DateFormat::DayMonthYearDash => "DD-MM-YYYY",
            DateFormat::DayMonthYearSlash => "DD/MM/YYYY",
        };
        f.write_str(layout)
    }
}

/// Outcome of checking a date candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateVerdict {
    /// Parsed and lies in the future.
    Valid { format: DateFormat, date: NaiveDate },
    /// Parsed but is not in the future. Later formats were not tried.
    Expired { format: DateFormat, date: NaiveDate },
    /// No format matched.
    Unparseable,
}

impl DateVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, DateVerdict::Valid { .. })
    }
}

/// Checks that a date string parses and has not expired.
#[derive(Clone)]
pub struct DateValidator {
    clock: Arc<dyn Clock>,
}

impl DateValidator {
    /// Create a validator reading the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a validator with an explicit time source.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Check a candidate against the format table.
    ///
    /// The first format that parses decides the verdict: an expired date is
    /// rejected outright even if a later format would read it as a future one.
    pub fn check(&self, raw: &str) -> DateVerdict {
        let Some((format, date)) = DateFormat::PRIORITY
            .iter()
            .find_map(|format| format.parse(raw).map(|date| (*format, date)))
        else {
            return DateVerdict::Unparseable;
        };

        if date.and_time(NaiveTime::MIN) > self.clock.now() {
            DateVerdict::Valid { format, date }
        } else {
            DateVerdict::Expired { format, date }
        }
    }

    /// Return `raw` unchanged if it is a valid, unexpired date.
    pub fn validate(&self, raw: &str) -> Option<String> {
        match self.check(raw) {
            DateVerdict::Valid { .. } => Some(raw.to_string()),
            DateVerdict::Expired { format, date } => {
                debug!("Rejected date {:?}: {} read as {} has expired", raw, format, date);
                None
            }
            DateVerdict::Unparseable => {
                debug!("Rejected date {:?}: no known format", raw);
                None
            }
        }
    }
}

impl Default for DateValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DateValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateValidator")
            .field("now", &self.clock.now())
            .finish()
    }
}
