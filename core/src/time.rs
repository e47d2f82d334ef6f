//! Date extraction from free text and calendar arithmetic.
//!
//! [`NaturalDateExtractor`] recognises:
//! - Relative words: `today`, `tonight`, `tomorrow`, `the day after tomorrow`
//! - Weekdays: `friday`, `on fri`, `this monday`, `next tuesday`
//! - Offsets: `in 3 days`, `in two weeks`, `next month`
//! - Numeric dates: `25/12/2023`, `25/12`, `25.12.2023`, `2023-12-25`
//! - Month names: `25 Dec`, `25th of December 2023`, `Dec 25, 2023`
//! - A time of day next to a date (`at 3pm Friday`) is swallowed into the
//!   match and thrown away. `at 15:00` alone resolves to a day.

use std::sync::OnceLock;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, Months, NaiveDate, NaiveTime, Weekday,
};
use log::debug;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// How to read an all-numeric date such as `10/05/2024`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    #[default]
    DayFirst,
    MonthFirst,
}

impl DateOrder {
    fn day_and_month(self, first: u32, second: u32) -> (u32, u32) {
        match self {
            DateOrder::DayFirst => (first, second),
            DateOrder::MonthFirst => (second, first),
        }
    }
}

/// A date expression found in a piece of text.
///
/// `start` and `len` are byte offsets into the text that was searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateMatch {
    pub start: usize,
    pub len: usize,
    pub date: NaiveDate,
}

impl DateMatch {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn as_str<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.start..self.end()).unwrap_or_default()
    }
}

/// Finds the first date expression in `text`, resolving relative phrases
/// against `reference`. Returns `None` when there is nothing to find.
pub trait DateExtractor {
    fn extract(
        &self,
        text: &str,
        reference: DateTime<FixedOffset>,
        order: DateOrder,
    ) -> Option<DateMatch>;
}

pub fn now_reference() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Parses an RFC 3339 reference instant. The offset is mandatory, an instant
/// without one is ambiguous.
pub fn parse_reference(input: &str) -> Result<DateTime<FixedOffset>, TaskError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TaskError::invalid("empty reference instant"));
    }
    DateTime::parse_from_rfc3339(input).map_err(|e| {
        TaskError::invalid(format!("malformed reference instant '{}': {}", input, e))
    })
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = first_of_month(year, month)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some((next - first).num_days() as u32)
}

/// Moves `(year, month)` by `delta` months.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NaturalDateExtractor;

impl DateExtractor for NaturalDateExtractor {
    fn extract(
        &self,
        text: &str,
        reference: DateTime<FixedOffset>,
        order: DateOrder,
    ) -> Option<DateMatch> {
        let today = reference.date_naive();
        let p = patterns();

        let mut candidates: Vec<Candidate> = p
            .date_candidates(text, today, order)
            .into_iter()
            .map(|c| p.absorb_time(text, c))
            .collect();
        collect(&mut candidates, &p.at_time, text, |c| resolve_at_time(c, reference));

        // Lowest start wins; on a tie the longer expression does.
        let found = candidates
            .into_iter()
            .min_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let found = found.map(|c| DateMatch {
            start: c.start,
            len: c.end - c.start,
            date: c.date,
        });
        match &found {
            Some(m) => debug!("date '{}' -> {} in {:?}", m.as_str(text), m.date, text),
            None => debug!("no date in {:?}", text),
        }
        found
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    start: usize,
    end: usize,
    date: NaiveDate,
}

fn patterns() -> &'static DatePatterns {
    static PATTERNS: OnceLock<DatePatterns> = OnceLock::new();
    PATTERNS.get_or_init(DatePatterns::new)
}

const MONTHS: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";
const TIME: &str = r"(?:\d{1,2}(?::\d{2})?\s*(?:am|pm)\b|\d{1,2}:\d{2}\b|noon\b|midnight\b)";

struct DatePatterns {
    // today, tomorrow, the day after tomorrow
    relative_day: Regex,
    // friday, on fri, next monday
    weekday: Regex,
    // in 3 days, in two weeks
    in_n_units: Regex,
    // next week, next month
    next_period: Regex,
    // 2023-12-25, 2023-12-25T09:00Z
    iso: Regex,
    // 25/12/2023, 25/12
    slashed: Regex,
    // 25.12.2023, 25-12-23
    dotted: Regex,
    // 25 dec, 25th of december 2023
    day_month: Regex,
    // dec 25, december 25th, 2023
    month_day: Regex,

    // at 3pm / 15:00 directly after or before a date
    trailing_time: Regex,
    leading_time: Regex,
    // at 15:00 anywhere in the text
    at_time: Regex,
}

impl DatePatterns {
    fn new() -> Self {
        Self {
            relative_day: Regex::new(
                r"(?i)\b(?:the\s+)?(day\s+after\s+tomorrow|today|tonight|tomorrow|tmrw)\b",
            )
            .unwrap(),
            weekday: Regex::new(
                r"(?i)\b(?:(on|this|next)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tues?|thu(?:rs?)?|fri)\b",
            )
            .unwrap(),
            in_n_units: Regex::new(
                r"(?i)\bin\s+(\d{1,3}|an?|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)\s+(days?|weeks?|months?|years?)\b",
            )
            .unwrap(),
            next_period: Regex::new(r"(?i)\bnext\s+(week|month|year)\b").unwrap(),
            iso: Regex::new(
                r"(?i)\b(?:on\s+)?(\d{4})-(\d{1,2})-(\d{1,2})(?:T\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?\b",
            )
            .unwrap(),
            slashed: Regex::new(r"(?i)\b(?:on\s+)?(\d{1,2})/(\d{1,2})(?:/(\d{4}|\d{2}))?\b")
                .unwrap(),
            dotted: Regex::new(r"(?i)\b(?:on\s+)?(\d{1,2})[.\-](\d{1,2})[.\-](\d{4}|\d{2})\b")
                .unwrap(),
            day_month: Regex::new(&format!(
                r"(?i)\b(?:on\s+)?(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({})\b\.?(?:,?\s+(\d{{4}})\b)?",
                MONTHS
            ))
            .unwrap(),
            month_day: Regex::new(&format!(
                r"(?i)\b(?:on\s+)?({})\b\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(\d{{4}})\b)?",
                MONTHS
            ))
            .unwrap(),
            trailing_time: Regex::new(&format!(r"(?i)^\s*(?:at\s+|@\s*)?{}", TIME)).unwrap(),
            leading_time: Regex::new(&format!(r"(?i)(?:\bat\s+|@\s*)?\b{}\s+$", TIME)).unwrap(),
            at_time: Regex::new(&format!(r"(?i)(?:\bat\s+|@\s*)({})", TIME)).unwrap(),
        }
    }

    fn date_candidates(&self, text: &str, today: NaiveDate, order: DateOrder) -> Vec<Candidate> {
        let mut out = Vec::new();
        collect(&mut out, &self.relative_day, text, |c| resolve_relative_day(c, today));
        collect(&mut out, &self.weekday, text, |c| resolve_weekday(c, today));
        collect(&mut out, &self.in_n_units, text, |c| resolve_in_n_units(c, today));
        collect(&mut out, &self.next_period, text, |c| resolve_next_period(c, today));
        collect(&mut out, &self.iso, text, |c| {
            NaiveDate::from_ymd_opt(number(c, 1)? as i32, number(c, 2)?, number(c, 3)?)
        });
        collect(&mut out, &self.slashed, text, |c| resolve_numeric(c, today, order));
        collect(&mut out, &self.dotted, text, |c| resolve_numeric(c, today, order));
        collect(&mut out, &self.day_month, text, |c| {
            resolve_day_month(number(c, 1)?, month_from_name(&c[2])?, c.get(3), today)
        });
        collect(&mut out, &self.month_day, text, |c| {
            resolve_day_month(number(c, 2)?, month_from_name(&c[1])?, c.get(3), today)
        });
        out
    }

    fn absorb_time(&self, text: &str, c: Candidate) -> Candidate {
        let mut start = c.start;
        let mut end = c.end;
        if let Some(m) = self.trailing_time.find(&text[end..]) {
            end += m.end();
        }
        if let Some(m) = self.leading_time.find(&text[..start]) {
            start = m.start();
        }
        Candidate { start, end, date: c.date }
    }
}

fn collect<F>(out: &mut Vec<Candidate>, re: &Regex, text: &str, resolve: F)
where
    F: Fn(&Captures) -> Option<NaiveDate>,
{
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if let Some(date) = resolve(&caps) {
            out.push(Candidate {
                start: whole.start(),
                end: whole.end(),
                date,
            });
        }
    }
}

fn number(caps: &Captures, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

fn resolve_relative_day(caps: &Captures, today: NaiveDate) -> Option<NaiveDate> {
    let word = caps[1].to_lowercase();
    let days = match word.as_str() {
        "today" | "tonight" => 0,
        "tomorrow" | "tmrw" => 1,
        _ => 2, // day after tomorrow
    };
    today.checked_add_signed(Duration::days(days))
}

fn resolve_weekday(caps: &Captures, today: NaiveDate) -> Option<NaiveDate> {
    let target = weekday_from_name(&caps[2])?;
    let modifier = caps.get(1).map(|m| m.as_str().to_lowercase());
    match modifier.as_deref() {
        Some("next") => {
            let offset = 7 + target.num_days_from_monday() as i64;
            Some(week_start(today) + Duration::days(offset))
        }
        _ => Some(upcoming_weekday(today, target)),
    }
}

/// The next `target` on or after `today`.
fn upcoming_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let days_needed = (target.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    today + Duration::days(days_needed)
}

fn resolve_in_n_units(caps: &Captures, today: NaiveDate) -> Option<NaiveDate> {
    let count = parse_count(&caps[1])?;
    add_units(today, count, &caps[2])
}

fn resolve_next_period(caps: &Captures, today: NaiveDate) -> Option<NaiveDate> {
    add_units(today, 1, &caps[1])
}

fn add_units(today: NaiveDate, count: u32, unit: &str) -> Option<NaiveDate> {
    match unit.to_lowercase().trim_end_matches('s') {
        "day" => today.checked_add_signed(Duration::days(count as i64)),
        "week" => today.checked_add_signed(Duration::weeks(count as i64)),
        "month" => today.checked_add_months(Months::new(count)),
        "year" => today.checked_add_months(Months::new(count.checked_mul(12)?)),
        _ => None,
    }
}

fn resolve_numeric(caps: &Captures, today: NaiveDate, order: DateOrder) -> Option<NaiveDate> {
    let (day, month) = order.day_and_month(number(caps, 1)?, number(caps, 2)?);
    resolve_day_month(day, month, caps.get(3), today)
}

fn resolve_day_month(
    day: u32,
    month: u32,
    year: Option<regex::Match>,
    today: NaiveDate,
) -> Option<NaiveDate> {
    match year {
        Some(y) => {
            let digits = y.as_str();
            let mut year: i32 = digits.parse().ok()?;
            if digits.len() == 2 {
                year += 2000;
            }
            NaiveDate::from_ymd_opt(year, month, day)
        }
        None => {
            // No year given: the next time this day comes round.
            match NaiveDate::from_ymd_opt(today.year(), month, day) {
                Some(d) if d >= today => Some(d),
                _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
            }
        }
    }
}

fn parse_count(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse() {
        return Some(n);
    }
    let n = match s.to_lowercase().as_str() {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        _ => return None,
    };
    Some(n)
}

fn weekday_from_name(s: &str) -> Option<Weekday> {
    let lower = s.to_lowercase();
    match lower.get(..3)? {
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

fn month_from_name(s: &str) -> Option<u32> {
    let lower = s.to_lowercase();
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// `at 5pm` with no date nearby: today, or tomorrow once that time has passed.
fn resolve_at_time(caps: &Captures, reference: DateTime<FixedOffset>) -> Option<NaiveDate> {
    let time = parse_time(&caps[1])?;
    let today = reference.date_naive();
    if time < reference.time() {
        today.succ_opt()
    } else {
        Some(today)
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let lower = s.to_lowercase().replace(' ', "");
    match lower.as_str() {
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => return NaiveTime::from_hms_opt(0, 0, 0),
        _ => {}
    }

    let (clock, meridiem) = if let Some(rest) = lower.strip_suffix("am") {
        (rest, Some(false))
    } else if let Some(rest) = lower.strip_suffix("pm") {
        (rest, Some(true))
    } else {
        (lower.as_str(), None)
    };

    let (hour, minute) = match clock.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?),
        None => (clock.parse::<u32>().ok()?, 0),
    };

    let hour = match meridiem {
        Some(pm) if (1..=12).contains(&hour) => (hour % 12) + if pm { 12 } else { 0 },
        Some(_) => return None,
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}
