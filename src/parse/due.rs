use std::sync::LazyLock;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap());

static RELATIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*(hours?|days?|weeks?)$").unwrap());

/// Error type for due date parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DueDateError {
    #[error("invalid date format. Use: dd/mm/yyyy, N days, N hours, or N weeks")]
    Format,
    #[error("{unit} must be between {min} and {max}")]
    OutOfRange {
        unit: &'static str,
        min: u32,
        max: u32,
    },
    #[error("invalid date {0}")]
    InvalidDate(String),
}

/// Parse a due date relative to the current local time.
///
/// Accepts `dd/mm/yyyy`, `N hour(s)`, `N day(s)` and `N week(s)`.
/// Calendar dates and day/week offsets resolve to 23:59:59 local time.
pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>, DueDateError> {
    parse_due_date_at(input, Local::now())
}

/// Parse a due date relative to `now`, resolving end-of-day in `now`'s zone
pub fn parse_due_date_at<Tz: TimeZone>(
    input: &str,
    now: DateTime<Tz>,
) -> Result<DateTime<Utc>, DueDateError> {
    let input = input.trim().to_lowercase();

    if let Some(caps) = DATE_RE.captures(&input) {
        let day: u32 = caps[1].parse().map_err(|_| DueDateError::Format)?;
        let month: u32 = caps[2].parse().map_err(|_| DueDateError::Format)?;
        let year: i32 = caps[3].parse().map_err(|_| DueDateError::Format)?;
        check_range("day", day, 1, 31)?;
        check_range("month", month, 1, 12)?;
        if !(2024..=2100).contains(&year) {
            return Err(DueDateError::OutOfRange {
                unit: "year",
                min: 2024,
                max: 2100,
            });
        }
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DueDateError::InvalidDate(input.clone()))?;
        return end_of_day(&now.timezone(), date);
    }

    let caps = RELATIVE_RE.captures(&input).ok_or(DueDateError::Format)?;
    // Overlong digit strings cannot be in range for any unit
    let amount: u32 = caps[1].parse().unwrap_or(u32::MAX);
    let today = now.date_naive();
    match caps[2].trim_end_matches('s') {
        "hour" => {
            check_range("hours", amount, 1, 8760)?;
            Ok((now + Duration::hours(i64::from(amount))).with_timezone(&Utc))
        }
        "day" => {
            check_range("days", amount, 1, 365)?;
            end_of_day(&now.timezone(), today + Duration::days(i64::from(amount)))
        }
        _ => {
            check_range("weeks", amount, 1, 52)?;
            end_of_day(&now.timezone(), today + Duration::weeks(i64::from(amount)))
        }
    }
}

fn check_range(unit: &'static str, value: u32, min: u32, max: u32) -> Result<(), DueDateError> {
    if value < min || value > max {
        return Err(DueDateError::OutOfRange { unit, min, max });
    }
    Ok(())
}

fn end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Utc>, DueDateError> {
    let naive = date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN));
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| DueDateError::InvalidDate(date.format("%d/%m/%Y").to_string()))
}

/// How close a due date is, for coloring and labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueUrgency {
    Overdue,
    Today,
    Tomorrow,
    /// Due within the next week, in whole days
    Soon(i64),
    Later,
}

/// Classify `due` by whole 24h periods remaining from `now`
pub fn due_urgency(due: DateTime<Utc>, now: DateTime<Utc>) -> DueUrgency {
    if due < now {
        return DueUrgency::Overdue;
    }
    match (due - now).num_hours() / 24 {
        0 => DueUrgency::Today,
        1 => DueUrgency::Tomorrow,
        d if d <= 7 => DueUrgency::Soon(d),
        _ => DueUrgency::Later,
    }
}

/// Compact label for table columns: `OVERDUE`, `TODAY`, `TOMORROW`, `3d`, `24/12`
pub fn due_short_label(due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match due_urgency(due, now) {
        DueUrgency::Overdue => "OVERDUE".to_string(),
        DueUrgency::Today => "TODAY".to_string(),
        DueUrgency::Tomorrow => "TOMORROW".to_string(),
        DueUrgency::Soon(d) => format!("{}d", d),
        DueUrgency::Later => due.with_timezone(&Local).format("%d/%m").to_string(),
    }
}

/// Descriptive label that always includes the calendar date
pub fn format_due_date(due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let date = due.with_timezone(&Local).format("%d/%m/%Y").to_string();
    match due_urgency(due, now) {
        DueUrgency::Overdue => format!("OVERDUE ({})", date),
        DueUrgency::Today => format!("Due today ({})", date),
        DueUrgency::Tomorrow => format!("Due tomorrow ({})", date),
        DueUrgency::Soon(d) => format!("Due {} (in {} days)", date, d),
        DueUrgency::Later => format!("Due {}", date),
    }
}
