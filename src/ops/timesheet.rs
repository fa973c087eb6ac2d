//! Weekly hours per task, for copying into an external time tracker.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::model::{Session, Task};
use crate::util::unicode::{display_width, fit_to_width};

pub const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const MIN_LABEL_WIDTH: usize = 20;
const MAX_LABEL_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimesheetRow {
    pub task_id: u64,
    pub ticket: String,
    /// `API-12 Title`, or `#7 Title` without a ticket
    pub label: String,
    /// Whole hours per weekday, Monday first, rounded up per day
    pub hours: [u64; 7],
}

impl TimesheetRow {
    pub fn total(&self) -> u64 {
        self.hours.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timesheet {
    pub week_start: NaiveDate,
    pub rows: Vec<TimesheetRow>,
}

impl Timesheet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn day_totals(&self) -> [u64; 7] {
        let mut totals = [0; 7];
        for row in &self.rows {
            for (total, hours) in totals.iter_mut().zip(row.hours) {
                *total += hours;
            }
        }
        totals
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().map(TimesheetRow::total).sum()
    }

    /// Weekday columns to print: Monday to Friday, plus weekend days with hours
    pub fn visible_days(&self) -> Vec<usize> {
        let totals = self.day_totals();
        (0..7).filter(|&d| d < 5 || totals[d] > 0).collect()
    }
}

/// Monday 00:00 to Sunday 23:59:59 of the week containing `now`, in `now`'s zone
pub fn week_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> (NaiveDate, DateTime<Utc>, DateTime<Utc>) {
    let tz = now.timezone();
    let today = now.date_naive();
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let start = local_midnight(&tz, monday);
    let end = local_midnight(&tz, monday + Duration::days(7)) - Duration::seconds(1);
    (monday, start, end)
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

/// Group finished sessions by task and local weekday.
///
/// Rows with a ticket come first ordered by ticket, then the rest by task id.
/// Sessions whose task no longer exists are skipped.
pub fn build<Tz: TimeZone>(
    week_start: NaiveDate,
    sessions: &[Session],
    tasks: &[Task],
    tz: &Tz,
) -> Timesheet {
    let by_id: HashMap<u64, &Task> = tasks.iter().map(|t| (t.id, t)).collect();
    let mut seconds: HashMap<u64, [u64; 7]> = HashMap::new();

    for session in sessions.iter().filter(|s| !s.is_active()) {
        if !by_id.contains_key(&session.task_id) {
            tracing::debug!(session = session.id, task = session.task_id, "session for missing task");
            continue;
        }
        let day = session
            .started_at
            .with_timezone(tz)
            .weekday()
            .num_days_from_monday() as usize;
        seconds.entry(session.task_id).or_insert([0; 7])[day] += session.duration_secs;
    }

    let mut rows: Vec<TimesheetRow> = seconds
        .into_iter()
        .filter_map(|(task_id, secs)| {
            let task = by_id.get(&task_id)?;
            let label = if task.ticket.is_empty() {
                format!("#{} {}", task.id, task.title)
            } else {
                format!("{} {}", task.ticket, task.title)
            };
            Some(TimesheetRow {
                task_id,
                ticket: task.ticket.clone(),
                label,
                hours: secs.map(|s| s.div_ceil(3600)),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.ticket
            .is_empty()
            .cmp(&b.ticket.is_empty())
            .then_with(|| a.ticket.cmp(&b.ticket))
            .then_with(|| a.task_id.cmp(&b.task_id))
    });

    Timesheet { week_start, rows }
}

/// Plain-text table with a totals row
pub fn render_table(sheet: &Timesheet) -> String {
    let days = sheet.visible_days();
    let label_width = sheet
        .rows
        .iter()
        .map(|r| display_width(&r.label))
        .max()
        .unwrap_or(0)
        .clamp(MIN_LABEL_WIDTH, MAX_LABEL_WIDTH);

    let separator = {
        let mut line = "-".repeat(label_width);
        for _ in &days {
            line.push_str("  ---");
        }
        line.push_str("  -----");
        line
    };

    let mut out = String::new();
    out.push_str(&format!("Week of {}\n\n", sheet.week_start.format("%d/%m/%Y")));
    out.push_str(&fit_to_width("Task", label_width));
    for &d in &days {
        out.push_str(&format!("  {:>3}", DAY_NAMES[d]));
    }
    out.push_str(&format!("  {:>5}\n", "Total"));
    out.push_str(&separator);
    out.push('\n');

    for row in &sheet.rows {
        out.push_str(&fit_to_width(&row.label, label_width));
        for &d in &days {
            match row.hours[d] {
                0 => out.push_str(&format!("  {:>3}", "-")),
                h => out.push_str(&format!("  {:>3}", h)),
            }
        }
        out.push_str(&format!("  {:>5}\n", row.total()));
    }

    out.push_str(&separator);
    out.push('\n');
    let totals = sheet.day_totals();
    out.push_str(&fit_to_width("Total", label_width));
    for &d in &days {
        out.push_str(&format!("  {:>3}", totals[d]));
    }
    out.push_str(&format!("  {:>5}\n", sheet.total()));
    out
}
