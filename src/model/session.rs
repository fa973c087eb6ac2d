use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A time tracking session bound to one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: u64,
    pub task_id: u64,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    /// Whole seconds, set when the session is stopped
    #[serde(default)]
    pub duration_secs: u64,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.finished_at.is_none()
    }

    /// Seconds elapsed at `now`, floored. Never negative.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        let end = self.finished_at.unwrap_or(now);
        (end - self.started_at).num_seconds().max(0) as u64
    }
}

/// Split a second count into `(hours, minutes, seconds)`
pub fn clock_parts(total_secs: u64) -> (u64, u64, u64) {
    (total_secs / 3600, (total_secs / 60) % 60, total_secs % 60)
}

/// `1.5h`, `42m`, `17s`
pub fn format_duration(total_secs: u64) -> String {
    if total_secs >= 3600 {
        format!("{:.1}h", total_secs as f64 / 3600.0)
    } else if total_secs >= 60 {
        format!("{}m", (total_secs as f64 / 60.0).round() as u64)
    } else {
        format!("{}s", total_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, m, s).unwrap()
    }

    #[test]
    fn elapsed_is_floored_and_clamped() {
        let session = Session {
            id: 1,
            task_id: 7,
            started_at: at(9, 0, 0),
            finished_at: None,
            duration_secs: 0,
        };
        assert!(session.is_active());
        assert_eq!(session.elapsed_secs(at(10, 1, 5)), 3665);
        assert_eq!(session.elapsed_secs(at(8, 0, 0)), 0);
        let fractional = at(9, 0, 1) + chrono::Duration::milliseconds(999);
        assert_eq!(session.elapsed_secs(fractional), 1);
    }

    #[test]
    fn finished_session_ignores_now() {
        let session = Session {
            id: 1,
            task_id: 7,
            started_at: at(9, 0, 0),
            finished_at: Some(at(9, 30, 0)),
            duration_secs: 1800,
        };
        assert!(!session.is_active());
        assert_eq!(session.elapsed_secs(at(12, 0, 0)), 1800);
    }

    #[test]
    fn clock_parts_use_div_and_mod() {
        assert_eq!(clock_parts(0), (0, 0, 0));
        assert_eq!(clock_parts(59), (0, 0, 59));
        assert_eq!(clock_parts(3665), (1, 1, 5));
        assert_eq!(clock_parts(90_061), (25, 1, 1));
    }

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(17), "17s");
        assert_eq!(format_duration(125), "2m");
        assert_eq!(format_duration(5400), "1.5h");
    }
}
