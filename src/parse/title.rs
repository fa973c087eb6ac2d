use std::sync::LazyLock;

use chrono::{DateTime, Local, TimeZone, Utc};
use regex::Regex;

use super::due::parse_due_date_at;
use super::ticket::normalize_ticket;
use crate::model::{Priority, TaskDraft};

static DUE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bdue:(\S+)").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_,-]+)").unwrap());
static PROJECT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_-]+)").unwrap());
static PRIORITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+([A-Za-z0-9]+)").unwrap());
static TICKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z]+-\d+)\b").unwrap());

/// A task title with inline metadata pulled out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTitle {
    pub title: String,
    pub project: String,
    pub tags: Vec<String>,
    pub priority: Priority,
    pub ticket: String,
    pub due: Option<DateTime<Utc>>,
    /// One message per token that could not be interpreted
    pub errors: Vec<String>,
}

impl ParsedTitle {
    pub fn into_draft(self) -> TaskDraft {
        TaskDraft {
            title: self.title,
            project: self.project,
            tags: self.tags,
            priority: self.priority,
            ticket: self.ticket,
            due: self.due,
            ..Default::default()
        }
    }
}

/// Parse `Fix login #bug,auth @backend +high API-12 due:3days`
pub fn parse_title(input: &str) -> ParsedTitle {
    parse_title_at(input, Local::now())
}

/// Like [`parse_title`], resolving relative due dates against `now`.
///
/// Tokens are consumed in a fixed order (due, tags, project, priority,
/// ticket) so that a later pattern never sees text an earlier one claimed.
pub fn parse_title_at<Tz: TimeZone>(input: &str, now: DateTime<Tz>) -> ParsedTitle {
    let mut parsed = ParsedTitle::default();
    let mut rest = input.to_string();

    if let Some(caps) = DUE_RE.captures(&rest) {
        match parse_due_date_at(&caps[1], now) {
            Ok(due) => parsed.due = Some(due),
            Err(e) => parsed
                .errors
                .push(format!("invalid due date '{}': {}", &caps[1], e)),
        }
        rest = DUE_RE.replace_all(&rest, "").into_owned();
    }

    for caps in TAG_RE.captures_iter(&rest) {
        for tag in caps[1].split(',') {
            let tag = tag.trim();
            if !tag.is_empty() && !parsed.tags.iter().any(|t| t == tag) {
                parsed.tags.push(tag.to_string());
            }
        }
    }
    rest = TAG_RE.replace_all(&rest, "").into_owned();

    if let Some(caps) = PROJECT_RE.captures(&rest) {
        parsed.project = caps[1].to_string();
        rest = PROJECT_RE.replace_all(&rest, "").into_owned();
    }

    if let Some(caps) = PRIORITY_RE.captures(&rest) {
        match Priority::parse(&caps[1]) {
            Ok(p) if p != Priority::None => parsed.priority = p,
            _ => parsed.errors.push(format!(
                "invalid priority '{}'. Use: low, medium, high, 1, 2, or 3",
                &caps[1]
            )),
        }
        rest = PRIORITY_RE.replace_all(&rest, "").into_owned();
    }

    if let Some(caps) = TICKET_RE.captures(&rest) {
        match normalize_ticket(&caps[1]) {
            Ok(ticket) => parsed.ticket = ticket,
            Err(e) => parsed.errors.push(e.to_string()),
        }
        rest = TICKET_RE.replace_all(&rest, "").into_owned();
    }

    parsed.title = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    parsed
}
