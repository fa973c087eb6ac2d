use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::model::{Session, Task, TaskStatus};
use crate::parse::format_due_date;
use crate::util::unicode::fit_to_width;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: u64,
    pub title: String,
    pub status: TaskStatus,
    pub project: String,
    pub priority: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ticket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct SearchJson {
    pub query: String,
    pub count: usize,
    pub tasks: Vec<TaskJson>,
}

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id,
        title: task.title.clone(),
        status: task.status,
        project: task.project.clone(),
        priority: task.priority.label().to_string(),
        ticket: task.ticket.clone(),
        due: task.due,
        tags: task.tags.clone(),
        url: task.url.clone(),
        notes: task.note.clone(),
        created_at: task.created_at,
        updated_at: task.updated_at,
    }
}

// ---------------------------------------------------------------------------
// Plain text
// ---------------------------------------------------------------------------

/// Fixed-width table sized for an 80 column terminal
pub fn format_task_table(tasks: &[Task]) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{} {} {} {} {} {}",
            fit_to_width("ID", 4),
            fit_to_width("TITLE", 35),
            fit_to_width("PROJECT", 12),
            fit_to_width("PRIORITY", 8),
            fit_to_width("TAGS", 12),
            "STATUS"
        ),
        "-".repeat(80),
    ];
    for task in tasks {
        let priority = match task.priority.short_label() {
            "-" => "",
            label => label,
        };
        lines.push(format!(
            "{} {} {} {} {} {}",
            fit_to_width(&task.id.to_string(), 4),
            fit_to_width(&task.title, 35),
            fit_to_width(&task.project, 12),
            fit_to_width(priority, 8),
            fit_to_width(&task.tags.join(","), 12),
            task.status
        ));
    }
    lines
}

/// Summary printed after creating or editing a task
pub fn format_task_summary(task: &Task, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = Vec::new();
    if !task.project.is_empty() {
        lines.push(format!("  Project: {}", task.project));
    }
    if !task.tags.is_empty() {
        lines.push(format!("  Tags: {}", task.tags.join(", ")));
    }
    if !task.priority.label().is_empty() {
        lines.push(format!("  Priority: {}", task.priority.label()));
    }
    if !task.ticket.is_empty() {
        lines.push(format!("  Ticket: {}", task.ticket));
    }
    if let Some(due) = task.due {
        lines.push(format!("  Due: {}", format_due_date(due, now)));
    }
    lines
}

/// Local wall-clock time of day
pub fn format_clock_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

pub fn format_session_header(verb: &str, session: &Session, task: Option<&Task>) -> String {
    match task {
        Some(task) => format!("{} task #{}: {}", verb, session.task_id, task.title),
        None => format!("{} task #{}", verb, session.task_id),
    }
}
