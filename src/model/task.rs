use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    Done,
    Archived,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Done => "done",
            TaskStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "done" => Ok(TaskStatus::Done),
            "archived" | "archive" => Ok(TaskStatus::Archived),
            other => Err(format!(
                "invalid status '{}'. Use: todo, done, archived",
                other
            )),
        }
    }
}

/// Task priority. `None` sorts lowest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    /// Parse a priority token (`low|1`, `medium|med|2`, `high|3`).
    /// An empty token means no priority.
    pub fn parse(token: &str) -> Result<Priority, String> {
        match token.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "0" => Ok(Priority::None),
            "low" | "1" => Ok(Priority::Low),
            "medium" | "med" | "2" => Ok(Priority::Medium),
            "high" | "3" => Ok(Priority::High),
            other => Err(format!(
                "invalid priority '{}'. Use: low, medium, high, 1, 2, or 3",
                other
            )),
        }
    }

    /// Numeric level, 0 (none) through 3 (high)
    pub fn level(self) -> u8 {
        match self {
            Priority::None => 0,
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    /// Short label used in table columns
    pub fn short_label(self) -> &'static str {
        match self {
            Priority::None => "-",
            Priority::Low => "low",
            Priority::Medium => "med",
            Priority::High => "high",
        }
    }

    /// Full label used in details and JSON output
    pub fn label(self) -> &'static str {
        match self {
            Priority::None => "",
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Words a search query may use to refer to this priority
    pub fn search_words(self) -> &'static [&'static str] {
        match self {
            Priority::None => &[],
            Priority::Low => &["low", "1"],
            Priority::Medium => &["medium", "med", "2"],
            Priority::High => &["high", "3"],
        }
    }
}

/// A task as persisted by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// External ticket id like `API-42`
    #[serde(default)]
    pub ticket: String,
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub done_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new todo task with no metadata
    pub fn new(id: u64, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Task {
            id,
            title: title.into(),
            status: TaskStatus::Todo,
            priority: Priority::None,
            project: String::new(),
            tags: Vec::new(),
            ticket: String::new(),
            due: None,
            note: String::new(),
            url: String::new(),
            created_at: now,
            updated_at: now,
            done_at: None,
            archived_at: None,
        }
    }

    /// `#42` style display id
    pub fn display_id(&self) -> String {
        format!("#{}", self.id)
    }

    pub fn has_tag(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}

/// Editable task fields, used for both create and update.
///
/// Update replaces every field; callers start from [`TaskDraft::from_task`]
/// to change only some of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub project: String,
    pub tags: Vec<String>,
    pub priority: Priority,
    pub ticket: String,
    pub url: String,
    pub note: String,
    pub due: Option<DateTime<Utc>>,
}

impl TaskDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn from_task(task: &Task) -> Self {
        TaskDraft {
            title: task.title.clone(),
            project: task.project.clone(),
            tags: task.tags.clone(),
            priority: task.priority,
            ticket: task.ticket.clone(),
            url: task.url.clone(),
            note: task.note.clone(),
            due: task.due,
        }
    }
}

/// A status flip requested on a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Done,
    Undone,
    Archive,
    Unarchive,
}

impl Transition {
    /// The done-toggle for a task in `status`
    pub fn toggle_done(status: TaskStatus) -> Transition {
        if status == TaskStatus::Done {
            Transition::Undone
        } else {
            Transition::Done
        }
    }

    /// The archive-toggle for a task in `status`
    pub fn toggle_archive(status: TaskStatus) -> Transition {
        if status == TaskStatus::Archived {
            Transition::Unarchive
        } else {
            Transition::Archive
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Transition::Done => "mark done",
            Transition::Undone => "mark undone",
            Transition::Archive => "archive",
            Transition::Unarchive => "unarchive",
        }
    }
}
