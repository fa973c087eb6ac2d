use super::task::{Priority, Task, TaskStatus};

/// Field a task listing is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Id,
    Created,
    Due,
    Priority,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ordering {
    pub key: SortKey,
    pub descending: bool,
}

impl Ordering {
    /// Newest first, the default for listings
    pub fn newest_first() -> Self {
        Ordering {
            key: SortKey::Id,
            descending: true,
        }
    }
}

impl std::str::FromStr for Ordering {
    type Err = String;

    /// `id`, `created desc`, `due asc`, `priority DESC`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let key = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            Some("id") => SortKey::Id,
            Some("created" | "created_at") => SortKey::Created,
            Some("due") => SortKey::Due,
            Some("priority") => SortKey::Priority,
            _ => {
                return Err(format!(
                    "invalid order '{}'. Use: id, created, due or priority, optionally followed by asc or desc",
                    s.trim()
                ));
            }
        };
        let descending = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => false,
            Some("desc") => true,
            Some(other) => return Err(format!("invalid sort direction '{}'. Use: asc, desc", other)),
        };
        if parts.next().is_some() {
            return Err(format!("invalid order '{}'", s.trim()));
        }
        Ok(Ordering { key, descending })
    }
}

/// Criteria for fetching tasks from a store. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring of the project name
    pub project: Option<String>,
    /// Every entry must be a substring of at least one tag
    pub tags: Vec<String>,
    pub priority: Option<Priority>,
    /// Case-insensitive substring of the ticket id
    pub ticket: Option<String>,
    pub ordering: Ordering,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl TaskFilter {
    pub fn with_status(status: TaskStatus) -> Self {
        TaskFilter {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status
            && task.status != status
        {
            return false;
        }
        if let Some(priority) = self.priority
            && task.priority != priority
        {
            return false;
        }
        if let Some(project) = &self.project
            && !contains_ci(&task.project, project)
        {
            return false;
        }
        if let Some(ticket) = &self.ticket
            && !contains_ci(&task.ticket, ticket)
        {
            return false;
        }
        self.tags.iter().all(|t| task.has_tag(t))
    }

    /// Filter, order and window a task list
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        let mut out: Vec<Task> = tasks.iter().filter(|t| self.matches(t)).cloned().collect();
        match self.ordering.key {
            SortKey::Id => out.sort_by_key(|t| t.id),
            SortKey::Created => out.sort_by_key(|t| (t.created_at, t.id)),
            // Tasks without a due date go last in ascending order
            SortKey::Due => out.sort_by_key(|t| (t.due.is_none(), t.due, t.id)),
            SortKey::Priority => out.sort_by_key(|t| (t.priority, t.id)),
        }
        if self.ordering.descending {
            out.reverse();
        }
        let iter = out.into_iter().skip(self.offset);
        match self.limit {
            Some(n) => iter.take(n).collect(),
            None => iter.collect(),
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
