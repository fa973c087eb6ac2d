use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::io::lock::LockError;
use crate::model::{Session, Task, TaskDraft, TaskFilter, TaskStatus, Transition};
use crate::parse::normalize_ticket;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task #{0} not found")]
    TaskNotFound(u64),
    #[error("no active session found")]
    NoActiveSession,
    #[error("session already active for task #{task_id}. Stop it first with 'wrok stop'")]
    SessionConflict { task_id: u64 },
    #[error("{0}")]
    Invalid(String),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad class of a [`StoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Io,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::TaskNotFound(_) | StoreError::NoActiveSession => ErrorKind::NotFound,
            StoreError::SessionConflict { .. } => ErrorKind::Conflict,
            StoreError::Invalid(_) => ErrorKind::Validation,
            _ => ErrorKind::Io,
        }
    }
}

/// Persistence for tasks and time tracking sessions.
///
/// At most one session is active at a time; implementations enforce this
/// inside `start_session` rather than trusting callers to check first.
pub trait TaskStore {
    fn fetch_all(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError>;
    fn get(&self, id: u64) -> Result<Task, StoreError>;
    fn create(&mut self, draft: TaskDraft) -> Result<Task, StoreError>;
    fn update(&mut self, id: u64, draft: TaskDraft) -> Result<Task, StoreError>;
    fn transition(&mut self, id: u64, transition: Transition) -> Result<Task, StoreError>;
    fn start_session(&mut self, task_id: u64) -> Result<Session, StoreError>;
    fn stop_active_session(&mut self) -> Result<Session, StoreError>;
    fn active_session(&self) -> Result<Option<Session>, StoreError>;
    /// Finished sessions that started within `[start, end]`, oldest first
    fn sessions_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>, StoreError>;

    fn set_done(&mut self, id: u64) -> Result<Task, StoreError> {
        self.transition(id, Transition::Done)
    }

    fn set_undone(&mut self, id: u64) -> Result<Task, StoreError> {
        self.transition(id, Transition::Undone)
    }

    fn set_archived(&mut self, id: u64) -> Result<Task, StoreError> {
        self.transition(id, Transition::Archive)
    }

    fn set_unarchived(&mut self, id: u64) -> Result<Task, StoreError> {
        self.transition(id, Transition::Unarchive)
    }
}

// ---------------------------------------------------------------------------
// Store document
// ---------------------------------------------------------------------------

/// The whole persisted state. Both store implementations run their
/// operations against this, passing in the current time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default = "first_id")]
    pub next_task_id: u64,
    #[serde(default = "first_id")]
    pub next_session_id: u64,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub sessions: Vec<Session>,
}

fn first_id() -> u64 {
    1
}

impl Default for StoreData {
    fn default() -> Self {
        StoreData::new()
    }
}

impl StoreData {
    pub fn new() -> Self {
        StoreData {
            next_task_id: 1,
            next_session_id: 1,
            tasks: Vec::new(),
            sessions: Vec::new(),
        }
    }

    pub fn fetch_all(&self, filter: &TaskFilter) -> Vec<Task> {
        filter.apply(&self.tasks)
    }

    pub fn get(&self, id: u64) -> Result<Task, StoreError> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::TaskNotFound(id))
    }

    fn task_mut(&mut self, id: u64) -> Result<&mut Task, StoreError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::TaskNotFound(id))
    }

    pub fn create(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> Result<Task, StoreError> {
        let draft = validate_draft(draft)?;
        let mut task = Task::new(self.next_task_id, draft.title.clone(), now);
        apply_draft(&mut task, draft);
        self.next_task_id += 1;
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub fn update(
        &mut self,
        id: u64,
        draft: TaskDraft,
        now: DateTime<Utc>,
    ) -> Result<Task, StoreError> {
        let draft = validate_draft(draft)?;
        let task = self.task_mut(id)?;
        apply_draft(task, draft);
        task.updated_at = now;
        Ok(task.clone())
    }

    pub fn transition(
        &mut self,
        id: u64,
        transition: Transition,
        now: DateTime<Utc>,
    ) -> Result<Task, StoreError> {
        let status = self.get(id)?.status;
        match (transition, status) {
            (Transition::Done, TaskStatus::Done) => {
                return Err(StoreError::Invalid(format!("task #{} is already completed", id)));
            }
            (Transition::Undone, s) if s != TaskStatus::Done => {
                return Err(StoreError::Invalid(format!("task #{} is not completed", id)));
            }
            (Transition::Archive, TaskStatus::Archived) => {
                return Err(StoreError::Invalid(format!("task #{} is already archived", id)));
            }
            (Transition::Unarchive, s) if s != TaskStatus::Archived => {
                return Err(StoreError::Invalid(format!("task #{} is not archived", id)));
            }
            _ => {}
        }

        // Closing out a task ends its running session
        if matches!(transition, Transition::Done | Transition::Archive)
            && self.active_session().is_some_and(|s| s.task_id == id)
        {
            self.stop_active_session(now)?;
        }

        let task = self.task_mut(id)?;
        match transition {
            Transition::Done => {
                task.status = TaskStatus::Done;
                task.done_at = Some(now);
            }
            Transition::Undone => {
                task.status = TaskStatus::Todo;
                task.done_at = None;
            }
            Transition::Archive => {
                task.status = TaskStatus::Archived;
                task.archived_at = Some(now);
            }
            Transition::Unarchive => {
                task.status = TaskStatus::Todo;
                task.archived_at = None;
            }
        }
        task.updated_at = now;
        Ok(task.clone())
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.sessions.iter().find(|s| s.is_active())
    }

    pub fn start_session(&mut self, task_id: u64, now: DateTime<Utc>) -> Result<Session, StoreError> {
        self.get(task_id)?;
        if let Some(active) = self.active_session() {
            return Err(StoreError::SessionConflict {
                task_id: active.task_id,
            });
        }
        let session = Session {
            id: self.next_session_id,
            task_id,
            started_at: now,
            finished_at: None,
            duration_secs: 0,
        };
        self.next_session_id += 1;
        self.sessions.push(session.clone());
        Ok(session)
    }

    pub fn stop_active_session(&mut self, now: DateTime<Utc>) -> Result<Session, StoreError> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.is_active())
            .ok_or(StoreError::NoActiveSession)?;
        session.duration_secs = session.elapsed_secs(now);
        session.finished_at = Some(now);
        Ok(session.clone())
    }

    pub fn sessions_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Session> {
        let mut out: Vec<Session> = self
            .sessions
            .iter()
            .filter(|s| !s.is_active() && s.started_at >= start && s.started_at <= end)
            .cloned()
            .collect();
        out.sort_by_key(|s| (s.started_at, s.id));
        out
    }
}

/// Trim fields and normalize the ticket id. Tickets that do not look like
/// `ABC-123` are kept verbatim.
fn validate_draft(mut draft: TaskDraft) -> Result<TaskDraft, StoreError> {
    draft.title = draft.title.trim().to_string();
    if draft.title.is_empty() {
        return Err(StoreError::Invalid("task title cannot be empty".into()));
    }
    draft.project = draft.project.trim().to_string();
    draft.ticket = normalize_ticket(&draft.ticket).unwrap_or_else(|_| draft.ticket.trim().to_string());
    let mut tags: Vec<String> = Vec::new();
    for tag in draft.tags.drain(..) {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    draft.tags = tags;
    Ok(draft)
}

fn apply_draft(task: &mut Task, draft: TaskDraft) {
    task.title = draft.title;
    task.project = draft.project;
    task.tags = draft.tags;
    task.priority = draft.priority;
    task.ticket = draft.ticket;
    task.url = draft.url;
    task.note = draft.note;
    task.due = draft.due;
}
