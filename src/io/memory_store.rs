use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::io::store::{StoreData, StoreError, TaskStore};
use crate::model::{Session, Task, TaskDraft, TaskFilter, Transition};

/// In-process store, used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore<C: Clock = SystemClock> {
    data: StoreData,
    clock: C,
}

impl MemoryStore<SystemClock> {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl<C: Clock> MemoryStore<C> {
    pub fn with_clock(clock: C) -> Self {
        MemoryStore {
            data: StoreData::new(),
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }
}

impl<C: Clock> TaskStore for MemoryStore<C> {
    fn fetch_all(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        Ok(self.data.fetch_all(filter))
    }

    fn get(&self, id: u64) -> Result<Task, StoreError> {
        self.data.get(id)
    }

    fn create(&mut self, draft: TaskDraft) -> Result<Task, StoreError> {
        self.data.create(draft, self.clock.now())
    }

    fn update(&mut self, id: u64, draft: TaskDraft) -> Result<Task, StoreError> {
        self.data.update(id, draft, self.clock.now())
    }

    fn transition(&mut self, id: u64, transition: Transition) -> Result<Task, StoreError> {
        self.data.transition(id, transition, self.clock.now())
    }

    fn start_session(&mut self, task_id: u64) -> Result<Session, StoreError> {
        self.data.start_session(task_id, self.clock.now())
    }

    fn stop_active_session(&mut self) -> Result<Session, StoreError> {
        self.data.stop_active_session(self.clock.now())
    }

    fn active_session(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.data.active_session().cloned())
    }

    fn sessions_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>, StoreError> {
        Ok(self.data.sessions_between(start, end))
    }
}
