use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use crate::clock::{Clock, SystemClock};
use crate::io::lock::FileLock;
use crate::io::store::{StoreData, StoreError, TaskStore};
use crate::model::{Session, Task, TaskDraft, TaskFilter, Transition};

pub const STORE_FILE: &str = "wrok.json";

/// JSON document store in the data directory.
///
/// Every mutation locks the directory, reloads the document, applies the
/// change and atomically replaces the file. Checks such as "no session is
/// active" are therefore made against the latest state on disk.
pub struct FileStore<C: Clock = SystemClock> {
    dir: PathBuf,
    clock: C,
    lock_timeout: Duration,
}

impl FileStore<SystemClock> {
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        Self::open_with_clock(dir, SystemClock)
    }
}

impl<C: Clock> FileStore<C> {
    pub fn open_with_clock(dir: &Path, clock: C) -> Result<Self, StoreError> {
        fs::create_dir_all(dir).map_err(|e| StoreError::ReadError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        Ok(FileStore {
            dir: dir.to_path_buf(),
            clock,
            lock_timeout: Duration::from_secs(5),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    /// Read the current document. A missing file is an empty store.
    fn load(&self) -> Result<StoreData, StoreError> {
        let path = self.path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoreData::new()),
            Err(e) => return Err(StoreError::ReadError { path, source: e }),
        };
        serde_json::from_str(&text).map_err(|e| StoreError::Corrupt { path, source: e })
    }

    fn save(&self, data: &StoreData) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(data)?;
        atomic_write(&self.path(), &json)?;
        Ok(())
    }

    /// Run `op` against the freshest document while holding the lock,
    /// persisting only if it succeeds.
    fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut StoreData, DateTime<Utc>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _lock = FileLock::acquire(&self.dir, self.lock_timeout)?;
        let mut data = self.load()?;
        let out = op(&mut data, self.clock.now())?;
        self.save(&data)?;
        Ok(out)
    }
}

/// Write `content` to a temp file beside `path`, then rename over it
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl<C: Clock> TaskStore for FileStore<C> {
    fn fetch_all(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        Ok(self.load()?.fetch_all(filter))
    }

    fn get(&self, id: u64) -> Result<Task, StoreError> {
        self.load()?.get(id)
    }

    fn create(&mut self, draft: TaskDraft) -> Result<Task, StoreError> {
        let task = self.transact(|data, now| data.create(draft, now))?;
        tracing::info!(id = task.id, "task created");
        Ok(task)
    }

    fn update(&mut self, id: u64, draft: TaskDraft) -> Result<Task, StoreError> {
        let task = self.transact(|data, now| data.update(id, draft, now))?;
        tracing::info!(id, "task updated");
        Ok(task)
    }

    fn transition(&mut self, id: u64, transition: Transition) -> Result<Task, StoreError> {
        let task = self.transact(|data, now| data.transition(id, transition, now))?;
        tracing::info!(id, ?transition, status = %task.status, "task transitioned");
        Ok(task)
    }

    fn start_session(&mut self, task_id: u64) -> Result<Session, StoreError> {
        let session = self.transact(|data, now| data.start_session(task_id, now))?;
        tracing::info!(session = session.id, task_id, "session started");
        Ok(session)
    }

    fn stop_active_session(&mut self) -> Result<Session, StoreError> {
        let session = self.transact(|data, now| data.stop_active_session(now))?;
        tracing::info!(
            session = session.id,
            task_id = session.task_id,
            duration_secs = session.duration_secs,
            "session stopped"
        );
        Ok(session)
    }

    fn active_session(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.load()?.active_session().cloned())
    }

    fn sessions_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Session>, StoreError> {
        Ok(self.load()?.sessions_between(start, end))
    }
}
