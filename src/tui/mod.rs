pub mod add;
pub mod details;
pub mod list;
pub mod runtime;
pub mod shimmer;
pub mod theme;
pub mod timer;

#[cfg(test)]
pub(crate) mod test_helpers;

use crate::io::TaskStore;
use crate::model::{Config, Session, Task, TaskDraft, TaskFilter};

pub use add::AddView;
pub use list::ListView;
pub use timer::{Outcome, TimerView};

/// Browse the tasks selected by `filter` until the user quits
pub fn run_list<S: TaskStore>(
    store: S,
    filter: TaskFilter,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = ListView::new(store, filter, config)?;
    runtime::run(&mut view)
}

/// Show the running session and report how the view was closed
pub fn run_timer(
    task: Task,
    session: Session,
    config: &Config,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    let mut view = TimerView::new(task, session, config);
    runtime::run(&mut view)?;
    Ok(view.outcome())
}

/// Walk the task form, starting from `draft`. Returns `None` when the user
/// cancels.
pub fn run_add(
    draft: TaskDraft,
    config: &Config,
) -> Result<Option<TaskDraft>, Box<dyn std::error::Error>> {
    let mut view = AddView::new(draft, config);
    runtime::run(&mut view)?;
    Ok(view.into_draft())
}

/// Walk the task form prefilled from `task`
pub fn run_edit(
    task: Task,
    config: &Config,
) -> Result<Option<TaskDraft>, Box<dyn std::error::Error>> {
    let mut view = AddView::edit(task, config);
    runtime::run(&mut view)?;
    Ok(view.into_draft())
}
