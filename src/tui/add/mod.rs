//! Step-by-step task form behind `add -i` and `edit`.
//!
//! Each step validates its input when the user moves forward. A step that
//! fails keeps focus and shows the error under the input until corrected.

pub mod input;
pub mod render;
pub mod state;

use chrono::Local;
use ratatui::Frame;

use crate::clock::{Clock, SystemClock};
use crate::model::{Config, Task, TaskDraft};
use crate::tui::runtime::{Command, Event, Model, Timer};
use crate::tui::shimmer::Shimmer;
use crate::tui::theme::Theme;

pub use state::{AddOutcome, AddState, Mode, Msg, Step};

pub struct AddView<C: Clock = SystemClock> {
    state: AddState,
    theme: Theme,
    clock: C,
}

impl AddView<SystemClock> {
    /// Form for a new task, prefilled from `draft`
    pub fn new(draft: TaskDraft, config: &Config) -> Self {
        let shimmer = Shimmer::new(config.shimmer.clone());
        AddView::with_clock(AddState::new(draft, shimmer), config, SystemClock)
    }

    /// Form over an existing task
    pub fn edit(task: Task, config: &Config) -> Self {
        let shimmer = Shimmer::new(config.shimmer.clone());
        AddView::with_clock(AddState::edit(task, shimmer), config, SystemClock)
    }
}

impl<C: Clock> AddView<C> {
    pub fn with_clock(state: AddState, config: &Config, clock: C) -> Self {
        AddView {
            state,
            theme: Theme::from_config(&config.ui),
            clock,
        }
    }

    pub fn state(&self) -> &AddState {
        &self.state
    }

    /// The saved draft, or `None` when the form was cancelled
    pub fn into_draft(self) -> Option<TaskDraft> {
        match self.state.outcome() {
            AddOutcome::Saved(draft) => Some(draft.clone()),
            AddOutcome::Editing | AddOutcome::Cancelled => None,
        }
    }
}

impl<C: Clock> Model for AddView<C> {
    fn init(&mut self) -> Vec<Command> {
        self.state.init()
    }

    fn handle_event(&mut self, event: Event) -> Vec<Command> {
        let msg = match event {
            Event::Key(key) => {
                let now = self.clock.now().with_timezone(&Local);
                input::key_to_msg(self.state.mode(), key, now)
            }
            Event::Resize(w, h) => Some(Msg::Resize(w, h)),
            Event::Tick {
                timer: Timer::Shimmer,
                at,
            } => Some(Msg::ShimmerTick(at)),
            Event::Tick { .. } => None,
        };
        match msg {
            Some(msg) => self.state.update(msg),
            None => Vec::new(),
        }
    }

    fn render(&self, frame: &mut Frame) {
        render::render(frame, &self.state, &self.theme, self.clock.now());
    }
}
