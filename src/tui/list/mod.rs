//! Interactive task browser.
//!
//! [`ListState`] is a pure reducer over the cached task snapshot. [`ListView`]
//! binds it to a store: it runs the reducer's mutation effects inline, feeds
//! the refreshed snapshot back in, and hands timer commands to the runtime.

pub mod input;
pub mod render;
pub mod rows;
pub mod state;

use std::collections::VecDeque;

use chrono::Utc;
use ratatui::Frame;

use crate::io::TaskStore;
use crate::model::{Config, TaskFilter};
use crate::tui::runtime::{Command, Event, Model, Timer};
use crate::tui::shimmer::Shimmer;
use crate::tui::theme::Theme;

pub use state::{Effect, ListState, Mode, Msg};

pub struct ListView<S: TaskStore> {
    store: S,
    filter: TaskFilter,
    state: ListState,
    theme: Theme,
}

impl<S: TaskStore> ListView<S> {
    /// Load the snapshot selected by `filter`. The same filter is reused for
    /// every refresh.
    pub fn new(store: S, filter: TaskFilter, config: &Config) -> Result<Self, crate::io::StoreError> {
        let tasks = store.fetch_all(&filter)?;
        let shimmer = Shimmer::new(config.shimmer.clone());
        Ok(ListView {
            store,
            filter,
            state: ListState::new(tasks, config, shimmer),
            theme: Theme::from_config(&config.ui),
        })
    }

    /// Replace the shimmer, e.g. to pin the color mode in tests
    pub fn with_shimmer(mut self, shimmer: Shimmer) -> Self {
        self.state.set_shimmer(shimmer);
        self
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Feed one message through the reducer and execute its effects
    pub fn send(&mut self, msg: state::Msg) -> Vec<Command> {
        let effects = self.state.update(msg);
        self.run_effects(effects)
    }

    fn run_effects(&mut self, effects: Vec<Effect>) -> Vec<Command> {
        let mut queue: VecDeque<Effect> = effects.into();
        let mut commands = Vec::new();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Runtime(command) => commands.push(command),
                Effect::Mutate { id, transition } => {
                    let msg = match self.mutate(id, transition) {
                        Ok(msg) => msg,
                        Err(e) => {
                            tracing::warn!(task = id, action = transition.verb(), error = %e, "hotkey action failed");
                            Msg::Failed(format!("could not {} task #{}: {}", transition.verb(), id, e))
                        }
                    };
                    queue.extend(self.state.update(msg));
                }
            }
        }
        commands
    }

    fn mutate(&mut self, id: u64, transition: crate::model::Transition) -> Result<Msg, crate::io::StoreError> {
        self.store.transition(id, transition)?;
        tracing::debug!(task = id, action = transition.verb(), "task updated from list");
        Ok(Msg::Refreshed(self.store.fetch_all(&self.filter)?))
    }
}

impl<S: TaskStore> Model for ListView<S> {
    fn init(&mut self) -> Vec<Command> {
        let effects = self.state.init();
        self.run_effects(effects)
    }

    fn handle_event(&mut self, event: Event) -> Vec<Command> {
        let msg = match event {
            Event::Key(key) => input::key_to_msg(self.state.mode(), key),
            Event::Resize(w, h) => Some(Msg::Resize(w, h)),
            Event::Tick {
                timer: Timer::Shimmer,
                at,
            } => Some(Msg::ShimmerTick(at)),
            Event::Tick {
                timer: Timer::StatusExpiry,
                ..
            } => Some(Msg::StatusExpired),
            Event::Tick { .. } => None,
        };
        match msg {
            Some(msg) => self.send(msg),
            None => Vec::new(),
        }
    }

    fn render(&self, frame: &mut Frame) {
        render::render(frame, &self.state, &self.theme, Utc::now());
    }
}
