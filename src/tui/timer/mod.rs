//! Full-screen view of the running session.

pub mod clock_face;
pub mod render;
pub mod state;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;

use crate::clock::{Clock, SystemClock};
use crate::model::{Config, Session, Task};
use crate::tui::runtime::{Command, Event, Model, Timer};
use crate::tui::shimmer::Shimmer;
use crate::tui::theme::Theme;

pub use state::{Msg, Outcome, TimerState};

pub struct TimerView<C: Clock = SystemClock> {
    state: TimerState,
    theme: Theme,
    clock: C,
}

impl TimerView<SystemClock> {
    pub fn new(task: Task, session: Session, config: &Config) -> Self {
        TimerView::with_clock(task, session, config, SystemClock)
    }
}

impl<C: Clock> TimerView<C> {
    pub fn with_clock(task: Task, session: Session, config: &Config, clock: C) -> Self {
        let shimmer = Shimmer::new(config.shimmer.clone());
        let state = TimerState::new(task, session, shimmer, config.ui.timer_split_width, clock.now());
        TimerView {
            state,
            theme: Theme::from_config(&config.ui),
            clock,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn outcome(&self) -> Outcome {
        self.state.outcome()
    }
}

fn key_to_msg(key: KeyEvent) -> Option<Msg> {
    match (key.modifiers, key.code) {
        (m, KeyCode::Char('c')) if m.contains(KeyModifiers::CONTROL) => Some(Msg::Exit),
        (_, KeyCode::Char('s') | KeyCode::Char('S')) => Some(Msg::Stop),
        (_, KeyCode::Esc | KeyCode::Char('q')) => Some(Msg::Exit),
        _ => None,
    }
}

impl<C: Clock> Model for TimerView<C> {
    fn init(&mut self) -> Vec<Command> {
        self.state.init()
    }

    fn handle_event(&mut self, event: Event) -> Vec<Command> {
        let msg = match event {
            Event::Key(key) => key_to_msg(key),
            Event::Resize(w, h) => Some(Msg::Resize(w, h)),
            Event::Tick { timer, at } => match timer {
                Timer::Clock => Some(Msg::ClockTick(self.clock.now())),
                Timer::Animation => Some(Msg::AnimationTick),
                Timer::Shimmer => Some(Msg::ShimmerTick(at)),
                Timer::StatusExpiry => None,
            },
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
