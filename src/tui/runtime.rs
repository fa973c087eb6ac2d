//! Single-threaded event loop shared by the list and timer views.
//!
//! A view implements [`Model`]. The loop feeds it one [`Event`] at a time
//! and executes the [`Command`]s it returns. Timers are keyed: scheduling a
//! key that is already pending replaces its deadline, so a view can re-arm
//! a tick on every event without building up duplicate chains.

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as TermEvent, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// Poll timeout when no timer is pending
const IDLE_POLL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    /// Shimmer frame or the shimmer's pause between sweeps
    Shimmer,
    /// Once-a-second elapsed time refresh
    Clock,
    /// Header animation frame
    Animation,
    /// Hides the transient status message
    StatusExpiry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick { timer: Timer, at: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Schedule(Timer, Duration),
    Cancel(Timer),
    Quit,
}

/// A view driven by the runtime
pub trait Model {
    /// Commands to run before the first event, typically initial ticks
    fn init(&mut self) -> Vec<Command>;
    fn handle_event(&mut self, event: Event) -> Vec<Command>;
    fn render(&self, frame: &mut Frame);
}

/// Pending one-shot timers keyed by [`Timer`]
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: HashMap<Timer, Instant>,
}

impl Scheduler {
    pub fn schedule(&mut self, timer: Timer, at: Instant) {
        self.pending.insert(timer, at);
    }

    pub fn cancel(&mut self, timer: Timer) {
        self.pending.remove(&timer);
    }

    pub fn is_pending(&self, timer: Timer) -> bool {
        self.pending.contains_key(&timer)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    /// Remove and return the earliest timer due at or before `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<(Timer, Instant)> {
        let (timer, at) = self
            .pending
            .iter()
            .filter(|(_, at)| **at <= now)
            .min_by_key(|(_, at)| **at)
            .map(|(t, at)| (*t, *at))?;
        self.pending.remove(&timer);
        Some((timer, at))
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Execute commands relative to `now`. Returns true on `Quit`.
    pub fn apply(&mut self, commands: Vec<Command>, now: Instant) -> bool {
        let mut quit = false;
        for command in commands {
            match command {
                Command::Schedule(timer, delay) => self.schedule(timer, now + delay),
                Command::Cancel(timer) => self.cancel(timer),
                Command::Quit => quit = true,
            }
        }
        quit
    }
}

/// Feed one event to `model` and apply its commands. Returns true on quit.
pub fn dispatch<M: Model>(model: &mut M, scheduler: &mut Scheduler, event: Event) -> bool {
    let now = match &event {
        Event::Tick { at, .. } => *at,
        _ => Instant::now(),
    };
    let commands = model.handle_event(event);
    scheduler.apply(commands, now)
}

/// Fire every timer due at `now`, earliest first. Returns true on quit.
pub fn fire_due<M: Model>(model: &mut M, scheduler: &mut Scheduler, now: Instant) -> bool {
    while let Some((timer, _)) = scheduler.pop_due(now) {
        if dispatch(model, scheduler, Event::Tick { timer, at: now }) {
            return true;
        }
    }
    false
}

/// Take over the terminal and run `model` until it quits
pub fn run<M: Model>(model: &mut M) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, model);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop<M: Model>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: &mut M,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut scheduler = Scheduler::default();
    let size = terminal.size()?;
    let mut quit = scheduler.apply(model.init(), Instant::now())
        || dispatch(model, &mut scheduler, Event::Resize(size.width, size.height));

    while !quit {
        terminal.draw(|frame| model.render(frame))?;

        let timeout = scheduler
            .next_deadline()
            .map_or(IDLE_POLL, |at| at.saturating_duration_since(Instant::now()));

        if event::poll(timeout)? {
            let event = match event::read()? {
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
                TermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
                _ => None,
            };
            if let Some(event) = event {
                quit = dispatch(model, &mut scheduler, event);
            }
        }

        if !quit {
            quit = fire_due(model, &mut scheduler, Instant::now());
        }
    }

    tracing::debug!(pending = scheduler.len(), "view closed, dropping timers");
    scheduler.clear();
    Ok(())
}
