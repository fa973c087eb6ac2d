use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::model::{Session, Task};
use crate::tui::runtime::{Command, Timer};
use crate::tui::shimmer::Shimmer;
use crate::util::unicode::{grapheme_count, truncate_to_width};

pub const CLOCK_INTERVAL: Duration = Duration::from_secs(1);
pub const ANIMATION_INTERVAL: Duration = Duration::from_millis(250);

/// Header animation frames
pub const FRAMES: [&str; 4] = ["⏱", "⏲", "⏱", "⏲"];

/// How the timer view ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Running,
    /// The user asked to stop and save the session
    StoppedBySave,
    /// The view closed and the session keeps running
    StoppedWithoutSave,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    ClockTick(DateTime<Utc>),
    AnimationTick,
    ShimmerTick(Instant),
    Resize(u16, u16),
    Stop,
    Exit,
}

#[derive(Debug, Clone)]
pub struct TimerState {
    task: Task,
    session: Session,
    elapsed_secs: u64,
    frame: usize,
    outcome: Outcome,
    width: u16,
    height: u16,
    split_width: u16,
    shimmer: Shimmer,
}

impl TimerState {
    pub fn new(
        task: Task,
        session: Session,
        shimmer: Shimmer,
        split_width: u16,
        now: DateTime<Utc>,
    ) -> Self {
        let elapsed_secs = session.elapsed_secs(now);
        TimerState {
            task,
            session,
            elapsed_secs,
            frame: 0,
            outcome: Outcome::Running,
            width: 0,
            height: 0,
            split_width,
            shimmer,
        }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn frame(&self) -> &'static str {
        FRAMES[self.frame]
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn shimmer(&self) -> &Shimmer {
        &self.shimmer
    }

    /// Whether the details panel is shown next to the clock
    pub fn is_split(&self) -> bool {
        self.width >= self.split_width
    }

    /// Width of the clock panel for the current terminal
    pub fn clock_panel_width(&self) -> u16 {
        if self.is_split() {
            self.width / 2
        } else {
            self.width
        }
    }

    /// The task title as it fits inside the clock panel
    pub fn title_label(&self) -> String {
        let width = usize::from(self.clock_panel_width().saturating_sub(4));
        truncate_to_width(&self.task.title, width)
    }

    pub fn init(&self) -> Vec<Command> {
        let mut commands = vec![
            Command::Schedule(Timer::Clock, CLOCK_INTERVAL),
            Command::Schedule(Timer::Animation, ANIMATION_INTERVAL),
        ];
        if let Some(delay) = self.shimmer.next_delay() {
            commands.push(Command::Schedule(Timer::Shimmer, delay));
        }
        commands
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        if self.outcome != Outcome::Running {
            return Vec::new();
        }
        match msg {
            Msg::ClockTick(now) => {
                self.elapsed_secs = self.session.elapsed_secs(now);
                vec![Command::Schedule(Timer::Clock, CLOCK_INTERVAL)]
            }
            Msg::AnimationTick => {
                self.frame = (self.frame + 1) % FRAMES.len();
                vec![Command::Schedule(Timer::Animation, ANIMATION_INTERVAL)]
            }
            Msg::ShimmerTick(at) => {
                let len = grapheme_count(&self.title_label());
                self.shimmer
                    .tick(at, len)
                    .map(|delay| Command::Schedule(Timer::Shimmer, delay))
                    .into_iter()
                    .collect()
            }
            Msg::Resize(width, height) => {
                self.width = width;
                self.height = height;
                Vec::new()
            }
            Msg::Stop => self.finish(Outcome::StoppedBySave),
            Msg::Exit => self.finish(Outcome::StoppedWithoutSave),
        }
    }

    fn finish(&mut self, outcome: Outcome) -> Vec<Command> {
        self.outcome = outcome;
        self.shimmer.set_active(false);
        vec![
            Command::Cancel(Timer::Clock),
            Command::Cancel(Timer::Animation),
            Command::Cancel(Timer::Shimmer),
            Command::Quit,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShimmerConfig;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 5, 9, 0, 0).unwrap()
    }

    fn state() -> TimerState {
        let task = Task::new(4, "Refactor billing", start());
        let session = Session {
            id: 1,
            task_id: 4,
            started_at: start(),
            finished_at: None,
            duration_secs: 0,
        };
        let shimmer = Shimmer::with_truecolor(ShimmerConfig::default(), true);
        TimerState::new(task, session, shimmer, 90, start() + chrono::Duration::seconds(5))
    }

    #[test]
    fn test_init_arms_clock_and_animation() {
        let s = state();
        assert_eq!(s.elapsed_secs(), 5);
        let commands = s.init();
        assert!(commands.contains(&Command::Schedule(Timer::Clock, CLOCK_INTERVAL)));
        assert!(commands.contains(&Command::Schedule(Timer::Animation, ANIMATION_INTERVAL)));
        assert!(commands.iter().any(|c| matches!(c, Command::Schedule(Timer::Shimmer, _))));
    }

    #[test]
    fn test_clock_tick_recomputes_from_start() {
        let mut s = state();
        let commands = s.update(Msg::ClockTick(start() + chrono::Duration::seconds(3725)));
        assert_eq!(s.elapsed_secs(), 3725);
        assert_eq!(commands, vec![Command::Schedule(Timer::Clock, CLOCK_INTERVAL)]);
    }

    #[test]
    fn test_animation_cycles_frames() {
        let mut s = state();
        let seen: Vec<&str> = (0..5)
            .map(|_| {
                s.update(Msg::AnimationTick);
                s.frame()
            })
            .collect();
        assert_eq!(seen, vec!["⏲", "⏱", "⏲", "⏱", "⏲"]);
    }

    #[test]
    fn test_stop_and_exit_outcomes() {
        let mut s = state();
        let commands = s.update(Msg::Stop);
        assert_eq!(s.outcome(), Outcome::StoppedBySave);
        assert_eq!(commands.last(), Some(&Command::Quit));
        assert!(s.update(Msg::ClockTick(start())).is_empty());

        let mut s = state();
        s.update(Msg::Exit);
        assert_eq!(s.outcome(), Outcome::StoppedWithoutSave);
        assert!(!s.shimmer().is_active());
    }

    #[test]
    fn test_split_threshold() {
        let mut s = state();
        s.update(Msg::Resize(89, 30));
        assert!(!s.is_split());
        assert_eq!(s.clock_panel_width(), 89);
        s.update(Msg::Resize(90, 30));
        assert!(s.is_split());
        assert_eq!(s.clock_panel_width(), 45);
    }
}
