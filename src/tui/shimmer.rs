//! Time-driven highlight sweep over a short label.
//!
//! The sweep is a Gaussian bell whose center moves linearly from one
//! sweep-width before the label to one sweep-width past it, then holds for
//! a pause and starts over. The state is advanced only by explicit ticks so
//! the owning view decides when time passes.

use std::time::{Duration, Instant};

use unicode_segmentation::UnicodeSegmentation;

use crate::model::{ColorMode, ShimmerConfig};

/// How a single grapheme of the label is colored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tone {
    /// Truecolor gradient weight in `[0, 1]`
    Blend(f64),
    /// Two-tone fallback: inside the highlight window or not
    Window(bool),
    /// Single accent color, no animation
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Sweeping,
    Paused { remaining: Duration },
}

#[derive(Debug, Clone)]
pub struct Shimmer {
    config: ShimmerConfig,
    truecolor: bool,
    active: bool,
    center: f64,
    phase: Phase,
    last_tick: Option<Instant>,
}

impl Shimmer {
    pub fn new(config: ShimmerConfig) -> Self {
        let truecolor = match config.color {
            ColorMode::TrueColor => true,
            ColorMode::Ansi256 => false,
            ColorMode::Auto => detect_truecolor(),
        };
        Shimmer::with_truecolor(config, truecolor)
    }

    pub fn with_truecolor(config: ShimmerConfig, truecolor: bool) -> Self {
        let active = config.enabled && !config.reduce_motion;
        Shimmer {
            config,
            truecolor,
            active,
            center: 0.0,
            phase: Phase::Sweeping,
            last_tick: None,
        }
    }

    pub fn center(&self) -> f64 {
        self.center
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the owner should keep a tick scheduled
    pub fn should_tick(&self) -> bool {
        self.active && self.config.enabled && !self.config.reduce_motion
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.config.tick_ms.max(1))
    }

    /// Turn animation on or off. Enabling has no effect when the shimmer is
    /// disabled or reduced-motion is set.
    pub fn set_active(&mut self, active: bool) {
        self.active = active && self.config.enabled && !self.config.reduce_motion;
        if !self.active {
            self.last_tick = None;
        }
    }

    /// Restart the sweep at the left edge of the label
    pub fn reset(&mut self) {
        self.center = 0.0;
        self.phase = Phase::Sweeping;
        self.last_tick = None;
    }

    /// Delay until the next tick is wanted, or `None` when idle
    pub fn next_delay(&self) -> Option<Duration> {
        if !self.should_tick() {
            return None;
        }
        match self.phase {
            Phase::Sweeping => Some(self.tick_interval()),
            Phase::Paused { remaining } => Some(remaining.max(Duration::from_millis(1))),
        }
    }

    /// Advance by the time since the previous tick (one interval for the
    /// first tick after a reset) and return the delay until the next one.
    pub fn tick(&mut self, at: Instant, len: usize) -> Option<Duration> {
        if !self.should_tick() {
            self.last_tick = None;
            return None;
        }
        let elapsed = match self.last_tick {
            Some(prev) => at.saturating_duration_since(prev),
            None => self.tick_interval(),
        };
        self.last_tick = Some(at);
        self.advance(elapsed, len);
        self.next_delay()
    }

    /// Move the sweep forward by `elapsed` for a label of `len` graphemes
    pub fn advance(&mut self, elapsed: Duration, len: usize) {
        if !self.should_tick() || len == 0 {
            return;
        }
        let len = len as f64;
        let ratio = self.config.width_ratio;

        if let Phase::Paused { remaining } = self.phase {
            if elapsed >= remaining {
                self.phase = Phase::Sweeping;
                self.center = -len * ratio;
            } else {
                self.phase = Phase::Paused {
                    remaining: remaining - elapsed,
                };
            }
            return;
        }

        let cycle_ms = self.config.cycle_ms.max(1) as f64;
        let distance = len * (1.0 + 2.0 * ratio);
        self.center += distance * elapsed.as_secs_f64() * 1000.0 / cycle_ms;

        let max_center = len + len * ratio;
        if self.center >= max_center {
            self.center = max_center;
            self.phase = Phase::Paused {
                remaining: Duration::from_millis(self.config.pause_ms),
            };
        }
    }

    fn sigma(&self, len: usize) -> f64 {
        (self.config.width_ratio * len as f64 / 2.0).max(1.0)
    }

    /// Gaussian highlight weight for each of `len` positions
    pub fn weights(&self, len: usize) -> Vec<f64> {
        let sigma = self.sigma(len);
        (0..len)
            .map(|i| {
                let dx = i as f64 - self.center;
                (-(dx * dx) / (2.0 * sigma * sigma)).exp().clamp(0.0, 1.0)
            })
            .collect()
    }

    /// Half-open index range lit by the two-tone fallback
    pub fn window(&self, len: usize) -> (i64, i64) {
        let width = ((self.config.width_ratio * len as f64) as i64).max(1);
        let start = self.center as i64 - width / 2;
        (start, start + width)
    }

    /// Split `label` into graphemes, each with its tone for this frame
    pub fn paint<'a>(&self, label: &'a str) -> Vec<(&'a str, Tone)> {
        let graphemes: Vec<&str> = label.graphemes(true).collect();
        let len = graphemes.len();
        if !self.active {
            return graphemes.into_iter().map(|g| (g, Tone::Static)).collect();
        }
        if self.truecolor {
            let weights = self.weights(len);
            graphemes
                .into_iter()
                .zip(weights)
                .map(|(g, w)| (g, Tone::Blend(w)))
                .collect()
        } else {
            let (start, end) = self.window(len);
            graphemes
                .into_iter()
                .enumerate()
                .map(|(i, g)| (g, Tone::Window((start..end).contains(&(i as i64)))))
                .collect()
        }
    }
}

fn detect_truecolor() -> bool {
    std::env::var("COLORTERM")
        .map(|v| {
            let v = v.to_ascii_lowercase();
            v == "truecolor" || v == "24bit"
        })
        .unwrap_or(false)
}
