use std::time::{Duration, Instant};

use crate::model::{Config, Task, Transition};
use crate::ops::search;
use crate::tui::list::rows::{self, ColumnLayout};
use crate::tui::runtime::{Command, Timer};
use crate::tui::shimmer::Shimmer;
use crate::util::unicode::{grapheme_count, truncate_to_width};

/// How long a status message stays on screen
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Smallest number of rows on a page, however short the terminal
pub const MIN_PAGE_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    /// Keys edit the query and the result set updates on every keystroke
    LiveSearching,
    /// Query committed; the filtered view persists while browsing
    SearchApplied,
    Exiting,
}

/// Input to the list reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    MoveSelection(isize),
    Page(isize),
    EnterSearch,
    TypeChar(char),
    Backspace,
    CommitSearch,
    ExitSearch,
    ToggleDone,
    ToggleArchive,
    /// A fresh snapshot from the store
    Refreshed(Vec<Task>),
    /// A store call triggered from a hotkey failed
    Failed(String),
    Resize(u16, u16),
    ShimmerTick(Instant),
    StatusExpired,
    Quit,
}

/// Work the reducer asks its owner to do
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Apply a status flip in the store, then refresh
    Mutate { id: u64, transition: Transition },
    Runtime(Command),
}

#[derive(Debug, Clone)]
pub struct ListState {
    original: Vec<Task>,
    filtered: Vec<Task>,
    selected: usize,
    page: usize,
    page_size: usize,
    mode: Mode,
    query: String,
    width: u16,
    height: u16,
    layout: ColumnLayout,
    shimmer: Shimmer,
    status: Option<String>,
    page_margin: u16,
    compact_width: u16,
}

impl ListState {
    pub fn new(tasks: Vec<Task>, config: &Config, shimmer: Shimmer) -> Self {
        let mut state = ListState {
            original: Vec::new(),
            filtered: Vec::new(),
            selected: 0,
            page: 0,
            page_size: MIN_PAGE_SIZE,
            mode: Mode::Browsing,
            query: String::new(),
            width: 0,
            height: 0,
            layout: ColumnLayout::Compact,
            shimmer,
            status: None,
            page_margin: config.ui.page_margin,
            compact_width: config.ui.compact_width,
        };
        state.load(tasks);
        state
    }

    /// Replace the task set and return to the first row
    pub fn load(&mut self, tasks: Vec<Task>) {
        self.filtered = tasks.clone();
        self.original = tasks;
        self.selected = 0;
        self.page = 0;
    }

    pub fn set_shimmer(&mut self, shimmer: Shimmer) {
        self.shimmer = shimmer;
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn tasks(&self) -> &[Task] {
        &self.filtered
    }

    pub fn all_tasks(&self) -> &[Task] {
        &self.original
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.filtered.get(self.selected)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size).max(1)
    }

    /// Indices of the rows on the current page
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let start = (self.page * self.page_size).min(self.filtered.len());
        let end = (start + self.page_size).min(self.filtered.len());
        start..end
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn shimmer(&self) -> &Shimmer {
        &self.shimmer
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// The selected title as it fits in the title column
    pub fn selected_label(&self) -> String {
        let width = rows::title_width(self.layout, rows::table_inner_width(self.width));
        self.selected_task()
            .map(|t| truncate_to_width(&t.title, width))
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Reducer
    // -----------------------------------------------------------------------

    /// Commands to run when the view starts
    pub fn init(&self) -> Vec<Effect> {
        match self.shimmer.next_delay() {
            Some(delay) => vec![Effect::Runtime(Command::Schedule(Timer::Shimmer, delay))],
            None => Vec::new(),
        }
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        if self.mode == Mode::Exiting {
            return Vec::new();
        }
        match msg {
            Msg::MoveSelection(delta) => self.move_selection(delta),
            Msg::Page(delta) => self.change_page(delta),
            Msg::EnterSearch => self.enter_search(),
            Msg::TypeChar(c) => {
                if self.mode != Mode::LiveSearching {
                    return Vec::new();
                }
                self.query.push(c);
                self.apply_live_search();
                Vec::new()
            }
            Msg::Backspace => {
                if self.mode != Mode::LiveSearching || self.query.pop().is_none() {
                    return Vec::new();
                }
                self.apply_live_search();
                Vec::new()
            }
            Msg::CommitSearch => self.commit_search(),
            Msg::ExitSearch => self.exit_search(),
            Msg::ToggleDone => self
                .selected_task()
                .map(|t| Effect::Mutate {
                    id: t.id,
                    transition: Transition::toggle_done(t.status),
                })
                .into_iter()
                .collect(),
            Msg::ToggleArchive => self
                .selected_task()
                .map(|t| Effect::Mutate {
                    id: t.id,
                    transition: Transition::toggle_archive(t.status),
                })
                .into_iter()
                .collect(),
            Msg::Refreshed(tasks) => self.refresh(tasks),
            Msg::Failed(message) => {
                self.status = Some(message);
                vec![Effect::Runtime(Command::Schedule(
                    Timer::StatusExpiry,
                    STATUS_TTL,
                ))]
            }
            Msg::Resize(width, height) => {
                self.resize(width, height);
                Vec::new()
            }
            Msg::ShimmerTick(at) => self.shimmer_tick(at),
            Msg::StatusExpired => {
                self.status = None;
                Vec::new()
            }
            Msg::Quit => {
                self.mode = Mode::Exiting;
                self.shimmer.set_active(false);
                vec![
                    Effect::Runtime(Command::Cancel(Timer::Shimmer)),
                    Effect::Runtime(Command::Cancel(Timer::StatusExpiry)),
                    Effect::Runtime(Command::Quit),
                ]
            }
        }
    }

    fn move_selection(&mut self, delta: isize) -> Vec<Effect> {
        if self.filtered.is_empty() {
            return Vec::new();
        }
        let last = self.filtered.len() - 1;
        let target = self.selected.saturating_add_signed(delta).min(last);
        if target == self.selected {
            return Vec::new();
        }
        self.selected = target;

        let range = self.visible_range();
        if self.selected < range.start && self.page > 0 {
            self.page -= 1;
        } else if self.selected >= range.end && self.page + 1 < self.page_count() {
            self.page += 1;
        }
        self.restart_shimmer()
    }

    fn change_page(&mut self, delta: isize) -> Vec<Effect> {
        let last_page = self.page_count() - 1;
        let target = self.page.saturating_add_signed(delta).min(last_page);
        if target == self.page {
            return Vec::new();
        }
        self.page = target;
        let range = self.visible_range();
        if !range.is_empty() {
            self.selected = self.selected.clamp(range.start, range.end - 1);
        }
        self.restart_shimmer()
    }

    fn enter_search(&mut self) -> Vec<Effect> {
        if self.mode == Mode::LiveSearching {
            return Vec::new();
        }
        self.mode = Mode::LiveSearching;
        self.shimmer.set_active(false);
        vec![Effect::Runtime(Command::Cancel(Timer::Shimmer))]
    }

    fn commit_search(&mut self) -> Vec<Effect> {
        if self.mode != Mode::LiveSearching {
            return Vec::new();
        }
        self.mode = if self.query.trim().is_empty() {
            Mode::Browsing
        } else {
            Mode::SearchApplied
        };
        self.shimmer.set_active(true);
        self.restart_shimmer()
    }

    fn exit_search(&mut self) -> Vec<Effect> {
        if !matches!(self.mode, Mode::LiveSearching | Mode::SearchApplied) {
            return Vec::new();
        }
        self.query.clear();
        self.filtered = self.original.clone();
        self.selected = 0;
        self.page = 0;
        self.mode = Mode::Browsing;
        self.shimmer.set_active(true);
        self.restart_shimmer()
    }

    /// Re-rank over the full set and jump back to the first result
    fn apply_live_search(&mut self) {
        self.filtered = search::search(&self.original, &self.query);
        self.selected = 0;
        self.page = 0;
    }

    fn refresh(&mut self, tasks: Vec<Task>) -> Vec<Effect> {
        self.original = tasks;
        self.filtered = search::search(&self.original, &self.query);
        if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len().saturating_sub(1);
        }
        self.page = self.selected / self.page_size;
        self.restart_shimmer()
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let margin = self.page_margin.max(rows::LAYOUT_OVERHEAD);
        self.page_size = usize::from(height.saturating_sub(margin)).max(MIN_PAGE_SIZE);
        self.layout = if width >= self.compact_width {
            ColumnLayout::Full
        } else {
            ColumnLayout::Compact
        };
        self.page = self.selected / self.page_size;
    }

    fn shimmer_tick(&mut self, at: Instant) -> Vec<Effect> {
        if self.filtered.is_empty() {
            return Vec::new();
        }
        let len = grapheme_count(&self.selected_label());
        match self.shimmer.tick(at, len) {
            Some(delay) => vec![Effect::Runtime(Command::Schedule(Timer::Shimmer, delay))],
            None => Vec::new(),
        }
    }

    /// Restart the sweep for a new selection. Re-arming replaces any
    /// pending pause so the new row animates right away.
    fn restart_shimmer(&mut self) -> Vec<Effect> {
        self.shimmer.reset();
        match self.shimmer.next_delay() {
            Some(delay) => vec![Effect::Runtime(Command::Schedule(Timer::Shimmer, delay))],
            None => vec![Effect::Runtime(Command::Cancel(Timer::Shimmer))],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ShimmerConfig, TaskStatus};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use proptest::test_runner::TestCaseError;

    fn tasks(n: u64) -> Vec<Task> {
        let at = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        (1..=n).map(|id| Task::new(id, format!("Task {id}"), at)).collect()
    }

    fn state(n: u64, height: u16) -> ListState {
        let shimmer = Shimmer::with_truecolor(ShimmerConfig::default(), true);
        let mut s = ListState::new(tasks(n), &Config::default(), shimmer);
        s.update(Msg::Resize(120, height));
        s
    }

    fn type_query(s: &mut ListState, q: &str) {
        s.update(Msg::EnterSearch);
        for c in q.chars() {
            s.update(Msg::TypeChar(c));
        }
    }

    fn ids(s: &ListState) -> Vec<u64> {
        s.tasks().iter().map(|t| t.id).collect()
    }

    fn schedules_shimmer(effects: &[Effect]) -> bool {
        effects
            .iter()
            .any(|e| matches!(e, Effect::Runtime(Command::Schedule(Timer::Shimmer, _))))
    }

    #[test]
    fn test_page_size_follows_height() {
        let s = state(10, 20);
        assert_eq!(s.page_size(), 8);
        let s = state(10, 5);
        assert_eq!(s.page_size(), MIN_PAGE_SIZE);
    }

    #[test]
    fn test_small_page_margin_never_exceeds_visible_rows() {
        let mut config = Config::default();
        config.ui.page_margin = 2;
        let shimmer = Shimmer::with_truecolor(ShimmerConfig::default(), true);
        let mut s = ListState::new(tasks(50), &config, shimmer);
        s.update(Msg::Resize(120, 30));
        assert_eq!(s.page_size(), 30 - usize::from(rows::LAYOUT_OVERHEAD));
    }

    #[test]
    fn test_very_wide_terminal_ticks() {
        let mut s = state(1, 40);
        s.update(Msg::Resize(2000, 40));
        assert_eq!(s.layout(), ColumnLayout::Full);
        assert_eq!(s.selected_label(), "Task 1");
        let effects = s.update(Msg::ShimmerTick(Instant::now()));
        assert!(schedules_shimmer(&effects));
    }

    #[test]
    fn test_move_selection_clamps_without_wrapping() {
        let mut s = state(3, 30);
        assert!(s.update(Msg::MoveSelection(-1)).is_empty());
        assert_eq!(s.selected(), 0);
        s.update(Msg::MoveSelection(1));
        s.update(Msg::MoveSelection(1));
        assert_eq!(s.selected(), 2);
        assert!(s.update(Msg::MoveSelection(1)).is_empty());
        assert_eq!(s.selected(), 2);
    }

    #[test]
    fn test_move_on_empty_set_is_noop() {
        let mut s = state(0, 30);
        assert!(s.update(Msg::MoveSelection(1)).is_empty());
        assert!(s.selected_task().is_none());
    }

    #[test]
    fn test_moving_past_page_edge_turns_one_page() {
        // page size 3
        let mut s = state(7, 15);
        s.update(Msg::MoveSelection(1));
        s.update(Msg::MoveSelection(1));
        assert_eq!(s.page(), 0);
        s.update(Msg::MoveSelection(1));
        assert_eq!((s.selected(), s.page()), (3, 1));
        s.update(Msg::MoveSelection(-1));
        assert_eq!((s.selected(), s.page()), (2, 0));
    }

    #[test]
    fn test_move_restarts_shimmer() {
        let mut s = state(3, 30);
        s.update(Msg::ShimmerTick(Instant::now()));
        assert!(s.shimmer().center() > 0.0);
        let effects = s.update(Msg::MoveSelection(1));
        assert_eq!(s.shimmer().center(), 0.0);
        assert!(schedules_shimmer(&effects));
    }

    #[test]
    fn test_selection_stays_on_page_after_paging() {
        let mut s = state(10, 15);
        let size = s.page_size();
        for delta in [1, 1, 1, 1, -1, 1, -1, -1, -1, -1] {
            s.update(Msg::Page(delta));
            let start = s.page() * size;
            let end = ((s.page() + 1) * size).min(s.tasks().len()) - 1;
            assert!(
                (start..=end).contains(&s.selected()),
                "selected {} outside {}..={}",
                s.selected(),
                start,
                end
            );
        }
    }

    #[test]
    fn test_page_clamps_to_nearest_edge() {
        let mut s = state(10, 15);
        s.update(Msg::MoveSelection(1));
        s.update(Msg::Page(1));
        assert_eq!((s.page(), s.selected()), (1, 3));
        s.update(Msg::MoveSelection(1));
        s.update(Msg::MoveSelection(1));
        s.update(Msg::Page(-1));
        assert_eq!((s.page(), s.selected()), (0, 2));
        // last page holds only task 10
        s.update(Msg::Page(1));
        s.update(Msg::Page(1));
        s.update(Msg::Page(1));
        assert_eq!((s.page(), s.selected()), (3, 9));
        assert!(s.update(Msg::Page(1)).is_empty());
    }

    #[test]
    fn test_live_search_runs_over_original_set() {
        let mut s = state(12, 30);
        type_query(&mut s, "task 1");
        assert_eq!(ids(&s), vec![1, 10, 11, 12]);
        s.update(Msg::TypeChar('1'));
        assert_eq!(ids(&s), vec![11]);
        s.update(Msg::Backspace);
        assert_eq!(ids(&s), vec![1, 10, 11, 12]);
    }

    #[test]
    fn test_backspace_only_broadens() {
        let mut s = state(30, 30);
        type_query(&mut s, "task 21");
        let mut prev = ids(&s);
        while !s.query().is_empty() {
            s.update(Msg::Backspace);
            let now = ids(&s);
            assert!(prev.iter().all(|id| now.contains(id)));
            prev = now;
        }
        assert_eq!(prev.len(), 30);
    }

    #[test]
    fn test_search_toggles_shimmer() {
        let mut s = state(3, 30);
        let effects = s.update(Msg::EnterSearch);
        assert!(!s.shimmer().is_active());
        assert_eq!(
            effects,
            vec![Effect::Runtime(Command::Cancel(Timer::Shimmer))]
        );
        assert!(s.update(Msg::ShimmerTick(Instant::now())).is_empty());

        let effects = s.update(Msg::ExitSearch);
        assert!(s.shimmer().is_active());
        assert!(schedules_shimmer(&effects));
    }

    #[test]
    fn test_commit_keeps_filter_and_escape_restores() {
        let mut s = state(5, 30);
        type_query(&mut s, "task 3");
        s.update(Msg::CommitSearch);
        assert_eq!(s.mode(), Mode::SearchApplied);
        assert_eq!(s.query(), "task 3");
        assert_eq!(ids(&s), vec![3]);

        // typing is ignored once the search is committed
        s.update(Msg::TypeChar('x'));
        assert_eq!(s.query(), "task 3");

        s.update(Msg::ExitSearch);
        assert_eq!(s.mode(), Mode::Browsing);
        assert_eq!(s.query(), "");
        assert_eq!(ids(&s), vec![1, 2, 3, 4, 5]);
        assert_eq!(s.selected(), 0);
    }

    #[test]
    fn test_commit_empty_query_returns_to_browsing() {
        let mut s = state(2, 30);
        s.update(Msg::EnterSearch);
        s.update(Msg::CommitSearch);
        assert_eq!(s.mode(), Mode::Browsing);
    }

    #[test]
    fn test_toggle_emits_inverse_mutation() {
        let mut s = state(2, 30);
        assert_eq!(
            s.update(Msg::ToggleDone),
            vec![Effect::Mutate {
                id: 1,
                transition: Transition::Done
            }]
        );

        let mut refreshed = tasks(2);
        refreshed[0].status = TaskStatus::Done;
        s.update(Msg::Refreshed(refreshed));
        assert_eq!(s.selected_task().unwrap().status, TaskStatus::Done);
        assert_eq!(
            s.update(Msg::ToggleDone),
            vec![Effect::Mutate {
                id: 1,
                transition: Transition::Undone
            }]
        );
        assert_eq!(
            s.update(Msg::ToggleArchive),
            vec![Effect::Mutate {
                id: 1,
                transition: Transition::Archive
            }]
        );
    }

    #[test]
    fn test_refresh_reapplies_query_and_clamps() {
        let mut s = state(6, 30);
        type_query(&mut s, "task");
        s.update(Msg::CommitSearch);
        for _ in 0..5 {
            s.update(Msg::MoveSelection(1));
        }
        assert_eq!(s.selected(), 5);

        s.update(Msg::Refreshed(tasks(4)));
        assert_eq!(s.mode(), Mode::SearchApplied);
        assert_eq!(s.query(), "task");
        assert_eq!(s.selected(), 3);
        assert_eq!(s.tasks().len(), 4);

        s.update(Msg::Refreshed(Vec::new()));
        assert_eq!(s.selected(), 0);
        assert!(s.selected_task().is_none());
    }

    #[test]
    fn test_resize_switches_layout_and_keeps_selected_task() {
        let mut s = state(20, 40);
        assert_eq!(s.layout(), ColumnLayout::Full);
        for _ in 0..11 {
            s.update(Msg::MoveSelection(1));
        }
        let before = s.selected_task().unwrap().id;

        s.update(Msg::Resize(80, 15));
        assert_eq!(s.layout(), ColumnLayout::Compact);
        assert_eq!(s.selected_task().unwrap().id, before);
        assert!(s.visible_range().contains(&s.selected()));
        assert_eq!(s.page(), 3);
    }

    #[test]
    fn test_failure_sets_expiring_status() {
        let mut s = state(1, 30);
        let effects = s.update(Msg::Failed("task #1 not found".into()));
        assert_eq!(s.status(), Some("task #1 not found"));
        assert_eq!(
            effects,
            vec![Effect::Runtime(Command::Schedule(
                Timer::StatusExpiry,
                STATUS_TTL
            ))]
        );
        s.update(Msg::StatusExpired);
        assert_eq!(s.status(), None);
    }

    #[test]
    fn test_quit_cancels_timers_and_ignores_later_input() {
        let mut s = state(3, 30);
        let effects = s.update(Msg::Quit);
        assert_eq!(s.mode(), Mode::Exiting);
        assert_eq!(
            effects.last(),
            Some(&Effect::Runtime(Command::Quit))
        );
        assert!(s.update(Msg::MoveSelection(1)).is_empty());
        assert_eq!(s.selected(), 0);
    }

    fn arb_msg() -> impl Strategy<Value = Msg> {
        prop_oneof![
            4 => prop_oneof![Just(-1isize), Just(1isize)].prop_map(Msg::MoveSelection),
            2 => prop_oneof![Just(-1isize), Just(1isize)].prop_map(Msg::Page),
            1 => (40u16..200, 4u16..60).prop_map(|(w, h)| Msg::Resize(w, h)),
        ]
    }

    fn assert_selection_visible(s: &ListState) -> Result<(), TestCaseError> {
        prop_assert!(s.page() < s.page_count());
        if s.tasks().is_empty() {
            prop_assert_eq!(s.selected(), 0);
        } else {
            prop_assert!(s.selected() < s.tasks().len());
            prop_assert!(s.visible_range().contains(&s.selected()));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_selection_stays_on_visible_page(
            n in 0u64..60,
            height in 4u16..60,
            msgs in prop::collection::vec(arb_msg(), 0..80),
        ) {
            let mut s = state(n, height);
            assert_selection_visible(&s)?;
            for msg in msgs {
                let paging = matches!(msg, Msg::Page(_));
                let page_before = s.page();
                s.update(msg);
                assert_selection_visible(&s)?;
                if paging {
                    let moved = s.page().abs_diff(page_before);
                    prop_assert!(moved <= 1);
                }
            }
        }

        #[test]
        fn prop_backspace_never_narrows(n in 1u64..40, query in "[a-z0-9 ]{1,6}") {
            let mut s = state(n, 30);
            type_query(&mut s, &query);
            let mut prev = ids(&s);
            while !s.query().is_empty() {
                s.update(Msg::Backspace);
                let now = ids(&s);
                prop_assert!(prev.iter().all(|id| now.contains(id)));
                prev = now;
            }
            prop_assert_eq!(prev, ids_of(&tasks(n)));
        }
    }

    fn ids_of(tasks: &[Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }
}
