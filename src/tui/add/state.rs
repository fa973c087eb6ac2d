use std::time::Instant;

use chrono::{DateTime, Local, Utc};

use crate::model::{Priority, Task, TaskDraft};
use crate::parse::{normalize_ticket, parse_due_date_at};
use crate::tui::runtime::{Command, Timer};
use crate::tui::shimmer::Shimmer;
use crate::util::unicode::{grapheme_count, next_grapheme_boundary, prev_grapheme_boundary};

/// Form steps in the order they are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Title,
    Project,
    Tags,
    Priority,
    Ticket,
    Due,
    Notes,
    Save,
}

impl Step {
    pub const ALL: [Step; 8] = [
        Step::Title,
        Step::Project,
        Step::Tags,
        Step::Priority,
        Step::Ticket,
        Step::Due,
        Step::Notes,
        Step::Save,
    ];

    /// Steps that own a text input
    pub const FIELDS: [Step; 7] = [
        Step::Title,
        Step::Project,
        Step::Tags,
        Step::Priority,
        Step::Ticket,
        Step::Due,
        Step::Notes,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::Title => "Title",
            Step::Project => "Project",
            Step::Tags => "Tags",
            Step::Priority => "Priority",
            Step::Ticket => "Ticket",
            Step::Due => "Due Date",
            Step::Notes => "Notes",
            Step::Save => "Save",
        }
    }

    /// Hint shown while the input is empty
    pub fn placeholder(self) -> &'static str {
        match self {
            Step::Title => "Enter task title... (required)",
            Step::Project => "Project name (enter to skip)",
            Step::Tags => "Comma-separated tags (enter to skip)",
            Step::Priority => "low/medium/high or 1/2/3 (enter to skip)",
            Step::Ticket => "Ticket like APP-42 (enter to skip)",
            Step::Due => "dd/mm/yyyy, 3 days, 24 hours, 2 weeks (enter to skip)",
            Step::Notes => "Additional notes (enter to skip)",
            Step::Save => "Press enter to save the task",
        }
    }

    fn next(self) -> Step {
        Step::ALL.get(self.index() + 1).copied().unwrap_or(Step::Save)
    }

    fn prev(self) -> Step {
        self.index()
            .checked_sub(1)
            .map_or(Step::Title, |i| Step::ALL[i])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Editing,
    /// "Save changes?" prompt after esc with unsaved input
    Confirming { save: bool },
    Finished,
}

/// How the form ended
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Editing,
    Saved(TaskDraft),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    TypeChar(char),
    Backspace,
    CursorLeft,
    CursorRight,
    Home,
    End,
    /// Validate the current step and move on; saves on the last step
    Next(DateTime<Local>),
    Back,
    Escape,
    Cancel,
    ToggleChoice,
    ConfirmSave(DateTime<Local>),
    Discard,
    CloseConfirm,
    Resize(u16, u16),
    ShimmerTick(Instant),
}

#[derive(Debug, Clone)]
pub struct AddState {
    step: Step,
    inputs: [String; 7],
    initial: [String; 7],
    cursor: usize,
    error: Option<String>,
    base: TaskDraft,
    editing: Option<Task>,
    mode: Mode,
    outcome: AddOutcome,
    width: u16,
    height: u16,
    shimmer: Shimmer,
}

impl AddState {
    /// A form for a new task, prefilled from `draft`
    pub fn new(draft: TaskDraft, shimmer: Shimmer) -> Self {
        let inputs = field_texts(&draft);
        let mut state = AddState {
            step: Step::Title,
            initial: Default::default(),
            inputs,
            cursor: 0,
            error: None,
            base: draft,
            editing: None,
            mode: Mode::Editing,
            outcome: AddOutcome::Editing,
            width: 0,
            height: 0,
            shimmer,
        };
        state.cursor = state.inputs[0].len();
        state
    }

    /// A form over an existing task. Only text that changes is re-parsed.
    pub fn edit(task: Task, shimmer: Shimmer) -> Self {
        let mut state = AddState::new(TaskDraft::from_task(&task), shimmer);
        state.initial = state.inputs.clone();
        state.editing = Some(task);
        state
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn outcome(&self) -> &AddOutcome {
        &self.outcome
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The task being edited, `None` when creating
    pub fn editing(&self) -> Option<&Task> {
        self.editing.as_ref()
    }

    pub fn input(&self, step: Step) -> &str {
        self.inputs.get(step.index()).map_or("", String::as_str)
    }

    /// Text of the current step's input
    pub fn current_input(&self) -> &str {
        self.input(self.step)
    }

    /// Byte offset of the cursor in the current input
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn shimmer(&self) -> &Shimmer {
        &self.shimmer
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Label the shimmer sweeps over
    pub fn field_label(&self) -> String {
        match self.editing {
            Some(ref task) if self.step == Step::Save => format!("Save Task #{}", task.id),
            _ if self.step == Step::Save => "Save Task".to_string(),
            _ => self.step.label().to_string(),
        }
    }

    /// Whether `step` holds a value, used for the step list markers
    pub fn has_value(&self, step: Step) -> bool {
        step != Step::Save && !self.input(step).trim().is_empty()
    }

    /// Whether any input differs from what the form opened with
    pub fn has_changes(&self) -> bool {
        let start = match self.editing {
            Some(_) => self.initial.clone(),
            None => Default::default(),
        };
        self.inputs
            .iter()
            .zip(start.iter())
            .any(|(now, was)| now.trim() != was.trim())
    }

    /// Draft of the current inputs for the preview panel. Invalid fields
    /// fall back to the values the form opened with.
    pub fn preview(&self, now: DateTime<Local>) -> Task {
        let mut task = self
            .editing
            .clone()
            .unwrap_or_else(|| Task::new(0, "", now.with_timezone(&Utc)));
        task.title = self.input(Step::Title).trim().to_string();
        task.project = self.input(Step::Project).trim().to_string();
        task.tags = parse_tags(self.input(Step::Tags));
        task.priority = Priority::parse(self.input(Step::Priority)).unwrap_or(self.base.priority);
        task.ticket = normalize_ticket(self.input(Step::Ticket)).unwrap_or_default();
        task.due = self.due(now).unwrap_or(self.base.due);
        task.note = self.input(Step::Notes).trim().to_string();
        task
    }

    pub fn init(&self) -> Vec<Command> {
        self.shimmer
            .next_delay()
            .map(|delay| Command::Schedule(Timer::Shimmer, delay))
            .into_iter()
            .collect()
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        match self.mode {
            Mode::Finished => return Vec::new(),
            Mode::Confirming { save } => return self.update_confirm(msg, save),
            Mode::Editing => {}
        }
        match msg {
            Msg::TypeChar(c) => {
                let cursor = self.cursor;
                if let Some(input) = self.current_mut() {
                    input.insert(cursor, c);
                    self.cursor += c.len_utf8();
                    self.error = None;
                }
                Vec::new()
            }
            Msg::Backspace => {
                let cursor = self.cursor;
                if let Some(input) = self.current_mut()
                    && let Some(prev) = prev_grapheme_boundary(input, cursor)
                {
                    input.drain(prev..cursor);
                    self.cursor = prev;
                    self.error = None;
                }
                Vec::new()
            }
            Msg::CursorLeft => {
                if let Some(prev) = prev_grapheme_boundary(self.current_input(), self.cursor) {
                    self.cursor = prev;
                }
                Vec::new()
            }
            Msg::CursorRight => {
                if let Some(next) = next_grapheme_boundary(self.current_input(), self.cursor) {
                    self.cursor = next;
                }
                Vec::new()
            }
            Msg::Home => {
                self.cursor = 0;
                Vec::new()
            }
            Msg::End => {
                self.cursor = self.current_input().len();
                Vec::new()
            }
            Msg::Next(now) => {
                if self.step == Step::Save {
                    return self.save(now);
                }
                match self.commit(self.step, now) {
                    Ok(()) => self.go_to(self.step.next()),
                    Err(message) => {
                        self.error = Some(message);
                        Vec::new()
                    }
                }
            }
            Msg::Back => {
                if self.step == Step::Title {
                    return Vec::new();
                }
                self.go_to(self.step.prev())
            }
            Msg::Escape => {
                if self.step == Step::Save {
                    self.go_to(self.step.prev())
                } else if self.has_changes() {
                    self.mode = Mode::Confirming { save: true };
                    Vec::new()
                } else {
                    self.finish(AddOutcome::Cancelled)
                }
            }
            Msg::Cancel => self.finish(AddOutcome::Cancelled),
            Msg::Resize(width, height) => {
                self.width = width;
                self.height = height;
                Vec::new()
            }
            Msg::ShimmerTick(at) => self.shimmer_tick(at),
            Msg::ToggleChoice | Msg::ConfirmSave(_) | Msg::Discard | Msg::CloseConfirm => {
                Vec::new()
            }
        }
    }

    fn update_confirm(&mut self, msg: Msg, save: bool) -> Vec<Command> {
        match msg {
            Msg::ToggleChoice => {
                self.mode = Mode::Confirming { save: !save };
                Vec::new()
            }
            Msg::ConfirmSave(now) => {
                self.mode = Mode::Editing;
                self.save(now)
            }
            Msg::Discard => self.finish(AddOutcome::Cancelled),
            Msg::CloseConfirm => {
                self.mode = Mode::Editing;
                Vec::new()
            }
            Msg::Cancel => self.finish(AddOutcome::Cancelled),
            Msg::Resize(width, height) => {
                self.width = width;
                self.height = height;
                Vec::new()
            }
            Msg::ShimmerTick(at) => self.shimmer_tick(at),
            _ => Vec::new(),
        }
    }

    fn shimmer_tick(&mut self, at: Instant) -> Vec<Command> {
        let len = grapheme_count(&self.field_label());
        self.shimmer
            .tick(at, len)
            .map(|delay| Command::Schedule(Timer::Shimmer, delay))
            .into_iter()
            .collect()
    }

    fn current_mut(&mut self) -> Option<&mut String> {
        self.inputs.get_mut(self.step.index())
    }

    fn go_to(&mut self, step: Step) -> Vec<Command> {
        self.step = step;
        self.cursor = self.current_input().len();
        self.error = None;
        self.shimmer.reset();
        self.init()
    }

    fn finish(&mut self, outcome: AddOutcome) -> Vec<Command> {
        self.mode = Mode::Finished;
        self.outcome = outcome;
        vec![Command::Quit]
    }

    /// Check one step's text, normalizing it in place when valid
    fn commit(&mut self, step: Step, now: DateTime<Local>) -> Result<(), String> {
        let text = self.input(step).to_string();
        match step {
            Step::Title if text.trim().is_empty() => Err("Task title is required".to_string()),
            Step::Priority => Priority::parse(&text).map(|_| ()),
            Step::Ticket => {
                let ticket = normalize_ticket(&text).map_err(|e| e.to_string())?;
                if ticket != text {
                    self.inputs[step.index()] = ticket;
                }
                Ok(())
            }
            Step::Due => self.due(now).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// The due date the input resolves to. Unchanged text keeps the
    /// original instant so a relative due is not shifted by an edit.
    fn due(&self, now: DateTime<Local>) -> Result<Option<DateTime<Utc>>, String> {
        let text = self.input(Step::Due).trim();
        if self.editing.is_some() && text == self.initial[Step::Due.index()].trim() {
            return Ok(self.base.due);
        }
        if text.is_empty() {
            return Ok(None);
        }
        parse_due_date_at(text, now)
            .map(Some)
            .map_err(|e| format!("invalid due date: {}", e))
    }

    /// Validate every field. The first invalid step becomes current and
    /// shows its error; the form stays open.
    fn save(&mut self, now: DateTime<Local>) -> Vec<Command> {
        for step in Step::FIELDS {
            if let Err(message) = self.commit(step, now) {
                let commands = self.go_to(step);
                self.error = Some(message);
                return commands;
            }
        }
        let draft = self.draft(now);
        self.finish(AddOutcome::Saved(draft))
    }

    fn draft(&self, now: DateTime<Local>) -> TaskDraft {
        TaskDraft {
            title: self.input(Step::Title).trim().to_string(),
            project: self.input(Step::Project).trim().to_string(),
            tags: parse_tags(self.input(Step::Tags)),
            priority: Priority::parse(self.input(Step::Priority)).unwrap_or_default(),
            ticket: normalize_ticket(self.input(Step::Ticket)).unwrap_or_default(),
            url: self.base.url.clone(),
            note: self.input(Step::Notes).trim().to_string(),
            due: self.due(now).unwrap_or(self.base.due),
        }
    }
}

/// Input text for each field step of `draft`
fn field_texts(draft: &TaskDraft) -> [String; 7] {
    [
        draft.title.clone(),
        draft.project.clone(),
        draft.tags.join(", "),
        draft.priority.label().to_string(),
        draft.ticket.clone(),
        draft
            .due
            .map(|d| d.with_timezone(&Local).format("%d/%m/%Y").to_string())
            .unwrap_or_default(),
        draft.note.clone(),
    ]
}

/// Split comma-separated tags, dropping blanks, `#` prefixes and repeats
pub fn parse_tags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in text.split(',') {
        let tag = tag.trim().trim_start_matches('#').trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}
