mod time;
pub use time::{cmd_start, cmd_status, cmd_stop, cmd_timesheet};

use std::path::PathBuf;

use chrono::Utc;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::{FileStore, TaskStore};
use crate::model::{Config, Ordering, Priority, TaskDraft, TaskFilter, TaskStatus, Transition};
use crate::ops::search;
use crate::parse::{normalize_ticket, parse_due_date, parse_title};
use crate::tui;

/// Everything a command needs besides its arguments
pub struct Context {
    pub data_dir: PathBuf,
    pub config: Config,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = FileStore::open(&ctx.data_dir)?;
    tracing::debug!(path = %store.path().display(), "opened store");

    match cli.command {
        Commands::Add(args) => cmd_add(&mut store, args, &ctx.config),
        Commands::Edit(args) => cmd_edit(&mut store, args, &ctx.config),
        Commands::List(args) => cmd_list(store, args, &ctx.config),
        Commands::Search(args) => cmd_search(&store, args),
        Commands::Start(args) => cmd_start(&mut store, args, &ctx.config),
        Commands::Stop => cmd_stop(&mut store),
        Commands::Status => cmd_status(&store),
        Commands::Done(args) => cmd_transition(&mut store, args.id, Transition::Done),
        Commands::Undone(args) => cmd_transition(&mut store, args.id, Transition::Undone),
        Commands::Archive(args) => cmd_transition(&mut store, args.id, Transition::Archive),
        Commands::Unarchive(args) => cmd_transition(&mut store, args.id, Transition::Unarchive),
        Commands::Timesheet => cmd_timesheet(&store),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_status(s: &str) -> Result<TaskStatus, String> {
    s.parse()
}

fn build_filter(args: &FilterArgs) -> Result<TaskFilter, String> {
    Ok(TaskFilter {
        status: args.status.as_deref().map(parse_status).transpose()?,
        project: args.project.clone().filter(|p| !p.is_empty()),
        tags: args.tags.iter().filter(|t| !t.is_empty()).cloned().collect(),
        ordering: Ordering::newest_first(),
        ..Default::default()
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

/// Build the draft described by `add`'s title words and flags
fn add_draft(args: AddArgs) -> Result<TaskDraft, Box<dyn std::error::Error>> {
    let parsed = parse_title(&args.title.join(" "));
    if !parsed.errors.is_empty() {
        let message = format!("could not parse task: {}", parsed.errors.join(", "));
        if !args.wants_form() {
            return Err(message.into());
        }
        eprintln!("{}; opening the form to finish it", message);
    }
    let mut draft = parsed.into_draft();

    if let Some(project) = args.project {
        draft.project = project;
    }
    for tag in args.tags {
        if !draft.tags.contains(&tag) {
            draft.tags.push(tag);
        }
    }
    if let Some(priority) = args.priority {
        draft.priority = Priority::parse(&priority)?;
    }
    if let Some(ticket) = args.ticket {
        draft.ticket = normalize_ticket(&ticket)?;
    }
    if let Some(due) = args.due {
        draft.due = Some(parse_due_date(&due)?);
    }
    draft.url = args.url.unwrap_or_default();
    draft.note = args.note.unwrap_or_default();
    Ok(draft)
}

pub fn cmd_add<S: TaskStore>(
    store: &mut S,
    args: AddArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let interactive = args.wants_form();
    let mut draft = add_draft(args)?;
    if interactive {
        match tui::run_add(draft, config)? {
            Some(saved) => draft = saved,
            None => {
                tracing::debug!("add form cancelled");
                println!("Cancelled, no task created");
                return Ok(());
            }
        }
    }

    let task = store.create(draft)?;
    println!("Created task #{}: {}", task.id, task.title);
    for line in format_task_summary(&task, Utc::now()) {
        println!("{}", line);
    }
    Ok(())
}

/// Apply `edit`'s field flags on top of `draft`
fn apply_edit_flags(draft: &mut TaskDraft, args: EditArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(project) = args.project {
        draft.project = project;
    }
    if let Some(tags) = args.tags {
        draft.tags = tags;
    }
    if let Some(priority) = args.priority {
        draft.priority = Priority::parse(&priority)?;
    }
    if let Some(ticket) = args.ticket {
        draft.ticket = normalize_ticket(&ticket)?;
    }
    if let Some(due) = args.due {
        draft.due = Some(parse_due_date(&due)?);
    }
    if args.clear_due {
        draft.due = None;
    }
    if let Some(url) = args.url {
        draft.url = url;
    }
    if let Some(note) = args.note {
        draft.note = note;
    }
    Ok(())
}

pub fn cmd_edit<S: TaskStore>(
    store: &mut S,
    args: EditArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let task = store.get(args.id)?;
    let draft = if args.has_field_flags() {
        let mut draft = TaskDraft::from_task(&task);
        apply_edit_flags(&mut draft, args)?;
        draft
    } else {
        match tui::run_edit(task.clone(), config)? {
            Some(draft) => draft,
            None => {
                tracing::debug!(task = task.id, "edit form cancelled");
                println!("Cancelled, task #{} unchanged", task.id);
                return Ok(());
            }
        }
    };

    if draft == TaskDraft::from_task(&task) {
        println!("Nothing to change for task #{}", task.id);
        return Ok(());
    }
    let task = store.update(task.id, draft)?;
    println!("Updated task #{}: {}", task.id, task.title);
    for line in format_task_summary(&task, Utc::now()) {
        println!("{}", line);
    }
    Ok(())
}

pub fn cmd_list<S: TaskStore>(
    store: S,
    args: ListArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = build_filter(&args.filter)?;

    if args.json {
        let tasks = store.fetch_all(&filter)?;
        let json: Vec<TaskJson> = tasks.iter().map(task_to_json).collect();
        return print_json(&json);
    }

    if args.no_ui {
        let tasks = store.fetch_all(&filter)?;
        if tasks.is_empty() {
            println!("No tasks found.");
        } else {
            for line in format_task_table(&tasks) {
                println!("{}", line);
            }
        }
        return Ok(());
    }

    if store.fetch_all(&filter)?.is_empty() {
        println!("No tasks found. Use 'wrok add \"task description\"' to create your first task.");
        return Ok(());
    }
    tui::run_list(store, filter, config)
}

pub fn cmd_search<S: TaskStore>(store: &S, args: SearchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let query = args.query.join(" ");
    let mut filter = build_filter(&args.filter)?;
    filter.priority = args.priority.as_deref().map(Priority::parse).transpose()?;
    filter.ticket = args.ticket.filter(|t| !t.is_empty());
    if let Some(order) = args.order {
        filter.ordering = order.parse::<Ordering>()?;
    }

    let candidates = store.fetch_all(&filter)?;
    let mut tasks = search::search(&candidates, &query);
    if let Some(limit) = args.limit {
        tasks.truncate(limit);
    }

    if args.json {
        return print_json(&SearchJson {
            query,
            count: tasks.len(),
            tasks: tasks.iter().map(task_to_json).collect(),
        });
    }

    println!("Search results for '{}' ({} found):", query, tasks.len());
    if tasks.is_empty() {
        println!("No tasks found matching your search.");
        return Ok(());
    }
    println!();
    for line in format_task_table(&tasks) {
        println!("{}", line);
    }
    Ok(())
}

pub fn cmd_transition<S: TaskStore>(
    store: &mut S,
    id: u64,
    transition: Transition,
) -> Result<(), Box<dyn std::error::Error>> {
    let task = store.transition(id, transition)?;
    match transition {
        Transition::Done => {
            println!("Marked task #{} as done: {}", task.id, task.title);
            if let Some(at) = task.done_at {
                println!("Completed at: {}", format_clock_time(at));
            }
        }
        Transition::Undone => {
            println!("Marked task #{} back to todo: {}", task.id, task.title);
        }
        Transition::Archive => {
            println!("Archived task #{}: {}", task.id, task.title);
            if let Some(at) = task.archived_at {
                println!("Archived at: {}", format_clock_time(at));
            }
        }
        Transition::Unarchive => {
            println!("Unarchived task #{}: {}", task.id, task.title);
        }
    }
    Ok(())
}
