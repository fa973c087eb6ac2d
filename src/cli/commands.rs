use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wrok", about = concat!("wrok v", env!("CARGO_PKG_VERSION"), " - tasks and time, in your terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task. Inline syntax: #tag1,tag2 @project +priority ABC-123 due:3days
    Add(AddArgs),
    /// Change fields of a task (opens the form when no field is given)
    Edit(EditArgs),
    /// Browse tasks (interactive unless --no-ui or --json)
    #[command(name = "ls", alias = "list")]
    List(ListArgs),
    /// Ranked search over tasks
    Search(SearchArgs),
    /// Start tracking time on a task
    Start(StartArgs),
    /// Stop the running session
    Stop,
    /// Show the running session
    Status,
    /// Mark a task done
    Done(IdArg),
    /// Mark a done task back to todo
    Undone(IdArg),
    /// Archive a task
    #[command(alias = "a")]
    Archive(IdArg),
    /// Restore an archived task to todo
    #[command(alias = "ua")]
    Unarchive(IdArg),
    /// Hours tracked this week, per task and weekday
    Timesheet,
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: u64,
}

#[derive(Args, Default)]
pub struct AddArgs {
    /// Task title, with optional inline metadata. Omit it to open the form.
    #[arg(num_args = 1..)]
    pub title: Vec<String>,
    /// Fill in the task step by step
    #[arg(short, long)]
    pub interactive: bool,
    /// Project name
    #[arg(short, long)]
    pub project: Option<String>,
    /// Comma-separated tags
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,
    /// Priority: low, medium, high, or 1-3
    #[arg(long)]
    pub priority: Option<String>,
    /// Ticket ID like ABC-123
    #[arg(long)]
    pub ticket: Option<String>,
    /// Due date: dd/mm/yyyy, N hours, N days, N weeks
    #[arg(long)]
    pub due: Option<String>,
    /// Related URL
    #[arg(long)]
    pub url: Option<String>,
    /// Additional notes
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Args, Default)]
pub struct EditArgs {
    /// Task ID
    pub id: u64,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New project (empty string clears it)
    #[arg(short, long)]
    pub project: Option<String>,
    /// Replace tags (comma-separated; empty string clears them)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
    /// Priority: none, low, medium, high, or 0-3
    #[arg(long)]
    pub priority: Option<String>,
    /// Ticket ID (empty string clears it)
    #[arg(long)]
    pub ticket: Option<String>,
    /// Due date: dd/mm/yyyy, N hours, N days, N weeks
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
    /// Related URL (empty string clears it)
    #[arg(long)]
    pub url: Option<String>,
    /// Notes (empty string clears them)
    #[arg(long)]
    pub note: Option<String>,
}

impl AddArgs {
    /// Whether the task is filled in through the form
    pub fn wants_form(&self) -> bool {
        self.interactive || self.title.is_empty()
    }
}

impl EditArgs {
    /// Whether any field flag was given
    pub fn has_field_flags(&self) -> bool {
        self.title.is_some()
            || self.project.is_some()
            || self.tags.is_some()
            || self.priority.is_some()
            || self.ticket.is_some()
            || self.due.is_some()
            || self.clear_due
            || self.url.is_some()
            || self.note.is_some()
    }
}

// ---------------------------------------------------------------------------
// Read args
// ---------------------------------------------------------------------------

#[derive(Args, Default)]
pub struct FilterArgs {
    /// Filter by status: todo, done, archived
    #[arg(short, long)]
    pub status: Option<String>,
    /// Filter by project (substring)
    #[arg(short, long)]
    pub project: Option<String>,
    /// Filter by tags (comma-separated, all must match)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Print a plain table instead of the interactive view
    #[arg(long)]
    pub no_ui: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Filter by priority
    #[arg(long)]
    pub priority: Option<String>,
    /// Filter by ticket ID (substring)
    #[arg(short = 'j', long)]
    pub ticket: Option<String>,
    /// Candidate order before ranking, e.g. "id desc" or "due asc"
    #[arg(short, long)]
    pub order: Option<String>,
    /// Limit number of results
    #[arg(short, long)]
    pub limit: Option<usize>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Time args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct StartArgs {
    /// Task ID
    pub id: u64,
    /// Start without the timer view
    #[arg(long)]
    pub no_ui: bool,
}
