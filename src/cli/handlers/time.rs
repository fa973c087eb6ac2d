use chrono::{Local, Utc};

use crate::cli::commands::StartArgs;
use crate::cli::output::{format_clock_time, format_session_header};
use crate::io::TaskStore;
use crate::model::{Config, Session, TaskFilter, format_duration};
use crate::ops::timesheet;
use crate::tui::{self, Outcome};

pub fn cmd_start<S: TaskStore>(
    store: &mut S,
    args: StartArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let task = store.get(args.id)?;
    let session = store.start_session(task.id)?;

    if args.no_ui {
        println!("{}", format_session_header("Started tracking time for", &session, Some(&task)));
        println!("Started at: {}", format_clock_time(session.started_at));
        return Ok(());
    }

    match tui::run_timer(task.clone(), session.clone(), config)? {
        Outcome::StoppedBySave => {
            let stopped = store.stop_active_session()?;
            print_stopped(&stopped, store);
        }
        Outcome::StoppedWithoutSave | Outcome::Running => {
            println!();
            println!(
                "Timer is still running in the background for task #{}: {}",
                task.id, task.title
            );
            println!("   Use 'wrok status' to check current timer or 'wrok stop' to stop it.");
        }
    }
    Ok(())
}

pub fn cmd_stop<S: TaskStore>(store: &mut S) -> Result<(), Box<dyn std::error::Error>> {
    let session = store.stop_active_session()?;
    print_stopped(&session, store);
    Ok(())
}

fn print_stopped<S: TaskStore>(session: &Session, store: &S) {
    let task = store.get(session.task_id).ok();
    println!("{}", format_session_header("Stopped tracking time for", session, task.as_ref()));
    println!("Session duration: {}", format_duration(session.duration_secs));
}

pub fn cmd_status<S: TaskStore>(store: &S) -> Result<(), Box<dyn std::error::Error>> {
    let Some(session) = store.active_session()? else {
        println!("No active time tracking session");
        return Ok(());
    };
    let task = store.get(session.task_id).ok();
    println!("{}", format_session_header("Currently tracking:", &session, task.as_ref()));
    println!("Started at: {}", format_clock_time(session.started_at));
    println!("Elapsed time: {}", format_duration(session.elapsed_secs(Utc::now())));
    Ok(())
}

pub fn cmd_timesheet<S: TaskStore>(store: &S) -> Result<(), Box<dyn std::error::Error>> {
    let (monday, start, end) = timesheet::week_bounds(&Local::now());
    let sessions = store.sessions_between(start, end)?;
    let tasks = store.fetch_all(&TaskFilter::default())?;
    let sheet = timesheet::build(monday, &sessions, &tasks, &Local);

    if sheet.is_empty() {
        println!("No time tracked this week.");
        return Ok(());
    }
    print!("{}", timesheet::render_table(&sheet));
    Ok(())
}
