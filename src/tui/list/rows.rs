//! Task table layout. Cells carry their text and a semantic tag; colors are
//! applied once at render time from the tag.

use chrono::{DateTime, Utc};

use crate::model::{Priority, Task, TaskStatus};
use crate::parse::{DueUrgency, due_short_label, due_urgency};
use crate::util::unicode::truncate_to_width;

pub const ID_WIDTH: usize = 4;
pub const STATUS_WIDTH: usize = 8;
pub const PRIORITY_WIDTH: usize = 8;
pub const TICKET_WIDTH: usize = 9;
pub const DUE_WIDTH: usize = 9;

/// Selection marker column in front of each row
pub const GUTTER_WIDTH: usize = 2;

const FULL_MIN_TITLE: usize = 15;
const COMPACT_MIN_TITLE: usize = 20;

/// Share of the terminal width given to the table
const TABLE_PERCENT: u16 = 60;

/// Screen rows outside the table body: top margin, table borders, column
/// header, pagination line, spacer and bottom bar
pub const LAYOUT_OVERHEAD: u16 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLayout {
    /// id, title, status, priority, ticket, due
    Full,
    /// id, title, status
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellTag {
    Header,
    Id,
    Title,
    Status(TaskStatus),
    Priority(Priority),
    Ticket,
    Due(DueUrgency),
    /// Placeholder for an unset field
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Already truncated to `width`, not padded
    pub text: String,
    pub tag: CellTag,
    pub width: usize,
}

impl Cell {
    fn new(text: &str, tag: CellTag, width: usize) -> Self {
        Cell {
            text: truncate_to_width(text, width),
            tag,
            width,
        }
    }
}

/// Width of the table panel for a terminal `width` cells wide
pub fn table_width(width: u16) -> u16 {
    (u32::from(width) * u32::from(TABLE_PERCENT) / 100) as u16
}

/// Width inside the table border
pub fn table_inner_width(width: u16) -> usize {
    usize::from(table_width(width).saturating_sub(2))
}

/// Width of the flexible title column for a table `inner` cells wide
pub fn title_width(layout: ColumnLayout, inner: usize) -> usize {
    let fixed = GUTTER_WIDTH + ID_WIDTH + 1;
    match layout {
        ColumnLayout::Full => {
            let right = STATUS_WIDTH + PRIORITY_WIDTH + TICKET_WIDTH + DUE_WIDTH + 4;
            inner.saturating_sub(fixed + right).max(FULL_MIN_TITLE)
        }
        ColumnLayout::Compact => inner
            .saturating_sub(fixed + STATUS_WIDTH + 1)
            .max(COMPACT_MIN_TITLE),
    }
}

pub fn status_text(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "○ todo",
        TaskStatus::Done => "✓ done",
        TaskStatus::Archived => "archive",
    }
}

pub fn header_cells(layout: ColumnLayout, inner: usize) -> Vec<Cell> {
    let mut cells = vec![
        Cell::new("ID", CellTag::Header, ID_WIDTH),
        Cell::new("TITLE", CellTag::Header, title_width(layout, inner)),
        Cell::new("STATUS", CellTag::Header, STATUS_WIDTH),
    ];
    if layout == ColumnLayout::Full {
        cells.push(Cell::new("PRIORITY", CellTag::Header, PRIORITY_WIDTH));
        cells.push(Cell::new("TICKET", CellTag::Header, TICKET_WIDTH));
        cells.push(Cell::new("DUE", CellTag::Header, DUE_WIDTH));
    }
    cells
}

pub fn row_cells(task: &Task, layout: ColumnLayout, inner: usize, now: DateTime<Utc>) -> Vec<Cell> {
    let mut cells = vec![
        Cell::new(&task.id.to_string(), CellTag::Id, ID_WIDTH),
        Cell::new(&task.title, CellTag::Title, title_width(layout, inner)),
        Cell::new(
            status_text(task.status),
            CellTag::Status(task.status),
            STATUS_WIDTH,
        ),
    ];
    if layout == ColumnLayout::Compact {
        return cells;
    }

    cells.push(Cell::new(
        task.priority.short_label(),
        CellTag::Priority(task.priority),
        PRIORITY_WIDTH,
    ));
    cells.push(if task.ticket.is_empty() {
        Cell::new("-", CellTag::Missing, TICKET_WIDTH)
    } else {
        Cell::new(&task.ticket, CellTag::Ticket, TICKET_WIDTH)
    });
    cells.push(match task.due {
        Some(due) => Cell::new(
            &due_short_label(due, now),
            CellTag::Due(due_urgency(due, now)),
            DUE_WIDTH,
        ),
        None => Cell::new("-", CellTag::Missing, DUE_WIDTH),
    });
    cells
}
