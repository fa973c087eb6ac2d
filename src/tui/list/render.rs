use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::tui::details::render_details;
use crate::tui::list::rows::{self, Cell, CellTag};
use crate::tui::list::state::{ListState, Mode};
use crate::tui::theme::Theme;
use crate::util::unicode::display_width;

pub const HELP_TEXT: &str =
    "↑/↓ nav · ←/→ page · / search · d done/undone · a archive/unarchive · q/esc quit";

/// Draw the whole list screen
pub fn render(frame: &mut Frame, state: &ListState, theme: &Theme, now: DateTime<Utc>) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // top margin
            Constraint::Min(3),    // table | details
            Constraint::Length(1), // spacing
            Constraint::Length(1), // help / search bar
        ])
        .split(area);

    let table_width = rows::table_width(area.width);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(table_width),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(chunks[1]);

    render_table(frame, state, theme, now, columns[0]);
    if columns[2].width > 2 {
        render_details(frame, columns[2], state.selected_task(), theme, now);
    }
    render_bottom_bar(frame, state, theme, chunks[3]);
}

fn render_table(frame: &mut Frame, state: &ListState, theme: &Theme, now: DateTime<Utc>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            " Tasks ",
            Style::default()
                .fg(theme.accent_bright)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // column headers
            Constraint::Min(0),    // rows
            Constraint::Length(1), // pagination
        ])
        .split(inner);

    let width = usize::from(inner.width);
    let layout = state.layout();
    let header = rows::header_cells(layout, width);
    frame.render_widget(Paragraph::new(cells_line(&header, "  ", theme, None)), parts[0]);

    if state.tasks().is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No tasks found",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(empty, parts[1]);
    } else {
        let lines: Vec<Line> = state
            .visible_range()
            .map(|i| {
                let task = &state.tasks()[i];
                let cells = rows::row_cells(task, layout, width, now);
                if i == state.selected() {
                    cells_line(&cells, "▶ ", theme, Some(state))
                } else {
                    cells_line(&cells, "  ", theme, None)
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), parts[1]);
    }

    let pagination = format!(
        "Page {}/{} · {} tasks",
        state.page() + 1,
        state.page_count(),
        state.tasks().len()
    );
    frame.render_widget(
        Paragraph::new(Span::styled(pagination, Style::default().fg(theme.help)))
            .alignment(Alignment::Right),
        parts[2],
    );
}

/// One table line. The selected row passes its state so the title is
/// painted by the shimmer.
fn cells_line(
    cells: &[Cell],
    gutter: &'static str,
    theme: &Theme,
    selected: Option<&ListState>,
) -> Line<'static> {
    let mut spans = vec![Span::styled(gutter, Style::default().fg(theme.accent_bright))];
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        match (cell.tag, selected) {
            (CellTag::Title, Some(state)) => {
                for (grapheme, tone) in state.shimmer().paint(&cell.text) {
                    spans.push(Span::styled(grapheme.to_string(), theme.shimmer_style(tone)));
                }
            }
            _ => spans.push(Span::styled(cell.text.clone(), cell_style(cell.tag, theme))),
        }
        let pad = cell.width.saturating_sub(display_width(&cell.text));
        if pad > 0 {
            spans.push(Span::raw(" ".repeat(pad)));
        }
    }
    let line = Line::from(spans);
    if selected.is_some() {
        line.style(Style::default().bg(theme.card))
    } else {
        line
    }
}

fn cell_style(tag: CellTag, theme: &Theme) -> Style {
    match tag {
        CellTag::Header => Style::default()
            .fg(theme.accent_bright)
            .add_modifier(Modifier::BOLD),
        CellTag::Id => Style::default().fg(theme.text_secondary),
        CellTag::Title => Style::default().fg(theme.text),
        CellTag::Status(status) => Style::default().fg(theme.status_color(status)),
        CellTag::Priority(priority) => Style::default().fg(theme.priority_color(priority)),
        CellTag::Ticket => Style::default().fg(theme.text),
        CellTag::Due(urgency) => Style::default().fg(theme.due_color(urgency)),
        CellTag::Missing => Style::default().fg(theme.text_disabled),
    }
}

/// Text of the bottom bar for the current mode
pub fn bottom_bar_text(state: &ListState) -> String {
    if let Some(status) = state.status() {
        return status.to_string();
    }
    let count = state.tasks().len();
    match state.mode() {
        Mode::LiveSearching if state.query().is_empty() => {
            "Search: █ (start typing for live search)".to_string()
        }
        Mode::LiveSearching => format!("Search: {}█ ({} results)", state.query(), count),
        Mode::SearchApplied => format!(
            "Filtered: \"{}\" ({} results) - ESC to clear",
            state.query(),
            count
        ),
        Mode::Browsing | Mode::Exiting => HELP_TEXT.to_string(),
    }
}

fn render_bottom_bar(frame: &mut Frame, state: &ListState, theme: &Theme, area: Rect) {
    let style = if state.status().is_some() {
        Style::default().fg(theme.error)
    } else {
        match state.mode() {
            Mode::LiveSearching | Mode::SearchApplied => Style::default().fg(theme.accent_bright),
            Mode::Browsing | Mode::Exiting => Style::default().fg(theme.help),
        }
    };
    frame.render_widget(
        Paragraph::new(Span::styled(bottom_bar_text(state), style)),
        area,
    );
}
