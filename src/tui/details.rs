//! Task details panel shared by the list and timer views.

use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::model::{Priority, Task};
use crate::parse::{due_urgency, format_due_date};
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, wrap_words};

const LOGO: [&str; 6] = [
    "██╗    ██╗██████╗  ██████╗ ██╗  ██╗",
    "██║    ██║██╔══██╗██╔═══██╗██║ ██╔╝",
    "██║ █╗ ██║██████╔╝██║   ██║█████╔╝ ",
    "██║███╗██║██╔══██╗██║   ██║██╔═██╗ ",
    "╚███╔███╔╝██║  ██║╚██████╔╝██║  ██╗",
    " ╚══╝╚══╝ ╚═╝  ╚═╝ ╚═════╝ ╚═╝  ╚═╝",
];

/// Minimum inner height before the logo is drawn above the details
const LOGO_MIN_HEIGHT: u16 = 30;

/// Render the bordered details panel for `task`
pub fn render_details(
    frame: &mut Frame,
    area: Rect,
    task: Option<&Task>,
    theme: &Theme,
    now: DateTime<Utc>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            " Details ",
            Style::default()
                .fg(theme.accent_bright)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let show_logo = inner.height >= LOGO_MIN_HEIGHT
        && usize::from(inner.width) >= display_width(LOGO[0]) + 2;
    let mut lines: Vec<Line> = Vec::new();
    if show_logo {
        let logo_style = Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD);
        lines.push(Line::default());
        lines.extend(
            LOGO.iter()
                .map(|l| Line::from(Span::styled(*l, logo_style)).alignment(Alignment::Center)),
        );
        lines.push(Line::default());
    }

    match task {
        Some(task) => lines.extend(detail_lines(task, theme, usize::from(inner.width), now)),
        None => lines.push(
            Line::from(Span::styled(
                "Select a task to view details",
                Style::default()
                    .fg(theme.text_secondary)
                    .add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center),
        ),
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Field lines for one task, wrapped to `width`
pub fn detail_lines(
    task: &Task,
    theme: &Theme,
    width: usize,
    now: DateTime<Utc>,
) -> Vec<Line<'static>> {
    let label = Style::default().fg(theme.text_secondary);
    let value = Style::default().fg(theme.text);
    let missing = Style::default().fg(theme.text_disabled);
    let field = |name: &str, text: String, style: Style| {
        Line::from(vec![
            Span::styled(format!("{:<10}", name), label),
            Span::styled(text, style),
        ])
    };
    let or_none = |s: &str, style: Style| {
        if s.is_empty() {
            ("none".to_string(), missing)
        } else {
            (s.to_string(), style)
        }
    };

    let title_style = Style::default()
        .fg(theme.text)
        .add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line<'static>> = wrap_words(&task.title, width.max(1))
        .into_iter()
        .map(|l| Line::from(Span::styled(l, title_style)))
        .collect();
    lines.push(Line::from(Span::styled(
        "─".repeat(width.min(40)),
        Style::default().fg(theme.border),
    )));

    lines.push(field(
        "ID",
        task.display_id(),
        Style::default().fg(theme.accent_bright),
    ));
    lines.push(field(
        "Status",
        task.status.to_string(),
        Style::default().fg(theme.status_color(task.status)),
    ));
    let (project, style) = or_none(&task.project, value);
    lines.push(field("Project", project, style));
    let priority = match task.priority {
        Priority::None => ("none".to_string(), missing),
        p => (
            p.label().to_string(),
            Style::default().fg(theme.priority_color(p)),
        ),
    };
    lines.push(field("Priority", priority.0, priority.1));
    let tags = task
        .tags
        .iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ");
    let (tags, style) = or_none(&tags, Style::default().fg(theme.accent_bright));
    lines.push(field("Tags", tags, style));
    let (ticket, style) = or_none(&task.ticket, value);
    lines.push(field("Ticket", ticket, style));
    let due = match task.due {
        Some(due) => (
            format_due_date(due, now),
            Style::default().fg(theme.due_color(due_urgency(due, now))),
        ),
        None => ("none".to_string(), missing),
    };
    lines.push(field("Due", due.0, due.1));
    if !task.url.is_empty() {
        lines.push(field("URL", task.url.clone(), value));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Notes", label)));
    if task.note.trim().is_empty() {
        lines.push(Line::from(Span::styled(
            "No notes",
            missing.add_modifier(Modifier::ITALIC),
        )));
    } else {
        for paragraph in task.note.lines() {
            lines.extend(
                wrap_words(paragraph, width.max(1))
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l, value))),
            );
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!(
            "Created {} · Updated {}",
            task.created_at.with_timezone(&Local).format("%d/%m %H:%M"),
            task.updated_at.with_timezone(&Local).format("%d/%m %H:%M"),
        ),
        missing,
    )));
    lines
}
