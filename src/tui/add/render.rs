use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::tui::add::state::{AddState, Mode, Step};
use crate::tui::details::detail_lines;
use crate::tui::theme::Theme;
use crate::util::unicode::next_grapheme_boundary;

pub const HELP_TEXT: &str = "enter/tab/↓ next · shift+tab/↑ back · esc cancel · ctrl+c quit";

/// Below this width the preview panel is hidden
pub const SPLIT_WIDTH: u16 = 85;

const MODAL_WIDTH: u16 = 44;
const MODAL_HEIGHT: u16 = 7;

pub fn render(frame: &mut Frame, state: &AddState, theme: &Theme, now: DateTime<Utc>) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // panels
            Constraint::Length(1), // help
        ])
        .split(area);

    if area.width >= SPLIT_WIDTH {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(60),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(rows[0]);
        render_form(frame, state, theme, cols[0]);
        render_preview(frame, state, theme, cols[2], now);
    } else {
        render_form(frame, state, theme, rows[0]);
    }

    frame.render_widget(
        Paragraph::new(Span::styled(
            HELP_TEXT,
            Style::default()
                .fg(theme.help)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center),
        rows[1],
    );

    if let Mode::Confirming { save } = state.mode() {
        render_confirm(frame, save, theme, area);
    }
}

fn render_form(frame: &mut Frame, state: &AddState, theme: &Theme, area: Rect) {
    let heading = match state.editing() {
        Some(task) => format!(" Edit Task {} ", task.display_id()),
        None => " Create New Task ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            heading,
            Style::default()
                .fg(theme.accent_bright)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for step in Step::ALL {
        if step == Step::Save {
            lines.push(Line::default());
        }
        lines.push(step_line(state, step, theme));
    }
    lines.push(Line::default());

    let label: Vec<Span> = state
        .shimmer()
        .paint(&state.field_label())
        .into_iter()
        .map(|(g, tone)| Span::styled(g.to_string(), theme.shimmer_style(tone)))
        .collect();
    lines.push(Line::from(label));

    if state.step() == Step::Save {
        lines.push(Line::from(Span::styled(
            state.step().placeholder(),
            Style::default().fg(theme.text_secondary),
        )));
    } else {
        let mut spans = vec![Span::styled("› ", Style::default().fg(theme.accent_bright))];
        spans.extend(input_spans(state, theme));
        lines.push(Line::from(spans));
    }

    if let Some(error) = state.error() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("✗ {}", error),
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        inner,
    );
}

fn step_line(state: &AddState, step: Step, theme: &Theme) -> Line<'static> {
    let current = state.step();
    let filled = state.has_value(step);
    let (marker, style) = if step == current {
        (
            "▶ ",
            Style::default()
                .fg(theme.accent_bright)
                .add_modifier(Modifier::BOLD),
        )
    } else if filled && (step < current || state.editing().is_some()) {
        ("✓ ", Style::default().fg(theme.success))
    } else if step < current {
        ("  ", Style::default().fg(theme.text_disabled))
    } else {
        ("  ", Style::default().fg(theme.text_secondary))
    };
    Line::from(Span::styled(format!("{}{}", marker, step.label()), style))
}

/// The current input with the cursor cell highlighted, or the placeholder
fn input_spans(state: &AddState, theme: &Theme) -> Vec<Span<'static>> {
    let text = state.current_input();
    let cursor_style = Style::default().fg(theme.card).bg(theme.text);
    if text.is_empty() {
        return vec![
            Span::styled(" ", cursor_style),
            Span::styled(
                state.step().placeholder(),
                Style::default().fg(theme.text_disabled),
            ),
        ];
    }

    let style = Style::default().fg(theme.text);
    let cursor = state.cursor().min(text.len());
    let mut spans = Vec::new();
    if cursor > 0 {
        spans.push(Span::styled(text[..cursor].to_string(), style));
    }
    match next_grapheme_boundary(text, cursor) {
        Some(end) => {
            spans.push(Span::styled(text[cursor..end].to_string(), cursor_style));
            if end < text.len() {
                spans.push(Span::styled(text[end..].to_string(), style));
            }
        }
        None => spans.push(Span::styled(" ", cursor_style)),
    }
    spans
}

fn render_preview(frame: &mut Frame, state: &AddState, theme: &Theme, area: Rect, now: DateTime<Utc>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent))
        .title(Span::styled(
            " Preview ",
            Style::default()
                .fg(theme.accent_bright)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut task = state.preview(now.with_timezone(&Local));
    if task.title.is_empty() {
        task.title = "Untitled task".to_string();
    }
    let mut lines = detail_lines(&task, theme, usize::from(inner.width), now);
    if state.editing().is_none() {
        lines.retain(|line| {
            line.spans
                .first()
                .is_none_or(|span| span.content.trim_end() != "ID")
        });
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_confirm(frame: &mut Frame, save: bool, theme: &Theme, area: Rect) {
    let width = MODAL_WIDTH.min(area.width);
    let height = MODAL_HEIGHT.min(area.height);
    let modal = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent_bright))
        .style(Style::default().bg(theme.card));
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let chosen = Style::default()
        .fg(theme.card)
        .bg(theme.accent_bright)
        .add_modifier(Modifier::BOLD);
    let plain = Style::default().fg(theme.text_secondary);
    let (yes, no) = if save { (chosen, plain) } else { (plain, chosen) };
    let lines = vec![
        Line::from(Span::styled("Save changes?", Style::default().fg(theme.text))),
        Line::default(),
        Line::from(vec![
            Span::styled("  Yes  ", yes),
            Span::raw("   "),
            Span::styled("  No  ", no),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "←/→ or y/n to choose · esc to keep editing",
            Style::default().fg(theme.help),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}
