use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::tui::details::render_details;
use crate::tui::theme::Theme;
use crate::tui::timer::clock_face::{big_clock, clock_text};
use crate::tui::timer::state::TimerState;
use crate::util::unicode::display_width;

pub const HELP_TEXT: &str = "s stop & save · esc/q exit (keep running) · ctrl+c force quit";

pub fn render(frame: &mut Frame, state: &TimerState, theme: &Theme, now: DateTime<Utc>) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // panels
            Constraint::Length(1), // help
        ])
        .split(area);

    if state.is_split() {
        let left = state.clock_panel_width();
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(left),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(rows[0]);
        render_clock_panel(frame, state, theme, cols[0]);
        render_details(frame, cols[2], Some(state.task()), theme, now);
    } else {
        render_clock_panel(frame, state, theme, rows[0]);
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
}

fn render_clock_panel(frame: &mut Frame, state: &TimerState, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let accent = Style::default()
        .fg(theme.accent_bright)
        .add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            format!("{f}  TRACKING TIME  {f}", f = state.frame()),
            accent,
        )),
        Line::default(),
        Line::from(Span::styled(
            state.task().display_id(),
            Style::default().fg(theme.text_secondary),
        )),
    ];

    let title: Vec<Span> = state
        .shimmer()
        .paint(&state.title_label())
        .into_iter()
        .map(|(g, tone)| Span::styled(g.to_string(), theme.shimmer_style(tone)))
        .collect();
    lines.push(Line::from(title));
    lines.push(Line::default());

    let glyphs = big_clock(state.elapsed_secs());
    if display_width(&glyphs[0]) <= usize::from(inner.width) {
        lines.extend(
            glyphs
                .into_iter()
                .map(|row| Line::from(Span::styled(row, accent))),
        );
    } else {
        lines.push(Line::from(Span::styled(
            clock_text(state.elapsed_secs()),
            accent,
        )));
    }
    lines.push(Line::default());

    let started = state
        .session()
        .started_at
        .with_timezone(&Local)
        .format("%H:%M:%S");
    lines.push(Line::from(Span::styled(
        format!("Started at {}", started),
        Style::default().fg(theme.text_secondary),
    )));

    let top = inner.height.saturating_sub(lines.len() as u16) / 2;
    let body = Rect {
        y: inner.y + top,
        height: inner.height - top,
        ..inner
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
}
