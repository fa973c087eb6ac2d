use ratatui::style::{Color, Modifier, Style};

use crate::model::{Priority, TaskStatus, UiConfig};
use crate::parse::DueUrgency;
use crate::tui::shimmer::Tone;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub text: Color,
    pub text_secondary: Color,
    pub text_disabled: Color,
    pub help: Color,
    pub accent: Color,
    pub accent_bright: Color,
    pub border: Color,
    pub card: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
    pub shimmer_base: Color,
    pub shimmer_highlight: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            text: Color::Rgb(0xE6, 0xEA, 0xF2),
            text_secondary: Color::Rgb(0xB1, 0xB8, 0xC7),
            text_disabled: Color::Rgb(0x6D, 0x73, 0x83),
            help: Color::Indexed(240),
            accent: Color::Rgb(0x7C, 0x3A, 0xED),
            accent_bright: Color::Rgb(0xA7, 0x8B, 0xFA),
            border: Color::Rgb(0x3A, 0x3F, 0x55),
            card: Color::Rgb(0x1B, 0x15, 0x30),
            error: Color::Rgb(0xEF, 0x44, 0x44),
            success: Color::Rgb(0x22, 0xC5, 0x5E),
            warning: Color::Rgb(0xF5, 0x9E, 0x0B),
            shimmer_base: Color::Rgb(177, 184, 199),
            shimmer_highlight: Color::Rgb(234, 230, 255),
        }
    }
}

/// Parse `#RRGGBB` into an RGB color
fn parse_hex_color(value: &str) -> Option<Color> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = u32::from_str_radix(digits, 16).ok()?;
    Some(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}

impl Theme {
    /// Create a theme from the `[ui]` config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid color override");
                continue;
            };
            match key.as_str() {
                "text" => theme.text = color,
                "text_secondary" => theme.text_secondary = color,
                "text_disabled" => theme.text_disabled = color,
                "help" => theme.help = color,
                "accent" => theme.accent = color,
                "accent_bright" => theme.accent_bright = color,
                "border" => theme.border = color,
                "card" => theme.card = color,
                "error" => theme.error = color,
                "success" => theme.success = color,
                "warning" => theme.warning = color,
                "shimmer_base" => theme.shimmer_base = color,
                "shimmer_highlight" => theme.shimmer_highlight = color,
                _ => tracing::warn!(key = %key, "unknown color key"),
            }
        }

        theme
    }

    pub fn status_color(&self, status: TaskStatus) -> Color {
        match status {
            TaskStatus::Todo => self.text_secondary,
            TaskStatus::Done => self.success,
            TaskStatus::Archived => self.text_disabled,
        }
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.error,
            Priority::Medium => self.warning,
            Priority::Low => self.text_secondary,
            Priority::None => self.text_disabled,
        }
    }

    pub fn due_color(&self, urgency: DueUrgency) -> Color {
        match urgency {
            DueUrgency::Overdue => self.error,
            DueUrgency::Today | DueUrgency::Tomorrow => self.warning,
            DueUrgency::Soon(_) => self.accent_bright,
            DueUrgency::Later => self.text,
        }
    }

    /// Style for one shimmer-painted grapheme
    pub fn shimmer_style(&self, tone: Tone) -> Style {
        let fg = match tone {
            Tone::Static => self.accent_bright,
            Tone::Blend(weight) => blend(self.shimmer_base, self.shimmer_highlight, weight),
            Tone::Window(true) => Color::Indexed(147),
            Tone::Window(false) => Color::Indexed(250),
        };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }
}

/// Linear blend `base * (1 - w) + highlight * w`. Non-RGB inputs pick the
/// nearer endpoint.
pub fn blend(base: Color, highlight: Color, weight: f64) -> Color {
    let w = weight.clamp(0.0, 1.0);
    match (base, highlight) {
        (Color::Rgb(br, bg, bb), Color::Rgb(hr, hg, hb)) => {
            let mix = |b: u8, h: u8| (f64::from(b) * (1.0 - w) + f64::from(h) * w) as u8;
            Color::Rgb(mix(br, hr), mix(bg, hg), mix(bb, hb))
        }
        _ if w >= 0.5 => highlight,
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#EF4444"),
            Some(Color::Rgb(0xEF, 0x44, 0x44))
        );
        assert_eq!(parse_hex_color("EF4444"), None);
        assert_eq!(parse_hex_color("#EF44"), None);
        assert_eq!(parse_hex_color("#ZZZZZZ"), None);
        assert_eq!(parse_hex_color("#+12345"), None);
    }

    #[test]
    fn test_non_ascii_color_is_rejected() {
        assert_eq!(parse_hex_color("#aé12x"), None);
        assert_eq!(parse_hex_color("#ééé"), None);

        let mut ui = UiConfig::default();
        ui.colors.insert("accent".into(), "#aé12x".into());
        assert_eq!(Theme::from_config(&ui).accent, Theme::default().accent);
    }

    #[test]
    fn test_from_config_overrides() {
        let mut ui = UiConfig::default();
        ui.colors.insert("accent".into(), "#000000".into());
        ui.colors.insert("error".into(), "not-a-color".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.accent, Color::Rgb(0, 0, 0));
        assert_eq!(theme.error, Theme::default().error);
        assert_eq!(theme.text, Color::Rgb(0xE6, 0xEA, 0xF2));
    }

    #[test]
    fn test_blend_endpoints_and_midpoint() {
        let base = Color::Rgb(177, 184, 199);
        let hi = Color::Rgb(234, 230, 255);
        assert_eq!(blend(base, hi, 0.0), base);
        assert_eq!(blend(base, hi, 1.0), hi);
        assert_eq!(blend(base, hi, 0.5), Color::Rgb(205, 207, 227));
        assert_eq!(blend(base, hi, 7.0), hi);
    }

    #[test]
    fn test_semantic_colors() {
        let theme = Theme::default();
        assert_eq!(theme.status_color(TaskStatus::Done), theme.success);
        assert_eq!(theme.priority_color(Priority::High), theme.error);
        assert_eq!(theme.due_color(DueUrgency::Overdue), theme.error);
        assert_eq!(theme.due_color(DueUrgency::Tomorrow), theme.warning);
    }
}
