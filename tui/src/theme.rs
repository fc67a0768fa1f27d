use ratatui::style::{Color, Modifier, Style};

/// Colors shared by every chart.
pub struct Theme;

impl Theme {
    pub const POINTS: Color = Color::Gray;
    pub const AXIS: Color = Color::DarkGray;

    /// Line colors, handed out in order and reused once exhausted.
    const LINES: [Color; 6] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Magenta,
        Color::Cyan,
        Color::Yellow,
    ];

    pub fn line_color(index: usize) -> Color {
        Self::LINES[index % Self::LINES.len()]
    }

    pub fn title() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn axis() -> Style {
        Style::default().fg(Self::AXIS)
    }

    pub fn hint() -> Style {
        Style::default().fg(Self::AXIS).add_modifier(Modifier::ITALIC)
    }
}
