use ratatui::style::{Color, Modifier, Style};

/// Palette for the churn form.
pub struct Theme;

impl Theme {
    pub const FG: Color = Color::Rgb(220, 224, 230);
    pub const FG_DIM: Color = Color::Rgb(140, 146, 156);
    pub const ACCENT: Color = Color::Rgb(90, 170, 255);

    pub const GREEN: Color = Color::Rgb(80, 200, 120);
    pub const AMBER: Color = Color::Rgb(255, 190, 70);
    pub const RED: Color = Color::Rgb(255, 90, 90);

    pub fn border() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn title() -> Style {
        Style::default().fg(Self::ACCENT).add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    /// Focused control
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    /// Customer stays
    pub fn ok() -> Style {
        Style::default().fg(Self::GREEN).add_modifier(Modifier::BOLD)
    }

    /// Customer leaves
    pub fn warn() -> Style {
        Style::default().fg(Self::AMBER).add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::RED).add_modifier(Modifier::BOLD)
    }

    pub fn info() -> Style {
        Style::default().fg(Self::FG_DIM).add_modifier(Modifier::ITALIC)
    }
}
