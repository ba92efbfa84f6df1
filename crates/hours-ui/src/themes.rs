use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are considered dark; 7–15 are considered light. An absent or
/// unparseable variable yields `BackgroundType::Unknown`.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .map(|val| background_from_colorfgbg(&val))
        .unwrap_or(BackgroundType::Unknown)
}

fn background_from_colorfgbg(val: &str) -> BackgroundType {
    match val.split(';').next_back().and_then(|bg| bg.parse::<u8>().ok()) {
        Some(bg) if bg <= 6 => BackgroundType::Dark,
        Some(_) => BackgroundType::Light,
        None => BackgroundType::Unknown,
    }
}

/// Complete theme definition carrying all UI styles used by hours-ui
/// components.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,
    pub warning: Style,

    // ── Chart ────────────────────────────────────────────────────────────────
    pub axis: Style,
    pub sprint_label: Style,
    pub cursor: Style,
    /// Line colours handed out to persons in order, wrapping around.
    pub series_palette: Vec<Color>,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),

            axis: Style::default().fg(Color::Gray),
            sprint_label: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            cursor: Style::default().fg(Color::Black).bg(Color::Cyan),
            series_palette: vec![
                Color::Cyan,
                Color::LightRed,
                Color::Green,
                Color::Magenta,
                Color::Yellow,
                Color::LightBlue,
                Color::LightGreen,
                Color::LightMagenta,
            ],

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Dark text with saturated line colours so the series stay legible on a
    /// white canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Red),

            axis: Style::default().fg(Color::DarkGray),
            sprint_label: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            cursor: Style::default().fg(Color::White).bg(Color::Blue),
            series_palette: vec![
                Color::Blue,
                Color::Red,
                Color::Green,
                Color::Magenta,
                Color::Cyan,
                Color::DarkGray,
                Color::LightRed,
                Color::LightBlue,
            ],

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Classic theme: basic ANSI colours, no bold modifiers.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::White),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::White),
            value: Style::default().fg(Color::White),
            warning: Style::default().fg(Color::Yellow),

            axis: Style::default().fg(Color::White),
            sprint_label: Style::default().fg(Color::Yellow),
            cursor: Style::default().fg(Color::Black).bg(Color::White),
            series_palette: vec![
                Color::Cyan,
                Color::Red,
                Color::Green,
                Color::Magenta,
                Color::Yellow,
                Color::Blue,
            ],

            table_header: Style::default().fg(Color::Cyan),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name. Falls back to `auto_detect` for unknown
    /// names (including `"auto"`).
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Line colour for the person at `index` in legend order.
    pub fn series_color(&self, index: usize) -> Color {
        if self.series_palette.is_empty() {
            return Color::Reset;
        }
        self.series_palette[index % self.series_palette.len()]
    }

    /// Full style for the person at `index` in legend order.
    pub fn series_style(&self, index: usize) -> Style {
        Style::default().fg(self.series_color(index))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
