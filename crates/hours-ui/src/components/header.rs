use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decoration placed either side of the application title.
pub const TITLE_MARK: &str = "▞▚▞";

/// Width of the `=` rule under the title.
pub const SEPARATOR_WIDTH: usize = 60;

/// Dashboard header rendering four lines:
///
/// 1. Application title with decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Data file and assumed year in `[ file | year ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Data file the chart was built from, as shown to the user.
    pub data_file: &'a str,
    /// Year assumed for every `M/D` date.
    pub year: i32,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(data_file: &'a str, year: i32, theme: &'a Theme) -> Self {
        Self {
            data_file,
            year,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(vec![
                Span::styled(TITLE_MARK, self.theme.header_accent),
                Span::styled(" SPRINT HOURS BY PERSON ", self.theme.header),
                Span::styled(TITLE_MARK, self.theme.header_accent),
            ]),
            Line::from(Span::styled(
                "=".repeat(SEPARATOR_WIDTH),
                self.theme.separator,
            )),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.data_file, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.year.to_string(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }

    /// Number of rows [`Header::to_lines`] occupies.
    pub const fn height() -> u16 {
        4
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
