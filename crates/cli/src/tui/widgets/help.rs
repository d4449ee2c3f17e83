//! Key hint bar rendered at the bottom of each screen.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Dim one-liner of `key action` pairs.
pub struct HelpBar<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl<'a> HelpBar<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }
}

impl Widget for HelpBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (i, (key, action)) in self.entries.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" · ", Theme::help()));
            }
            spans.push(Span::styled(*key, Theme::accent()));
            spans.push(Span::styled(format!(" {action}"), Theme::help()));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
