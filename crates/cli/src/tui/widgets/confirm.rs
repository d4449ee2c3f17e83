//! Modal confirmation dialog for irreversible actions.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::tui::theme::Theme;

/// Yes/no prompt rendered over the current screen. The caller owns the
/// decision handling; declining must leave all state untouched.
pub struct ConfirmDialog<'a> {
    message: &'a str,
}

impl<'a> ConfirmDialog<'a> {
    pub const fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog = super::centered(56, 7, area);
        Clear.render(dialog, buf);

        let block = Block::default()
            .title("Confirm")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::error());
        let inner = block.inner(dialog);
        block.render(dialog, buf);

        let lines = vec![
            Line::from(Span::styled(self.message.to_string(), Theme::text())),
            Line::from(""),
            Line::from(vec![
                Span::styled("[y]", Theme::error()),
                Span::styled(" Yes    ", Theme::text()),
                Span::styled("[n]", Theme::accent()),
                Span::styled(" No", Theme::text()),
            ]),
        ];

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
