//! Project summary card for the dashboard grid.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use taskdeck_api::Project;

use crate::tui::theme::Theme;
use crate::tui::widgets::format_date;

/// Card showing one project; the selected card gets the accent border.
pub struct ProjectCard<'a> {
    project: &'a Project,
    selected: bool,
    deleting: bool,
}

impl<'a> ProjectCard<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            selected: false,
            deleting: false,
        }
    }

    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    #[must_use]
    pub const fn deleting(mut self, deleting: bool) -> Self {
        self.deleting = deleting;
        self
    }
}

impl Widget for ProjectCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.selected {
                Theme::border_focused()
            } else {
                Theme::border()
            });
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(vec![
                Span::styled(self.project.title.clone(), Theme::header()),
                Span::raw("  "),
                Span::styled(
                    self.project.status.as_str(),
                    Theme::project_status(self.project.status),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(self.project.description.clone(), Theme::text())),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!("Created: {}", format_date(&self.project.created_at)),
                    Theme::text_dim(),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("Updated: {}", format_date(&self.project.updated_at)),
                    Theme::text_dim(),
                ),
            ]),
        ];
        if self.deleting {
            lines.push(Line::from(Span::styled("Deleting…", Theme::error())));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
