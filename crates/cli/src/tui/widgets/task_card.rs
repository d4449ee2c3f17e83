//! Task card for the project details grid.

use chrono::{DateTime, Utc};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use taskdeck_api::{Task, TaskStatus};

use crate::tui::theme::Theme;
use crate::tui::widgets::format_date;

/// A task is overdue when its due date has passed and it is not done.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    task.due_date
        .is_some_and(|due| due < now && task.status != TaskStatus::Done)
}

/// Card showing one task; the selected card gets the accent border and an
/// overdue task gets the red due-date marker.
pub struct TaskCard<'a> {
    task: &'a Task,
    selected: bool,
    updating: bool,
    deleting: bool,
}

impl<'a> TaskCard<'a> {
    pub fn new(task: &'a Task) -> Self {
        Self {
            task,
            selected: false,
            updating: false,
            deleting: false,
        }
    }

    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    #[must_use]
    pub const fn updating(mut self, updating: bool) -> Self {
        self.updating = updating;
        self
    }

    #[must_use]
    pub const fn deleting(mut self, deleting: bool) -> Self {
        self.deleting = deleting;
        self
    }
}

impl Widget for TaskCard<'_> {
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
                Span::styled(self.task.title.clone(), Theme::header()),
                Span::raw("  "),
                Span::styled(
                    self.task.status.label(),
                    Theme::task_status(self.task.status),
                ),
            ]),
            Line::from(Span::styled(self.task.description.clone(), Theme::text())),
        ];

        if let Some(due) = &self.task.due_date {
            let overdue = is_overdue(self.task, Utc::now());
            let text = if overdue {
                format!("Due: {} (Overdue)", format_date(due))
            } else {
                format!("Due: {}", format_date(due))
            };
            lines.push(Line::from(Span::styled(
                text,
                if overdue { Theme::overdue() } else { Theme::text_dim() },
            )));
        }

        lines.push(Line::from(vec![
            Span::styled(
                format!("Created: {}", format_date(&self.task.created_at)),
                Theme::text_dim(),
            ),
            Span::raw("  "),
            Span::styled(
                format!("Updated: {}", format_date(&self.task.updated_at)),
                Theme::text_dim(),
            ),
        ]));

        if self.updating {
            lines.push(Line::from(Span::styled("Updating…", Theme::text_dim())));
        }
        if self.deleting {
            lines.push(Line::from(Span::styled("Deleting…", Theme::error())));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(status: TaskStatus, due_date: Option<DateTime<Utc>>) -> Task {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Task {
            id: "t1".to_string(),
            title: "Write docs".to_string(),
            description: "Document the new endpoints".to_string(),
            status,
            due_date,
            project: "p1".to_string(),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_past_due_open_task_is_overdue() {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let due = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();

        assert!(is_overdue(&task(TaskStatus::Todo, Some(due)), now));
        assert!(is_overdue(&task(TaskStatus::InProgress, Some(due)), now));
    }

    #[test]
    fn test_done_task_is_never_overdue() {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let due = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();

        assert!(!is_overdue(&task(TaskStatus::Done, Some(due)), now));
    }

    #[test]
    fn test_future_due_or_no_due_is_not_overdue() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let due = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();

        assert!(!is_overdue(&task(TaskStatus::Todo, Some(due)), now));
        assert!(!is_overdue(&task(TaskStatus::Todo, None), now));
    }
}
