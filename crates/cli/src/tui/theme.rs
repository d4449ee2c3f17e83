//! Color palette and shared styles for the board.

use ratatui::style::{Color, Modifier, Style};

use taskdeck_api::{ProjectStatus, TaskStatus};

/// Central style table so every screen draws from the same palette.
pub struct Theme;

impl Theme {
    pub const ACCENT: Color = Color::Blue;

    pub fn header() -> Style {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn border() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn error() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn accent() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn help() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    /// Badge style for a project status, mirroring the green/gray web badges.
    pub fn project_status(status: ProjectStatus) -> Style {
        match status {
            ProjectStatus::Active => Style::default().fg(Color::Green),
            ProjectStatus::Completed => Style::default().fg(Color::DarkGray),
        }
    }

    /// Badge style for a task status, mirroring the gray/yellow/green web badges.
    pub fn task_status(status: TaskStatus) -> Style {
        match status {
            TaskStatus::Todo => Style::default().fg(Color::Gray),
            TaskStatus::InProgress => Style::default().fg(Color::Yellow),
            TaskStatus::Done => Style::default().fg(Color::Green),
        }
    }

    pub fn overdue() -> Style {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    }
}
