//! Project details: one project plus its task board.
//!
//! The project record and its tasks are fetched together on entry; either
//! failing shows the error state, never a partially populated page. Task
//! mutations adjust the in-memory list optimistically from server-returned
//! records; only the status filter round-trips to the server.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use tracing::{debug, error};

use taskdeck_api::{ApiError, NewTask, Project, Task, TaskPatch, TaskStatus};

use crate::tui::theme::Theme;
use crate::tui::widgets::{format_date, ConfirmDialog, FormOutcome, HelpBar, TaskCard, TaskForm};

const DELETE_PROMPT: &str =
    "Are you sure you want to delete this task? This action cannot be undone.";

/// What the details screen asks the app to do.
#[derive(Debug, PartialEq, Eq)]
pub enum ProjectAction {
    /// Re-fetch the task list scoped to this status
    Filter(Option<TaskStatus>),
    /// Create a task under this project
    CreateTask(NewTask),
    /// Patch one task
    UpdateTask { id: String, patch: TaskPatch },
    /// Delete one task; confirmation already given
    DeleteTask(String),
    /// Return to the dashboard
    Back,
}

/// Per-status tallies derived from the in-memory task list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl TaskCounts {
    pub fn tally(tasks: &[Task]) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            match task.status {
                TaskStatus::Todo => counts.todo += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Done => counts.done += 1,
            }
        }
        counts
    }

    pub const fn total(&self) -> usize {
        self.todo + self.in_progress + self.done
    }

    pub const fn for_status(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }
}

#[derive(Debug)]
enum Mode {
    Browse,
    Create(TaskForm),
    ConfirmDelete(String),
}

/// Detail controller state.
pub struct ProjectScreen {
    pub project_id: String,
    pub project: Option<Project>,
    pub tasks: Vec<Task>,
    pub status_filter: Option<TaskStatus>,
    pub loading: bool,
    pub error: Option<String>,
    selected: usize,
    mode: Mode,
    updating: Option<String>,
    deleting: Option<String>,
    /// Sequence id of the most recently issued filter fetch
    latest_seq: u64,
    next_seq: u64,
}

impl ProjectScreen {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            project: None,
            tasks: Vec::new(),
            status_filter: None,
            loading: true,
            error: None,
            selected: 0,
            mode: Mode::Browse,
            updating: None,
            deleting: None,
            latest_seq: 0,
            next_seq: 0,
        }
    }

    /// Whether key presses are being consumed by a text field or dialog.
    pub fn is_input_mode(&self) -> bool {
        !matches!(self.mode, Mode::Browse)
    }

    pub fn counts(&self) -> TaskCounts {
        TaskCounts::tally(&self.tasks)
    }

    fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ProjectAction> {
        match &mut self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Create(form) => match form.handle_key(key) {
                FormOutcome::Submit(data) => {
                    form.saving = true;
                    Some(ProjectAction::CreateTask(data))
                }
                FormOutcome::Cancel => {
                    self.mode = Mode::Browse;
                    None
                }
                FormOutcome::Continue => None,
            },
            Mode::ConfirmDelete(id) => {
                let id = id.clone();
                match key.code {
                    KeyCode::Char('y') => {
                        self.mode = Mode::Browse;
                        self.deleting = Some(id.clone());
                        Some(ProjectAction::DeleteTask(id))
                    }
                    KeyCode::Char('n') | KeyCode::Esc => {
                        // Declined: no request, no state change.
                        self.mode = Mode::Browse;
                        None
                    }
                    _ => None,
                }
            }
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<ProjectAction> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => Some(ProjectAction::Back),
            KeyCode::Char('c') => {
                self.mode = Mode::Create(TaskForm::default());
                None
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task() {
                    self.mode = Mode::ConfirmDelete(task.id.clone());
                }
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < self.tasks.len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Char('s') | KeyCode::Char(' ') => {
                self.selected_task().map(|task| ProjectAction::UpdateTask {
                    id: task.id.clone(),
                    patch: TaskPatch::status(task.status.next()),
                })
            }
            KeyCode::Char('1') => self.set_status_action(TaskStatus::Todo),
            KeyCode::Char('2') => self.set_status_action(TaskStatus::InProgress),
            KeyCode::Char('3') => self.set_status_action(TaskStatus::Done),
            KeyCode::Char('f') => {
                let next = match self.status_filter {
                    None => Some(TaskStatus::Todo),
                    Some(TaskStatus::Todo) => Some(TaskStatus::InProgress),
                    Some(TaskStatus::InProgress) => Some(TaskStatus::Done),
                    Some(TaskStatus::Done) => None,
                };
                Some(ProjectAction::Filter(next))
            }
            _ => None,
        }
    }

    /// Status buttons are no-ops when the task already has that status.
    fn set_status_action(&self, status: TaskStatus) -> Option<ProjectAction> {
        self.selected_task()
            .filter(|task| task.status != status)
            .map(|task| ProjectAction::UpdateTask {
                id: task.id.clone(),
                patch: TaskPatch::status(status),
            })
    }

    /// Apply the joined project + tasks fetch. Both must have succeeded;
    /// otherwise the error state shows and nothing partial is kept.
    pub fn apply_loaded(&mut self, result: Result<(Project, Vec<Task>), ApiError>) {
        self.loading = false;
        match result {
            Ok((project, tasks)) => {
                self.project = Some(project);
                self.tasks = tasks;
                self.error = None;
            }
            Err(err) => {
                error!(%err, project_id = %self.project_id, "failed to load project details");
                self.project = None;
                self.tasks.clear();
                self.error = Some("Failed to load project details. Please try again.".to_string());
            }
        }
    }

    /// Mark a filter fetch as issued; returns its sequence id.
    pub fn begin_filter(&mut self, status: Option<TaskStatus>) -> u64 {
        self.status_filter = status;
        self.next_seq += 1;
        self.latest_seq = self.next_seq;
        self.latest_seq
    }

    /// Apply a finished filter fetch; the server list replaces the in-memory
    /// one wholesale. Responses from superseded fetches are dropped.
    pub fn apply_tasks(&mut self, seq: u64, result: Result<Vec<Task>, ApiError>) {
        if seq != self.latest_seq {
            debug!(seq, latest = self.latest_seq, "dropping stale task list response");
            return;
        }
        match result {
            Ok(tasks) => {
                self.tasks = tasks;
                self.selected = self.selected.min(self.tasks.len().saturating_sub(1));
                self.error = None;
            }
            Err(err) => {
                error!(%err, "failed to filter tasks");
                self.error = Some("Failed to filter tasks. Please try again.".to_string());
            }
        }
    }

    /// Apply a finished create: the server's record is prepended, no re-fetch.
    pub fn apply_task_created(&mut self, result: Result<Task, ApiError>) {
        match result {
            Ok(task) => {
                debug!(id = %task.id, "task created");
                self.tasks.insert(0, task);
                self.mode = Mode::Browse;
                self.error = None;
            }
            Err(err) => {
                error!(%err, "failed to create task");
                if let Mode::Create(form) = &mut self.mode {
                    form.saving = false;
                }
                self.error = Some("Failed to create task. Please try again.".to_string());
            }
        }
    }

    pub fn begin_update(&mut self, id: &str) {
        self.updating = Some(id.to_string());
    }

    /// Apply a finished update: the matching task is replaced in place by
    /// id, preserving order.
    pub fn apply_task_updated(&mut self, id: &str, result: Result<Task, ApiError>) {
        if self.updating.as_deref() == Some(id) {
            self.updating = None;
        }
        match result {
            Ok(task) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                    *slot = task;
                }
                self.error = None;
            }
            Err(err) => {
                error!(%err, id, "failed to update task");
                self.error = Some("Failed to update task. Please try again.".to_string());
            }
        }
    }

    /// Apply a finished delete: the matching task is removed, no re-fetch.
    pub fn apply_task_deleted(&mut self, id: &str, result: Result<(), ApiError>) {
        if self.deleting.as_deref() == Some(id) {
            self.deleting = None;
        }
        match result {
            Ok(()) => {
                self.tasks.retain(|t| t.id != id);
                self.selected = self.selected.min(self.tasks.len().saturating_sub(1));
                self.error = None;
            }
            Err(err) => {
                error!(%err, id, "failed to delete task");
                self.error = Some("Failed to delete task. Please try again.".to_string());
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        if self.loading {
            frame.render_widget(
                Paragraph::new("Loading project…")
                    .style(Theme::text_dim())
                    .alignment(Alignment::Center),
                area,
            );
            return;
        }

        let Some(project) = &self.project else {
            // The join failed; only the error state is shown.
            let message = self
                .error
                .clone()
                .unwrap_or_else(|| "Project not found".to_string());
            let lines = vec![
                Line::from(Span::styled(message, Theme::error())),
                Line::from(""),
                Line::from(Span::styled("esc back to dashboard", Theme::help())),
            ];
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                area,
            );
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Header
                Constraint::Length(3), // Status tiles
                Constraint::Length(1), // Filter chips
                Constraint::Length(if self.error.is_some() { 1 } else { 0 }),
                Constraint::Min(6),    // Task grid
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        self.draw_header(frame, chunks[0], project);
        self.draw_tiles(frame, chunks[1]);
        self.draw_filter_chips(frame, chunks[2]);
        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(error.clone(), Theme::error())),
                chunks[3],
            );
        }
        self.draw_tasks(frame, chunks[4]);
        frame.render_widget(
            HelpBar::new(&[
                ("j/k", "select"),
                ("s", "advance status"),
                ("1/2/3", "set status"),
                ("f", "filter"),
                ("c", "add task"),
                ("d", "delete"),
                ("esc", "back"),
                ("q", "quit"),
            ]),
            chunks[5],
        );

        match &self.mode {
            Mode::Create(form) => form.render(frame),
            Mode::ConfirmDelete(_) => {
                frame.render_widget(ConfirmDialog::new(DELETE_PROMPT), frame.area());
            }
            _ => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect, project: &Project) {
        let lines = vec![
            Line::from(vec![
                Span::styled(project.title.clone(), Theme::header()),
                Span::raw("  "),
                Span::styled(project.status.as_str(), Theme::project_status(project.status)),
            ]),
            Line::from(Span::styled(project.description.clone(), Theme::text())),
            Line::from(Span::styled(
                format!("Created: {}", format_date(&project.created_at)),
                Theme::text_dim(),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
    }

    fn draw_tiles(&self, frame: &mut Frame, area: Rect) {
        let counts = self.counts();
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(33),
                Constraint::Percentage(34),
            ])
            .split(area);

        for (i, status) in TaskStatus::all().iter().enumerate() {
            let tile = Paragraph::new(Line::from(vec![
                Span::styled(
                    counts.for_status(*status).to_string(),
                    Theme::task_status(*status).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {}", status.label()), Theme::text()),
            ]))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Theme::border()),
            );
            frame.render_widget(tile, cols[i]);
        }
    }

    fn draw_filter_chips(&self, frame: &mut Frame, area: Rect) {
        let counts = self.counts();
        let mut spans = vec![chip(
            &format!("All Tasks ({})", counts.total()),
            self.status_filter.is_none(),
        )];
        for status in TaskStatus::all() {
            spans.push(Span::raw("  "));
            spans.push(chip(
                &format!("{} ({})", status.label(), counts.for_status(status)),
                self.status_filter == Some(status),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_tasks(&self, frame: &mut Frame, area: Rect) {
        if self.tasks.is_empty() {
            let message = if self.status_filter.is_some() {
                "No tasks found\n\nNo tasks match the current filter."
            } else {
                "No tasks found\n\nGet started by creating your first task (c)."
            };
            frame.render_widget(
                Paragraph::new(message)
                    .style(Theme::text_dim())
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                area,
            );
            return;
        }

        let row_count = self.tasks.len().div_ceil(3).max(1) as u16;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, u32::from(row_count)); row_count as usize])
            .split(area);

        for (i, task) in self.tasks.iter().enumerate() {
            let row = rows[i / 3];
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(33),
                    Constraint::Percentage(33),
                    Constraint::Percentage(34),
                ])
                .split(row);
            let card = TaskCard::new(task)
                .selected(i == self.selected)
                .updating(self.updating.as_deref() == Some(task.id.as_str()))
                .deleting(self.deleting.as_deref() == Some(task.id.as_str()));
            frame.render_widget(card, cols[i % 3]);
        }
    }
}

/// Filter chip; the active one is highlighted.
fn chip(label: &str, active: bool) -> Span<'static> {
    if active {
        Span::styled(format!("[{label}]"), Theme::selected())
    } else {
        Span::styled(format!(" {label} "), Theme::text_dim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crossterm::event::KeyCode;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn project() -> Project {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Project {
            id: "p1".to_string(),
            title: "Test Project".to_string(),
            description: "This is a test project description".to_string(),
            status: taskdeck_api::ProjectStatus::Active,
            owner: "user1".to_string(),
            created_at: ts,
            updated_at: ts,
        }
    }

    fn task(id: &str, status: TaskStatus) -> Task {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            description: "A task description long enough".to_string(),
            status,
            due_date: None,
            project: "p1".to_string(),
            created_at: ts,
            updated_at: ts,
        }
    }

    fn loaded_screen(tasks: Vec<Task>) -> ProjectScreen {
        let mut screen = ProjectScreen::new("p1");
        screen.apply_loaded(Ok((project(), tasks)));
        screen
    }

    #[test]
    fn test_counts_derive_from_in_memory_tasks() {
        let screen = loaded_screen(vec![
            task("t1", TaskStatus::Todo),
            task("t2", TaskStatus::Todo),
            task("t3", TaskStatus::InProgress),
            task("t4", TaskStatus::Done),
            task("t5", TaskStatus::Done),
            task("t6", TaskStatus::Done),
        ]);

        let counts = screen.counts();
        assert_eq!(counts.todo, 2);
        assert_eq!(counts.in_progress, 1);
        assert_eq!(counts.done, 3);
        assert_eq!(counts.total(), 6);
        assert_eq!(screen.tasks.len(), 6);
    }

    #[test]
    fn test_failed_join_shows_error_and_nothing_partial() {
        let mut screen = ProjectScreen::new("p1");
        screen.apply_loaded(Err(ApiError::Api {
            status: 500,
            message: "boom".to_string(),
        }));

        assert!(screen.project.is_none());
        assert!(screen.tasks.is_empty());
        assert_eq!(
            screen.error.as_deref(),
            Some("Failed to load project details. Please try again.")
        );
    }

    #[test]
    fn test_created_task_is_prepended() {
        let mut screen = loaded_screen(vec![task("t1", TaskStatus::Todo)]);
        screen.handle_key(key(KeyCode::Char('c')));

        screen.apply_task_created(Ok(task("t2", TaskStatus::Todo)));
        let ids: Vec<_> = screen.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "t1"]);
        assert!(!screen.is_input_mode());
    }

    #[test]
    fn test_updated_task_is_replaced_in_place() {
        let mut screen = loaded_screen(vec![
            task("t1", TaskStatus::Todo),
            task("t2", TaskStatus::Todo),
            task("t3", TaskStatus::Todo),
        ]);

        screen.apply_task_updated("t2", Ok(task("t2", TaskStatus::Done)));
        let ids: Vec<_> = screen.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);
        assert_eq!(screen.tasks[1].status, TaskStatus::Done);
    }

    #[test]
    fn test_advance_status_patches_selected_task() {
        let mut screen = loaded_screen(vec![task("t1", TaskStatus::Todo)]);

        let action = screen.handle_key(key(KeyCode::Char('s')));
        assert_eq!(
            action,
            Some(ProjectAction::UpdateTask {
                id: "t1".to_string(),
                patch: TaskPatch::status(TaskStatus::InProgress),
            })
        );
    }

    #[test]
    fn test_setting_same_status_is_a_noop() {
        let mut screen = loaded_screen(vec![task("t1", TaskStatus::Todo)]);
        assert_eq!(screen.handle_key(key(KeyCode::Char('1'))), None);
        assert_eq!(
            screen.handle_key(key(KeyCode::Char('3'))),
            Some(ProjectAction::UpdateTask {
                id: "t1".to_string(),
                patch: TaskPatch::status(TaskStatus::Done),
            })
        );
    }

    #[test]
    fn test_delete_needs_confirmation_and_decline_changes_nothing() {
        let mut screen = loaded_screen(vec![task("t1", TaskStatus::Todo)]);

        assert_eq!(screen.handle_key(key(KeyCode::Char('d'))), None);
        assert_eq!(screen.handle_key(key(KeyCode::Char('n'))), None);
        assert_eq!(screen.tasks.len(), 1);

        screen.handle_key(key(KeyCode::Char('d')));
        assert_eq!(
            screen.handle_key(key(KeyCode::Char('y'))),
            Some(ProjectAction::DeleteTask("t1".to_string()))
        );

        screen.apply_task_deleted("t1", Ok(()));
        assert!(screen.tasks.is_empty());
    }

    #[test]
    fn test_filter_cycles_and_refetches() {
        let mut screen = loaded_screen(vec![task("t1", TaskStatus::Todo)]);

        assert_eq!(
            screen.handle_key(key(KeyCode::Char('f'))),
            Some(ProjectAction::Filter(Some(TaskStatus::Todo)))
        );

        let seq = screen.begin_filter(Some(TaskStatus::Todo));
        screen.apply_tasks(seq, Ok(vec![task("t9", TaskStatus::Todo)]));
        assert_eq!(screen.tasks[0].id, "t9");
    }

    #[test]
    fn test_stale_filter_response_is_discarded() {
        let mut screen = loaded_screen(vec![task("t1", TaskStatus::Todo)]);

        let seq1 = screen.begin_filter(Some(TaskStatus::Todo));
        let seq2 = screen.begin_filter(Some(TaskStatus::Done));

        screen.apply_tasks(seq1, Ok(vec![task("old", TaskStatus::Todo)]));
        assert_eq!(screen.tasks[0].id, "t1");

        screen.apply_tasks(seq2, Ok(vec![task("new", TaskStatus::Done)]));
        assert_eq!(screen.tasks[0].id, "new");
    }

    #[test]
    fn test_filter_failure_keeps_tasks_and_sets_error() {
        let mut screen = loaded_screen(vec![task("t1", TaskStatus::Todo)]);

        let seq = screen.begin_filter(Some(TaskStatus::Done));
        screen.apply_tasks(
            seq,
            Err(ApiError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        );

        assert_eq!(screen.tasks.len(), 1);
        assert_eq!(
            screen.error.as_deref(),
            Some("Failed to filter tasks. Please try again.")
        );
    }

    #[test]
    fn test_update_failure_surfaces_message() {
        let mut screen = loaded_screen(vec![task("t1", TaskStatus::Todo)]);
        screen.begin_update("t1");
        screen.apply_task_updated(
            "t1",
            Err(ApiError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        );

        assert_eq!(screen.tasks[0].status, TaskStatus::Todo);
        assert_eq!(
            screen.error.as_deref(),
            Some("Failed to update task. Please try again.")
        );
    }

    #[test]
    fn test_back_action_from_browse() {
        let mut screen = loaded_screen(Vec::new());
        assert_eq!(
            screen.handle_key(key(KeyCode::Esc)),
            Some(ProjectAction::Back)
        );
    }
}
