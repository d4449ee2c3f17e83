//! Form fields and validation for the create dialogs.
//!
//! Validation rules match the web client's schemas: title required with at
//! least 3 characters, description required with at least 10. Values are
//! submitted exactly as entered, untrimmed.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use taskdeck_api::{NewProject, NewTask, ProjectStatus, TaskStatus};

use crate::tui::theme::Theme;
use crate::tui::widgets::centered;

/// What a key press did to an open form.
#[derive(Debug, PartialEq, Eq)]
pub enum FormOutcome<T> {
    /// Valid submission; the form produced its payload
    Submit(T),
    /// The user dismissed the form
    Cancel,
    /// Still editing
    Continue,
}

// =============================================================================
// Text input
// =============================================================================

/// Single-line text input with cursor editing. The cursor is a char index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Apply a key press; returns true when the value changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => {
                let idx = self.byte_index();
                self.value.insert(idx, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let idx = self.byte_index();
                    self.value.remove(idx);
                    true
                } else {
                    false
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.value.chars().count() {
                    let idx = self.byte_index();
                    self.value.remove(idx);
                    true
                } else {
                    false
                }
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.value.chars().count());
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.value.chars().count();
                false
            }
            _ => false,
        }
    }
}

/// Bordered one-line field with label, optional cursor, and inline error.
pub struct FieldView<'a> {
    label: &'a str,
    value: &'a str,
    cursor: Option<usize>,
    error: Option<&'a str>,
}

impl<'a> FieldView<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            cursor: None,
            error: None,
        }
    }

    /// Mark the field focused, showing the cursor at the given char index.
    #[must_use]
    pub fn focused(mut self, cursor: usize) -> Self {
        self.cursor = Some(cursor);
        self
    }

    #[must_use]
    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }
}

impl Widget for FieldView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::default()
            .title(self.label)
            .borders(Borders::ALL)
            .border_style(if self.cursor.is_some() {
                Theme::border_focused()
            } else {
                Theme::border()
            });
        if let Some(error) = self.error {
            block = block.title_bottom(Line::from(Span::styled(error, Theme::error())));
        }

        let line = match self.cursor {
            Some(cursor) => {
                let before: String = self.value.chars().take(cursor).collect();
                let at: String = self.value.chars().skip(cursor).take(1).collect();
                let after: String = self.value.chars().skip(cursor + 1).collect();
                let cursor_cell = if at.is_empty() { " ".to_string() } else { at };
                Line::from(vec![
                    Span::styled(before, Theme::text()),
                    Span::styled(cursor_cell, Style::default().add_modifier(Modifier::REVERSED)),
                    Span::styled(after, Theme::text()),
                ])
            }
            None => Line::from(Span::styled(self.value.to_string(), Theme::text())),
        };

        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(line).render(inner, buf);
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Title rule: required, at least 3 characters.
pub fn validate_title(title: &str) -> Option<&'static str> {
    if title.is_empty() {
        Some("Title is required")
    } else if title.chars().count() < 3 {
        Some("Title must be at least 3 characters")
    } else {
        None
    }
}

/// Description rule: required, at least 10 characters.
pub fn validate_description(description: &str) -> Option<&'static str> {
    if description.is_empty() {
        Some("Description is required")
    } else if description.chars().count() < 10 {
        Some("Description must be at least 10 characters")
    } else {
        None
    }
}

/// Optional due date entered as `YYYY-MM-DD`; sent as midnight UTC.
pub fn validate_due_date(raw: &str) -> Result<Option<DateTime<Utc>>, &'static str> {
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| Some(date.and_time(NaiveTime::MIN).and_utc()))
        .map_err(|_| "Due date must be YYYY-MM-DD")
}

// =============================================================================
// Project form
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProjectField {
    Title,
    Description,
    Status,
}

impl ProjectField {
    const fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::Status,
            Self::Status => Self::Title,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Title => Self::Status,
            Self::Description => Self::Title,
            Self::Status => Self::Description,
        }
    }
}

/// Create-project dialog state.
#[derive(Debug)]
pub struct ProjectForm {
    title: TextInput,
    description: TextInput,
    status: ProjectStatus,
    focus: ProjectField,
    title_error: Option<&'static str>,
    description_error: Option<&'static str>,
    /// Create request in flight; input is ignored until it resolves.
    pub saving: bool,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            title: TextInput::default(),
            description: TextInput::default(),
            status: ProjectStatus::Active,
            focus: ProjectField::Title,
            title_error: None,
            description_error: None,
            saving: false,
        }
    }
}

impl ProjectForm {
    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome<NewProject> {
        if self.saving {
            return FormOutcome::Continue;
        }
        match key.code {
            KeyCode::Esc => FormOutcome::Cancel,
            KeyCode::Enter => match self.submit() {
                Some(data) => FormOutcome::Submit(data),
                None => FormOutcome::Continue,
            },
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                FormOutcome::Continue
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                FormOutcome::Continue
            }
            _ => {
                match self.focus {
                    ProjectField::Title => {
                        self.title.handle_key(key);
                    }
                    ProjectField::Description => {
                        self.description.handle_key(key);
                    }
                    ProjectField::Status => {
                        if matches!(
                            key.code,
                            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                        ) {
                            self.status = match self.status {
                                ProjectStatus::Active => ProjectStatus::Completed,
                                ProjectStatus::Completed => ProjectStatus::Active,
                            };
                        }
                    }
                }
                FormOutcome::Continue
            }
        }
    }

    /// Validate and build the payload. Invalid input records the messages
    /// and produces nothing; the values pass through exactly as entered.
    fn submit(&mut self) -> Option<NewProject> {
        self.title_error = validate_title(self.title.value());
        self.description_error = validate_description(self.description.value());
        if self.title_error.is_some() || self.description_error.is_some() {
            return None;
        }
        Some(NewProject {
            title: self.title.value().to_string(),
            description: self.description.value().to_string(),
            status: Some(self.status),
        })
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = centered(52, 14, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title("Create New Project")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Description
                Constraint::Length(3), // Status
                Constraint::Length(1), // Hint
            ])
            .split(inner);

        let mut title = FieldView::new("Project Title", self.title.value()).error(self.title_error);
        if self.focus == ProjectField::Title {
            title = title.focused(self.title.cursor());
        }
        frame.render_widget(title, chunks[0]);

        let mut description = FieldView::new("Description", self.description.value())
            .error(self.description_error);
        if self.focus == ProjectField::Description {
            description = description.focused(self.description.cursor());
        }
        frame.render_widget(description, chunks[1]);

        frame.render_widget(
            status_selector(
                "Status",
                &ProjectStatus::all().map(|s| (s.label(), s == self.status)),
                self.focus == ProjectField::Status,
            ),
            chunks[2],
        );

        let hint = if self.saving {
            Line::from(Span::styled("Saving…", Theme::text_dim()))
        } else {
            Line::from(Span::styled(
                "enter save · tab next field · esc cancel",
                Theme::help(),
            ))
        };
        frame.render_widget(Paragraph::new(hint).alignment(Alignment::Center), chunks[3]);
    }
}

// =============================================================================
// Task form
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskField {
    Title,
    Description,
    DueDate,
    Status,
}

impl TaskField {
    const fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::DueDate,
            Self::DueDate => Self::Status,
            Self::Status => Self::Title,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Title => Self::Status,
            Self::Description => Self::Title,
            Self::DueDate => Self::Description,
            Self::Status => Self::DueDate,
        }
    }
}

/// Create-task dialog state.
#[derive(Debug)]
pub struct TaskForm {
    title: TextInput,
    description: TextInput,
    due_date: TextInput,
    status: TaskStatus,
    focus: TaskField,
    title_error: Option<&'static str>,
    description_error: Option<&'static str>,
    due_date_error: Option<&'static str>,
    /// Create request in flight; input is ignored until it resolves.
    pub saving: bool,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: TextInput::default(),
            description: TextInput::default(),
            due_date: TextInput::default(),
            status: TaskStatus::Todo,
            focus: TaskField::Title,
            title_error: None,
            description_error: None,
            due_date_error: None,
            saving: false,
        }
    }
}

impl TaskForm {
    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome<NewTask> {
        if self.saving {
            return FormOutcome::Continue;
        }
        match key.code {
            KeyCode::Esc => FormOutcome::Cancel,
            KeyCode::Enter => match self.submit() {
                Some(data) => FormOutcome::Submit(data),
                None => FormOutcome::Continue,
            },
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                FormOutcome::Continue
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                FormOutcome::Continue
            }
            _ => {
                match self.focus {
                    TaskField::Title => {
                        self.title.handle_key(key);
                    }
                    TaskField::Description => {
                        self.description.handle_key(key);
                    }
                    TaskField::DueDate => {
                        self.due_date.handle_key(key);
                    }
                    TaskField::Status => {
                        if matches!(
                            key.code,
                            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                        ) {
                            self.status = self.status.next();
                        }
                    }
                }
                FormOutcome::Continue
            }
        }
    }

    fn submit(&mut self) -> Option<NewTask> {
        self.title_error = validate_title(self.title.value());
        self.description_error = validate_description(self.description.value());
        let due_date = match validate_due_date(self.due_date.value()) {
            Ok(due) => {
                self.due_date_error = None;
                due
            }
            Err(message) => {
                self.due_date_error = Some(message);
                None
            }
        };
        if self.title_error.is_some()
            || self.description_error.is_some()
            || self.due_date_error.is_some()
        {
            return None;
        }
        Some(NewTask {
            title: self.title.value().to_string(),
            description: self.description.value().to_string(),
            status: Some(self.status),
            due_date,
        })
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = centered(52, 17, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title("Create New Task")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Description
                Constraint::Length(3), // Due date
                Constraint::Length(3), // Status
                Constraint::Length(1), // Hint
            ])
            .split(inner);

        let mut title = FieldView::new("Task Title", self.title.value()).error(self.title_error);
        if self.focus == TaskField::Title {
            title = title.focused(self.title.cursor());
        }
        frame.render_widget(title, chunks[0]);

        let mut description = FieldView::new("Description", self.description.value())
            .error(self.description_error);
        if self.focus == TaskField::Description {
            description = description.focused(self.description.cursor());
        }
        frame.render_widget(description, chunks[1]);

        let mut due = FieldView::new("Due Date (YYYY-MM-DD, optional)", self.due_date.value())
            .error(self.due_date_error);
        if self.focus == TaskField::DueDate {
            due = due.focused(self.due_date.cursor());
        }
        frame.render_widget(due, chunks[2]);

        frame.render_widget(
            status_selector(
                "Status",
                &TaskStatus::all().map(|s| (s.label(), s == self.status)),
                self.focus == TaskField::Status,
            ),
            chunks[3],
        );

        let hint = if self.saving {
            Line::from(Span::styled("Saving…", Theme::text_dim()))
        } else {
            Line::from(Span::styled(
                "enter save · tab next field · esc cancel",
                Theme::help(),
            ))
        };
        frame.render_widget(Paragraph::new(hint).alignment(Alignment::Center), chunks[4]);
    }
}

/// One-line choice row; the selected option is highlighted.
fn status_selector<'a>(
    label: &'a str,
    options: &[(&'a str, bool)],
    focused: bool,
) -> impl Widget + 'a {
    let mut spans = Vec::new();
    for (i, (option, selected)) in options.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Theme::text_dim()));
        }
        if *selected {
            spans.push(Span::styled(format!("[{option}]"), Theme::selected()));
        } else {
            spans.push(Span::styled(format!(" {option} "), Theme::text_dim()));
        }
    }

    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(if focused {
                Theme::border_focused()
            } else {
                Theme::border()
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn type_str(form: &mut ProjectForm, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_empty_fields_block_submission() {
        let mut form = ProjectForm::default();
        let outcome = form.handle_key(key(KeyCode::Enter));

        assert_eq!(outcome, FormOutcome::Continue);
        assert_eq!(form.title_error, Some("Title is required"));
        assert_eq!(form.description_error, Some("Description is required"));
    }

    #[test]
    fn test_short_fields_show_min_length_messages() {
        let mut form = ProjectForm::default();
        type_str(&mut form, "ab");
        form.handle_key(key(KeyCode::Tab));
        type_str(&mut form, "too short");

        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Continue);
        assert_eq!(form.title_error, Some("Title must be at least 3 characters"));
        assert_eq!(
            form.description_error,
            Some("Description must be at least 10 characters")
        );
    }

    #[test]
    fn test_valid_submission_passes_exact_untrimmed_values() {
        let mut form = ProjectForm::default();
        type_str(&mut form, " Test Project ");
        form.handle_key(key(KeyCode::Tab));
        type_str(&mut form, "This is a test project description");

        let outcome = form.handle_key(key(KeyCode::Enter));
        assert_eq!(
            outcome,
            FormOutcome::Submit(NewProject {
                title: " Test Project ".to_string(),
                description: "This is a test project description".to_string(),
                status: Some(ProjectStatus::Active),
            })
        );
    }

    #[test]
    fn test_status_toggles_with_space() {
        let mut form = ProjectForm::default();
        form.handle_key(key(KeyCode::BackTab)); // Title → Status
        form.handle_key(key(KeyCode::Char(' ')));
        type_str_description_and_title(&mut form);

        match form.handle_key(key(KeyCode::Enter)) {
            FormOutcome::Submit(data) => {
                assert_eq!(data.status, Some(ProjectStatus::Completed));
            }
            other => panic!("expected submission, got {other:?}"),
        }
    }

    fn type_str_description_and_title(form: &mut ProjectForm) {
        form.handle_key(key(KeyCode::Tab)); // Status → Title
        type_str(form, "Test Project");
        form.handle_key(key(KeyCode::Tab)); // Title → Description
        type_str(form, "This is a test project description");
    }

    #[test]
    fn test_escape_cancels() {
        let mut form = ProjectForm::default();
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormOutcome::Cancel);
    }

    #[test]
    fn test_saving_form_ignores_input() {
        let mut form = ProjectForm::default();
        form.saving = true;
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormOutcome::Continue);
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Continue);
    }

    #[test]
    fn test_task_form_rejects_malformed_due_date() {
        let mut form = TaskForm::default();
        for c in "Write docs".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
        form.handle_key(key(KeyCode::Tab));
        for c in "Document the new endpoints".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
        form.handle_key(key(KeyCode::Tab));
        for c in "next week".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }

        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormOutcome::Continue);
        assert_eq!(form.due_date_error, Some("Due date must be YYYY-MM-DD"));
    }

    #[test]
    fn test_task_form_parses_due_date_as_midnight_utc() {
        let mut form = TaskForm::default();
        for c in "Write docs".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
        form.handle_key(key(KeyCode::Tab));
        for c in "Document the new endpoints".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
        form.handle_key(key(KeyCode::Tab));
        for c in "2024-03-05".chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }

        match form.handle_key(key(KeyCode::Enter)) {
            FormOutcome::Submit(data) => {
                assert_eq!(
                    data.due_date.unwrap().to_rfc3339(),
                    "2024-03-05T00:00:00+00:00"
                );
                assert_eq!(data.status, Some(TaskStatus::Todo));
            }
            other => panic!("expected submission, got {other:?}"),
        }
    }

    #[test]
    fn test_text_input_edits_at_cursor() {
        let mut input = TextInput::default();
        for c in "helo".chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Char('l')));
        assert_eq!(input.value(), "hello");

        input.handle_key(key(KeyCode::End));
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.value(), "hell");
    }
}
