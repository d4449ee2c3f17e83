//! Dashboard: the paginated, filterable project list.
//!
//! Owns the search/filter/pagination state. Filter edits arm a trailing-edge
//! debounce; when it fires, a page-1 load goes out with the current filters.
//! Every load carries a sequence id and only the latest issued id may apply
//! its response, so a slow superseded request can never clobber newer
//! results.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tracing::{debug, error};

use taskdeck_api::{
    ApiError, NewProject, Project, ProjectPage, ProjectQuery, ProjectStatus, User,
};

use crate::tui::theme::Theme;
use crate::tui::widgets::{
    ConfirmDialog, FieldView, FormOutcome, HelpBar, Pagination, ProjectCard, ProjectForm, TextInput,
};

/// Projects shown per page, matching the web dashboard grid.
pub const PAGE_SIZE: u32 = 6;

/// Inactivity window before a search or filter change reloads the list.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

const DELETE_PROMPT: &str =
    "Are you sure you want to delete this project? This action cannot be undone.";

/// What the dashboard asks the app to do.
#[derive(Debug, PartialEq, Eq)]
pub enum DashboardAction {
    /// Load the given page with the current filters
    Load { page: u32 },
    /// Open a project's details
    Open(String),
    /// Create a project
    Create(NewProject),
    /// Delete a project; confirmation already given
    Delete(String),
    /// Sign out and return to the login screen
    Logout,
}

#[derive(Debug)]
enum Mode {
    Browse,
    Search,
    Create(ProjectForm),
    ConfirmDelete(String),
}

/// List controller state.
pub struct DashboardScreen {
    pub projects: Vec<Project>,
    pub page: u32,
    pub total_pages: u32,
    pub status_filter: Option<ProjectStatus>,
    pub loading: bool,
    /// A debounced reload is pending or in flight
    pub searching: bool,
    pub error: Option<String>,
    search: TextInput,
    selected: usize,
    mode: Mode,
    deleting: Option<String>,
    debounce_deadline: Option<Instant>,
    /// Sequence id of the most recently issued load
    latest_seq: u64,
    next_seq: u64,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            projects: Vec::new(),
            page: 1,
            total_pages: 1,
            status_filter: None,
            loading: false,
            searching: false,
            error: None,
            search: TextInput::default(),
            selected: 0,
            mode: Mode::Browse,
            deleting: None,
            debounce_deadline: None,
            latest_seq: 0,
            next_seq: 0,
        }
    }

    pub fn search_text(&self) -> &str {
        self.search.value()
    }

    /// Whether key presses are being consumed by a text field or dialog.
    pub fn is_input_mode(&self) -> bool {
        !matches!(self.mode, Mode::Browse)
    }

    fn selected_project(&self) -> Option<&Project> {
        self.projects.get(self.selected)
    }

    /// Query for the given page with the currently active filters.
    fn query(&self, page: u32) -> ProjectQuery {
        let search = self.search.value();
        ProjectQuery {
            page,
            limit: PAGE_SIZE,
            search: (!search.is_empty()).then(|| search.to_string()),
            status: self.status_filter,
        }
    }

    /// Restart the debounce window after a search or filter edit.
    fn arm_debounce(&mut self, now: Instant) {
        self.searching = true;
        self.debounce_deadline = Some(now + SEARCH_DEBOUNCE);
    }

    /// Drop any pending debounced reload, like the web view unmounting its
    /// timer when navigating away.
    pub fn cancel_debounce(&mut self) {
        self.debounce_deadline = None;
        self.searching = false;
    }

    /// Fire the pending debounced reload once the window has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<DashboardAction> {
        if self.debounce_deadline.is_some_and(|deadline| now >= deadline) {
            self.debounce_deadline = None;
            return Some(DashboardAction::Load { page: 1 });
        }
        None
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<DashboardAction> {
        self.handle_key_at(key, Instant::now())
    }

    fn handle_key_at(&mut self, key: KeyEvent, now: Instant) -> Option<DashboardAction> {
        match &mut self.mode {
            Mode::Browse => self.handle_browse_key(key, now),
            Mode::Search => {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter => self.mode = Mode::Browse,
                    _ => {
                        if self.search.handle_key(key) {
                            self.arm_debounce(now);
                        }
                    }
                }
                None
            }
            Mode::Create(form) => match form.handle_key(key) {
                FormOutcome::Submit(data) => {
                    form.saving = true;
                    Some(DashboardAction::Create(data))
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
                        Some(DashboardAction::Delete(id))
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

    fn handle_browse_key(&mut self, key: KeyEvent, now: Instant) -> Option<DashboardAction> {
        match key.code {
            KeyCode::Char('/') => {
                self.mode = Mode::Search;
                None
            }
            KeyCode::Char('f') => {
                self.status_filter = match self.status_filter {
                    None => Some(ProjectStatus::Active),
                    Some(ProjectStatus::Active) => Some(ProjectStatus::Completed),
                    Some(ProjectStatus::Completed) => None,
                };
                self.arm_debounce(now);
                None
            }
            KeyCode::Char('c') => {
                self.mode = Mode::Create(ProjectForm::default());
                None
            }
            KeyCode::Char('d') => {
                if let Some(project) = self.selected_project() {
                    self.mode = Mode::ConfirmDelete(project.id.clone());
                }
                None
            }
            KeyCode::Char('r') => Some(DashboardAction::Load { page: self.page }),
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < self.projects.len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Enter => self
                .selected_project()
                .map(|p| DashboardAction::Open(p.id.clone())),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('n') => {
                // Disabled on the last page
                (self.page < self.total_pages).then(|| DashboardAction::Load {
                    page: self.page + 1,
                })
            }
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('p') => {
                // Disabled on the first page
                (self.page > 1).then(|| DashboardAction::Load {
                    page: self.page - 1,
                })
            }
            KeyCode::Char('L') => Some(DashboardAction::Logout),
            _ => None,
        }
    }

    /// Mark a load as issued; returns its sequence id and query.
    pub fn begin_load(&mut self, page: u32) -> (u64, ProjectQuery) {
        self.loading = true;
        self.error = None;
        self.next_seq += 1;
        self.latest_seq = self.next_seq;
        (self.latest_seq, self.query(page))
    }

    /// Apply a finished load. Responses from superseded requests are dropped.
    pub fn apply_projects(&mut self, seq: u64, result: Result<ProjectPage, ApiError>) {
        if seq != self.latest_seq {
            debug!(seq, latest = self.latest_seq, "dropping stale project list response");
            return;
        }
        self.loading = false;
        self.searching = false;
        match result {
            Ok(page) => {
                self.projects = page.projects;
                self.total_pages = page.total_pages;
                self.page = page.page;
                self.selected = self.selected.min(self.projects.len().saturating_sub(1));
                self.error = None;
            }
            Err(err) => {
                // Prior list contents stay on screen.
                error!(%err, "failed to load projects");
                self.error = Some("Failed to load projects. Please try again.".to_string());
            }
        }
    }

    /// Apply a finished create; success closes the form and reloads the
    /// current page with the current filters.
    pub fn apply_created(&mut self, result: Result<Project, ApiError>) -> Option<DashboardAction> {
        match result {
            Ok(project) => {
                debug!(id = %project.id, "project created");
                self.mode = Mode::Browse;
                Some(DashboardAction::Load { page: self.page })
            }
            Err(err) => {
                error!(%err, "failed to create project");
                if let Mode::Create(form) = &mut self.mode {
                    form.saving = false;
                }
                self.error = Some("Failed to create project. Please try again.".to_string());
                None
            }
        }
    }

    /// Apply a finished delete; success reloads the current page.
    pub fn apply_deleted(
        &mut self,
        id: &str,
        result: Result<(), ApiError>,
    ) -> Option<DashboardAction> {
        if self.deleting.as_deref() == Some(id) {
            self.deleting = None;
        }
        match result {
            Ok(()) => {
                debug!(id, "project deleted");
                Some(DashboardAction::Load { page: self.page })
            }
            Err(err) => {
                error!(%err, "failed to delete project");
                self.error = Some("Failed to delete project. Please try again.".to_string());
                None
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, user: Option<&User>) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Length(3), // Search and filter
                Constraint::Length(if self.error.is_some() { 1 } else { 0 }),
                Constraint::Min(8),    // Project grid
                Constraint::Length(if self.total_pages > 1 { 1 } else { 0 }),
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        self.draw_header(frame, chunks[0], user);
        self.draw_filters(frame, chunks[1]);
        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(error.clone(), Theme::error())),
                chunks[2],
            );
        }
        self.draw_grid(frame, chunks[3]);
        if self.total_pages > 1 {
            frame.render_widget(Pagination::new(self.page, self.total_pages), chunks[4]);
        }
        frame.render_widget(
            HelpBar::new(&[
                ("j/k", "select"),
                ("enter", "open"),
                ("/", "search"),
                ("f", "filter"),
                ("h/l", "page"),
                ("c", "create"),
                ("d", "delete"),
                ("L", "logout"),
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

    fn draw_header(&self, frame: &mut Frame, area: Rect, user: Option<&User>) {
        let title = match user {
            Some(user) => format!("My Projects — {}", user.name),
            None => "My Projects".to_string(),
        };
        let mut spans = vec![Span::styled(title, Theme::header())];
        if self.loading {
            spans.push(Span::styled("  ⟳ loading", Theme::text_dim()));
        }
        let lines = vec![
            Line::from(spans),
            Line::from(Span::styled(
                "Manage and track your projects",
                Theme::text_dim(),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_filters(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(28)])
            .split(area);

        let label = if self.searching { "Search ⟳" } else { "Search" };
        let mut search = FieldView::new(label, self.search_text());
        if matches!(self.mode, Mode::Search) {
            search = search.focused(self.search.cursor());
        }
        frame.render_widget(search, chunks[0]);

        let status = match self.status_filter {
            None => "All Status",
            Some(status) => status.label(),
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(status, Theme::accent()),
                Span::styled("  (f cycles)", Theme::help()),
            ]))
            .block(
                Block::default()
                    .title("Status")
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            ),
            chunks[1],
        );
    }

    fn draw_grid(&self, frame: &mut Frame, area: Rect) {
        if self.projects.is_empty() {
            let message = if self.loading {
                "Loading projects…".to_string()
            } else if !self.search.value().is_empty() || self.status_filter.is_some() {
                "No projects found\n\nNo projects match your search criteria.".to_string()
            } else {
                "No projects found\n\nGet started by creating your first project (c).".to_string()
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

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        // The grid has PAGE_SIZE slots; the server never returns more per page.
        for (i, project) in self.projects.iter().take(PAGE_SIZE as usize).enumerate() {
            let row = rows[i / 3];
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(33),
                    Constraint::Percentage(33),
                    Constraint::Percentage(34),
                ])
                .split(row);
            let card = ProjectCard::new(project)
                .selected(i == self.selected)
                .deleting(self.deleting.as_deref() == Some(project.id.as_str()));
            frame.render_widget(card, cols[i % 3]);
        }
    }
}

impl Default for DashboardScreen {
    fn default() -> Self {
        Self::new()
    }
}
