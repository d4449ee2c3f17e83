//! Application state machine for the board.
//!
//! All state lives here and in the screens; spawned tasks only run the
//! network call and post the tagged result back over the channel, so every
//! mutation happens between awaits on this loop.

use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::warn;

use taskdeck_api::{ApiClient, ApiError, AuthResponse, Project, ProjectPage, Task};

use crate::config::{Config, Credentials};

use super::event::{Event, EventHandler};
use super::screens::{
    DashboardAction, DashboardScreen, LoginAction, LoginScreen, ProjectAction, ProjectScreen,
};
use super::Tui;

/// Result of a spawned API call, applied to screen state on the event loop.
pub enum AppMessage {
    AuthFinished(Result<AuthResponse, ApiError>),
    ProjectsLoaded {
        seq: u64,
        result: Result<ProjectPage, ApiError>,
    },
    ProjectCreated(Result<Project, ApiError>),
    ProjectDeleted {
        id: String,
        result: Result<(), ApiError>,
    },
    /// Joined project + tasks fetch for the details screen
    ProjectOpened(Result<(Project, Vec<Task>), ApiError>),
    TasksFiltered {
        seq: u64,
        result: Result<Vec<Task>, ApiError>,
    },
    TaskCreated(Result<Task, ApiError>),
    TaskUpdated {
        id: String,
        result: Result<Task, ApiError>,
    },
    TaskDeleted {
        id: String,
        result: Result<(), ApiError>,
    },
}

/// Either kind of input the loop waits on.
enum Incoming {
    Terminal(Event),
    Api(AppMessage),
}

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
    Project,
}

/// Application state
pub struct App {
    config: Config,
    client: ApiClient,
    /// Whether the app should quit
    should_quit: bool,
    /// Current screen
    current_screen: Screen,
    login: LoginScreen,
    dashboard: DashboardScreen,
    /// Details screen, present while one is open
    project: Option<ProjectScreen>,
    /// Signed-in user, mirrored from the persisted credentials
    user: Option<taskdeck_api::User>,
    msg_tx: mpsc::UnboundedSender<AppMessage>,
    msg_rx: mpsc::UnboundedReceiver<AppMessage>,
}

impl App {
    /// Create the application, restoring a persisted session when present.
    pub fn new(config: Config) -> Result<Self> {
        let mut client = ApiClient::new(&config.api_url)?;
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        let credentials = Credentials::load(&config);
        let (current_screen, user) = match credentials {
            Some(credentials) => {
                client.set_token(&credentials.token);
                (Screen::Dashboard, Some(credentials.user))
            }
            None => (Screen::Login, None),
        };

        Ok(Self {
            config,
            client,
            should_quit: false,
            current_screen,
            login: LoginScreen::new(),
            dashboard: DashboardScreen::new(),
            project: None,
            user,
            msg_tx,
            msg_rx,
        })
    }

    /// Run the application main loop.
    pub async fn run(&mut self, terminal: &mut Tui, mut events: EventHandler) -> Result<()> {
        // Initial page-1 load with no filters.
        if self.current_screen == Screen::Dashboard {
            self.dispatch_dashboard(DashboardAction::Load { page: 1 });
        }

        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            let incoming = tokio::select! {
                event = events.next() => Incoming::Terminal(event?),
                Some(msg) = self.msg_rx.recv() => Incoming::Api(msg),
            };
            match incoming {
                Incoming::Terminal(Event::Tick) => self.tick(),
                Incoming::Terminal(Event::Key(key)) => self.handle_key(key),
                Incoming::Terminal(Event::Resize(_, _)) => {}
                Incoming::Api(msg) => self.handle_message(msg),
            }
        }

        Ok(())
    }

    /// Draw the current screen.
    fn draw(&self, frame: &mut Frame) {
        match self.current_screen {
            Screen::Login => self.login.draw(frame),
            Screen::Dashboard => self.dashboard.draw(frame, self.user.as_ref()),
            Screen::Project => {
                if let Some(project) = &self.project {
                    project.draw(frame);
                }
            }
        }
    }

    /// Tick drives the dashboard's debounce; the window is cancelled when
    /// the screen is left, like the web view unmounting its timer.
    fn tick(&mut self) {
        if self.current_screen == Screen::Dashboard {
            if let Some(action) = self.dashboard.tick(Instant::now()) {
                self.dispatch_dashboard(action);
            }
        }
    }

    /// Check if key presses are being consumed by a text field or dialog.
    fn is_input_mode(&self) -> bool {
        match self.current_screen {
            Screen::Login => true,
            Screen::Dashboard => self.dashboard.is_input_mode(),
            Screen::Project => self.project.as_ref().is_some_and(|p| p.is_input_mode()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Global quit shortcuts
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::Char('q') && !self.is_input_mode() {
            self.should_quit = true;
            return;
        }

        match self.current_screen {
            Screen::Login => {
                if key.code == KeyCode::Esc {
                    self.should_quit = true;
                } else if let Some(action) = self.login.handle_key(key) {
                    self.dispatch_login(action);
                }
            }
            Screen::Dashboard => {
                if let Some(action) = self.dashboard.handle_key(key) {
                    self.dispatch_dashboard(action);
                }
            }
            Screen::Project => {
                let action = self.project.as_mut().and_then(|p| p.handle_key(key));
                if let Some(action) = action {
                    self.dispatch_project(action);
                }
            }
        }
    }

    fn dispatch_login(&mut self, action: LoginAction) {
        let client = self.client.clone();
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let result = match action {
                LoginAction::Login { email, password } => client.login(&email, &password).await,
                LoginAction::Register {
                    name,
                    email,
                    password,
                } => client.register(&name, &email, &password).await,
            };
            let _ = tx.send(AppMessage::AuthFinished(result));
        });
    }

    fn dispatch_dashboard(&mut self, action: DashboardAction) {
        match action {
            DashboardAction::Load { page } => {
                let (seq, query) = self.dashboard.begin_load(page);
                let client = self.client.clone();
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let result = client.list_projects(&query).await;
                    let _ = tx.send(AppMessage::ProjectsLoaded { seq, result });
                });
            }
            DashboardAction::Open(id) => {
                self.dashboard.cancel_debounce();
                self.project = Some(ProjectScreen::new(id.clone()));
                self.current_screen = Screen::Project;
                let client = self.client.clone();
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let result =
                        tokio::try_join!(client.get_project(&id), client.project_tasks(&id, None));
                    let _ = tx.send(AppMessage::ProjectOpened(result));
                });
            }
            DashboardAction::Create(data) => {
                let client = self.client.clone();
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let result = client.create_project(&data).await;
                    let _ = tx.send(AppMessage::ProjectCreated(result));
                });
            }
            DashboardAction::Delete(id) => {
                let client = self.client.clone();
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let result = client.delete_project(&id).await;
                    let _ = tx.send(AppMessage::ProjectDeleted { id, result });
                });
            }
            DashboardAction::Logout => {
                if let Err(err) = Credentials::clear(&self.config) {
                    warn!(%err, "failed to clear credentials");
                }
                self.client.clear_token();
                self.user = None;
                self.login = LoginScreen::new();
                self.current_screen = Screen::Login;
            }
        }
    }

    fn dispatch_project(&mut self, action: ProjectAction) {
        let Some(project) = &mut self.project else {
            return;
        };
        match action {
            ProjectAction::Filter(status) => {
                let seq = project.begin_filter(status);
                let id = project.project_id.clone();
                let client = self.client.clone();
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let result = client.project_tasks(&id, status).await;
                    let _ = tx.send(AppMessage::TasksFiltered { seq, result });
                });
            }
            ProjectAction::CreateTask(data) => {
                let id = project.project_id.clone();
                let client = self.client.clone();
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let result = client.create_task(&id, &data).await;
                    let _ = tx.send(AppMessage::TaskCreated(result));
                });
            }
            ProjectAction::UpdateTask { id, patch } => {
                project.begin_update(&id);
                let client = self.client.clone();
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let result = client.update_task(&id, &patch).await;
                    let _ = tx.send(AppMessage::TaskUpdated { id, result });
                });
            }
            ProjectAction::DeleteTask(id) => {
                let client = self.client.clone();
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let result = client.delete_task(&id).await;
                    let _ = tx.send(AppMessage::TaskDeleted { id, result });
                });
            }
            ProjectAction::Back => {
                self.project = None;
                self.current_screen = Screen::Dashboard;
                // The dashboard re-loads on return, as the web view does on
                // remount.
                self.dispatch_dashboard(DashboardAction::Load {
                    page: self.dashboard.page,
                });
            }
        }
    }

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::AuthFinished(result) => match result {
                Ok(auth) => {
                    self.client.set_token(&auth.access_token);
                    let credentials = Credentials {
                        token: auth.access_token,
                        user: auth.user,
                    };
                    if let Err(err) = credentials.save(&self.config) {
                        warn!(%err, "failed to persist credentials");
                    }
                    self.user = Some(credentials.user);
                    self.login.finish();
                    self.dashboard = DashboardScreen::new();
                    self.current_screen = Screen::Dashboard;
                    self.dispatch_dashboard(DashboardAction::Load { page: 1 });
                }
                Err(err) => self.login.fail(&err),
            },
            AppMessage::ProjectsLoaded { seq, result } => {
                self.dashboard.apply_projects(seq, result);
            }
            AppMessage::ProjectCreated(result) => {
                if let Some(action) = self.dashboard.apply_created(result) {
                    self.dispatch_dashboard(action);
                }
            }
            AppMessage::ProjectDeleted { id, result } => {
                if let Some(action) = self.dashboard.apply_deleted(&id, result) {
                    self.dispatch_dashboard(action);
                }
            }
            AppMessage::ProjectOpened(result) => {
                if let Some(project) = &mut self.project {
                    project.apply_loaded(result);
                }
            }
            AppMessage::TasksFiltered { seq, result } => {
                if let Some(project) = &mut self.project {
                    project.apply_tasks(seq, result);
                }
            }
            AppMessage::TaskCreated(result) => {
                if let Some(project) = &mut self.project {
                    project.apply_task_created(result);
                }
            }
            AppMessage::TaskUpdated { id, result } => {
                if let Some(project) = &mut self.project {
                    project.apply_task_updated(&id, result);
                }
            }
            AppMessage::TaskDeleted { id, result } => {
                if let Some(project) = &mut self.project {
                    project.apply_task_deleted(&id, result);
                }
            }
        }
    }
}
