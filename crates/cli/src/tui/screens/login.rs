//! Sign-in / registration screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use taskdeck_api::ApiError;

use crate::tui::theme::Theme;
use crate::tui::widgets::{centered, FieldView, HelpBar, TextInput};

/// Submission produced by the screen; the app runs the network call.
#[derive(Debug, PartialEq, Eq)]
pub enum LoginAction {
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    SignIn,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Email,
    Password,
}

/// Login controller state.
pub struct LoginScreen {
    mode: AuthMode,
    name: TextInput,
    email: TextInput,
    password: TextInput,
    focus: Field,
    pub error: Option<String>,
    /// Auth request in flight; input is ignored until it resolves.
    pub submitting: bool,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self {
            mode: AuthMode::SignIn,
            name: TextInput::default(),
            email: TextInput::default(),
            password: TextInput::default(),
            focus: Field::Email,
            error: None,
            submitting: false,
        }
    }

    fn next_field(&self) -> Field {
        match (self.mode, self.focus) {
            (AuthMode::Register, Field::Name) => Field::Email,
            (_, Field::Email) => Field::Password,
            (AuthMode::Register, Field::Password) => Field::Name,
            (AuthMode::SignIn, _) => Field::Email,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<LoginAction> {
        if self.submitting {
            return None;
        }

        // Ctrl+R flips between sign-in and registration.
        if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.mode = match self.mode {
                AuthMode::SignIn => AuthMode::Register,
                AuthMode::Register => AuthMode::SignIn,
            };
            self.focus = match self.mode {
                AuthMode::SignIn => Field::Email,
                AuthMode::Register => Field::Name,
            };
            self.error = None;
            return None;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Up | KeyCode::BackTab => {
                self.focus = self.next_field();
                None
            }
            KeyCode::Enter => self.submit(),
            _ => {
                let input = match self.focus {
                    Field::Name => &mut self.name,
                    Field::Email => &mut self.email,
                    Field::Password => &mut self.password,
                };
                input.handle_key(key);
                None
            }
        }
    }

    /// Required-field validation; transport-level failures come back via
    /// [`Self::fail`].
    fn submit(&mut self) -> Option<LoginAction> {
        match self.mode {
            AuthMode::SignIn => {
                if self.email.value().is_empty() || self.password.value().is_empty() {
                    self.error = Some("Email and password are required".to_string());
                    return None;
                }
                self.submitting = true;
                self.error = None;
                Some(LoginAction::Login {
                    email: self.email.value().to_string(),
                    password: self.password.value().to_string(),
                })
            }
            AuthMode::Register => {
                if self.name.value().is_empty()
                    || self.email.value().is_empty()
                    || self.password.value().is_empty()
                {
                    self.error = Some("Name, email, and password are required".to_string());
                    return None;
                }
                self.submitting = true;
                self.error = None;
                Some(LoginAction::Register {
                    name: self.name.value().to_string(),
                    email: self.email.value().to_string(),
                    password: self.password.value().to_string(),
                })
            }
        }
    }

    /// Authentication succeeded; reset transient state.
    pub fn finish(&mut self) {
        self.submitting = false;
        self.error = None;
        self.password.clear();
    }

    /// Authentication failed; show the server's message when it has one.
    pub fn fail(&mut self, err: &ApiError) {
        self.submitting = false;
        self.error = Some(match err {
            ApiError::Api { message, .. } if !message.is_empty() => message.clone(),
            _ => "Sign in failed. Please try again.".to_string(),
        });
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let box_height = if self.mode == AuthMode::Register { 16 } else { 13 };
        let dialog = centered(48, box_height, area);

        let title = match self.mode {
            AuthMode::SignIn => "Sign in to Taskdeck",
            AuthMode::Register => "Create your Taskdeck account",
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_focused());
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let mut constraints = Vec::new();
        if self.mode == AuthMode::Register {
            constraints.push(Constraint::Length(3)); // Name
        }
        constraints.extend([
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(1), // Error / status
            Constraint::Length(1), // Hint
        ]);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let mut idx = 0;
        if self.mode == AuthMode::Register {
            let mut name = FieldView::new("Name", self.name.value());
            if self.focus == Field::Name {
                name = name.focused(self.name.cursor());
            }
            frame.render_widget(name, chunks[idx]);
            idx += 1;
        }

        let mut email = FieldView::new("Email", self.email.value());
        if self.focus == Field::Email {
            email = email.focused(self.email.cursor());
        }
        frame.render_widget(email, chunks[idx]);

        let masked = "•".repeat(self.password.value().chars().count());
        let mut password = FieldView::new("Password", &masked);
        if self.focus == Field::Password {
            password = password.focused(self.password.cursor());
        }
        frame.render_widget(password, chunks[idx + 1]);

        let status = if self.submitting {
            Span::styled("Signing in…", Theme::text_dim())
        } else if let Some(error) = &self.error {
            Span::styled(error.clone(), Theme::error())
        } else {
            Span::raw("")
        };
        frame.render_widget(
            Paragraph::new(Line::from(status)).alignment(Alignment::Center),
            chunks[idx + 2],
        );

        frame.render_widget(
            HelpBar::new(&[
                ("tab", "next field"),
                ("enter", "submit"),
                ("ctrl+r", "sign in / register"),
                ("esc", "quit"),
            ]),
            chunks[idx + 3],
        );
    }
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(screen: &mut LoginScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_missing_fields_block_submission() {
        let mut screen = LoginScreen::new();
        assert_eq!(screen.handle_key(key(KeyCode::Enter)), None);
        assert_eq!(
            screen.error.as_deref(),
            Some("Email and password are required")
        );
        assert!(!screen.submitting);
    }

    #[test]
    fn test_valid_sign_in_submits_exact_values() {
        let mut screen = LoginScreen::new();
        type_str(&mut screen, "alice@example.com");
        screen.handle_key(key(KeyCode::Tab));
        type_str(&mut screen, "secret");

        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)),
            Some(LoginAction::Login {
                email: "alice@example.com".to_string(),
                password: "secret".to_string(),
            })
        );
        assert!(screen.submitting);
    }

    #[test]
    fn test_register_mode_requires_name() {
        let mut screen = LoginScreen::new();
        screen.handle_key(ctrl('r'));
        screen.handle_key(key(KeyCode::Tab)); // Name → Email
        type_str(&mut screen, "alice@example.com");
        screen.handle_key(key(KeyCode::Tab));
        type_str(&mut screen, "secret");

        assert_eq!(screen.handle_key(key(KeyCode::Enter)), None);
        assert_eq!(
            screen.error.as_deref(),
            Some("Name, email, and password are required")
        );
    }

    #[test]
    fn test_register_submits_all_fields() {
        let mut screen = LoginScreen::new();
        screen.handle_key(ctrl('r'));
        type_str(&mut screen, "Alice");
        screen.handle_key(key(KeyCode::Tab));
        type_str(&mut screen, "alice@example.com");
        screen.handle_key(key(KeyCode::Tab));
        type_str(&mut screen, "secret");

        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)),
            Some(LoginAction::Register {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "secret".to_string(),
            })
        );
    }

    #[test]
    fn test_fail_prefers_server_message() {
        let mut screen = LoginScreen::new();
        screen.submitting = true;

        screen.fail(&ApiError::Api {
            status: 401,
            message: "Invalid credentials".to_string(),
        });
        assert_eq!(screen.error.as_deref(), Some("Invalid credentials"));
        assert!(!screen.submitting);

        screen.fail(&ApiError::Api {
            status: 500,
            message: String::new(),
        });
        assert_eq!(
            screen.error.as_deref(),
            Some("Sign in failed. Please try again.")
        );
    }

    #[test]
    fn test_submitting_screen_ignores_input() {
        let mut screen = LoginScreen::new();
        screen.submitting = true;
        assert_eq!(screen.handle_key(key(KeyCode::Enter)), None);
    }
}
