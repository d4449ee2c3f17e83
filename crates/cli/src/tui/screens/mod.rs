//! Screen controllers for the board.

mod dashboard;
mod login;
mod project;

pub use dashboard::{DashboardAction, DashboardScreen, PAGE_SIZE, SEARCH_DEBOUNCE};
pub use login::{LoginAction, LoginScreen};
pub use project::{ProjectAction, ProjectScreen, TaskCounts};
