//! Reusable widgets for the board.

mod confirm;
mod forms;
mod help;
mod pagination;
mod project_card;
mod task_card;

pub use confirm::ConfirmDialog;
pub use forms::{
    validate_description, validate_due_date, validate_title, FieldView, FormOutcome, ProjectForm,
    TaskForm, TextInput,
};
pub use help::HelpBar;
pub use pagination::{PageEntry, Pagination};
pub use project_card::ProjectCard;
pub use task_card::{is_overdue, TaskCard};

use chrono::{DateTime, Utc};
use ratatui::layout::Rect;

/// Date rendering used on every card.
pub(crate) fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// A rect of the given size centered inside `r`, clamped to fit.
pub fn centered(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}
