//! Pagination bar: Previous / numbered pages / Next.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// One rendered control in the bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub label: String,
    /// This entry is the current page
    pub active: bool,
    /// Whether activating this entry would do anything
    pub enabled: bool,
}

/// Pagination state for a list with `total` pages, 1-based.
pub struct Pagination {
    current: u32,
    total: u32,
}

impl Pagination {
    pub const fn new(current: u32, total: u32) -> Self {
        Self { current, total }
    }

    /// Controls left to right: Previous, one button per page, Next.
    /// Previous is disabled on the first page and Next on the last.
    pub fn entries(&self) -> Vec<PageEntry> {
        let mut entries = vec![PageEntry {
            label: "Previous".to_string(),
            active: false,
            enabled: self.current > 1,
        }];
        for page in 1..=self.total {
            entries.push(PageEntry {
                label: page.to_string(),
                active: page == self.current,
                enabled: true,
            });
        }
        entries.push(PageEntry {
            label: "Next".to_string(),
            active: false,
            enabled: self.current < self.total,
        });
        entries
    }
}

impl Widget for Pagination {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (i, entry) in self.entries().into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            let style = if entry.active {
                Theme::selected().add_modifier(Modifier::REVERSED)
            } else if entry.enabled {
                Theme::text()
            } else {
                Theme::text_dim()
            };
            spans.push(Span::styled(format!(" {} ", entry.label), style));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_one_button_per_page() {
        let entries = Pagination::new(1, 4).entries();
        // Previous + 4 pages + Next
        assert_eq!(entries.len(), 6);
        let labels: Vec<_> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Previous", "1", "2", "3", "4", "Next"]);
    }

    #[test]
    fn test_previous_disabled_on_first_page() {
        let entries = Pagination::new(1, 3).entries();
        assert!(!entries.first().unwrap().enabled);
        assert!(entries.last().unwrap().enabled);
    }

    #[test]
    fn test_next_disabled_on_last_page() {
        let entries = Pagination::new(3, 3).entries();
        assert!(entries.first().unwrap().enabled);
        assert!(!entries.last().unwrap().enabled);
    }

    #[test]
    fn test_current_page_is_active() {
        let entries = Pagination::new(2, 3).entries();
        let active: Vec<_> = entries.iter().filter(|e| e.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].label, "2");
    }
}
