//! # EntryList Component
//!
//! Renders one of the session's lists (menu, keys, fields) as two-line rows:
//! the entry title, then its description dimmed underneath.
//!
//! The selection lives in the core `EntryList`; the ratatui `ListState` is
//! rebuilt each frame from it, so this wrapper is transient.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::core::state::EntryList;
use crate::tui::component::Component;

pub struct EntryListView<'a> {
    list: &'a EntryList,
}

impl<'a> EntryListView<'a> {
    pub fn new(list: &'a EntryList) -> Self {
        Self { list }
    }
}

impl Component for EntryListView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let count = if self.list.is_empty() {
            String::new()
        } else {
            format!(" {} ", self.list.items().len())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", self.list.title))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(count).right_aligned())
            .padding(Padding::horizontal(1));

        if self.list.is_empty() {
            let empty = Paragraph::new("Nothing here.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        // borders + padding
        let inner_width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = self
            .list
            .items()
            .iter()
            .map(|entry| {
                ListItem::new(vec![
                    Line::from(Span::raw(truncate_to_width(&entry.title, inner_width))),
                    Line::from(Span::styled(
                        truncate_to_width(&entry.description, inner_width),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        );
        let mut list_state = ListState::default().with_selected(self.list.selected_index());

        frame.render_stateful_widget(list, area, &mut list_state);
    }
}

/// Truncate `s` to at most `max_width` terminal columns, adding "..." if
/// anything was cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let budget = max_width - 3;
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}
