//! # InputBox Component
//!
//! Single-line text entry with a prompt title and a terminal cursor.
//!
//! The entry's cursor is a byte offset; the screen cursor is placed by
//! display width so wide characters line up. When the text is wider than
//! the box, it scrolls horizontally to keep the cursor visible.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::state::TextEntry;
use crate::tui::component::Component;

const BORDER_OFFSET: u16 = 1;

pub struct InputBox<'a> {
    /// Prompt shown in the border (e.g., "Input the key")
    pub prompt: &'a str,
    /// Context shown in the bottom border (operation and key so far)
    pub context: String,
    pub entry: &'a TextEntry,
}

impl<'a> InputBox<'a> {
    pub fn new(prompt: &'a str, context: String, entry: &'a TextEntry) -> Self {
        Self {
            prompt,
            context,
            entry,
        }
    }
}

impl Component for InputBox<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // Border plus one line of text
        let area = Rect {
            height: area.height.min(3),
            ..area
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(format!(" {} ", self.prompt))
            .title_alignment(Alignment::Left)
            .title_bottom(self.context.as_str());

        let inner_width = area.width.saturating_sub(BORDER_OFFSET * 2) as usize;
        let (visible, cursor_col) = visible_window(self.entry, inner_width);

        frame.render_widget(Paragraph::new(visible).block(block), area);
        frame.set_cursor_position((
            area.x + BORDER_OFFSET + cursor_col as u16,
            area.y + BORDER_OFFSET,
        ));
    }
}

/// Slice of the entry that fits in `width` columns, and the cursor column
/// within it.
fn visible_window(entry: &TextEntry, width: usize) -> (&str, usize) {
    let value = entry.value();
    let before = &value[..entry.cursor()];
    let mut cursor_col = before.width();
    if width == 0 {
        return ("", 0);
    }

    // Drop leading chars until the cursor fits (one column spare for it)
    let mut start = 0;
    let mut chars = before.char_indices();
    while cursor_col >= width {
        match chars.next() {
            Some((i, c)) => {
                start = i + c.len_utf8();
                cursor_col -= c.width().unwrap_or(0);
            }
            None => break,
        }
    }

    let mut end = start;
    let mut used = 0;
    for (i, c) in value[start..].char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        end = start + i + c.len_utf8();
    }

    (&value[start..end], cursor_col)
}
