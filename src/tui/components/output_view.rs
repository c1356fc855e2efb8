//! # OutputView Component
//!
//! Shows the last result. Values can be large (a JSON blob, a long list
//! element), so the wrapped text sits in a `ScrollView`.
//!
//! Transient wrapper over `&mut ScrollViewState`, which persists in
//! `TuiState` and is reset whenever the view changes.

use ratatui::Frame;
use ratatui::layout::{Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::tui::component::Component;

pub struct OutputView<'a> {
    pub text: &'a str,
    pub scroll_state: &'a mut ScrollViewState,
}

impl<'a> OutputView<'a> {
    pub fn new(text: &'a str, scroll_state: &'a mut ScrollViewState) -> Self {
        Self { text, scroll_state }
    }
}

impl Component for OutputView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Output ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Leave a column for the scrollbar
        let content_width = inner.width.saturating_sub(1);
        let paragraph = Paragraph::new(self.text)
            .style(Style::default().fg(Color::Green))
            .wrap(Wrap { trim: false });
        let height = (paragraph.line_count(content_width) as u16).max(1);

        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, height));

        frame.render_stateful_widget(scroll_view, inner, &mut *self.scroll_state);
    }
}
