//! # LoadingView Component
//!
//! Shown while the session waits on the network: a spinner, what it is
//! waiting for and, while (re)connecting, the attempt number.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::Pending;
use crate::tui::component::Component;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct LoadingView<'a> {
    pub address: &'a str,
    pub pending: Pending,
    pub attempts: u32,
    pub spinner_frame: usize,
}

impl LoadingView<'_> {
    fn message(&self) -> String {
        match self.pending {
            Pending::Connect => {
                format!("Connecting to {} (attempt {})", self.address, self.attempts)
            }
            Pending::Retry => format!(
                "Could not reach {}; retrying (attempt {} failed)",
                self.address, self.attempts
            ),
            Pending::Command | Pending::Idle => "Loading..".to_string(),
        }
    }
}

impl Component for LoadingView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [_, row, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
        let line = Line::from(vec![
            Span::styled(spinner, Style::default().fg(Color::Magenta)),
            Span::raw(" "),
            Span::raw(self.message()),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_text(view: &mut LoadingView) -> String {
        let backend = TestBackend::new(70, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| view.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_connect_shows_attempt() {
        let mut view = LoadingView {
            address: "127.0.0.1:6379",
            pending: Pending::Connect,
            attempts: 3,
            spinner_frame: 1,
        };
        let text = render_text(&mut view);
        assert!(text.contains("⠙"));
        assert!(text.contains("Connecting to 127.0.0.1:6379 (attempt 3)"));
    }

    #[test]
    fn test_command_shows_loading() {
        let mut view = LoadingView {
            address: "127.0.0.1:6379",
            pending: Pending::Command,
            attempts: 0,
            spinner_frame: 12,
        };
        let text = render_text(&mut view);
        assert!(text.contains("Loading.."));
        assert!(text.contains("⠹"));
    }
}
