//! # TitleBar Component
//!
//! Top status bar: server address, connection status and the latest
//! status message.
//!
//! TitleBar is purely presentational. It receives all data as props and
//! has no internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(
//!     session.address.clone(),
//!     session.is_connected(),
//!     session.status_message.clone(),
//! );
//! title_bar.render(frame, area);
//! ```
//!
//! ## Conditional Formatting
//!
//! 1. **Status message**: `"redis-tui (127.0.0.1:6379) ● connected | Deleted key: a"`
//! 2. **Default**: `"redis-tui (127.0.0.1:6379) ● connected"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    /// Server address (e.g., "127.0.0.1:6379")
    pub address: String,
    pub connected: bool,
    /// Status message (e.g., "Deleted key: user:100")
    pub status_message: String,
}

impl TitleBar {
    pub fn new(address: String, connected: bool, status_message: String) -> Self {
        Self {
            address,
            connected,
            status_message,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (marker, color) = if self.connected {
            ("● connected", Color::Green)
        } else {
            ("○ disconnected", Color::Red)
        };

        let mut spans = vec![
            Span::raw(format!("redis-tui ({}) ", self.address)),
            Span::styled(marker, Style::default().fg(color)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
