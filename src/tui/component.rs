use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable UI component.
///
/// Components receive data via props (struct fields), may borrow
/// presentation state mutably, and render to a `Frame` within a given
/// `Rect`.
///
/// `render` takes `&mut self` so components can update presentation state
/// (scroll offsets, list selection) during the render pass, in line with
/// ratatui's `StatefulWidget`.
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}
