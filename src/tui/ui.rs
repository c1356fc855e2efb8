use crate::core::state::{Operation, Session, ViewState};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    ConfirmDialog, EntryListView, InputBox, LoadingView, OutputView, TitleBar,
};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

/// Draw one frame: title bar, the view for the current state, help line.
///
/// A pure function of the session plus presentation-only scroll state.
pub fn draw_ui(frame: &mut Frame, session: &Session, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, help_area] = layout.areas(frame.area());

    TitleBar::new(
        session.address.clone(),
        session.is_connected(),
        session.status_message.clone(),
    )
    .render(frame, title_area);

    match session.state {
        ViewState::Menu => EntryListView::new(&session.menu).render(frame, main_area),
        ViewState::Browser => EntryListView::new(&session.keys).render(frame, main_area),
        ViewState::FieldSelect => EntryListView::new(&session.fields).render(frame, main_area),
        ViewState::InputKey | ViewState::InputField | ViewState::InputValue => InputBox::new(
            input_prompt(session.state),
            input_context(session),
            &session.input,
        )
        .render(frame, main_area),
        ViewState::Output => {
            OutputView::new(&session.output, &mut tui.output_scroll).render(frame, main_area)
        }
        ViewState::Loading => LoadingView {
            address: &session.address,
            pending: session.pending,
            attempts: session.connect_attempts,
            spinner_frame: tui.spinner_frame,
        }
        .render(frame, main_area),
        ViewState::Confirmation => {
            // Keep the list being acted on visible underneath
            let underneath = if session.previous_state == Some(ViewState::FieldSelect) {
                &session.fields
            } else {
                &session.keys
            };
            EntryListView::new(underneath).render(frame, main_area);
            ConfirmDialog::new(confirmation_prompt(session)).render(frame, main_area);
        }
    }

    let help = Paragraph::new(help_text(session.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, help_area);
}

fn input_prompt(state: ViewState) -> &'static str {
    match state {
        ViewState::InputField => "Input the field",
        ViewState::InputValue => "Input the value",
        _ => "Input the key",
    }
}

/// What has been entered so far, e.g. `HSET user:100 role`.
fn input_context(session: &Session) -> String {
    let Some(op) = session.selected_op else {
        return String::new();
    };
    let mut parts = vec![op.label().to_string()];
    if session.state != ViewState::InputKey {
        parts.push(session.active_key.clone());
    }
    if session.state == ViewState::InputValue {
        match op {
            Operation::HSet => parts.push(session.active_field.clone()),
            Operation::LSet => {
                if let Some(index) = session.active_index {
                    parts.push(format!("[{index}]"));
                }
            }
            _ => {}
        }
    }
    format!(" {} ", parts.join(" "))
}

pub fn confirmation_prompt(session: &Session) -> String {
    match session.selected_op {
        Some(Operation::Del) => format!(
            "Are you sure you want to delete the key: {}? (y/n)",
            session.active_key
        ),
        Some(Operation::HDel) => format!(
            "Are you sure you want to delete the field: {}? (y/n)",
            session.active_field
        ),
        Some(Operation::LRem) => format!(
            "Remove one instance of value: {}? (y/n)",
            session.active_field
        ),
        Some(op) => format!(
            "Are you sure you want to perform this action: {}? (y/n)",
            op.label()
        ),
        None => "Are you sure? (y/n)".to_string(),
    }
}

fn help_text(state: ViewState) -> &'static str {
    match state {
        ViewState::Menu => "↑/↓: Move • Enter: Select • Ctrl+C: Quit",
        ViewState::InputKey | ViewState::InputField | ViewState::InputValue => {
            "Enter: Confirm • Esc: Menu • Ctrl+C: Quit"
        }
        ViewState::FieldSelect => "↑/↓: Move • Enter: Open • d: Delete • Esc: Back",
        ViewState::Browser => "↑/↓: Move • Enter: Open • d: Delete • Esc: Menu",
        ViewState::Output => "Esc: Return • e: Edit • ↑/↓: Scroll",
        ViewState::Loading => "Ctrl+C: Quit",
        ViewState::Confirmation => "y: Confirm • n/Esc: Cancel",
    }
}
