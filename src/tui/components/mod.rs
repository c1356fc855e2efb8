//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as parameters:
//! - `TitleBar`: address, connection status, status message
//! - `ConfirmDialog`: centered y/n overlay
//! - `LoadingView`: spinner and connect attempt
//!
//! ### Transient Wrappers Over Borrowed State
//!
//! Created each frame around state that lives elsewhere:
//! - `EntryListView`: one of the session's lists (`&EntryList`)
//! - `InputBox`: the session's text entry (`&TextEntry`)
//! - `OutputView`: the result text plus `&mut ScrollViewState` from `TuiState`
//!
//! Components receive external data as props, not by reaching into the
//! `Session`, so each can be rendered against a `TestBackend` in isolation.
//!
//! ```text
//! components/
//! ├── mod.rs             (this file)
//! ├── title_bar.rs       (Top status bar)
//! ├── entry_list.rs      (Menu, key browser, field list)
//! ├── input_box.rs       (Single-line entry with cursor)
//! ├── output_view.rs     (Scrollable result)
//! ├── confirm_dialog.rs  (Destructive action overlay)
//! └── loading.rs         (Spinner)
//! ```

mod confirm_dialog;
mod entry_list;
mod input_box;
mod loading;
mod output_view;
mod title_bar;

pub use confirm_dialog::ConfirmDialog;
pub use entry_list::EntryListView;
pub use input_box::InputBox;
pub use loading::LoadingView;
pub use output_view::OutputView;
pub use title_bar::TitleBar;
