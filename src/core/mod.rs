//! # Core Session Logic
//!
//! The client's behaviour: which view is active, what each key press does,
//! and how a reply is interpreted. It knows nothing about terminals and
//! never touches the socket.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Session (state)      │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!          ┌────────────┐                ┌────────────┐
//!          │    TUI     │                │    RESP    │
//!          │  Adapter   │                │ connection │
//!          │ (ratatui)  │                │  (tokio)   │
//!          └────────────┘                └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `Session` struct, all client state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`config`]: Layered settings resolution
//!
//! Reply interpretation lives in `replies`, private to this module.

pub mod action;
pub mod config;
mod replies;
pub mod state;
