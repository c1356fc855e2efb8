//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into `core::Action` values and turns each
//! returned `Effect` into a background task.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! ```text
//! crossterm event ──▶ Action ──▶ update() ──▶ Effect ──▶ tokio task
//!                        ▲                                   │
//!                        └──────── mpsc channel ◀────────────┘
//! ```
//!
//! Every task answers with exactly one `Action`. The loop drains terminal
//! events first, then task results, then redraws.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the spinner turns.
//! - **Idle**: sleeps up to 500ms, only redraws on events.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use tui_scrollview::ScrollViewState;

use crate::core::action::{Action, Effect, KeyInput, init, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::{Session, ViewState};
use crate::resp::{Command, Connection, RespError, SharedConnection};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of the session)
pub struct TuiState {
    /// Scroll position of the Output view; reset on every view change
    pub output_scroll: ScrollViewState,
    pub spinner_frame: usize,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            output_scroll: ScrollViewState::default(),
            spinner_frame: 0,
        }
    }

    /// Output scrolling is presentation only and never reaches the core.
    /// Returns true if the key was consumed.
    fn scroll_output(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Up => self.output_scroll.scroll_up(),
            KeyInput::Down => self.output_scroll.scroll_down(),
            KeyInput::PageUp => self.output_scroll.scroll_page_up(),
            KeyInput::PageDown => self.output_scroll.scroll_page_down(),
            KeyInput::Home => self.output_scroll.scroll_to_top(),
            KeyInput::End => self.output_scroll.scroll_to_bottom(),
            _ => return false,
        }
        true
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape,
            Hide // Hide cursor on exit
        );
    }
}

/// Settings the effect runner needs for spawning tasks.
struct Runtime {
    tx: mpsc::Sender<Action>,
    retry_delay: Duration,
    scan_count: Option<u32>,
}

impl Runtime {
    /// Start the task for `effect`. Returns true if the loop should quit.
    fn run(&self, effect: Effect, session: &Session) -> bool {
        match effect {
            Effect::None => false,
            Effect::Quit => true,
            Effect::Connect => {
                spawn_connect(session.address.clone(), self.tx.clone());
                false
            }
            Effect::ScheduleReconnect => {
                spawn_retry_timer(self.retry_delay, self.tx.clone());
                false
            }
            Effect::Execute(command) => {
                match session.connection.clone() {
                    Some(connection) => spawn_command(connection, command, self.tx.clone()),
                    None => send(&self.tx, Action::CommandResult(Err(RespError::NotConnected))),
                }
                false
            }
            Effect::ScanKeys { pattern } => {
                match session.connection.clone() {
                    Some(connection) => {
                        spawn_scan(connection, pattern, self.scan_count, self.tx.clone())
                    }
                    None => send(&self.tx, Action::CommandResult(Err(RespError::NotConnected))),
                }
                false
            }
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut session = Session::new(config.address.clone(), config.scan_pattern.clone());
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let runtime = Runtime {
        tx,
        retry_delay: config.retry_delay,
        scan_count: config.scan_count,
    };

    let effect = init(&mut session);
    runtime.run(effect, &session);

    // Animation timer
    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        let animating = session.state == ViewState::Loading;
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            tui.spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &session, &mut tui))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match event {
                TuiEvent::ForceQuit => Action::Quit,
                TuiEvent::Resize(width, height) => Action::Resize { width, height },
                TuiEvent::Paste(text) => Action::Paste(text),
                TuiEvent::Key(key) => {
                    if session.state == ViewState::Output && tui.scroll_output(key) {
                        continue;
                    }
                    Action::Key(key)
                }
            };
            if dispatch(&mut session, &mut tui, &runtime, action) {
                break 'main;
            }
        }

        // Handle background task results
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut session, &mut tui, &runtime, action) {
                break 'main;
            }
        }
    }

    info!("Shutting down");
    ratatui::restore();
    Ok(())
}

/// Feed one action through the reducer and run its effect.
fn dispatch(session: &mut Session, tui: &mut TuiState, runtime: &Runtime, action: Action) -> bool {
    let before = session.state;
    let effect = update(session, action);
    if session.state != before {
        tui.output_scroll = ScrollViewState::default();
    }
    runtime.run(effect, session)
}

fn send(tx: &mpsc::Sender<Action>, action: Action) {
    if tx.send(action).is_err() {
        warn!("Failed to deliver action: receiver dropped");
    }
}

fn spawn_connect(address: String, tx: mpsc::Sender<Action>) {
    info!("Connecting to {}", address);
    tokio::spawn(async move {
        let result = Connection::connect(&address)
            .await
            .map(Connection::into_shared);
        send(&tx, Action::ConnectionResult(result));
    });
}

fn spawn_retry_timer(delay: Duration, tx: mpsc::Sender<Action>) {
    debug!("Retrying connection in {:?}", delay);
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        send(&tx, Action::RetryTimerFired);
    });
}

fn spawn_command(connection: SharedConnection, command: Command, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        let result = connection.lock().await.request(&command).await;
        send(&tx, Action::CommandResult(result));
    });
}

fn spawn_scan(
    connection: SharedConnection,
    pattern: String,
    count: Option<u32>,
    tx: mpsc::Sender<Action>,
) {
    tokio::spawn(async move {
        let result = connection.lock().await.scan_keys(&pattern, count).await;
        send(&tx, Action::CommandResult(result));
    });
}
