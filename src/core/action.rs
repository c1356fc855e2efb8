//! # Actions
//!
//! Everything that can happen in the client becomes an `Action`.
//! User presses Enter? That's `Action::Key(KeyInput::Enter)`.
//! Server answers? That's `Action::CommandResult(Ok(reply))`.
//!
//! The `update()` function takes the session and an action, mutates the
//! session, and returns at most one `Effect` for the runtime to execute.
//! No I/O happens here.
//!
//! ```text
//! Session + Action  →  update()  →  Session' + Effect
//! ```
//!
//! Reply interpretation (the per-operation dispatch table) lives in
//! `replies.rs`.

use log::{debug, error, info, warn};

use crate::core::replies;
use crate::core::state::{EntryList, Operation, Pending, Session, TextEntry, ViewState};
use crate::resp::{Command, Reply, RespError, SharedConnection};

/// Keys the controller reacts to. Terminal specifics are translated by the
/// TUI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Enter,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
    Char(char),
}

#[derive(Debug)]
pub enum Action {
    Key(KeyInput),
    /// Bracketed paste into the text entry.
    Paste(String),
    Resize {
        width: u16,
        height: u16,
    },
    ConnectionResult(Result<SharedConnection, RespError>),
    CommandResult(Result<Reply, RespError>),
    RetryTimerFired,
    Quit,
}

/// Follow-up work for the runtime. Each one is a one-shot task that
/// answers with exactly one `Action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    /// Open a connection to `session.address`.
    Connect,
    /// Wait the retry delay, then deliver `RetryTimerFired`.
    ScheduleReconnect,
    /// Send a command on the session's connection and read its reply.
    Execute(Command),
    /// Run a full cursor-driven key scan.
    ScanKeys { pattern: String },
}

/// Startup task: the first connect attempt.
pub fn init(session: &mut Session) -> Effect {
    info!("Starting session against {}", session.address);
    start_connect(session)
}

pub fn update(session: &mut Session, action: Action) -> Effect {
    match action {
        Action::Quit => {
            info!("Quit requested");
            Effect::Quit
        }
        Action::Resize { width, height } => {
            debug!("Terminal resized to {}x{}", width, height);
            Effect::None
        }
        Action::ConnectionResult(result) => connection_result(session, result),
        Action::RetryTimerFired => retry_timer_fired(session),
        Action::CommandResult(result) => command_result(session, result),
        Action::Paste(text) => {
            if accepts_text(session.state) {
                session.input.insert_str(&text);
            }
            Effect::None
        }
        Action::Key(key) => match session.state {
            ViewState::Menu => menu_key(session, key),
            ViewState::InputKey => input_key(session, key),
            ViewState::InputField => input_field_key(session, key),
            ViewState::InputValue => input_value_key(session, key),
            ViewState::FieldSelect => field_select_key(session, key),
            ViewState::Output => output_key(session, key),
            ViewState::Browser => browser_key(session, key),
            ViewState::Confirmation => confirmation_key(session, key),
            // Only connection results, replies and the retry timer leave Loading
            ViewState::Loading => Effect::None,
        },
    }
}

// ============================================================================
// Network results
// ============================================================================

fn connection_result(session: &mut Session, result: Result<SharedConnection, RespError>) -> Effect {
    if session.pending != Pending::Connect {
        warn!(
            "Connection result arrived while {:?}; applying anyway",
            session.pending
        );
    }

    match result {
        Ok(connection) => {
            info!(
                "Connected to {} after {} attempt(s)",
                session.address, session.connect_attempts
            );
            session.connection = Some(connection);
            session.pending = Pending::Idle;
            session.connect_attempts = 0;
            session.status_message = format!("Connected to {}", session.address);
            session.state = session.previous_state.unwrap_or(ViewState::Menu);
            Effect::None
        }
        Err(e) => {
            warn!(
                "Connect to {} failed (attempt {}): {}",
                session.address, session.connect_attempts, e
            );
            session.connection = None;
            session.enter_loading();
            session.pending = Pending::Retry;
            session.status_message = format!("Connection failed: {e}");
            Effect::ScheduleReconnect
        }
    }
}

fn retry_timer_fired(session: &mut Session) -> Effect {
    if session.pending != Pending::Retry {
        debug!("Retry timer fired while {:?}; ignoring", session.pending);
        return Effect::None;
    }
    start_connect(session)
}

fn command_result(session: &mut Session, result: Result<Reply, RespError>) -> Effect {
    if session.pending != Pending::Command {
        warn!(
            "Discarding command result that arrived while {:?}",
            session.pending
        );
        return Effect::None;
    }
    session.pending = Pending::Idle;

    let op = session.selected_op.map(Operation::label).unwrap_or("-");
    match result {
        Err(e) if e.is_transport() => {
            warn!("Transport failure during {}: {}", op, e);
            session.connection = None;
            session.enter_loading();
            session.status_message = "Connection lost, reconnecting".to_string();
            start_connect(session)
        }
        Err(e) => {
            // Stream position is unknown after a bad frame; reconnect on next use
            error!("Protocol failure during {}: {}", op, e);
            session.connection = None;
            session.show_output(e.to_string());
            Effect::None
        }
        Ok(Reply::Error(msg)) => {
            info!("Server error for {}: {}", op, msg);
            session.show_output(msg);
            Effect::None
        }
        Ok(reply) => replies::apply(session, reply),
    }
}

fn start_connect(session: &mut Session) -> Effect {
    session.pending = Pending::Connect;
    session.connect_attempts += 1;
    debug!(
        "Connect attempt {} to {}",
        session.connect_attempts, session.address
    );
    Effect::Connect
}

// ============================================================================
// Issuing commands
// ============================================================================

/// Enter Loading under `op` and send `command`.
pub(crate) fn execute(session: &mut Session, op: Operation, command: Command) -> Effect {
    session.selected_op = Some(op);
    session.enter_loading();
    dispatch(session, Effect::Execute(command))
}

/// Enter Loading and scan all keys for the browser.
pub(crate) fn explore(session: &mut Session) -> Effect {
    session.selected_op = Some(Operation::Explore);
    session.enter_loading();
    let pattern = session.scan_pattern.clone();
    dispatch(session, Effect::ScanKeys { pattern })
}

/// Hand a network effect to the runtime, keeping one request in flight.
///
/// Without a connection the command is dropped and a connect starts
/// instead; the user re-triggers it once the session resumes.
fn dispatch(session: &mut Session, effect: Effect) -> Effect {
    if session.pending != Pending::Idle {
        warn!("Refusing {:?} while {:?}", effect, session.pending);
        return Effect::None;
    }
    if session.connection.is_none() {
        info!("Not connected; reconnecting before {:?}", effect);
        return start_connect(session);
    }
    session.pending = Pending::Command;
    effect
}

// ============================================================================
// Key handling per view
// ============================================================================

fn accepts_text(state: ViewState) -> bool {
    matches!(
        state,
        ViewState::InputKey | ViewState::InputField | ViewState::InputValue
    )
}

/// List navigation shared by the menu, browser and field list.
fn navigate(list: &mut EntryList, key: KeyInput) {
    match key {
        KeyInput::Up => list.move_selection(-1),
        KeyInput::Down => list.move_selection(1),
        KeyInput::PageUp => list.move_selection(-(EntryList::PAGE as isize)),
        KeyInput::PageDown => list.move_selection(EntryList::PAGE as isize),
        KeyInput::Home => list.select_first(),
        KeyInput::End => list.select_last(),
        _ => {}
    }
}

fn edit_text(entry: &mut TextEntry, key: KeyInput) {
    match key {
        KeyInput::Char(c) => entry.insert(c),
        KeyInput::Backspace => entry.backspace(),
        KeyInput::Delete => entry.delete(),
        KeyInput::Left => entry.move_left(),
        KeyInput::Right => entry.move_right(),
        KeyInput::Home => entry.cursor_home(),
        KeyInput::End => entry.cursor_end(),
        _ => {}
    }
}

fn menu_key(session: &mut Session, key: KeyInput) -> Effect {
    if key != KeyInput::Enter {
        navigate(&mut session.menu, key);
        return Effect::None;
    }

    let Some(op) = session
        .menu
        .selected_item()
        .and_then(|entry| Operation::from_label(&entry.title))
    else {
        return Effect::None;
    };
    session.selected_op = Some(op);

    match op {
        Operation::Set
        | Operation::Get
        | Operation::HSet
        | Operation::HGet
        | Operation::Delete
        | Operation::RPush => {
            session.input.clear();
            session.push_state(ViewState::InputKey);
            Effect::None
        }
        Operation::Explore => {
            session.keys.set_items(Vec::new());
            explore(session)
        }
        _ => Effect::None,
    }
}

fn input_key(session: &mut Session, key: KeyInput) -> Effect {
    match key {
        KeyInput::Esc => {
            session.reset_to_menu();
            Effect::None
        }
        KeyInput::Enter => {
            session.active_key = session.input.take();
            let k = session.active_key.clone();

            match session.selected_op {
                Some(Operation::Get) => execute(session, Operation::Get, Command::new("GET", [k])),
                Some(Operation::HGet) => {
                    // The field list replaces the wizard; backing out of it goes to the menu
                    session.state = ViewState::Menu;
                    execute(session, Operation::HKeys, Command::new("HKEYS", [k]))
                }
                Some(Operation::Delete) => {
                    execute(session, Operation::Delete, Command::new("DEL", [k]))
                }
                Some(Operation::Set | Operation::RPush) => {
                    session.state = ViewState::InputValue;
                    Effect::None
                }
                Some(Operation::HSet) => {
                    session.state = ViewState::InputField;
                    Effect::None
                }
                _ => Effect::None,
            }
        }
        other => {
            edit_text(&mut session.input, other);
            Effect::None
        }
    }
}

fn input_field_key(session: &mut Session, key: KeyInput) -> Effect {
    match key {
        KeyInput::Esc => session.reset_to_menu(),
        KeyInput::Enter => {
            session.active_field = session.input.take();
            if session.selected_op == Some(Operation::HSet) {
                session.state = ViewState::InputValue;
            }
        }
        other => edit_text(&mut session.input, other),
    }
    Effect::None
}

fn input_value_key(session: &mut Session, key: KeyInput) -> Effect {
    match key {
        KeyInput::Esc => {
            session.reset_to_menu();
            Effect::None
        }
        KeyInput::Enter => {
            session.active_value = session.input.take();
            let k = session.active_key.clone();
            let value = session.active_value.clone();

            match session.selected_op {
                Some(Operation::Set) => {
                    execute(session, Operation::Set, Command::new("SET", [k, value]))
                }
                Some(Operation::HSet) => {
                    let field = session.active_field.clone();
                    execute(
                        session,
                        Operation::HSet,
                        Command::new("HSET", [k, field, value]),
                    )
                }
                Some(Operation::RPush) => {
                    execute(session, Operation::RPush, Command::new("RPUSH", [k, value]))
                }
                Some(Operation::LSet) => match session.active_index {
                    Some(index) => execute(
                        session,
                        Operation::LSet,
                        Command::new("LSET", [k, index.to_string(), value]),
                    ),
                    None => {
                        session.show_output("No list element selected");
                        Effect::None
                    }
                },
                _ => Effect::None,
            }
        }
        other => {
            edit_text(&mut session.input, other);
            Effect::None
        }
    }
}

fn field_select_key(session: &mut Session, key: KeyInput) -> Effect {
    match key {
        KeyInput::Esc => {
            session.input.clear();
            session.output.clear();
            session.state = session.list_origin;
            Effect::None
        }
        KeyInput::Enter => {
            let Some(entry) = session.fields.selected_item().cloned() else {
                return Effect::None;
            };
            session.active_field = entry.title.clone();
            session.active_index = entry.index;

            match session.selected_op {
                Some(Operation::HGet | Operation::HKeys | Operation::Explore) => {
                    let k = session.active_key.clone();
                    execute(
                        session,
                        Operation::HGet,
                        Command::new("HGET", [k, entry.title]),
                    )
                }
                Some(Operation::ExploreList) => {
                    // Element values are already known; no round trip
                    session.previous_state = Some(ViewState::FieldSelect);
                    session.show_value(entry.title, entry.binary);
                    Effect::None
                }
                _ => Effect::None,
            }
        }
        KeyInput::Char('d') => {
            let Some(entry) = session.fields.selected_item().cloned() else {
                return Effect::None;
            };
            session.active_field = entry.title;
            session.active_index = entry.index;
            session.selected_op = Some(if session.selected_op == Some(Operation::ExploreList) {
                Operation::LRem
            } else {
                Operation::HDel
            });
            session.push_state(ViewState::Confirmation);
            Effect::None
        }
        other => {
            navigate(&mut session.fields, other);
            Effect::None
        }
    }
}

fn output_key(session: &mut Session, key: KeyInput) -> Effect {
    match key {
        KeyInput::Esc => {
            session.input.clear();
            session.output.clear();
            session.state = session.previous_state.unwrap_or(ViewState::Menu);
        }
        KeyInput::Char('e') if session.output_binary => {
            info!("Refusing to edit a binary value as text");
            session.status_message = "Value is not valid UTF-8 and cannot be edited".to_string();
        }
        KeyInput::Char('e') => {
            let has_index = session.active_index.is_some();
            let (edit_op, seed) = match session.selected_op {
                Some(Operation::Get) => (Operation::Set, session.output.clone()),
                Some(Operation::HGet) => (Operation::HSet, session.output.clone()),
                Some(Operation::ExploreList) if has_index => {
                    (Operation::LSet, session.output.clone())
                }
                // The output of a write is its status; edit the value sent instead
                Some(op @ (Operation::Set | Operation::HSet)) => (op, session.active_value.clone()),
                Some(Operation::LSet) if has_index => {
                    (Operation::LSet, session.active_value.clone())
                }
                _ => return Effect::None,
            };
            debug!("Editing output as {}", edit_op.label());
            session.selected_op = Some(edit_op);
            session.input.set_value(seed);
            session.input.cursor_end();
            session.state = ViewState::InputValue;
        }
        _ => {}
    }
    Effect::None
}

fn browser_key(session: &mut Session, key: KeyInput) -> Effect {
    match key {
        KeyInput::Esc => {
            session.reset_to_menu();
            Effect::None
        }
        KeyInput::Enter => {
            let Some(entry) = session.keys.selected_item() else {
                return Effect::None;
            };
            session.active_key = entry.title.clone();
            let k = session.active_key.clone();
            execute(session, Operation::CheckType, Command::new("TYPE", [k]))
        }
        KeyInput::Char('d') => {
            let Some(entry) = session.keys.selected_item() else {
                return Effect::None;
            };
            session.active_key = entry.title.clone();
            session.selected_op = Some(Operation::Del);
            session.push_state(ViewState::Confirmation);
            Effect::None
        }
        other => {
            navigate(&mut session.keys, other);
            Effect::None
        }
    }
}

fn confirmation_key(session: &mut Session, key: KeyInput) -> Effect {
    match key {
        KeyInput::Char('y' | 'Y') => {
            let k = session.active_key.clone();
            let target = session.active_field.clone();
            let command = match session.selected_op {
                Some(Operation::Del) => Command::new("DEL", [k]),
                Some(Operation::HDel) => Command::new("HDEL", [k, target]),
                // Removes one occurrence of the element
                Some(Operation::LRem) => Command::new("LREM", [k, "1".to_string(), target]),
                _ => {
                    session.state = session.previous_state.unwrap_or(ViewState::Menu);
                    return Effect::None;
                }
            };
            // PreviousState is left alone so the refresh lands back on the list
            session.state = ViewState::Loading;
            dispatch(session, Effect::Execute(command))
        }
        KeyInput::Char('n' | 'N') | KeyInput::Esc => {
            session.selected_op = session.selected_op.map(|op| match op {
                Operation::LRem => Operation::ExploreList,
                Operation::HDel => Operation::HKeys,
                Operation::Del => Operation::Explore,
                other => other,
            });
            session.state = session.previous_state.unwrap_or(ViewState::Menu);
            Effect::None
        }
        _ => Effect::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::ListEntry;
    use crate::test_support::{connected_session, test_connection, test_session};
    use std::io;

    fn press(session: &mut Session, key: KeyInput) -> Effect {
        update(session, Action::Key(key))
    }

    fn type_text(session: &mut Session, text: &str) {
        for c in text.chars() {
            assert_eq!(press(session, KeyInput::Char(c)), Effect::None);
        }
    }

    fn choose_menu(session: &mut Session, label: &str) -> Effect {
        press(session, KeyInput::Home);
        while session.menu.selected_item().unwrap().title != label {
            press(session, KeyInput::Down);
        }
        press(session, KeyInput::Enter)
    }

    fn select(list: &mut EntryList, title: &str) {
        list.select_first();
        while list.selected_item().unwrap().title != title {
            list.move_selection(1);
        }
    }

    fn reply(session: &mut Session, reply: Reply) -> Effect {
        update(session, Action::CommandResult(Ok(reply)))
    }

    fn bulk(s: &str) -> Reply {
        Reply::bulk(s.to_string())
    }

    fn bulk_array(items: &[&str]) -> Reply {
        Reply::Array(Some(items.iter().map(|s| bulk(s)).collect()))
    }

    fn cmd(name: &str, args: &[&str]) -> Effect {
        Effect::Execute(Command::new(name, args.iter().copied()))
    }

    fn eof() -> RespError {
        RespError::Transport(io::Error::from(io::ErrorKind::UnexpectedEof))
    }

    #[test]
    fn test_init_connects_then_shows_menu() {
        let mut session = test_session();
        assert_eq!(init(&mut session), Effect::Connect);
        assert_eq!(session.state, ViewState::Loading);
        assert_eq!(session.pending, Pending::Connect);

        let effect = update(&mut session, Action::ConnectionResult(Ok(test_connection())));
        assert_eq!(effect, Effect::None);
        assert_eq!(session.state, ViewState::Menu);
        assert!(session.is_connected());
        assert_eq!(session.connect_attempts, 0);
    }

    #[test]
    fn test_set_then_get() {
        let mut session = connected_session();

        assert_eq!(choose_menu(&mut session, "SET"), Effect::None);
        assert_eq!(session.state, ViewState::InputKey);
        assert_eq!(session.previous_state, Some(ViewState::Menu));
        type_text(&mut session, "myConfig");
        assert_eq!(press(&mut session, KeyInput::Enter), Effect::None);
        assert_eq!(session.state, ViewState::InputValue);
        type_text(&mut session, "true");
        assert_eq!(
            press(&mut session, KeyInput::Enter),
            cmd("SET", &["myConfig", "true"])
        );
        assert_eq!(session.state, ViewState::Loading);

        reply(&mut session, Reply::Text("OK".into()));
        assert_eq!(session.state, ViewState::Output);
        assert_eq!(session.output, "OK");

        press(&mut session, KeyInput::Esc);
        assert_eq!(session.state, ViewState::InputValue);
        press(&mut session, KeyInput::Esc);
        assert_eq!(session.state, ViewState::Menu);

        choose_menu(&mut session, "GET");
        type_text(&mut session, "myConfig");
        assert_eq!(press(&mut session, KeyInput::Enter), cmd("GET", &["myConfig"]));
        reply(&mut session, bulk("true"));
        assert_eq!(session.state, ViewState::Output);
        assert_eq!(session.output, "true");
    }

    #[test]
    fn test_explore_to_hash_field() {
        let mut session = connected_session();

        assert_eq!(
            choose_menu(&mut session, "EXPLORE"),
            Effect::ScanKeys {
                pattern: "*".to_string()
            }
        );
        assert_eq!(session.state, ViewState::Loading);
        reply(&mut session, bulk_array(&["user:100", "config:app"]));
        assert_eq!(session.state, ViewState::Browser);
        assert_eq!(session.keys.items()[0], ListEntry::new("user:100", "key"));

        assert_eq!(press(&mut session, KeyInput::Enter), cmd("TYPE", &["user:100"]));
        assert_eq!(session.selected_op, Some(Operation::CheckType));
        assert_eq!(
            reply(&mut session, Reply::Text("hash".into())),
            cmd("HKEYS", &["user:100"])
        );
        assert_eq!(session.state, ViewState::Loading);

        reply(&mut session, bulk_array(&["name", "role"]));
        assert_eq!(session.state, ViewState::FieldSelect);
        assert_eq!(session.fields.items().len(), 2);
        assert_eq!(session.fields.items()[1].description, "Hash Field");

        assert_eq!(
            press(&mut session, KeyInput::Enter),
            cmd("HGET", &["user:100", "name"])
        );
        reply(&mut session, bulk("Alice"));
        assert_eq!(session.state, ViewState::Output);
        assert_eq!(session.output, "Alice");

        press(&mut session, KeyInput::Esc);
        assert_eq!(session.state, ViewState::FieldSelect);
        press(&mut session, KeyInput::Esc);
        assert_eq!(session.state, ViewState::Browser);
        press(&mut session, KeyInput::Esc);
        assert_eq!(session.state, ViewState::Menu);
    }

    #[test]
    fn test_destructive_action_preserves_history() {
        let mut session = connected_session();
        choose_menu(&mut session, "EXPLORE");
        reply(&mut session, bulk_array(&["user:100", "config:app"]));
        assert_eq!(session.previous_state, Some(ViewState::Menu));

        assert_eq!(press(&mut session, KeyInput::Char('d')), Effect::None);
        assert_eq!(session.state, ViewState::Confirmation);
        assert_eq!(session.selected_op, Some(Operation::Del));
        assert_eq!(session.previous_state, Some(ViewState::Browser));

        assert_eq!(press(&mut session, KeyInput::Char('y')), cmd("DEL", &["user:100"]));
        assert_eq!(session.state, ViewState::Loading);
        assert_eq!(session.previous_state, Some(ViewState::Browser));

        let effect = reply(&mut session, Reply::Integer(1));
        assert_eq!(
            effect,
            Effect::ScanKeys {
                pattern: "*".to_string()
            }
        );
        assert_eq!(session.status_message, "Deleted key: user:100");
        assert_eq!(session.previous_state, Some(ViewState::Browser));

        reply(&mut session, bulk_array(&["config:app"]));
        assert_eq!(session.state, ViewState::Browser);
        assert_eq!(session.keys.items().len(), 1);

        // Open the remaining string key, then back out of the output
        press(&mut session, KeyInput::Enter);
        assert_eq!(
            reply(&mut session, Reply::Text("string".into())),
            cmd("GET", &["config:app"])
        );
        reply(&mut session, bulk("{\"debug\":true}"));
        assert_eq!(session.state, ViewState::Output);
        press(&mut session, KeyInput::Esc);
        assert_eq!(session.state, ViewState::Browser);
    }

    #[test]
    fn test_confirmation_cancel_restores_list() {
        let mut session = connected_session();
        choose_menu(&mut session, "EXPLORE");
        reply(&mut session, bulk_array(&["user:100"]));
        press(&mut session, KeyInput::Char('d'));

        assert_eq!(press(&mut session, KeyInput::Char('n')), Effect::None);
        assert_eq!(session.state, ViewState::Browser);
        assert_eq!(session.selected_op, Some(Operation::Explore));
        assert!(session.is_connected());
    }

    #[test]
    fn test_reconnect_retries_forever_then_resumes() {
        let mut session = test_session();
        init(&mut session);

        for attempt in 1..=5 {
            assert_eq!(session.connect_attempts, attempt);
            let effect = update(
                &mut session,
                Action::ConnectionResult(Err(RespError::Transport(io::Error::from(
                    io::ErrorKind::ConnectionRefused,
                )))),
            );
            assert_eq!(effect, Effect::ScheduleReconnect);
            assert_eq!(session.state, ViewState::Loading);
            assert_eq!(session.pending, Pending::Retry);

            // Keys never leave Loading
            assert_eq!(press(&mut session, KeyInput::Enter), Effect::None);

            assert_eq!(update(&mut session, Action::RetryTimerFired), Effect::Connect);
        }

        update(&mut session, Action::ConnectionResult(Ok(test_connection())));
        assert_eq!(session.state, ViewState::Menu);
    }

    #[test]
    fn test_transport_failure_resumes_previous_view() {
        let mut session = connected_session();
        choose_menu(&mut session, "GET");
        type_text(&mut session, "k");
        press(&mut session, KeyInput::Enter);
        assert_eq!(session.previous_state, Some(ViewState::InputKey));

        let effect = update(&mut session, Action::CommandResult(Err(eof())));
        assert_eq!(effect, Effect::Connect);
        assert_eq!(session.state, ViewState::Loading);
        assert!(!session.is_connected());

        // A failed reconnect keeps the resume target
        update(
            &mut session,
            Action::ConnectionResult(Err(RespError::NotConnected)),
        );
        update(&mut session, Action::RetryTimerFired);
        assert_eq!(session.previous_state, Some(ViewState::InputKey));

        update(&mut session, Action::ConnectionResult(Ok(test_connection())));
        assert_eq!(session.state, ViewState::InputKey);
        assert_eq!(session.active_key, "k");
    }

    #[test]
    fn test_only_one_command_in_flight() {
        let mut session = connected_session();
        choose_menu(&mut session, "GET");
        type_text(&mut session, "a");
        assert_eq!(press(&mut session, KeyInput::Enter), cmd("GET", &["a"]));
        assert_eq!(session.pending, Pending::Command);

        for key in [KeyInput::Enter, KeyInput::Esc, KeyInput::Char('y'), KeyInput::Down] {
            assert_eq!(press(&mut session, key), Effect::None);
        }
        assert_eq!(update(&mut session, Action::RetryTimerFired), Effect::None);

        reply(&mut session, bulk("1"));
        assert_eq!(session.pending, Pending::Idle);

        // A second result has no command to belong to
        assert_eq!(reply(&mut session, bulk("2")), Effect::None);
        assert_eq!(session.output, "1");
    }

    #[test]
    fn test_list_browse_edit_and_remove() {
        let mut session = connected_session();
        choose_menu(&mut session, "EXPLORE");
        reply(&mut session, bulk_array(&["groceries"]));
        press(&mut session, KeyInput::Enter);
        assert_eq!(
            reply(&mut session, Reply::Text("list".into())),
            cmd("LRANGE", &["groceries", "0", "-1"])
        );
        reply(&mut session, bulk_array(&["eggs", "milk", "bread"]));
        assert_eq!(session.selected_op, Some(Operation::ExploreList));
        assert_eq!(session.fields.items()[2].description, "Index: 2");

        select(&mut session.fields, "milk");
        assert_eq!(press(&mut session, KeyInput::Enter), Effect::None);
        assert_eq!(session.state, ViewState::Output);
        assert_eq!(session.output, "milk");

        press(&mut session, KeyInput::Char('e'));
        assert_eq!(session.state, ViewState::InputValue);
        assert_eq!(session.selected_op, Some(Operation::LSet));
        assert_eq!(session.input.value(), "milk");
        assert_eq!(session.input.cursor(), 4);
        type_text(&mut session, "!");
        assert_eq!(
            press(&mut session, KeyInput::Enter),
            cmd("LSET", &["groceries", "1", "milk!"])
        );
        reply(&mut session, Reply::Text("OK".into()));
        assert_eq!(session.output, "OK");

        // Re-editing a write starts from the value that was sent
        press(&mut session, KeyInput::Char('e'));
        assert_eq!(session.input.value(), "milk!");
        assert_eq!(session.selected_op, Some(Operation::LSet));
    }

    #[test]
    fn test_list_element_removal_refreshes() {
        let mut session = connected_session();
        session.active_key = "groceries".to_string();
        execute(
            &mut session,
            Operation::LRange,
            Command::new("LRANGE", ["groceries", "0", "-1"]),
        );
        reply(&mut session, bulk_array(&["eggs", "milk"]));
        select(&mut session.fields, "milk");

        press(&mut session, KeyInput::Char('d'));
        assert_eq!(session.selected_op, Some(Operation::LRem));
        assert_eq!(session.previous_state, Some(ViewState::FieldSelect));
        assert_eq!(
            press(&mut session, KeyInput::Char('Y')),
            cmd("LREM", &["groceries", "1", "milk"])
        );
        assert_eq!(
            reply(&mut session, Reply::Integer(1)),
            cmd("LRANGE", &["groceries", "0", "-1"])
        );
        reply(&mut session, bulk_array(&["eggs"]));
        assert_eq!(session.state, ViewState::FieldSelect);
        assert_eq!(session.fields.selected_item().unwrap().title, "eggs");
        assert_eq!(session.list_origin, ViewState::Menu);
    }

    #[test]
    fn test_hash_field_delete_refreshes_fields() {
        let mut session = connected_session();
        session.active_key = "user:100".to_string();
        execute(&mut session, Operation::HKeys, Command::new("HKEYS", ["user:100"]));
        reply(&mut session, bulk_array(&["name", "role"]));

        press(&mut session, KeyInput::Char('d'));
        assert_eq!(session.selected_op, Some(Operation::HDel));
        assert_eq!(
            press(&mut session, KeyInput::Char('y')),
            cmd("HDEL", &["user:100", "name"])
        );
        assert_eq!(
            reply(&mut session, Reply::Integer(1)),
            cmd("HKEYS", &["user:100"])
        );
        assert_eq!(session.status_message, "Deleted hash field: name");
        reply(&mut session, bulk_array(&["role"]));
        assert_eq!(session.state, ViewState::FieldSelect);
    }

    #[test]
    fn test_zset_pairs_with_odd_trailing_member() {
        let mut session = connected_session();
        session.active_key = "board".to_string();
        execute(
            &mut session,
            Operation::ZRange,
            Command::new("ZRANGE", ["board", "0", "-1", "WITHSCORES"]),
        );
        reply(&mut session, bulk_array(&["ann", "1.5", "bob", "2", "eve"]));

        let items = session.fields.items();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].description, "Score: 1.5");
        assert_eq!(items[2].title, "eve");
        assert_eq!(items[2].description, "Score: unknown");
        assert_eq!(session.selected_op, Some(Operation::ExploreList));
    }

    #[test]
    fn test_hset_wizard_renders_integer() {
        let mut session = connected_session();
        choose_menu(&mut session, "HSET");
        type_text(&mut session, "user:100");
        press(&mut session, KeyInput::Enter);
        assert_eq!(session.state, ViewState::InputField);
        type_text(&mut session, "role");
        press(&mut session, KeyInput::Enter);
        type_text(&mut session, "admin");
        assert_eq!(
            press(&mut session, KeyInput::Enter),
            cmd("HSET", &["user:100", "role", "admin"])
        );
        reply(&mut session, Reply::Integer(1));
        assert_eq!(session.output, "1");
    }

    #[test]
    fn test_hget_wizard_lists_fields_first() {
        let mut session = connected_session();
        choose_menu(&mut session, "HGET");
        type_text(&mut session, "user:100");
        assert_eq!(press(&mut session, KeyInput::Enter), cmd("HKEYS", &["user:100"]));
        reply(&mut session, bulk_array(&["name"]));
        assert_eq!(session.state, ViewState::FieldSelect);
        assert_eq!(session.list_origin, ViewState::Menu);

        // Backing out of the field list lands on a working menu
        press(&mut session, KeyInput::Esc);
        assert_eq!(session.state, ViewState::Menu);
        assert_eq!(choose_menu(&mut session, "HGET"), Effect::None);
        type_text(&mut session, "user:100");
        assert_eq!(press(&mut session, KeyInput::Enter), cmd("HKEYS", &["user:100"]));
        reply(&mut session, bulk_array(&["name"]));

        press(&mut session, KeyInput::Enter);
        reply(&mut session, bulk("Alice"));
        press(&mut session, KeyInput::Char('e'));
        assert_eq!(session.selected_op, Some(Operation::HSet));
        session.input.set_value("Bob");
        assert_eq!(
            press(&mut session, KeyInput::Enter),
            cmd("HSET", &["user:100", "name", "Bob"])
        );
    }

    #[test]
    fn test_rpush_and_delete_from_menu() {
        let mut session = connected_session();
        choose_menu(&mut session, "RPUSH");
        type_text(&mut session, "queue");
        press(&mut session, KeyInput::Enter);
        type_text(&mut session, "job");
        assert_eq!(
            press(&mut session, KeyInput::Enter),
            cmd("RPUSH", &["queue", "job"])
        );
        reply(&mut session, Reply::Integer(3));
        assert_eq!(session.output, "3");

        press(&mut session, KeyInput::Esc);
        press(&mut session, KeyInput::Esc);
        choose_menu(&mut session, "DELETE");
        type_text(&mut session, "queue");
        assert_eq!(press(&mut session, KeyInput::Enter), cmd("DEL", &["queue"]));
        reply(&mut session, Reply::Integer(1));
        assert_eq!(session.output, "1");
    }

    #[test]
    fn test_server_error_is_shown_verbatim() {
        let mut session = connected_session();
        choose_menu(&mut session, "GET");
        type_text(&mut session, "user:100");
        press(&mut session, KeyInput::Enter);
        reply(
            &mut session,
            Reply::Error("WRONGTYPE Operation against a key holding the wrong kind of value".into()),
        );
        assert_eq!(session.state, ViewState::Output);
        assert!(session.output.starts_with("WRONGTYPE"));
        assert!(session.is_connected());
    }

    #[test]
    fn test_refused_scan_is_shown_verbatim() {
        let mut session = connected_session();
        choose_menu(&mut session, "EXPLORE");
        reply(
            &mut session,
            Reply::Error("NOPERM this user has no permissions to run the 'scan' command".into()),
        );
        assert_eq!(session.state, ViewState::Output);
        assert!(session.output.starts_with("NOPERM"));
        assert!(session.is_connected());
        assert_eq!(session.pending, Pending::Idle);
    }

    #[test]
    fn test_binary_value_is_not_editable() {
        let mut session = connected_session();
        choose_menu(&mut session, "GET");
        type_text(&mut session, "blob");
        press(&mut session, KeyInput::Enter);
        reply(&mut session, Reply::bulk(&b"\xff\xfe"[..]));
        assert_eq!(session.state, ViewState::Output);
        assert!(session.output_binary);

        assert_eq!(press(&mut session, KeyInput::Char('e')), Effect::None);
        assert_eq!(session.state, ViewState::Output);
        assert_eq!(session.selected_op, Some(Operation::Get));
        assert!(session.status_message.contains("cannot be edited"));

        // A text value read afterwards is editable again
        press(&mut session, KeyInput::Esc);
        press(&mut session, KeyInput::Esc);
        choose_menu(&mut session, "GET");
        type_text(&mut session, "name");
        press(&mut session, KeyInput::Enter);
        reply(&mut session, bulk("Alice"));
        press(&mut session, KeyInput::Char('e'));
        assert_eq!(session.state, ViewState::InputValue);
        assert_eq!(session.selected_op, Some(Operation::Set));
    }

    #[test]
    fn test_binary_list_element_is_not_editable() {
        let mut session = connected_session();
        session.active_key = "queue".into();
        session.selected_op = Some(Operation::ExploreList);
        session.fields.set_items(vec![ListEntry::indexed("\u{fffd}", 0).mark_binary(true)]);
        session.state = ViewState::FieldSelect;

        press(&mut session, KeyInput::Enter);
        assert!(session.output_binary);
        press(&mut session, KeyInput::Char('e'));
        assert_eq!(session.state, ViewState::Output);
    }

    #[test]
    fn test_shape_mismatch_is_unexpected_response() {
        let mut session = connected_session();
        choose_menu(&mut session, "HSET");
        type_text(&mut session, "k");
        press(&mut session, KeyInput::Enter);
        type_text(&mut session, "f");
        press(&mut session, KeyInput::Enter);
        press(&mut session, KeyInput::Enter);
        reply(&mut session, Reply::Text("OK".into()));
        assert_eq!(session.output, "Unexpected response");

        press(&mut session, KeyInput::Esc);
        press(&mut session, KeyInput::Esc);
        choose_menu(&mut session, "EXPLORE");
        reply(&mut session, Reply::Array(None));
        assert_eq!(session.state, ViewState::Output);
        assert_eq!(session.output, "Unexpected response");
    }

    #[test]
    fn test_protocol_error_reconnects_on_next_command() {
        let mut session = connected_session();
        choose_menu(&mut session, "GET");
        type_text(&mut session, "k");
        press(&mut session, KeyInput::Enter);

        let effect = update(
            &mut session,
            Action::CommandResult(Err(RespError::Protocol("invalid bulk length 'abc'".into()))),
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(session.state, ViewState::Output);
        assert!(session.output.contains("invalid bulk length"));
        assert!(!session.is_connected());

        press(&mut session, KeyInput::Esc);
        type_text(&mut session, "k");
        assert_eq!(press(&mut session, KeyInput::Enter), Effect::Connect);
        update(&mut session, Action::ConnectionResult(Ok(test_connection())));
        assert_eq!(session.state, ViewState::InputKey);
    }

    #[test]
    fn test_unsupported_type() {
        let mut session = connected_session();
        choose_menu(&mut session, "EXPLORE");
        reply(&mut session, bulk_array(&["events"]));
        press(&mut session, KeyInput::Enter);
        assert_eq!(reply(&mut session, Reply::Text("stream".into())), Effect::None);
        assert_eq!(session.output, "Unsupported key type: stream");
    }

    #[test]
    fn test_paste_only_in_text_views() {
        let mut session = connected_session();
        update(&mut session, Action::Paste("ignored".into()));
        assert_eq!(session.input.value(), "");

        choose_menu(&mut session, "GET");
        update(&mut session, Action::Paste("user:\n100".into()));
        assert_eq!(session.input.value(), "user:100");
    }

    #[test]
    fn test_escape_from_input_clears_buffer() {
        let mut session = connected_session();
        choose_menu(&mut session, "SET");
        type_text(&mut session, "half");
        press(&mut session, KeyInput::Esc);
        assert_eq!(session.state, ViewState::Menu);
        assert_eq!(session.input.value(), "");
    }

    #[test]
    fn test_quit_from_any_state() {
        let mut session = test_session();
        init(&mut session);
        assert_eq!(update(&mut session, Action::Quit), Effect::Quit);
    }
}
