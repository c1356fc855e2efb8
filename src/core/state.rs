//! # Session State
//!
//! Everything the controller knows about the running client, in one place.
//! No terminal types live here; presentation-only state (scroll offsets)
//! belongs to the `tui` module.
//!
//! ```text
//! Session
//! ├── state / previous_state   // current view and where "back" goes
//! ├── menu, fields, keys       // the three lists
//! ├── input: TextEntry         // single-line text entry
//! ├── output, status_message   // last result, status line
//! ├── active_key/field/index/value
//! ├── selected_op: Operation   // how to read the next reply
//! ├── connection               // shared handle, None while disconnected
//! └── pending: Pending         // what the session is waiting for
//! ```
//!
//! State changes only happen through `update(session, action)` in action.rs.

use crate::resp::SharedConnection;

/// Which view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Menu,
    InputKey,
    InputField,
    FieldSelect,
    InputValue,
    Output,
    Browser,
    Loading,
    Confirmation,
}

/// The selected operation tag. Replies carry no schema, so this is what
/// decides how the next reply is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Set,
    Get,
    HSet,
    HGet,
    Delete,
    RPush,
    Explore,
    HKeys,
    LRange,
    SMembers,
    ZRange,
    CheckType,
    /// Browsing the members of a list, set or sorted set.
    ExploreList,
    LSet,
    Del,
    HDel,
    LRem,
}

impl Operation {
    /// Operations offered in the main menu, with their descriptions.
    pub const MENU: [(Operation, &'static str); 7] = [
        (Operation::Set, "Set a key-value pair"),
        (Operation::Get, "Get the value of a key"),
        (Operation::HSet, "Set a hash field"),
        (Operation::HGet, "Get the value of a hash field"),
        (Operation::Delete, "Delete a key"),
        (Operation::RPush, "Append a value to a list"),
        (Operation::Explore, "Browse keys and values"),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Operation::Set => "SET",
            Operation::Get => "GET",
            Operation::HSet => "HSET",
            Operation::HGet => "HGET",
            Operation::Delete => "DELETE",
            Operation::RPush => "RPUSH",
            Operation::Explore => "EXPLORE",
            Operation::HKeys => "HKEYS",
            Operation::LRange => "LRANGE",
            Operation::SMembers => "SMEMBERS",
            Operation::ZRange => "ZRANGE",
            Operation::CheckType => "CHECK_TYPE",
            Operation::ExploreList => "EXPLORE_LIST",
            Operation::LSet => "LSET",
            Operation::Del => "DEL",
            Operation::HDel => "HDEL",
            Operation::LRem => "LREM",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::MENU
            .iter()
            .map(|(op, _)| *op)
            .chain([
                Operation::HKeys,
                Operation::LRange,
                Operation::SMembers,
                Operation::ZRange,
                Operation::CheckType,
                Operation::ExploreList,
                Operation::LSet,
                Operation::Del,
                Operation::HDel,
                Operation::LRem,
            ])
            .find(|op| op.label() == label)
    }
}

/// What, if anything, the session is waiting on.
///
/// At most one network operation is outstanding at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pending {
    #[default]
    Idle,
    /// A connect attempt is running.
    Connect,
    /// A connect attempt failed; the retry timer is running.
    Retry,
    /// A command was sent and its reply has not arrived.
    Command,
}

/// One row of a list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub title: String,
    pub description: String,
    /// Position inside a list-typed value, so edits can target it.
    pub index: Option<usize>,
    /// The title is a lossy rendering of bytes that are not UTF-8.
    pub binary: bool,
}

impl ListEntry {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            index: None,
            binary: false,
        }
    }

    pub fn indexed(title: impl Into<String>, index: usize) -> Self {
        Self {
            title: title.into(),
            description: format!("Index: {index}"),
            index: Some(index),
            binary: false,
        }
    }

    pub fn mark_binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }
}

/// A titled list with a selection cursor.
#[derive(Debug, Clone, Default)]
pub struct EntryList {
    pub title: String,
    items: Vec<ListEntry>,
    selected: Option<usize>,
}

impl EntryList {
    pub const PAGE: usize = 10;

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
            selected: None,
        }
    }

    /// Replace the items. Selection is kept where possible so a refresh
    /// after a delete lands near the removed row.
    pub fn set_items(&mut self, items: Vec<ListEntry>) {
        self.selected = match (self.selected, items.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.items = items;
    }

    pub fn items(&self) -> &[ListEntry] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&ListEntry> {
        self.selected.and_then(|i| self.items.get(i))
    }

    /// Move the selection by `delta` rows, clamped to the list bounds.
    pub fn move_selection(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        let current = self.selected.unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        self.selected = Some(next);
    }

    pub fn select_first(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(0);
        }
    }

    pub fn select_last(&mut self) {
        if !self.items.is_empty() {
            self.selected = Some(self.items.len() - 1);
        }
    }
}

/// Single-line text entry. The cursor is a byte offset on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEntry {
    value: String,
    cursor: usize,
}

impl TextEntry {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the contents. The cursor moves to the start; call
    /// [`cursor_end`](Self::cursor_end) to continue typing after it.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Take the contents, leaving the entry empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.value.len();
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert pasted text. Line breaks are dropped; the entry is one line.
    pub fn insert_str(&mut self, text: &str) {
        let clean: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        self.value.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.value.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.value.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.cursor]
            .chars()
            .next_back()
            .map(|c| self.cursor - c.len_utf8())
    }

    fn next_boundary(&self) -> Option<usize> {
        self.value[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }
}

/// The single session record owned by the controller loop.
#[derive(Debug)]
pub struct Session {
    pub state: ViewState,
    /// Where "back" goes, and where Loading resumes after a reconnect.
    pub previous_state: Option<ViewState>,
    /// The view the field list was opened from. Refreshes of the list
    /// itself never overwrite it.
    pub list_origin: ViewState,
    pub menu: EntryList,
    pub fields: EntryList,
    pub keys: EntryList,
    pub input: TextEntry,
    pub output: String,
    /// The output is a lossy rendering of a non UTF-8 value and must not
    /// be written back.
    pub output_binary: bool,
    pub status_message: String,
    pub active_key: String,
    pub active_field: String,
    pub active_index: Option<usize>,
    pub active_value: String,
    pub selected_op: Option<Operation>,
    pub connection: Option<SharedConnection>,
    pub pending: Pending,
    /// Connect attempts since the last successful connect.
    pub connect_attempts: u32,
    pub address: String,
    pub scan_pattern: String,
}

impl Session {
    pub fn new(address: impl Into<String>, scan_pattern: impl Into<String>) -> Self {
        let mut menu = EntryList::new("redis-tui");
        menu.set_items(
            Operation::MENU
                .iter()
                .map(|(op, desc)| ListEntry::new(op.label(), *desc))
                .collect(),
        );

        Self {
            state: ViewState::Loading,
            previous_state: None,
            list_origin: ViewState::Menu,
            menu,
            fields: EntryList::new("Select a field"),
            keys: EntryList::new("Select a key"),
            input: TextEntry::default(),
            output: String::new(),
            output_binary: false,
            status_message: String::new(),
            active_key: String::new(),
            active_field: String::new(),
            active_index: None,
            active_value: String::new(),
            selected_op: None,
            connection: None,
            pending: Pending::Idle,
            connect_attempts: 0,
            address: address.into(),
            scan_pattern: scan_pattern.into(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Enter Loading, remembering the current view unless we are already
    /// loading (repeated reconnects must not clobber the resume target).
    pub fn enter_loading(&mut self) {
        if self.state != ViewState::Loading {
            self.previous_state = Some(self.state);
        }
        self.state = ViewState::Loading;
    }

    /// Move to `next`, remembering the current view as the back target.
    pub fn push_state(&mut self, next: ViewState) {
        self.previous_state = Some(self.state);
        self.state = next;
    }

    /// Show `text` in the Output view.
    pub fn show_output(&mut self, text: impl Into<String>) {
        self.show_value(text, false);
    }

    /// Show a value read from the server, flagging it if it is binary.
    pub fn show_value(&mut self, text: impl Into<String>, binary: bool) {
        self.output = text.into();
        self.output_binary = binary;
        self.state = ViewState::Output;
    }

    /// Back to the main menu, dropping any half-typed input and output.
    pub fn reset_to_menu(&mut self) {
        self.input.clear();
        self.output.clear();
        self.state = ViewState::Menu;
    }

    /// Show the field list, recording where it was opened from.
    ///
    /// A refresh (the list reloading itself after a delete) keeps both the
    /// origin and the selection row.
    pub fn open_field_list(&mut self, title: impl Into<String>, entries: Vec<ListEntry>) {
        match self.previous_state {
            Some(ViewState::FieldSelect) | None => {}
            Some(origin) => {
                self.list_origin = origin;
                self.fields.set_items(Vec::new());
            }
        }
        self.fields.title = title.into();
        self.fields.set_items(entries);
        self.state = ViewState::FieldSelect;
    }
}
