//! Reply interpretation.
//!
//! Replies are untyped; the operation tag recorded when the command was
//! issued decides what a reply means and where the session goes next.
//!
//! ```text
//! GET/HGET/SET/LSET        scalar          → Output
//! HSET/RPUSH/DELETE        integer         → Output
//! EXPLORE                  [key...]        → Browser
//! HKEYS                    [field...]      → FieldSelect
//! LRANGE/SMEMBERS          [elem...]       → FieldSelect (indexed)
//! ZRANGE                   [m, s, ...]     → FieldSelect (scored)
//! CHECK_TYPE               type name       → issue the matching read
//! DEL/HDEL/LREM            integer         → refresh the list
//! ```
//!
//! Error replies and transport failures are handled before we get here.

use log::{info, warn};

use super::action::{self, Effect};
use super::state::{ListEntry, Operation, Session, ViewState};
use crate::resp::{Command, Reply};

const UNEXPECTED: &str = "Unexpected response";

pub(crate) fn apply(session: &mut Session, reply: Reply) -> Effect {
    let Some(op) = session.selected_op else {
        warn!("Reply with no operation selected: {:?}", reply);
        return Effect::None;
    };

    match op {
        Operation::Get | Operation::HGet | Operation::Set | Operation::LSet => {
            let binary = reply.is_binary();
            match reply.into_scalar() {
                Some(text) => session.show_value(text, binary),
                None => unexpected(session, op),
            }
            Effect::None
        }
        Operation::HSet | Operation::RPush | Operation::Delete => {
            match reply {
                Reply::Integer(n) => session.show_output(n.to_string()),
                _ => unexpected(session, op),
            }
            Effect::None
        }
        Operation::Explore => {
            match reply.into_strings() {
                Some(keys) => {
                    session.keys.title = format!("Keys matching {}", session.scan_pattern);
                    session
                        .keys
                        .set_items(keys.into_iter().map(|k| ListEntry::new(k, "key")).collect());
                    session.state = ViewState::Browser;
                }
                None => unexpected(session, op),
            }
            Effect::None
        }
        Operation::HKeys => {
            match reply.into_strings() {
                Some(fields) => {
                    let title = format!("Fields of {}", session.active_key);
                    session.open_field_list(
                        title,
                        fields
                            .into_iter()
                            .map(|f| ListEntry::new(f, "Hash Field"))
                            .collect(),
                    );
                }
                None => unexpected(session, op),
            }
            Effect::None
        }
        Operation::LRange | Operation::SMembers => {
            let binary = member_flags(&reply);
            match reply.into_strings() {
                Some(elements) => {
                    let title = format!("Elements of {}", session.active_key);
                    session.selected_op = Some(Operation::ExploreList);
                    session.open_field_list(
                        title,
                        elements
                            .into_iter()
                            .enumerate()
                            .map(|(i, e)| {
                                let flag = binary.get(i).copied().unwrap_or(false);
                                ListEntry::indexed(e, i).mark_binary(flag)
                            })
                            .collect(),
                    );
                }
                None => unexpected(session, op),
            }
            Effect::None
        }
        Operation::ZRange => {
            match reply.into_strings() {
                Some(flat) => {
                    let title = format!("Members of {}", session.active_key);
                    session.selected_op = Some(Operation::ExploreList);
                    session.open_field_list(title, scored_members(flat));
                }
                None => unexpected(session, op),
            }
            Effect::None
        }
        Operation::CheckType => match reply.into_scalar() {
            Some(type_name) => open_by_type(session, &type_name),
            None => {
                unexpected(session, op);
                Effect::None
            }
        },
        Operation::Del => {
            let message = format!("Deleted key: {}", session.active_key);
            announce(session, message);
            action::explore(session)
        }
        Operation::HDel => {
            let message = format!("Deleted hash field: {}", session.active_field);
            announce(session, message);
            let k = session.active_key.clone();
            action::execute(session, Operation::HKeys, Command::new("HKEYS", [k]))
        }
        Operation::LRem => {
            let message = format!("Removed element from list: {}", session.active_key);
            announce(session, message);
            let k = session.active_key.clone();
            action::execute(
                session,
                Operation::LRange,
                Command::new("LRANGE", [k.as_str(), "0", "-1"]),
            )
        }
        Operation::ExploreList => {
            unexpected(session, op);
            Effect::None
        }
    }
}

/// Issue the read that fits the key's type.
fn open_by_type(session: &mut Session, type_name: &str) -> Effect {
    let k = session.active_key.clone();
    match type_name {
        "string" => action::execute(session, Operation::Get, Command::new("GET", [k])),
        "hash" => action::execute(session, Operation::HKeys, Command::new("HKEYS", [k])),
        "list" => action::execute(
            session,
            Operation::LRange,
            Command::new("LRANGE", [k.as_str(), "0", "-1"]),
        ),
        "set" => action::execute(session, Operation::SMembers, Command::new("SMEMBERS", [k])),
        "zset" => action::execute(
            session,
            Operation::ZRange,
            Command::new("ZRANGE", [k.as_str(), "0", "-1", "WITHSCORES"]),
        ),
        // Deleted between the scan and the TYPE call
        "none" => {
            session.show_output(format!("Key no longer exists: {k}"));
            Effect::None
        }
        other => {
            info!("Key {} has unsupported type {}", k, other);
            session.show_output(format!("Unsupported key type: {other}"));
            Effect::None
        }
    }
}

/// Pair up a flat `member, score, member, score...` reply. A trailing
/// member without a score is kept.
fn scored_members(flat: Vec<String>) -> Vec<ListEntry> {
    flat.chunks(2)
        .map(|pair| {
            let score = pair.get(1).map(String::as_str).unwrap_or("unknown");
            ListEntry::new(pair[0].clone(), format!("Score: {score}"))
        })
        .collect()
}

fn announce(session: &mut Session, message: String) {
    info!("{}", message);
    session.output = message.clone();
    session.status_message = message;
}

/// Per-member binary flags of an array reply.
fn member_flags(reply: &Reply) -> Vec<bool> {
    match reply {
        Reply::Array(Some(items)) => items.iter().map(Reply::is_binary).collect(),
        _ => Vec::new(),
    }
}

fn unexpected(session: &mut Session, op: Operation) {
    warn!("Unexpected reply shape for {}", op.label());
    session.show_output(UNEXPECTED);
}
