//! redis-tui library exports for testing

pub mod core;
pub mod resp;
pub mod tui;

#[cfg(test)]
pub mod test_support;
