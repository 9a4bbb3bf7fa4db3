//! Shared reactive state.
//!
//! `session` holds who is signed in; `notices` is the toast queue.

pub mod notices;
pub mod session;
