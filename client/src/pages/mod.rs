//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (loading, selection, saving) and
//! keeps its row shaping and validation in plain functions next to it, so the
//! sibling tests can cover them without a reactive runtime. Shared table and
//! layout pieces live in `components`.

pub mod assignments;
pub mod attendance;
pub(crate) mod common;
pub mod dashboard;
pub mod grades;
pub mod login;
pub mod my_courses;
pub mod not_found;
pub mod reports;
pub mod resources;
pub mod unauthorized;
pub mod users;
