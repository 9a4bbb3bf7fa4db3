//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the authenticated chrome (layout, sidebar, toasts) and
//! the guard that sits in front of every protected route, reading shared
//! state from Leptos context providers.

pub mod data_table;
pub mod layout;
pub mod route_guard;
pub mod sidebar;
pub mod toaster;
