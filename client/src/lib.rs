//! # class-central client
//!
//! Leptos + WASM front-end for the school administration backend: session
//! handling, role-gated routing, and the admin/teacher screens.
//!
//! Browser glue is compiled only with the `csr` feature; without it the
//! crate builds natively so the session, API, and guard logic can be unit
//! tested without a browser.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

/// Browser entry point: install panic/console hooks and mount the app.
#[cfg(feature = "csr")]
pub fn mount() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::logging::log!("api base url: {}", net::api::configured_base_url());
    leptos::mount::mount_to_body(app::App);
}
