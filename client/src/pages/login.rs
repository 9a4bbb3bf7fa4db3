//! Login page: email + password exchanged through the session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The guard sends anonymous visitors here with `?from=<path>`; a successful
//! login returns them there when it is a known protected route.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_query_map;

use crate::app::AppApi;
use crate::net::types::Credentials;
use crate::state::session::AppSession;
use crate::util::auth::post_login_destination;

/// Check the form before any network call.
///
/// # Errors
///
/// Returns the message to show under the form.
pub fn validate_login(email: &str, password: &str) -> Result<Credentials, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Ingresa tu email y contraseña.");
    }
    if !email.contains('@') {
        return Err("Ingresa un email válido.");
    }
    Ok(Credentials { email: email.to_owned(), password: password.to_owned() })
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<AppSession>();
    let api = expect_context::<AppApi>();
    let query = use_query_map();
    let from = move || query.with_untracked(|q| q.get("from"));

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(None::<&'static str>);
    let busy = move || session.current().busy;

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if session.snapshot().busy {
            return;
        }
        match validate_login(&email.get_untracked(), &password.get_untracked()) {
            Err(message) => info.set(Some(message)),
            Ok(credentials) => {
                info.set(None);
                let api = api.clone();
                let return_to = from();
                leptos::task::spawn_local(async move {
                    if session.login(&api, &credentials, return_to.as_deref()).await.is_err() {
                        password.set(String::new());
                    }
                });
            }
        }
    };

    // Already signed in (e.g. a bookmarked /login): go straight on.
    let signed_in = move || session.current().identity.is_some() && !session.current().busy;

    view! {
        <Show when=signed_in>
            <Redirect path=post_login_destination(from().as_deref())/>
        </Show>
        <div class="login-page">
            <div class="login-card">
                <h1>"Class Central"</h1>
                <p class="login-card__subtitle">"Sistema de Gestión Escolar"</p>
                <form class="login-form" on:submit=on_submit>
                    <label class="form-label" for="login-email">"Email"</label>
                    <input
                        id="login-email"
                        class="form-input"
                        type="email"
                        placeholder="usuario@escuela.edu"
                        autocomplete="username"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <label class="form-label" for="login-password">"Contraseña"</label>
                    <input
                        id="login-password"
                        class="form-input"
                        type="password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="btn btn--primary" type="submit" disabled=busy>
                        {move || if busy() { "Iniciando sesión..." } else { "Iniciar Sesión" }}
                    </button>
                </form>
                <Show when=move || info.get().is_some()>
                    <p class="login-message">{move || info.get().unwrap_or_default()}</p>
                </Show>
            </div>
        </div>
    }
}
