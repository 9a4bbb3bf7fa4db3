//! Session store: the single source of truth for who is signed in.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store owns the in-memory identity and is the only writer of the
//! durable session mirror (`token` + `user`). Route guards read it, the API
//! client reads the bearer token from it and reports credential rejection
//! back to it, and views call `login`/`logout` on it.
//!
//! DESIGN
//! ======
//! The store is generic over three seams so its lifecycle runs unchanged in
//! the browser and in native unit tests:
//!
//! - `SessionCell`: where `SessionState` lives (`RwSignal` in the app);
//! - `SessionStorage`: the durable mirror (`localStorage` in the app);
//! - `SessionEffects`: navigation and user-facing notices.
//!
//! Token presence and identity presence always change together; bootstrap
//! drops a half-written mirror instead of trusting it.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use leptos::prelude::*;
use thiserror::Error;

use crate::net::api::{ApiError, Authenticator, SessionAuthority};
use crate::net::types::{Credentials, Identity, Role};
use crate::routes::AppRoute;
use crate::state::notices::{NoticeKind, NoticeState};
use crate::util::auth::post_login_destination;
use crate::util::storage::{BrowserStorage, SessionStorage, StorageError};

/// Storage key for the credential token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the serialized identity.
pub const USER_KEY: &str = "user";

const LOGIN_FAILED_FALLBACK: &str = "Error al iniciar sesión";

/// Tri-state readiness used to gate first render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionReadiness {
    Loading,
    Authenticated,
    Anonymous,
}

/// In-memory session snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    /// Set once bootstrap has read the durable mirror.
    pub ready: bool,
    /// A login exchange is in flight.
    pub busy: bool,
}

impl SessionState {
    pub fn readiness(&self) -> SessionReadiness {
        match (self.ready, &self.identity) {
            (false, _) => SessionReadiness::Loading,
            (true, Some(_)) => SessionReadiness::Authenticated,
            (true, None) => SessionReadiness::Anonymous,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|identity| identity.role)
    }

    /// Whether the signed-in role is one of `roles`. False when signed out.
    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.role().is_some_and(|role| roles.contains(&role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(&[Role::Admin])
    }

    pub fn is_teacher(&self) -> bool {
        self.has_role(&[Role::Teacher])
    }
}

/// Holder of the session state.
pub trait SessionCell {
    /// Read, subscribing the caller when inside a reactive scope.
    fn current(&self) -> SessionState;
    /// Read without subscribing.
    fn snapshot(&self) -> SessionState;
    fn modify(&self, f: impl FnOnce(&mut SessionState));
}

impl SessionCell for RwSignal<SessionState> {
    fn current(&self) -> SessionState {
        self.get()
    }

    fn snapshot(&self) -> SessionState {
        self.get_untracked()
    }

    fn modify(&self, f: impl FnOnce(&mut SessionState)) {
        self.update(f);
    }
}

/// Side effects the store performs besides state and storage writes.
pub trait SessionEffects {
    fn navigate(&self, path: &str);
    fn notify(&self, kind: NoticeKind, title: &str, description: &str);
}

/// Effects wired into the running app: navigation requests are picked up by
/// the router-side watcher, notices land in the toast queue.
#[derive(Clone, Copy, Debug)]
pub struct AppEffects {
    pub redirect: RwSignal<Option<String>>,
    pub notices: RwSignal<NoticeState>,
}

impl SessionEffects for AppEffects {
    fn navigate(&self, path: &str) {
        self.redirect.set(Some(path.to_owned()));
    }

    fn notify(&self, kind: NoticeKind, title: &str, description: &str) {
        self.notices.update(|notices| {
            notices.push(kind, title, description);
        });
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The backend refused the credentials or the exchange failed.
    #[error("{message}")]
    Authentication { message: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Clears `busy` when dropped, whichever way `login` exits.
struct BusyGuard<'a, C: SessionCell> {
    cell: &'a C,
}

impl<'a, C: SessionCell> BusyGuard<'a, C> {
    fn acquire(cell: &'a C) -> Self {
        cell.modify(|state| state.busy = true);
        Self { cell }
    }
}

impl<C: SessionCell> Drop for BusyGuard<'_, C> {
    fn drop(&mut self) {
        self.cell.modify(|state| state.busy = false);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SessionStore<C, S, E> {
    cell: C,
    storage: S,
    effects: E,
}

/// The store as wired into the browser app.
pub type AppSession = SessionStore<RwSignal<SessionState>, BrowserStorage, AppEffects>;

impl<C: SessionCell, S: SessionStorage, E: SessionEffects> SessionStore<C, S, E> {
    pub fn new(cell: C, storage: S, effects: E) -> Self {
        Self { cell, storage, effects }
    }

    /// Rehydrate from the durable mirror. No network call is made; a stale
    /// token surfaces on the first authenticated request.
    pub fn bootstrap(&self) {
        let token = self.storage.read(TOKEN_KEY);
        let user = self.storage.read(USER_KEY);
        let identity = match (token, user) {
            (Some(_), Some(raw)) => match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    leptos::logging::warn!("discarding unreadable stored session: {e}");
                    self.clear_persisted();
                    None
                }
            },
            (None, None) => None,
            _ => {
                leptos::logging::warn!("discarding partial stored session");
                self.clear_persisted();
                None
            }
        };
        self.cell.modify(|state| {
            state.identity = identity;
            state.ready = true;
        });
    }

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// `SessionError::Authentication` when the exchange fails (the user has
    /// already been notified), `SessionError::Storage` when the session could
    /// not be persisted.
    pub async fn login<Au: Authenticator>(
        &self,
        authenticator: &Au,
        credentials: &Credentials,
        return_to: Option<&str>,
    ) -> Result<Identity, SessionError> {
        let _busy = BusyGuard::acquire(&self.cell);

        let grant = match authenticator.authenticate(credentials).await {
            Ok(grant) => grant,
            Err(e) => {
                let message = login_failure_message(&e);
                leptos::logging::warn!("login failed: {e}");
                self.effects.notify(NoticeKind::Error, "Error de autenticación", &message);
                return Err(SessionError::Authentication { message });
            }
        };

        if let Err(e) = self.persist(&grant.token, &grant.user) {
            self.clear_persisted();
            self.effects.notify(NoticeKind::Error, "Error de autenticación", &e.to_string());
            return Err(e.into());
        }

        let identity = grant.user;
        self.cell.modify(|state| state.identity = Some(identity.clone()));
        leptos::logging::log!("signed in as user {} ({})", identity.id, identity.role.as_str());
        self.effects.notify(
            NoticeKind::Success,
            "¡Bienvenido!",
            &format!("Has iniciado sesión como {}", identity.display_name),
        );
        self.effects.navigate(&post_login_destination(return_to));
        Ok(identity)
    }

    /// End the session. Safe to call without one.
    pub fn logout(&self) {
        self.clear_persisted();
        self.cell.modify(|state| state.identity = None);
        self.effects.navigate(AppRoute::Login.path());
        self.effects.notify(NoticeKind::Info, "Sesión cerrada", "Has cerrado sesión exitosamente");
    }

    /// Tear down after the backend rejected the credential.
    pub fn invalidate(&self) {
        let was_active = self.cell.snapshot().identity.is_some() || self.storage.read(TOKEN_KEY).is_some();
        self.clear_persisted();
        self.cell.modify(|state| state.identity = None);
        self.effects.navigate(AppRoute::Login.path());
        if was_active {
            self.effects.notify(
                NoticeKind::Error,
                "Sesión expirada",
                "Tu sesión ya no es válida. Inicia sesión nuevamente.",
            );
        }
    }

    pub fn current(&self) -> SessionState {
        self.cell.current()
    }

    pub fn snapshot(&self) -> SessionState {
        self.cell.snapshot()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.cell.current().identity
    }

    pub fn readiness(&self) -> SessionReadiness {
        self.cell.current().readiness()
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.cell.current().has_role(roles)
    }

    pub fn is_admin(&self) -> bool {
        self.cell.current().is_admin()
    }

    pub fn is_teacher(&self) -> bool {
        self.cell.current().is_teacher()
    }

    fn persist(&self, token: &str, identity: &Identity) -> Result<(), StorageError> {
        let serialized =
            serde_json::to_string(identity).map_err(|_| StorageError::WriteFailed { key: USER_KEY.to_owned() })?;
        self.storage.write(TOKEN_KEY, token)?;
        self.storage.write(USER_KEY, &serialized)
    }

    fn clear_persisted(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
    }
}

impl<C: SessionCell, S: SessionStorage, E: SessionEffects> SessionAuthority for SessionStore<C, S, E> {
    fn bearer_token(&self) -> Option<String> {
        self.storage.read(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    fn session_invalidated(&self) {
        self.invalidate();
    }
}

fn login_failure_message(error: &ApiError) -> String {
    error.server_message().unwrap_or(LOGIN_FAILED_FALLBACK).to_owned()
}
