//! Admin user management: list, search, create/edit dialog, delete confirm.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use leptos::prelude::*;

use crate::app::AppApi;
use crate::net::api::Query;
use crate::net::types::{Role, UserAccount, UserDraft};
use crate::pages::common::report_failure;
use crate::state::notices::NoticeState;

/// Case-insensitive match on name or email.
pub fn filter_users(users: &[UserAccount], term: &str) -> Vec<UserAccount> {
    let term = term.trim().to_lowercase();
    users
        .iter()
        .filter(|user| {
            term.is_empty() || user.name.to_lowercase().contains(&term) || user.email.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

/// Editable form state for the user dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Default for UserForm {
    fn default() -> Self {
        Self { name: String::new(), email: String::new(), password: String::new(), role: Role::Teacher }
    }
}

impl UserForm {
    pub fn from_account(account: &UserAccount) -> Self {
        Self { name: account.name.clone(), email: account.email.clone(), password: String::new(), role: account.role }
    }

    /// Build the request payload. A password is mandatory when creating;
    /// on edit an empty password leaves the stored one unchanged.
    ///
    /// # Errors
    ///
    /// Returns the message to show in the dialog.
    pub fn to_draft(&self, creating: bool) -> Result<UserDraft, &'static str> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err("Nombre y email son obligatorios.");
        }
        if !email.contains('@') {
            return Err("Ingresa un email válido.");
        }
        let password = (!self.password.is_empty()).then(|| self.password.clone());
        if creating && password.is_none() {
            return Err("La contraseña es obligatoria para nuevos usuarios.");
        }
        Ok(UserDraft { name: name.to_owned(), email: email.to_owned(), password, role: self.role })
    }
}

#[component]
pub fn UsersPage() -> impl IntoView {
    let api = StoredValue::new(expect_context::<AppApi>());
    let notices = expect_context::<RwSignal<NoticeState>>();

    let users = RwSignal::new(Vec::<UserAccount>::new());
    let loading = RwSignal::new(true);
    let search = RwSignal::new(String::new());
    let dialog_open = RwSignal::new(false);
    let editing = RwSignal::new(None::<UserAccount>);
    let deleting = RwSignal::new(None::<UserAccount>);
    let form = RwSignal::new(UserForm::default());
    let form_error = RwSignal::new(None::<&'static str>);
    let submitting = RwSignal::new(false);

    let fetch_users = move || {
        loading.set(true);
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            match api.users().list(&Query::new()).await {
                Ok(rows) => users.set(rows),
                Err(e) => report_failure(notices, "list users", &e, "No se pudieron cargar los usuarios"),
            }
            loading.set(false);
        });
    };
    fetch_users();

    let open_create = move |_| {
        editing.set(None);
        form.set(UserForm::default());
        form_error.set(None);
        dialog_open.set(true);
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let target = editing.get_untracked();
        let draft = match form.get_untracked().to_draft(target.is_none()) {
            Ok(draft) => draft,
            Err(message) => {
                form_error.set(Some(message));
                return;
            }
        };
        submitting.set(true);
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            let result = match &target {
                Some(account) => api.users().update(account.id, &draft).await,
                None => api.users().create(&draft).await,
            };
            match result {
                Ok(_) => {
                    let (title, verb) =
                        if target.is_some() { ("Usuario actualizado", "actualizado") } else { ("Usuario creado", "creado") };
                    notices.update(|n| {
                        n.success(title, &format!("El usuario {} ha sido {verb} exitosamente", draft.name));
                    });
                    dialog_open.set(false);
                    fetch_users();
                }
                Err(e) => report_failure(notices, "save user", &e, "Error al guardar el usuario"),
            }
            submitting.set(false);
        });
    };

    let on_confirm_delete = move |_| {
        let Some(account) = deleting.get_untracked() else {
            return;
        };
        submitting.set(true);
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            match api.users().delete(account.id).await {
                Ok(_) => {
                    notices.update(|n| {
                        n.success(
                            "Usuario eliminado",
                            &format!("El usuario {} ha sido eliminado exitosamente", account.name),
                        );
                    });
                    deleting.set(None);
                    fetch_users();
                }
                Err(e) => report_failure(notices, "delete user", &e, "Error al eliminar el usuario"),
            }
            submitting.set(false);
        });
    };

    let visible = move || filter_users(&users.get(), &search.get());

    view! {
        <div class="page">
            <header class="page__header page__header--actions">
                <div>
                    <h1>"Usuarios"</h1>
                    <p class="page__subtitle">"Administra los usuarios del sistema"</p>
                </div>
                <button class="btn btn--primary" on:click=open_create>"+ Nuevo Usuario"</button>
            </header>

            <input
                class="form-input page__search"
                placeholder="Buscar usuarios..."
                prop:value=move || search.get()
                on:input=move |ev| search.set(event_target_value(&ev))
            />

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Nombre"</th>
                        <th>"Email"</th>
                        <th>"Rol"</th>
                        <th class="data-table__actions">"Acciones"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        if loading.get() {
                            return view! { <tr><td colspan="4" class="data-table__empty">"Cargando..."</td></tr> }
                                .into_any();
                        }
                        let rows = visible();
                        if rows.is_empty() {
                            return view! {
                                <tr><td colspan="4" class="data-table__empty">"No se encontraron usuarios"</td></tr>
                            }
                                .into_any();
                        }
                        rows.into_iter()
                            .map(|user| {
                                let for_edit = user.clone();
                                let for_delete = user.clone();
                                let badge = if user.role == Role::Admin { "badge badge--admin" } else { "badge" };
                                view! {
                                    <tr>
                                        <td class="data-table__strong">{user.name}</td>
                                        <td>{user.email}</td>
                                        <td><span class=badge>{user.role.label()}</span></td>
                                        <td class="data-table__actions">
                                            <button
                                                class="btn btn--ghost"
                                                title="Editar"
                                                on:click=move |_| {
                                                    form.set(UserForm::from_account(&for_edit));
                                                    editing.set(Some(for_edit.clone()));
                                                    form_error.set(None);
                                                    dialog_open.set(true);
                                                }
                                            >
                                                "Editar"
                                            </button>
                                            <button
                                                class="btn btn--ghost btn--danger"
                                                title="Eliminar"
                                                on:click=move |_| deleting.set(Some(for_delete.clone()))
                                            >
                                                "Eliminar"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view()
                            .into_any()
                    }}
                </tbody>
            </table>

            <Show when=move || dialog_open.get()>
                <div class="dialog-backdrop">
                    <form class="dialog" on:submit=on_submit>
                        <h2>{move || if editing.get().is_some() { "Editar Usuario" } else { "Nuevo Usuario" }}</h2>
                        <label class="form-label">"Nombre"</label>
                        <input
                            class="form-input"
                            prop:value=move || form.get().name
                            on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                        />
                        <label class="form-label">"Email"</label>
                        <input
                            class="form-input"
                            type="email"
                            prop:value=move || form.get().email
                            on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                        />
                        <label class="form-label">
                            {move || {
                                if editing.get().is_some() {
                                    "Contraseña (dejar en blanco para mantener)"
                                } else {
                                    "Contraseña"
                                }
                            }}
                        </label>
                        <input
                            class="form-input"
                            type="password"
                            prop:value=move || form.get().password
                            on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                        />
                        <label class="form-label">"Rol"</label>
                        <select
                            class="form-input"
                            prop:value=move || form.get().role.as_str()
                            on:change=move |ev| {
                                if let Some(role) = Role::from_wire(&event_target_value(&ev)) {
                                    form.update(|f| f.role = role);
                                }
                            }
                        >
                            {Role::ALL
                                .into_iter()
                                .map(|role| view! { <option value=role.as_str()>{role.label()}</option> })
                                .collect_view()}
                        </select>
                        <Show when=move || form_error.get().is_some()>
                            <p class="form-error">{move || form_error.get().unwrap_or_default()}</p>
                        </Show>
                        <div class="dialog__actions">
                            <button class="btn btn--outline" type="button" on:click=move |_| dialog_open.set(false)>
                                "Cancelar"
                            </button>
                            <button class="btn btn--primary" type="submit" disabled=move || submitting.get()>
                                {move || if submitting.get() { "Guardando..." } else { "Guardar" }}
                            </button>
                        </div>
                    </form>
                </div>
            </Show>

            <Show when=move || deleting.get().is_some()>
                <div class="dialog-backdrop">
                    <div class="dialog">
                        <h2>"¿Eliminar usuario?"</h2>
                        <p>
                            "Esta acción no se puede deshacer. Se eliminará permanentemente el usuario "
                            {move || deleting.get().map(|u| u.name).unwrap_or_default()} "."
                        </p>
                        <div class="dialog__actions">
                            <button class="btn btn--outline" on:click=move |_| deleting.set(None)>"Cancelar"</button>
                            <button
                                class="btn btn--danger"
                                disabled=move || submitting.get()
                                on:click=on_confirm_delete
                            >
                                "Eliminar"
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}
