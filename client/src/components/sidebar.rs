//! Navigation sidebar for authenticated pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Menu entries are derived from the route table for the signed-in role, so
//! the sidebar never links to a route the guard would refuse.

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_location;

use crate::routes::{AppRoute, menu_for};
use crate::state::session::AppSession;

#[component]
pub fn Sidebar() -> impl IntoView {
    let session = expect_context::<AppSession>();
    let location = use_location();

    let identity = move || session.identity();
    let entries = move || identity().map(|identity| menu_for(identity.role)).unwrap_or_default();

    view! {
        <aside class="sidebar">
            <div class="sidebar__header">
                <span class="sidebar__brand">"Class Central"</span>
            </div>
            <Show when=move || identity().is_some()>
                <div class="sidebar__identity">
                    <p class="sidebar__welcome">
                        "Bienvenido, " {move || identity().map(|i| i.display_name).unwrap_or_default()}
                    </p>
                    <p class="sidebar__role">
                        "Rol: " {move || identity().map(|i| i.role.label()).unwrap_or_default()}
                    </p>
                </div>
            </Show>
            <nav class="sidebar__menu">
                <p class="sidebar__group-label">"Menú"</p>
                <A href=AppRoute::Dashboard.path() attr:class="sidebar__link">
                    {AppRoute::Dashboard.title()}
                </A>
                {move || {
                    entries()
                        .into_iter()
                        .map(|route| {
                            let active = move || location.pathname.get().starts_with(route.path());
                            view! {
                                <A
                                    href=route.path()
                                    attr:class=move || {
                                        if active() { "sidebar__link sidebar__link--active" } else { "sidebar__link" }
                                    }
                                >
                                    {route.title()}
                                </A>
                            }
                        })
                        .collect_view()
                }}
            </nav>
            <div class="sidebar__footer">
                <button class="btn btn--outline sidebar__logout" on:click=move |_| session.logout()>
                    "Cerrar Sesión"
                </button>
            </div>
        </aside>
    }
}
