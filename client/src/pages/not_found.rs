//! Fallback for paths missing from the route table.

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_location;

use crate::routes::AppRoute;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    let location = use_location();
    leptos::logging::warn!("no route for {}", location.pathname.get_untracked());

    view! {
        <div class="status-page">
            <div class="status-card">
                <h1>"404"</h1>
                <p>"Página no encontrada"</p>
                <A href=AppRoute::Home.path() attr:class="btn btn--primary">"Volver al Inicio"</A>
            </div>
        </div>
    }
}
