//! Shown when a signed-in role is refused by a route.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::routes::AppRoute;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    view! {
        <div class="status-page">
            <div class="status-card">
                <h1>"Acceso Denegado"</h1>
                <p>"No tienes permisos para acceder a esta sección."</p>
                <div class="status-card__actions">
                    <A href=AppRoute::Dashboard.path() attr:class="btn btn--primary">"Ir al Dashboard"</A>
                    <A href=AppRoute::Home.path() attr:class="btn btn--outline">"Volver al Inicio"</A>
                </div>
            </div>
        </div>
    }
}
