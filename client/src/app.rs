//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds the session store and the API client once, bootstraps the
//! session from durable storage, and provides both to every page. Routes come
//! from the route table; protected ones render through `RouteGuard`.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::NavigateOptions;
use leptos_router::StaticSegment;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::hooks::use_navigate;

use crate::components::route_guard::RouteGuard;
use crate::components::toaster::Toaster;
use crate::net::api::{ApiClient, configured_base_url};
use crate::net::transport::BrowserTransport;
use crate::pages::login::LoginPage;
use crate::pages::not_found::NotFoundPage;
use crate::pages::unauthorized::UnauthorizedPage;
use crate::routes::AppRoute;
use crate::state::notices::NoticeState;
use crate::state::session::{AppEffects, AppSession, SessionState, SessionStore};
use crate::util::storage::BrowserStorage;

/// The API client as wired into the browser app.
pub type AppApi = ApiClient<BrowserTransport, AppSession>;

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let notices = RwSignal::new(NoticeState::default());
    let effects = AppEffects { redirect: RwSignal::new(None), notices };
    let session: AppSession = SessionStore::new(RwSignal::new(SessionState::default()), BrowserStorage, effects);
    session.bootstrap();

    let api: AppApi = ApiClient::new(configured_base_url(), BrowserTransport, session);

    provide_context(notices);
    provide_context(effects);
    provide_context(session);
    provide_context(api);

    view! {
        <Title text="Class Central"/>
        <Router>
            <SessionNavigator/>
            <Routes fallback=|| view! { <NotFoundPage/> }>
                <Route path=StaticSegment(AppRoute::Login.segment()) view=LoginPage/>
                <Route path=StaticSegment(AppRoute::Unauthorized.segment()) view=UnauthorizedPage/>
                <Route path=StaticSegment(AppRoute::Home.segment()) view=|| view! { <RouteGuard route=AppRoute::Home/> }/>
                <Route
                    path=StaticSegment(AppRoute::Dashboard.segment())
                    view=|| view! { <RouteGuard route=AppRoute::Dashboard/> }
                />
                <Route path=StaticSegment(AppRoute::Users.segment()) view=|| view! { <RouteGuard route=AppRoute::Users/> }/>
                <Route
                    path=StaticSegment(AppRoute::Courses.segment())
                    view=|| view! { <RouteGuard route=AppRoute::Courses/> }
                />
                <Route
                    path=StaticSegment(AppRoute::Subjects.segment())
                    view=|| view! { <RouteGuard route=AppRoute::Subjects/> }
                />
                <Route
                    path=StaticSegment(AppRoute::Students.segment())
                    view=|| view! { <RouteGuard route=AppRoute::Students/> }
                />
                <Route
                    path=StaticSegment(AppRoute::Assignments.segment())
                    view=|| view! { <RouteGuard route=AppRoute::Assignments/> }
                />
                <Route
                    path=StaticSegment(AppRoute::MyCourses.segment())
                    view=|| view! { <RouteGuard route=AppRoute::MyCourses/> }
                />
                <Route
                    path=StaticSegment(AppRoute::RecordAttendance.segment())
                    view=|| view! { <RouteGuard route=AppRoute::RecordAttendance/> }
                />
                <Route
                    path=StaticSegment(AppRoute::RecordGrades.segment())
                    view=|| view! { <RouteGuard route=AppRoute::RecordGrades/> }
                />
                <Route
                    path=StaticSegment(AppRoute::Reports.segment())
                    view=|| view! { <RouteGuard route=AppRoute::Reports/> }
                />
            </Routes>
        </Router>
        <Toaster/>
    }
}

/// Turns session-store navigation requests into router navigations.
///
/// The store cannot hold a router handle (it outlives any one route), so it
/// parks the target in `AppEffects::redirect` and this watcher, mounted
/// inside `<Router>`, performs the navigation.
#[component]
fn SessionNavigator() -> impl IntoView {
    let effects = expect_context::<AppEffects>();
    let navigate = use_navigate();

    Effect::new(move || {
        if let Some(path) = effects.redirect.get() {
            effects.redirect.set(None);
            navigate(&path, NavigateOptions::default());
        }
    });
}
