//! Route guard component wrapping every protected route.
//!
//! The decision itself is `util::auth::evaluate_access`; this component only
//! maps it onto a waiting indicator, a redirect, or the page inside the
//! authenticated layout. It is memoized, so session changes that do not
//! change the decision (the login `busy` flag, for instance) do not remount
//! the page.

use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;

use crate::components::layout::Layout;
use crate::pages::assignments::AssignmentsPage;
use crate::pages::attendance::RecordAttendancePage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::grades::RecordGradesPage;
use crate::pages::login::LoginPage;
use crate::pages::my_courses::MyCoursesPage;
use crate::pages::reports::ReportsPage;
use crate::pages::resources::{CoursesPage, StudentsPage, SubjectsPage};
use crate::pages::unauthorized::UnauthorizedPage;
use crate::pages::users::UsersPage;
use crate::routes::AppRoute;
use crate::state::session::AppSession;
use crate::util::auth::{GuardDecision, evaluate_access, login_redirect_path, requested_location};

#[component]
pub fn RouteGuard(route: AppRoute) -> impl IntoView {
    let session = expect_context::<AppSession>();
    let location = use_location();

    let decision = Memo::new(move |_| {
        let state = session.current();
        let requested = requested_location(&location.pathname.get_untracked(), &location.search.get_untracked());
        evaluate_access(&state, route.required_roles(), &requested)
    });

    move || match decision.get() {
        GuardDecision::Loading => view! { <div class="page-loading">"Cargando..."</div> }.into_any(),
        GuardDecision::RedirectToLogin { from } => view! { <Redirect path=login_redirect_path(&from)/> }.into_any(),
        GuardDecision::RedirectToUnauthorized => {
            view! { <Redirect path=AppRoute::Unauthorized.path()/> }.into_any()
        }
        GuardDecision::Render => view! { <Layout>{render_page(route)}</Layout> }.into_any(),
    }
}

fn render_page(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage/> }.into_any(),
        AppRoute::Unauthorized => view! { <UnauthorizedPage/> }.into_any(),
        AppRoute::Home | AppRoute::Dashboard => view! { <DashboardPage/> }.into_any(),
        AppRoute::Users => view! { <UsersPage/> }.into_any(),
        AppRoute::Courses => view! { <CoursesPage/> }.into_any(),
        AppRoute::Subjects => view! { <SubjectsPage/> }.into_any(),
        AppRoute::Students => view! { <StudentsPage/> }.into_any(),
        AppRoute::Assignments => view! { <AssignmentsPage/> }.into_any(),
        AppRoute::MyCourses => view! { <MyCoursesPage/> }.into_any(),
        AppRoute::RecordAttendance => view! { <RecordAttendancePage/> }.into_any(),
        AppRoute::RecordGrades => view! { <RecordGradesPage/> }.into_any(),
        AppRoute::Reports => view! { <ReportsPage/> }.into_any(),
    }
}
