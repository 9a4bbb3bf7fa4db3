//! Dashboard: role-specific summary cards and quick actions.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. Admins see system-wide counts;
//! teachers see counts derived from their own assignments. Counts are
//! fetched once on mount.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::app::AppApi;
use crate::net::api::{ApiError, Query};
use crate::net::types::{Id, Role};
use crate::pages::common::report_failure;
use crate::routes::AppRoute;
use crate::state::notices::NoticeState;
use crate::state::session::AppSession;
use crate::util::teaching::{course_ids, subject_ids};

/// Counts shown on the cards; `None` until loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub courses: Option<usize>,
    pub students: Option<usize>,
    pub subjects: Option<usize>,
    pub assignments: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardCard {
    pub title: &'static str,
    pub value: Option<usize>,
    pub description: &'static str,
    pub link: AppRoute,
}

pub fn cards_for(role: Role, stats: DashboardStats) -> Vec<DashboardCard> {
    let card = |title, value, description, link| DashboardCard { title, value, description, link };
    match role {
        Role::Admin => vec![
            card("Cursos", stats.courses, "Total de cursos registrados", AppRoute::Courses),
            card("Estudiantes", stats.students, "Total de estudiantes registrados", AppRoute::Students),
            card("Materias", stats.subjects, "Total de materias registradas", AppRoute::Subjects),
            card("Asignaciones", stats.assignments, "Total de asignaciones creadas", AppRoute::Assignments),
        ],
        Role::Teacher => vec![
            card("Mis Cursos", stats.courses, "Cursos asignados", AppRoute::MyCourses),
            card("Mis Estudiantes", stats.students, "Estudiantes en tus cursos", AppRoute::MyCourses),
            card("Mis Materias", stats.subjects, "Materias que dictas", AppRoute::MyCourses),
            card("Asignaciones", stats.assignments, "Curso y materia por asignación", AppRoute::RecordAttendance),
        ],
    }
}

pub fn quick_actions(role: Role) -> Vec<(AppRoute, &'static str)> {
    match role {
        Role::Admin => vec![
            (AppRoute::Users, "+ Nuevo Usuario"),
            (AppRoute::Students, "Ver Estudiantes"),
            (AppRoute::Reports, "Generar Reportes"),
        ],
        Role::Teacher => vec![
            (AppRoute::RecordAttendance, "+ Registrar Asistencia"),
            (AppRoute::RecordGrades, "+ Registrar Notas"),
            (AppRoute::Reports, "Ver Reportes"),
        ],
    }
}

pub fn greeting(role: Role) -> &'static str {
    match role {
        Role::Admin => "Administre el sistema desde aquí.",
        Role::Teacher => "Gestione sus cursos desde aquí.",
    }
}

async fn load_admin_stats(api: &AppApi) -> Result<DashboardStats, ApiError> {
    let all = Query::new();
    Ok(DashboardStats {
        courses: Some(api.courses().list(&all).await?.len()),
        students: Some(api.students().list(&all).await?.len()),
        subjects: Some(api.subjects().list(&all).await?.len()),
        assignments: Some(api.assignments().list(&all).await?.len()),
    })
}

async fn load_teacher_stats(api: &AppApi, teacher_id: Id) -> Result<DashboardStats, ApiError> {
    let assignments = api.assignments().by_teacher(teacher_id).await?;
    let courses = course_ids(&assignments);
    let mut students = 0;
    for course_id in &courses {
        students += api.students().by_course(*course_id).await?.len();
    }
    Ok(DashboardStats {
        courses: Some(courses.len()),
        students: Some(students),
        subjects: Some(subject_ids(&assignments).len()),
        assignments: Some(assignments.len()),
    })
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<AppSession>();
    let api = expect_context::<AppApi>();
    let notices = expect_context::<RwSignal<NoticeState>>();
    let stats = RwSignal::new(DashboardStats::default());

    if let Some(identity) = session.snapshot().identity {
        leptos::task::spawn_local(async move {
            let loaded = match identity.role {
                Role::Admin => load_admin_stats(&api).await,
                Role::Teacher => load_teacher_stats(&api, identity.id).await,
            };
            match loaded {
                Ok(loaded) => stats.set(loaded),
                Err(e) => report_failure(notices, "dashboard stats", &e, "No se pudieron cargar las estadísticas"),
            }
        });
    }

    let role = move || session.current().role();
    let name = move || session.current().identity.map(|i| i.display_name).unwrap_or_default();

    view! {
        <div class="page">
            <header class="page__header">
                <h1>"Dashboard"</h1>
                <p class="page__subtitle">
                    "Bienvenido, " {name} ". " {move || role().map(greeting).unwrap_or_default()}
                </p>
            </header>
            <div class="card-grid">
                {move || {
                    role()
                        .map(|role| cards_for(role, stats.get()))
                        .unwrap_or_default()
                        .into_iter()
                        .map(|card| {
                            let value = card.value.map_or_else(|| "…".to_owned(), |v| v.to_string());
                            view! {
                                <A href=card.link.path() attr:class="stat-card">
                                    <p class="stat-card__title">{card.title}</p>
                                    <p class="stat-card__value">{value}</p>
                                    <p class="stat-card__description">{card.description}</p>
                                </A>
                            }
                        })
                        .collect_view()
                }}
            </div>
            <section class="panel">
                <h2>"Acciones Rápidas"</h2>
                <p class="panel__subtitle">"Accede rápidamente a las funciones más utilizadas"</p>
                {move || {
                    role()
                        .map(quick_actions)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|(route, label)| view! { <A href=route.path() attr:class="quick-action">{label}</A> })
                        .collect_view()
                }}
            </section>
        </div>
    }
}
