//! Read-only admin listings for courses, subjects, and students.

#[cfg(test)]
#[path = "resources_test.rs"]
mod resources_test;

use leptos::prelude::*;

use crate::app::AppApi;
use crate::components::data_table::DataTable;
use crate::net::api::{ApiError, Query};
use crate::net::types::{Course, Id, Student, Subject};
use crate::pages::common::report_failure;
use crate::state::notices::NoticeState;
use crate::util::teaching::label_for;

pub fn course_rows(courses: &[Course]) -> Vec<Vec<String>> {
    courses
        .iter()
        .map(|c| vec![c.id.to_string(), c.name.clone(), c.description.clone().unwrap_or_default()])
        .collect()
}

pub fn subject_rows(subjects: &[Subject]) -> Vec<Vec<String>> {
    subjects
        .iter()
        .map(|s| vec![s.id.to_string(), s.name.clone(), s.description.clone().unwrap_or_default()])
        .collect()
}

pub fn student_rows(students: &[Student], course_names: &[(Id, String)]) -> Vec<Vec<String>> {
    students
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.name.clone(),
                s.course_id.map(|id| label_for(id, course_names, "Curso")).unwrap_or_else(|| "Sin curso".to_owned()),
                s.email.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

pub fn course_names(courses: &[Course]) -> Vec<(Id, String)> {
    courses.iter().map(|c| (c.id, c.name.clone())).collect()
}

/// Run `fetch` once and publish its rows, reporting failures as toasts.
pub(crate) fn load_table<Fut>(
    rows: RwSignal<Vec<Vec<String>>>,
    loading: RwSignal<bool>,
    fallback: &'static str,
    fetch: Fut,
) where
    Fut: Future<Output = Result<Vec<Vec<String>>, ApiError>> + 'static,
{
    let notices = expect_context::<RwSignal<NoticeState>>();
    leptos::task::spawn_local(async move {
        match fetch.await {
            Ok(loaded) => rows.set(loaded),
            Err(e) => report_failure(notices, "load table", &e, fallback),
        }
        loading.set(false);
    });
}

#[component]
fn ResourcePage(
    title: &'static str,
    subtitle: &'static str,
    headers: &'static [&'static str],
    empty: &'static str,
    rows: RwSignal<Vec<Vec<String>>>,
    loading: RwSignal<bool>,
) -> impl IntoView {
    view! {
        <div class="page">
            <header class="page__header">
                <h1>{title}</h1>
                <p class="page__subtitle">{subtitle}</p>
            </header>
            <DataTable headers=headers rows=rows loading=loading empty=empty/>
        </div>
    }
}

#[component]
pub fn CoursesPage() -> impl IntoView {
    let api = expect_context::<AppApi>();
    let rows = RwSignal::new(Vec::new());
    let loading = RwSignal::new(true);
    load_table(rows, loading, "No se pudieron cargar los cursos", async move {
        Ok::<_, ApiError>(course_rows(&api.courses().list(&Query::new()).await?))
    });

    view! {
        <ResourcePage
            title="Cursos"
            subtitle="Cursos registrados en el sistema"
            headers=&["ID", "Nombre", "Descripción"]
            empty="No hay cursos registrados"
            rows=rows
            loading=loading
        />
    }
}

#[component]
pub fn SubjectsPage() -> impl IntoView {
    let api = expect_context::<AppApi>();
    let rows = RwSignal::new(Vec::new());
    let loading = RwSignal::new(true);
    load_table(rows, loading, "No se pudieron cargar las materias", async move {
        Ok::<_, ApiError>(subject_rows(&api.subjects().list(&Query::new()).await?))
    });

    view! {
        <ResourcePage
            title="Materias"
            subtitle="Materias registradas en el sistema"
            headers=&["ID", "Nombre", "Descripción"]
            empty="No hay materias registradas"
            rows=rows
            loading=loading
        />
    }
}

#[component]
pub fn StudentsPage() -> impl IntoView {
    let api = expect_context::<AppApi>();
    let rows = RwSignal::new(Vec::new());
    let loading = RwSignal::new(true);
    load_table(rows, loading, "No se pudieron cargar los estudiantes", async move {
        let courses = api.courses().list(&Query::new()).await?;
        let students = api.students().list(&Query::new()).await?;
        Ok::<_, ApiError>(student_rows(&students, &course_names(&courses)))
    });

    view! {
        <ResourcePage
            title="Estudiantes"
            subtitle="Estudiantes matriculados"
            headers=&["ID", "Nombre", "Curso", "Email"]
            empty="No hay estudiantes registrados"
            rows=rows
            loading=loading
        />
    }
}
