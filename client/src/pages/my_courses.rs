//! Teacher view of their own course/subject assignments.

#[cfg(test)]
#[path = "my_courses_test.rs"]
mod my_courses_test;

use leptos::prelude::*;

use crate::app::AppApi;
use crate::components::data_table::DataTable;
use crate::net::api::{ApiError, Query};
use crate::net::types::{Assignment, Id};
use crate::pages::resources::{course_names, load_table};
use crate::state::session::AppSession;
use crate::util::teaching::{course_ids, label_for, subject_ids_in_course};

/// One row per course: course name and the subjects taught there.
pub fn my_course_rows(
    assignments: &[Assignment],
    courses: &[(Id, String)],
    subjects: &[(Id, String)],
) -> Vec<Vec<String>> {
    course_ids(assignments)
        .into_iter()
        .map(|course_id| {
            let taught = subject_ids_in_course(assignments, course_id)
                .into_iter()
                .map(|id| label_for(id, subjects, "Materia"))
                .collect::<Vec<_>>()
                .join(", ");
            vec![label_for(course_id, courses, "Curso"), taught]
        })
        .collect()
}

#[component]
pub fn MyCoursesPage() -> impl IntoView {
    let api = expect_context::<AppApi>();
    let session = expect_context::<AppSession>();
    let rows = RwSignal::new(Vec::new());
    let loading = RwSignal::new(true);
    let teacher_id = session.snapshot().identity.map(|identity| identity.id);

    load_table(rows, loading, "No se pudieron cargar los cursos", async move {
        let Some(teacher_id) = teacher_id else {
            return Ok(Vec::new());
        };
        let assignments = api.assignments().by_teacher(teacher_id).await?;
        let courses = course_names(&api.courses().list(&Query::new()).await?);
        let subjects: Vec<_> =
            api.subjects().list(&Query::new()).await?.into_iter().map(|s| (s.id, s.name)).collect();
        Ok::<_, ApiError>(my_course_rows(&assignments, &courses, &subjects))
    });

    view! {
        <div class="page">
            <header class="page__header">
                <h1>"Mis Cursos"</h1>
                <p class="page__subtitle">"Cursos y materias que tienes asignados"</p>
            </header>
            <DataTable
                headers=&["Curso", "Materias"]
                rows=rows
                loading=loading
                empty="No tienes cursos asignados"
            />
        </div>
    }
}
