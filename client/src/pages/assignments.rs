//! Admin listing of teacher/subject/course assignments.

#[cfg(test)]
#[path = "assignments_test.rs"]
mod assignments_test;

use leptos::prelude::*;

use crate::app::AppApi;
use crate::components::data_table::DataTable;
use crate::net::api::{ApiError, Query};
use crate::net::types::{Assignment, Id, Role};
use crate::pages::resources::{course_names, load_table};
use crate::util::teaching::label_for;

/// Names for every lookup column of the assignment table.
#[derive(Clone, Debug, Default)]
pub struct AssignmentLabels {
    pub teachers: Vec<(Id, String)>,
    pub subjects: Vec<(Id, String)>,
    pub courses: Vec<(Id, String)>,
}

pub fn assignment_rows(assignments: &[Assignment], labels: &AssignmentLabels) -> Vec<Vec<String>> {
    assignments
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                label_for(a.teacher_id, &labels.teachers, "Docente"),
                label_for(a.subject_id, &labels.subjects, "Materia"),
                label_for(a.course_id, &labels.courses, "Curso"),
            ]
        })
        .collect()
}

#[component]
pub fn AssignmentsPage() -> impl IntoView {
    let api = expect_context::<AppApi>();
    let rows = RwSignal::new(Vec::new());
    let loading = RwSignal::new(true);
    load_table(rows, loading, "No se pudieron cargar las asignaciones", async move {
        let all = Query::new();
        let labels = AssignmentLabels {
            teachers: api
                .users()
                .list(&all)
                .await?
                .into_iter()
                .filter(|u| u.role == Role::Teacher)
                .map(|u| (u.id, u.name))
                .collect(),
            subjects: api.subjects().list(&all).await?.into_iter().map(|s| (s.id, s.name)).collect(),
            courses: course_names(&api.courses().list(&all).await?),
        };
        Ok::<_, ApiError>(assignment_rows(&api.assignments().list(&all).await?, &labels))
    });

    view! {
        <div class="page">
            <header class="page__header">
                <h1>"Asignaciones"</h1>
                <p class="page__subtitle">"Docentes asignados a cada materia y curso"</p>
            </header>
            <DataTable
                headers=&["ID", "Docente", "Materia", "Curso"]
                rows=rows
                loading=loading
                empty="No hay asignaciones registradas"
            />
        </div>
    }
}
