//! Teacher grade recording.
//!
//! Same selection flow as attendance: course from the teacher's assignments,
//! subject within that course, then a trimester. The sheet keeps raw text per
//! student so half-typed values survive re-renders; only the save path
//! parses them.

#[cfg(test)]
#[path = "grades_test.rs"]
mod grades_test;

use leptos::prelude::*;

use crate::app::AppApi;
use crate::net::api::{ApiError, Query};
use crate::net::types::{GradeRecord, Id, Student};
use crate::pages::common::{TRIMESTERS, is_latest, parse_id, report_failure, stale_all, take_ticket};
use crate::pages::resources::course_names;
use crate::state::notices::NoticeState;
use crate::state::session::AppSession;
use crate::util::request_seq::Generation;
use crate::util::teaching::{course_ids, label_for, subject_ids_in_course};

pub const MIN_GRADE: f64 = 0.0;
pub const MAX_GRADE: f64 = 100.0;

/// Parse one grade cell. Blank means "not graded".
///
/// # Errors
///
/// Returns the message to show when the text is not a grade in range.
pub fn parse_grade(text: &str) -> Result<Option<f64>, &'static str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: f64 = trimmed
        .replace(',', ".")
        .parse()
        .map_err(|_| "Las notas deben ser números")?;
    if !value.is_finite() || !(MIN_GRADE..=MAX_GRADE).contains(&value) {
        return Err("Las notas deben estar entre 0 y 100");
    }
    Ok(Some(value))
}

/// Format a stored grade for its input cell, dropping a `.0` suffix.
pub fn format_grade(value: f64) -> String {
    if value.fract() == 0.0 { format!("{value:.0}") } else { value.to_string() }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GradeSheet {
    entries: Vec<(Id, String)>,
    pub existing: bool,
}

impl GradeSheet {
    pub fn for_students(students: &[Student]) -> Self {
        Self { entries: students.iter().map(|s| (s.id, String::new())).collect(), existing: false }
    }

    /// Prefill from stored grades of one trimester. Grades of other
    /// trimesters are ignored.
    pub fn apply_existing(&mut self, grades: &[GradeRecord], trimester: u8) {
        let mut found = false;
        for (student_id, text) in &mut self.entries {
            let stored = grades.iter().find(|g| g.student_id == *student_id && g.trimester == trimester);
            found |= stored.is_some();
            *text = stored.map(|g| format_grade(g.grade)).unwrap_or_default();
        }
        self.existing = found;
    }

    pub fn text(&self, student_id: Id) -> String {
        self.entries.iter().find(|(id, _)| *id == student_id).map(|(_, t)| t.clone()).unwrap_or_default()
    }

    pub fn set(&mut self, student_id: Id, text: String) {
        if let Some((_, entry)) = self.entries.iter_mut().find(|(id, _)| *id == student_id) {
            *entry = text;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records for every filled cell.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid cell, or when nothing was filled in.
    pub fn to_records(&self, subject_id: Id, trimester: u8) -> Result<Vec<GradeRecord>, &'static str> {
        let mut records = Vec::new();
        for (student_id, text) in &self.entries {
            if let Some(grade) = parse_grade(text)? {
                records.push(GradeRecord { id: None, student_id: *student_id, subject_id, trimester, grade });
            }
        }
        if records.is_empty() {
            return Err("Ingresa al menos una nota");
        }
        Ok(records)
    }

    pub fn save_label(&self) -> &'static str {
        if self.existing { "Actualizar Notas" } else { "Guardar Notas" }
    }
}

#[component]
pub fn RecordGradesPage() -> impl IntoView {
    let api = StoredValue::new(expect_context::<AppApi>());
    let notices = expect_context::<RwSignal<NoticeState>>();
    let session = expect_context::<AppSession>();
    let teacher_id = session.snapshot().identity.map(|identity| identity.id);

    let assignments = RwSignal::new(Vec::new());
    let course_labels = RwSignal::new(Vec::<(Id, String)>::new());
    let subject_labels = RwSignal::new(Vec::<(Id, String)>::new());
    let students = RwSignal::new(Vec::<Student>::new());
    let sheet = RwSignal::new(GradeSheet::default());

    let selected_course = RwSignal::new(None::<Id>);
    let selected_subject = RwSignal::new(None::<Id>);
    let trimester = RwSignal::new(1_u8);
    let loading = RwSignal::new(false);
    let saving = RwSignal::new(false);

    let roster_seq = StoredValue::new(Generation::default());
    let grades_seq = StoredValue::new(Generation::default());

    if let Some(teacher_id) = teacher_id {
        loading.set(true);
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            let result = async {
                let rows = api.assignments().by_teacher(teacher_id).await?;
                let courses = course_names(&api.courses().list(&Query::new()).await?);
                let subjects: Vec<_> =
                    api.subjects().list(&Query::new()).await?.into_iter().map(|s| (s.id, s.name)).collect();
                Ok::<_, ApiError>((rows, courses, subjects))
            }
            .await;
            match result {
                Ok((rows, courses, subjects)) => {
                    assignments.set(rows);
                    course_labels.set(courses);
                    subject_labels.set(subjects);
                }
                Err(e) => report_failure(notices, "teacher courses", &e, "No se pudieron cargar los cursos"),
            }
            loading.set(false);
        });
    }

    Effect::new(move || {
        let Some(course_id) = selected_course.get() else {
            return;
        };
        let ticket = take_ticket(roster_seq);
        stale_all(grades_seq);
        selected_subject.set(None);
        students.set(Vec::new());
        sheet.set(GradeSheet::default());
        loading.set(true);
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            let result = api.students().by_course(course_id).await;
            if !is_latest(roster_seq, ticket) {
                return;
            }
            match result {
                Ok(roster) => {
                    sheet.set(GradeSheet::for_students(&roster));
                    students.set(roster);
                }
                Err(e) => report_failure(notices, "course roster", &e, "No se pudieron cargar los estudiantes"),
            }
            loading.set(false);
        });
    });

    Effect::new(move || {
        let (Some(_), Some(subject_id)) = (selected_course.get(), selected_subject.get()) else {
            return;
        };
        let term = trimester.get();
        let ticket = take_ticket(grades_seq);
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            let result = api.grades().by_subject(subject_id).await;
            if !is_latest(grades_seq, ticket) {
                return;
            }
            match result {
                Ok(grades) => sheet.update(|s| s.apply_existing(&grades, term)),
                Err(e) => leptos::logging::warn!("existing grades lookup failed: {e}"),
            }
        });
    });

    let subjects_for_course = move || {
        selected_course
            .get()
            .map(|course_id| subject_ids_in_course(&assignments.get(), course_id))
            .unwrap_or_default()
    };

    let on_save = move |_| {
        if saving.get_untracked() {
            return;
        }
        let Some(subject_id) = selected_subject.get_untracked() else {
            notices.update(|n| {
                n.error("Error", "Por favor selecciona curso, materia y trimestre");
            });
            return;
        };
        let records = match sheet.with_untracked(|s| s.to_records(subject_id, trimester.get_untracked())) {
            Ok(records) => records,
            Err(message) => {
                notices.update(|n| {
                    n.error("Error", message);
                });
                return;
            }
        };
        saving.set(true);
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            match api.grades().bulk_create(&records).await {
                Ok(_) => {
                    notices.update(|n| {
                        n.success("Notas registradas", "Las notas han sido registradas exitosamente");
                    });
                    sheet.update(|s| s.existing = true);
                }
                Err(e) => report_failure(notices, "save grades", &e, "No se pudieron guardar las notas"),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="page">
            <header class="page__header">
                <h1>"Registrar Notas"</h1>
                <p class="page__subtitle">"Registra las notas de los estudiantes por materia y trimestre"</p>
            </header>

            <section class="panel panel--grid">
                <div class="form-field">
                    <label class="form-label">"Curso"</label>
                    <select
                        class="form-input"
                        disabled=move || loading.get()
                        on:change=move |ev| selected_course.set(parse_id(&event_target_value(&ev)))
                    >
                        <option value="">"Seleccionar curso"</option>
                        {move || {
                            course_ids(&assignments.get())
                                .into_iter()
                                .map(|id| {
                                    let label = label_for(id, &course_labels.get(), "Curso");
                                    view! {
                                        <option value=id.to_string() selected=move || selected_course.get() == Some(id)>
                                            {label}
                                        </option>
                                    }
                                })
                                .collect_view()
                        }}
                    </select>
                </div>
                <div class="form-field">
                    <label class="form-label">"Materia"</label>
                    <select
                        class="form-input"
                        disabled=move || selected_course.get().is_none() || loading.get()
                        on:change=move |ev| selected_subject.set(parse_id(&event_target_value(&ev)))
                    >
                        <option value="" selected=move || selected_subject.get().is_none()>"Seleccionar materia"</option>
                        {move || {
                            subjects_for_course()
                                .into_iter()
                                .map(|id| {
                                    let label = label_for(id, &subject_labels.get(), "Materia");
                                    view! { <option value=id.to_string()>{label}</option> }
                                })
                                .collect_view()
                        }}
                    </select>
                </div>
                <div class="form-field">
                    <label class="form-label">"Trimestre"</label>
                    <select
                        class="form-input"
                        on:change=move |ev| {
                            if let Ok(term) = event_target_value(&ev).parse::<u8>() {
                                trimester.set(term);
                            }
                        }
                    >
                        {TRIMESTERS
                            .iter()
                            .map(|(term, name)| {
                                let term = *term;
                                view! {
                                    <option value=term.to_string() selected=move || trimester.get() == term>
                                        {*name}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </div>
            </section>

            {move || {
                if loading.get() {
                    return view! { <p class="page-loading">"Cargando..."</p> }.into_any();
                }
                if selected_course.get().is_none() || selected_subject.get().is_none() {
                    return ().into_any();
                }
                let roster = students.get();
                if roster.is_empty() {
                    return view! { <p class="data-table__empty">"No hay estudiantes registrados en este curso"</p> }
                        .into_any();
                }
                view! {
                    <section class="panel">
                        <div class="panel__toolbar">
                            <h2>"Lista de Estudiantes"</h2>
                            <p class="panel__subtitle">"Notas de 0 a 100. Deja en blanco para omitir."</p>
                        </div>
                        <table class="data-table">
                            <thead>
                                <tr>
                                    <th>"Nombre"</th>
                                    <th class="data-table__center">"Nota"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {roster
                                    .into_iter()
                                    .map(|student| {
                                        let id = student.id;
                                        view! {
                                            <tr>
                                                <td>{student.name}</td>
                                                <td class="data-table__center">
                                                    <input
                                                        class="form-input form-input--narrow"
                                                        type="number"
                                                        min="0"
                                                        max="100"
                                                        step="0.1"
                                                        prop:value=move || sheet.with(|s| s.text(id))
                                                        on:input=move |ev| {
                                                            let text = event_target_value(&ev);
                                                            sheet.update(|s| s.set(id, text));
                                                        }
                                                    />
                                                </td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()}
                            </tbody>
                        </table>
                        <div class="panel__footer">
                            <button class="btn btn--primary" disabled=move || saving.get() on:click=on_save>
                                {move || if saving.get() { "Guardando...".to_owned() } else { sheet.with(|s| s.save_label().to_owned()) }}
                            </button>
                        </div>
                    </section>
                }
                    .into_any()
            }}
        </div>
    }
}
