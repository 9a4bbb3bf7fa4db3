//! Teacher attendance recording.
//!
//! SYSTEM CONTEXT
//! ==============
//! Course choices come from the teacher's assignments; picking a course
//! loads its subjects and roster, and picking a subject + date looks up
//! existing records so the sheet can be edited instead of duplicated. Both
//! lookups run under generation tickets, so answers for a selection the user
//! has already moved away from are dropped. Saving posts the whole sheet to
//! the bulk endpoint.

#[cfg(test)]
#[path = "attendance_test.rs"]
mod attendance_test;

use leptos::prelude::*;

use crate::app::AppApi;
use crate::net::api::{ApiError, Query};
use crate::net::types::{AttendanceRecord, Id, Student};
use crate::pages::common::{is_latest, parse_id, report_failure, stale_all, take_ticket};
use crate::pages::resources::course_names;
use crate::state::notices::{NoticeKind, NoticeState};
use crate::state::session::AppSession;
use crate::util::date::{is_valid_date, today};
use crate::util::request_seq::Generation;
use crate::util::teaching::{course_ids, label_for, subject_ids_in_course};

/// Presence marks for one course roster.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttendanceSheet {
    marks: Vec<(Id, bool)>,
    /// Records already exist for the selected subject and date.
    pub existing: bool,
}

impl AttendanceSheet {
    /// Everyone absent, nothing recorded yet.
    pub fn for_students(students: &[Student]) -> Self {
        Self { marks: students.iter().map(|s| (s.id, false)).collect(), existing: false }
    }

    /// Overlay stored records; an empty answer resets the sheet.
    pub fn apply_existing(&mut self, records: &[AttendanceRecord]) {
        self.existing = !records.is_empty();
        for (student_id, present) in &mut self.marks {
            *present = records
                .iter()
                .find(|record| record.student_id == *student_id)
                .is_some_and(|record| record.present);
        }
    }

    pub fn is_present(&self, student_id: Id) -> bool {
        self.marks.iter().any(|(id, present)| *id == student_id && *present)
    }

    pub fn set(&mut self, student_id: Id, present: bool) {
        if let Some((_, mark)) = self.marks.iter_mut().find(|(id, _)| *id == student_id) {
            *mark = present;
        }
    }

    pub fn set_all(&mut self, present: bool) {
        for (_, mark) in &mut self.marks {
            *mark = present;
        }
    }

    pub fn present_count(&self) -> usize {
        self.marks.iter().filter(|(_, present)| *present).count()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn to_records(&self, subject_id: Id, date: &str) -> Vec<AttendanceRecord> {
        self.marks
            .iter()
            .map(|(student_id, present)| AttendanceRecord {
                id: None,
                student_id: *student_id,
                subject_id,
                date: date.to_owned(),
                present: *present,
            })
            .collect()
    }

    pub fn save_label(&self) -> &'static str {
        if self.existing { "Actualizar Asistencia" } else { "Guardar Asistencia" }
    }
}

/// Check the selection before saving.
///
/// # Errors
///
/// Returns the message to toast.
pub fn validate_selection(
    course: Option<Id>,
    subject: Option<Id>,
    date: &str,
    sheet: &AttendanceSheet,
) -> Result<(Id, String), &'static str> {
    let (Some(_), Some(subject_id)) = (course, subject) else {
        return Err("Por favor selecciona curso, materia y fecha");
    };
    if !is_valid_date(date) {
        return Err("Por favor selecciona curso, materia y fecha");
    }
    if sheet.is_empty() {
        return Err("No hay estudiantes para registrar asistencia");
    }
    Ok((subject_id, date.to_owned()))
}

#[component]
pub fn RecordAttendancePage() -> impl IntoView {
    let api = StoredValue::new(expect_context::<AppApi>());
    let notices = expect_context::<RwSignal<NoticeState>>();
    let session = expect_context::<AppSession>();
    let teacher_id = session.snapshot().identity.map(|identity| identity.id);

    let assignments = RwSignal::new(Vec::new());
    let course_labels = RwSignal::new(Vec::<(Id, String)>::new());
    let subject_labels = RwSignal::new(Vec::<(Id, String)>::new());
    let students = RwSignal::new(Vec::<Student>::new());
    let sheet = RwSignal::new(AttendanceSheet::default());

    let selected_course = RwSignal::new(None::<Id>);
    let selected_subject = RwSignal::new(None::<Id>);
    let date = RwSignal::new(today());
    let loading = RwSignal::new(false);
    let saving = RwSignal::new(false);

    let roster_seq = StoredValue::new(Generation::default());
    let records_seq = StoredValue::new(Generation::default());

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

    // Course change: reload roster, clear subject and any pending record lookup.
    Effect::new(move || {
        let Some(course_id) = selected_course.get() else {
            return;
        };
        let ticket = take_ticket(roster_seq);
        stale_all(records_seq);
        selected_subject.set(None);
        students.set(Vec::new());
        sheet.set(AttendanceSheet::default());
        loading.set(true);
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            let result = api.students().by_course(course_id).await;
            if !is_latest(roster_seq, ticket) {
                return;
            }
            match result {
                Ok(roster) => {
                    sheet.set(AttendanceSheet::for_students(&roster));
                    students.set(roster);
                }
                Err(e) => report_failure(notices, "course roster", &e, "No se pudieron cargar los estudiantes"),
            }
            loading.set(false);
        });
    });

    // Subject/date change: look for records already stored for that day.
    Effect::new(move || {
        let (Some(_), Some(subject_id)) = (selected_course.get(), selected_subject.get()) else {
            return;
        };
        let day = date.get();
        if !is_valid_date(&day) {
            return;
        }
        let ticket = take_ticket(records_seq);
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            let result = api.attendance().for_subject_on(subject_id, &day).await;
            if !is_latest(records_seq, ticket) {
                return;
            }
            match result {
                Ok(records) => {
                    sheet.update(|s| s.apply_existing(&records));
                    if !records.is_empty() {
                        notices.update(|n| {
                            n.push(
                                NoticeKind::Info,
                                "Registros encontrados",
                                "Se encontraron registros de asistencia para la fecha seleccionada",
                            );
                        });
                    }
                }
                Err(e) => leptos::logging::warn!("existing attendance lookup failed: {e}"),
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
        let current = sheet.get_untracked();
        let (subject_id, day) = match validate_selection(
            selected_course.get_untracked(),
            selected_subject.get_untracked(),
            &date.get_untracked(),
            &current,
        ) {
            Ok(selection) => selection,
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
            match api.attendance().bulk_create(&current.to_records(subject_id, &day)).await {
                Ok(_) => {
                    notices.update(|n| {
                        n.success("Asistencia registrada", "La asistencia ha sido registrada exitosamente");
                    });
                    sheet.update(|s| s.existing = true);
                }
                Err(e) => report_failure(notices, "save attendance", &e, "No se pudo guardar la asistencia"),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="page">
            <header class="page__header">
                <h1>"Registrar Asistencia"</h1>
                <p class="page__subtitle">"Registra la asistencia de estudiantes por curso y materia"</p>
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
                    <label class="form-label">"Fecha"</label>
                    <input
                        class="form-input"
                        type="date"
                        disabled=move || loading.get()
                        prop:value=move || date.get()
                        on:change=move |ev| date.set(event_target_value(&ev))
                    />
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
                let total = roster.len();
                view! {
                    <section class="panel">
                        <div class="panel__toolbar">
                            <div>
                                <h2>"Lista de Estudiantes"</h2>
                                <p class="panel__subtitle">
                                    {move || date.get()} " - Total: " {total} " estudiantes, presentes: "
                                    {move || sheet.get().present_count()}
                                </p>
                            </div>
                            <div class="panel__actions">
                                <button class="btn btn--outline" on:click=move |_| sheet.update(|s| s.set_all(true))>
                                    "Todos presentes"
                                </button>
                                <button class="btn btn--outline" on:click=move |_| sheet.update(|s| s.set_all(false))>
                                    "Todos ausentes"
                                </button>
                            </div>
                        </div>
                        <table class="data-table">
                            <thead>
                                <tr>
                                    <th>"Nombre"</th>
                                    <th class="data-table__center">"Presente"</th>
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
                                                        type="checkbox"
                                                        prop:checked=move || sheet.get().is_present(id)
                                                        on:change=move |ev| {
                                                            let checked = event_target_checked(&ev);
                                                            sheet.update(|s| s.set(id, checked));
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
                                {move || if saving.get() { "Guardando...".to_owned() } else { sheet.get().save_label().to_owned() }}
                            </button>
                        </div>
                    </section>
                }
                    .into_any()
            }}
        </div>
    }
}
