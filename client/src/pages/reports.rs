//! Report generation.
//!
//! SYSTEM CONTEXT
//! ==============
//! The form picks a kind (grades or attendance), a scope (course or one
//! student), and a format. `ReportForm::build` turns the selection into an
//! endpoint target and query; documents are saved as downloads, JSON data is
//! shown inline as a table.

#[cfg(test)]
#[path = "reports_test.rs"]
mod reports_test;

use leptos::prelude::*;

use crate::app::AppApi;
use crate::net::api::{ApiError, Query};
use crate::net::api_resources::{ReportKind, ReportTarget};
use crate::net::types::{Id, Identity, ReportFormat, ReportPayload, ReportQuery, Role, Student};
use crate::pages::common::{TRIMESTERS, is_latest, parse_id, report_failure, take_ticket};
use crate::pages::resources::course_names;
use crate::state::notices::NoticeState;
use crate::state::session::AppSession;
use crate::util::download::{report_file_name, save_bytes};
use crate::util::request_seq::Generation;
use crate::util::teaching::{course_ids, label_for, subject_ids, subject_ids_in_course};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportScope {
    #[default]
    Course,
    Student,
}

/// Everything the report form has selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportForm {
    pub kind: ReportKind,
    pub scope: ReportScope,
    pub course: Option<Id>,
    pub student: Option<Id>,
    pub subject: Option<Id>,
    pub trimester: u8,
    pub format: ReportFormat,
}

impl Default for ReportForm {
    fn default() -> Self {
        Self {
            kind: ReportKind::Grades,
            scope: ReportScope::Course,
            course: None,
            student: None,
            subject: None,
            trimester: 1,
            format: ReportFormat::Pdf,
        }
    }
}

/// A validated report request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRequest {
    pub target: ReportTarget,
    pub kind: ReportKind,
    pub query: ReportQuery,
}

impl ReportForm {
    /// Resolve the selection for `requester`.
    ///
    /// Teachers who narrowed a course report to one subject get the
    /// teacher/subject/course endpoint; everything else goes to the course or
    /// student endpoint with the filters as query parameters.
    ///
    /// # Errors
    ///
    /// Returns the message to toast when a required pick is missing.
    pub fn build(&self, requester: &Identity) -> Result<ReportRequest, &'static str> {
        let teacher_id = (requester.role == Role::Teacher).then_some(requester.id);
        let subject = teacher_id.and(self.subject);
        let trimester = (self.kind == ReportKind::Grades).then_some(self.trimester);

        let target = match self.scope {
            ReportScope::Course => {
                let course_id = self.course.ok_or("Por favor selecciona un curso")?;
                match (teacher_id, subject) {
                    (Some(teacher_id), Some(subject_id)) => {
                        ReportTarget::TeacherSubjectCourse { teacher_id, subject_id, course_id }
                    }
                    _ => ReportTarget::Course(course_id),
                }
            }
            ReportScope::Student => ReportTarget::Student(self.student.ok_or("Por favor selecciona un estudiante")?),
        };

        let path_has_scope = matches!(target, ReportTarget::TeacherSubjectCourse { .. });
        let query = ReportQuery {
            format: self.format,
            trimester,
            subject_id: if path_has_scope { None } else { subject },
            teacher_id: if path_has_scope { None } else { teacher_id },
        };
        Ok(ReportRequest { target, kind: self.kind, query })
    }
}

/// Flatten JSON report data into a header row plus body rows.
///
/// Arrays of objects become one row per element with the union of keys as
/// columns; a single object becomes key/value rows; anything else is one cell.
pub fn tabulate(data: &serde_json::Value) -> (Vec<String>, Vec<Vec<String>>) {
    use serde_json::Value;

    match data {
        Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
            let mut headers: Vec<String> = Vec::new();
            for item in items.iter().filter_map(Value::as_object) {
                for key in item.keys() {
                    if !headers.contains(key) {
                        headers.push(key.clone());
                    }
                }
            }
            let rows = items
                .iter()
                .filter_map(Value::as_object)
                .map(|item| headers.iter().map(|h| item.get(h).map(cell_text).unwrap_or_default()).collect())
                .collect();
            (headers, rows)
        }
        Value::Array(items) => (vec!["Valor".to_owned()], items.iter().map(|v| vec![cell_text(v)]).collect()),
        Value::Object(map) => (
            vec!["Campo".to_owned(), "Valor".to_owned()],
            map.iter().map(|(k, v)| vec![k.clone(), cell_text(v)]).collect(),
        ),
        other => (vec!["Valor".to_owned()], vec![vec![cell_text(other)]]),
    }
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Bool(true) => "Sí".to_owned(),
        serde_json::Value::Bool(false) => "No".to_owned(),
        other => other.to_string(),
    }
}

type DataView = (Vec<String>, Vec<Vec<String>>);

#[component]
pub fn ReportsPage() -> impl IntoView {
    let api = StoredValue::new(expect_context::<AppApi>());
    let notices = expect_context::<RwSignal<NoticeState>>();
    let session = expect_context::<AppSession>();
    let identity = session.snapshot().identity;
    let is_teacher = identity.as_ref().is_some_and(|i| i.role == Role::Teacher);

    let form = RwSignal::new(ReportForm::default());
    let courses = RwSignal::new(Vec::<(Id, String)>::new());
    let subject_labels = RwSignal::new(Vec::<(Id, String)>::new());
    let assignments = RwSignal::new(Vec::new());
    let students = RwSignal::new(Vec::<Student>::new());
    let generating = RwSignal::new(false);
    let data = RwSignal::new(None::<DataView>);
    let students_seq = StoredValue::new(Generation::default());

    {
        let api = api.get_value();
        let teacher_id = identity.as_ref().filter(|_| is_teacher).map(|i| i.id);
        leptos::task::spawn_local(async move {
            let result = async {
                let all_courses = course_names(&api.courses().list(&Query::new()).await?);
                let Some(teacher_id) = teacher_id else {
                    return Ok::<_, ApiError>((all_courses, Vec::new(), Vec::new()));
                };
                let rows = api.assignments().by_teacher(teacher_id).await?;
                let mine = course_ids(&rows);
                let visible: Vec<(Id, String)> =
                    all_courses.into_iter().filter(|(id, _)| mine.contains(id)).collect();
                let subjects: Vec<(Id, String)> =
                    api.subjects().list(&Query::new()).await?.into_iter().map(|s| (s.id, s.name)).collect();
                Ok::<_, ApiError>((visible, subjects, rows))
            }
            .await;
            match result {
                Ok((visible, subjects, rows)) => {
                    courses.set(visible);
                    subject_labels.set(subjects);
                    assignments.set(rows);
                }
                Err(e) => report_failure(notices, "report options", &e, "No se pudieron cargar los cursos"),
            }
        });
    }

    // Student picks are scoped to the selected course.
    let selected_course = Memo::new(move |_| form.with(|f| f.course));
    Effect::new(move || {
        let course = selected_course.get();
        let ticket = take_ticket(students_seq);
        students.set(Vec::new());
        let Some(course_id) = course else {
            return;
        };
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            let result = api.students().by_course(course_id).await;
            if !is_latest(students_seq, ticket) {
                return;
            }
            match result {
                Ok(roster) => students.set(roster),
                Err(e) => report_failure(notices, "report students", &e, "No se pudieron cargar los estudiantes"),
            }
        });
    });

    let subject_choices = move || {
        let rows = assignments.get();
        match selected_course.get() {
            Some(course_id) => subject_ids_in_course(&rows, course_id),
            None => subject_ids(&rows),
        }
    };

    let on_generate = move |_| {
        if generating.get_untracked() {
            return;
        }
        let Some(requester) = session.identity() else {
            return;
        };
        let request = match form.with_untracked(|f| f.build(&requester)) {
            Ok(request) => request,
            Err(message) => {
                notices.update(|n| {
                    n.error("Error", message);
                });
                return;
            }
        };
        generating.set(true);
        data.set(None);
        let api = api.get_value();
        leptos::task::spawn_local(async move {
            let result = api.reports().fetch(request.target, request.kind, &request.query).await;
            match result {
                Ok(ReportPayload::Document { bytes, content_type }) => {
                    let name = report_file_name(request.kind, request.target, request.query.format);
                    match save_bytes(&bytes, content_type.as_deref(), &name) {
                        Ok(()) => notices.update(|n| {
                            n.success("Reporte generado", "El reporte ha sido descargado exitosamente");
                        }),
                        Err(reason) => {
                            leptos::logging::warn!("report download failed: {reason}");
                            notices.update(|n| {
                                n.error("Error", "No se pudo descargar el reporte");
                            });
                        }
                    }
                }
                Ok(ReportPayload::Data(value)) => {
                    data.set(Some(tabulate(&value)));
                    notices.update(|n| {
                        n.success("Reporte generado", "El reporte se muestra a continuación");
                    });
                }
                Err(e) => report_failure(notices, "generate report", &e, "No se pudo generar el reporte"),
            }
            generating.set(false);
        });
    };

    let tab = move |active: bool| if active { "tab tab--active" } else { "tab" };

    view! {
        <div class="page">
            <header class="page__header">
                <h1>"Reportes"</h1>
                <p class="page__subtitle">"Genera y descarga reportes de notas y asistencias"</p>
            </header>

            <div class="page__columns">
                <section class="panel">
                    <h2>"Generador de Reportes"</h2>
                    <p class="panel__subtitle">"Configura los parámetros para generar el reporte deseado"</p>

                    <div class="tabs">
                        <button
                            class=move || tab(form.with(|f| f.kind == ReportKind::Grades))
                            on:click=move |_| form.update(|f| f.kind = ReportKind::Grades)
                        >
                            "Notas"
                        </button>
                        <button
                            class=move || tab(form.with(|f| f.kind == ReportKind::Attendance))
                            on:click=move |_| form.update(|f| f.kind = ReportKind::Attendance)
                        >
                            "Asistencias"
                        </button>
                    </div>

                    <div class="form-field">
                        <label class="form-label">"Seleccionar vista"</label>
                        <div class="tabs">
                            <button
                                class=move || tab(form.with(|f| f.scope == ReportScope::Course))
                                on:click=move |_| form.update(|f| f.scope = ReportScope::Course)
                            >
                                "Por Curso"
                            </button>
                            <button
                                class=move || tab(form.with(|f| f.scope == ReportScope::Student))
                                on:click=move |_| form.update(|f| f.scope = ReportScope::Student)
                            >
                                "Por Estudiante"
                            </button>
                        </div>
                    </div>

                    <div class="form-field">
                        <label class="form-label">"Curso"</label>
                        <select
                            class="form-input"
                            on:change=move |ev| {
                                let course = parse_id(&event_target_value(&ev));
                                form.update(|f| {
                                    f.course = course;
                                    f.student = None;
                                    f.subject = None;
                                });
                            }
                        >
                            <option value="">"Seleccionar curso"</option>
                            {move || {
                                courses
                                    .get()
                                    .into_iter()
                                    .map(|(id, name)| view! { <option value=id.to_string()>{name}</option> })
                                    .collect_view()
                            }}
                        </select>
                    </div>

                    <Show when=move || form.with(|f| f.scope == ReportScope::Student)>
                        <div class="form-field">
                            <label class="form-label">"Estudiante"</label>
                            <select
                                class="form-input"
                                disabled=move || form.with(|f| f.course.is_none())
                                on:change=move |ev| {
                                    let student = parse_id(&event_target_value(&ev));
                                    form.update(|f| f.student = student);
                                }
                            >
                                <option value="" selected=move || form.with(|f| f.student.is_none())>
                                    "Seleccionar estudiante"
                                </option>
                                {move || {
                                    students
                                        .get()
                                        .into_iter()
                                        .map(|s| view! { <option value=s.id.to_string()>{s.name}</option> })
                                        .collect_view()
                                }}
                            </select>
                        </div>
                    </Show>

                    <Show when=move || form.with(|f| f.kind == ReportKind::Grades)>
                        <div class="form-field">
                            <label class="form-label">"Trimestre"</label>
                            <select
                                class="form-input"
                                on:change=move |ev| {
                                    if let Ok(term) = event_target_value(&ev).parse::<u8>() {
                                        form.update(|f| f.trimester = term);
                                    }
                                }
                            >
                                {TRIMESTERS
                                    .iter()
                                    .map(|(term, name)| {
                                        let term = *term;
                                        view! {
                                            <option
                                                value=term.to_string()
                                                selected=move || form.with(|f| f.trimester == term)
                                            >
                                                {*name}
                                            </option>
                                        }
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                    </Show>

                    <Show when=move || is_teacher>
                        <div class="form-field">
                            <label class="form-label">"Materia"</label>
                            <select
                                class="form-input"
                                on:change=move |ev| {
                                    let subject = parse_id(&event_target_value(&ev));
                                    form.update(|f| f.subject = subject);
                                }
                            >
                                <option value="" selected=move || form.with(|f| f.subject.is_none())>
                                    "Todas las materias"
                                </option>
                                {move || {
                                    subject_choices()
                                        .into_iter()
                                        .map(|id| {
                                            let label = label_for(id, &subject_labels.get(), "Materia");
                                            view! { <option value=id.to_string()>{label}</option> }
                                        })
                                        .collect_view()
                                }}
                            </select>
                        </div>
                    </Show>

                    <div class="form-field">
                        <label class="form-label">"Formato"</label>
                        <select
                            class="form-input"
                            on:change=move |ev| {
                                if let Some(format) = ReportFormat::from_wire(&event_target_value(&ev)) {
                                    form.update(|f| f.format = format);
                                }
                            }
                        >
                            <option value="pdf">"PDF"</option>
                            <option value="excel">"Excel"</option>
                        </select>
                    </div>

                    <button class="btn btn--primary btn--block" disabled=move || generating.get() on:click=on_generate>
                        {move || if generating.get() { "Generando..." } else { "Descargar Reporte" }}
                    </button>
                </section>

                <section class="panel">
                    <h2>"Ayuda"</h2>
                    <h3>"Reportes de Notas"</h3>
                    <p class="panel__subtitle">
                        "Los reportes de notas incluyen todas las calificaciones del período seleccionado, organizadas por materia."
                    </p>
                    <h3>"Reportes de Asistencia"</h3>
                    <p class="panel__subtitle">
                        "Los reportes de asistencia muestran un resumen de la asistencia y ausencias en el período seleccionado."
                    </p>
                    <h3>"Formatos"</h3>
                    <p class="panel__subtitle">"PDF: ideal para imprimir o compartir. Excel: útil para análisis adicionales."</p>
                </section>
            </div>

            {move || {
                data.get()
                    .map(|(headers, rows)| {
                        view! {
                            <section class="panel">
                                <h2>"Resultado"</h2>
                                <table class="data-table">
                                    <thead>
                                        <tr>{headers.into_iter().map(|h| view! { <th>{h}</th> }).collect_view()}</tr>
                                    </thead>
                                    <tbody>
                                        {rows
                                            .into_iter()
                                            .map(|row| {
                                                view! {
                                                    <tr>{row.into_iter().map(|c| view! { <td>{c}</td> }).collect_view()}</tr>
                                                }
                                            })
                                            .collect_view()}
                                    </tbody>
                                </table>
                            </section>
                        }
                    })
            }}
        </div>
    }
}
