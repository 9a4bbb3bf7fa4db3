//! Per-resource operations on top of `ApiClient`.
//!
//! DESIGN
//! ======
//! Every backend noun (`usuarios`, `cursos`, `materias`, `estudiantes`,
//! `asignaciones`, `asistencias`, `calificaciones`) shares the same CRUD
//! shape, so a single `Collection` handle carries list/get/create/update/
//! delete. Resource-specific endpoints (password change, filtered lookups,
//! bulk create) are inherent impls on the concrete row type. Reads decode
//! into typed rows; writes hand back the raw response.

#[cfg(test)]
#[path = "api_resources_test.rs"]
mod api_resources_test;

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api::{ApiClient, ApiError, Query, SessionAuthority};
use super::transport::{ApiResponse, Method, Transport};
use super::types::{
    Assignment, AttendanceRecord, AuthGrant, Course, Credentials, GradeRecord, Id, Identity, PasswordChange,
    ReportFormat, ReportPayload, ReportQuery, Student, Subject, UserAccount,
};

const USERS: &str = "usuarios";
const COURSES: &str = "cursos";
const SUBJECTS: &str = "materias";
const STUDENTS: &str = "estudiantes";
const ASSIGNMENTS: &str = "asignaciones";
const ATTENDANCE: &str = "asistencias";
const GRADES: &str = "calificaciones";

/// CRUD handle for one backend resource family.
pub struct Collection<'a, T, A, R> {
    client: &'a ApiClient<T, A>,
    path: &'static str,
    _row: PhantomData<fn() -> R>,
}

impl<'a, T, A, R> Collection<'a, T, A, R>
where
    T: Transport,
    A: SessionAuthority,
    R: DeserializeOwned,
{
    fn new(client: &'a ApiClient<T, A>, path: &'static str) -> Self {
        Self { client, path, _row: PhantomData }
    }

    fn item_path(&self, id: Id) -> String {
        format!("{}/{id}", self.path)
    }

    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn list(&self, query: &Query) -> Result<Vec<R>, ApiError> {
        self.client.get_json(self.path, query).await
    }

    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn get(&self, id: Id) -> Result<R, ApiError> {
        self.client.get_json(&self.item_path(id), &Query::new()).await
    }

    /// # Errors
    ///
    /// Propagates encode, transport, and status failures.
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<ApiResponse, ApiError> {
        self.client.send_json(Method::Post, self.path, body).await
    }

    /// # Errors
    ///
    /// Propagates encode, transport, and status failures.
    pub async fn update<B: Serialize + ?Sized>(&self, id: Id, body: &B) -> Result<ApiResponse, ApiError> {
        self.client.send_json(Method::Put, &self.item_path(id), body).await
    }

    /// # Errors
    ///
    /// Propagates transport and status failures.
    pub async fn delete(&self, id: Id) -> Result<ApiResponse, ApiError> {
        self.client.delete_path(&self.item_path(id)).await
    }

    async fn list_where(&self, key: &str, id: Id) -> Result<Vec<R>, ApiError> {
        self.list(&Query::new().param(key, id)).await
    }

    /// Forward the array to the resource's `bulk` endpoint unchanged.
    async fn post_bulk<B: Serialize>(&self, items: &[B]) -> Result<ApiResponse, ApiError> {
        self.client.send_json(Method::Post, &format!("{}/bulk", self.path), items).await
    }
}

impl<T: Transport, A: SessionAuthority> Collection<'_, T, A, UserAccount> {
    /// # Errors
    ///
    /// Propagates encode, transport, and status failures.
    pub async fn change_password(&self, id: Id, change: &PasswordChange) -> Result<ApiResponse, ApiError> {
        self.client.send_json(Method::Patch, &format!("{}/password", self.item_path(id)), change).await
    }
}

impl<T: Transport, A: SessionAuthority> Collection<'_, T, A, Student> {
    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn by_course(&self, course_id: Id) -> Result<Vec<Student>, ApiError> {
        self.list_where("curso_id", course_id).await
    }
}

impl<T: Transport, A: SessionAuthority> Collection<'_, T, A, Assignment> {
    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn by_teacher(&self, teacher_id: Id) -> Result<Vec<Assignment>, ApiError> {
        self.list_where("docente_id", teacher_id).await
    }

    /// Assignments of one teacher within one course.
    ///
    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn for_teacher_in_course(&self, teacher_id: Id, course_id: Id) -> Result<Vec<Assignment>, ApiError> {
        self.list(&Query::new().param("curso_id", course_id).param("docente_id", teacher_id)).await
    }
}

impl<T: Transport, A: SessionAuthority> Collection<'_, T, A, AttendanceRecord> {
    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn by_student(&self, student_id: Id) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.list_where("estudiante_id", student_id).await
    }

    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn by_subject(&self, subject_id: Id) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.list_where("materia_id", subject_id).await
    }

    /// Records for one subject on one date (`YYYY-MM-DD`).
    ///
    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn for_subject_on(&self, subject_id: Id, date: &str) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.list(&Query::new().param("materia_id", subject_id).param("fecha", date)).await
    }

    /// # Errors
    ///
    /// Propagates encode, transport, and status failures.
    pub async fn bulk_create(&self, records: &[AttendanceRecord]) -> Result<ApiResponse, ApiError> {
        self.post_bulk(records).await
    }
}

impl<T: Transport, A: SessionAuthority> Collection<'_, T, A, GradeRecord> {
    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn by_student(&self, student_id: Id) -> Result<Vec<GradeRecord>, ApiError> {
        self.list_where("estudiante_id", student_id).await
    }

    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn by_subject(&self, subject_id: Id) -> Result<Vec<GradeRecord>, ApiError> {
        self.list_where("materia_id", subject_id).await
    }

    /// # Errors
    ///
    /// Propagates encode, transport, and status failures.
    pub async fn bulk_create(&self, grades: &[GradeRecord]) -> Result<ApiResponse, ApiError> {
        self.post_bulk(grades).await
    }
}

/// What a report is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    Grades,
    Attendance,
}

impl ReportKind {
    const fn segment(self) -> &'static str {
        match self {
            Self::Grades => "notas",
            Self::Attendance => "asistencias",
        }
    }
}

/// Whose data a report covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportTarget {
    Course(Id),
    Student(Id),
    TeacherSubjectCourse { teacher_id: Id, subject_id: Id, course_id: Id },
}

/// Endpoint path (relative to the base URL) for a report.
pub fn report_path(target: ReportTarget, kind: ReportKind) -> String {
    let scope = match target {
        ReportTarget::Course(course_id) => format!("curso/{course_id}"),
        ReportTarget::Student(student_id) => format!("estudiante/{student_id}"),
        ReportTarget::TeacherSubjectCourse { teacher_id, subject_id, course_id } => {
            format!("docente/{teacher_id}/materia/{subject_id}/curso/{course_id}")
        }
    };
    format!("reportes/{scope}/{}", kind.segment())
}

fn report_params(query: &ReportQuery) -> Query {
    Query::new()
        .param("format", query.format.as_str())
        .opt_param("trimestre", query.trimester)
        .opt_param("materia_id", query.subject_id)
        .opt_param("docente_id", query.teacher_id)
}

/// Interpret a report response according to the requested format.
///
/// PDF is always a binary document. Excel is structured data when the
/// backend answers with JSON, otherwise a binary document.
pub fn report_payload(format: ReportFormat, response: ApiResponse) -> Result<ReportPayload, ApiError> {
    match format {
        ReportFormat::Excel if response.is_json() => {
            response.json().map(ReportPayload::Data).map_err(|e| ApiError::Decode(e.to_string()))
        }
        ReportFormat::Pdf | ReportFormat::Excel => {
            Ok(ReportPayload::Document { bytes: response.body, content_type: response.content_type })
        }
    }
}

/// Report endpoints handle.
pub struct Reports<'a, T, A> {
    client: &'a ApiClient<T, A>,
}

impl<T: Transport, A: SessionAuthority> Reports<'_, T, A> {
    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn fetch(
        &self,
        target: ReportTarget,
        kind: ReportKind,
        query: &ReportQuery,
    ) -> Result<ReportPayload, ApiError> {
        let request = self.client.request(Method::Get, &report_path(target, kind), &report_params(query));
        let response = self.client.execute(request).await?;
        report_payload(query.format, response)
    }

    /// # Errors
    ///
    /// See [`Reports::fetch`].
    pub async fn course_grades(&self, course_id: Id, query: &ReportQuery) -> Result<ReportPayload, ApiError> {
        self.fetch(ReportTarget::Course(course_id), ReportKind::Grades, query).await
    }

    /// # Errors
    ///
    /// See [`Reports::fetch`].
    pub async fn course_attendance(&self, course_id: Id, query: &ReportQuery) -> Result<ReportPayload, ApiError> {
        self.fetch(ReportTarget::Course(course_id), ReportKind::Attendance, query).await
    }

    /// # Errors
    ///
    /// See [`Reports::fetch`].
    pub async fn student_grades(&self, student_id: Id, query: &ReportQuery) -> Result<ReportPayload, ApiError> {
        self.fetch(ReportTarget::Student(student_id), ReportKind::Grades, query).await
    }

    /// # Errors
    ///
    /// See [`Reports::fetch`].
    pub async fn student_attendance(&self, student_id: Id, query: &ReportQuery) -> Result<ReportPayload, ApiError> {
        self.fetch(ReportTarget::Student(student_id), ReportKind::Attendance, query).await
    }

    /// # Errors
    ///
    /// See [`Reports::fetch`].
    pub async fn teacher_subject_course_grades(
        &self,
        teacher_id: Id,
        subject_id: Id,
        course_id: Id,
        query: &ReportQuery,
    ) -> Result<ReportPayload, ApiError> {
        let target = ReportTarget::TeacherSubjectCourse { teacher_id, subject_id, course_id };
        self.fetch(target, ReportKind::Grades, query).await
    }

    /// # Errors
    ///
    /// See [`Reports::fetch`].
    pub async fn teacher_subject_course_attendance(
        &self,
        teacher_id: Id,
        subject_id: Id,
        course_id: Id,
        query: &ReportQuery,
    ) -> Result<ReportPayload, ApiError> {
        let target = ReportTarget::TeacherSubjectCourse { teacher_id, subject_id, course_id };
        self.fetch(target, ReportKind::Attendance, query).await
    }
}

impl<T: Transport, A: SessionAuthority> ApiClient<T, A> {
    /// Exchange credentials for a token via `POST usuarios/login`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError> {
        let response = self.send_json(Method::Post, &format!("{USERS}/login"), credentials).await?;
        response.json().map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// The identity behind the current token via `GET usuarios/me`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn me(&self) -> Result<Identity, ApiError> {
        self.get_json(&format!("{USERS}/me"), &Query::new()).await
    }

    pub fn users(&self) -> Collection<'_, T, A, UserAccount> {
        Collection::new(self, USERS)
    }

    pub fn courses(&self) -> Collection<'_, T, A, Course> {
        Collection::new(self, COURSES)
    }

    pub fn subjects(&self) -> Collection<'_, T, A, Subject> {
        Collection::new(self, SUBJECTS)
    }

    pub fn students(&self) -> Collection<'_, T, A, Student> {
        Collection::new(self, STUDENTS)
    }

    pub fn assignments(&self) -> Collection<'_, T, A, Assignment> {
        Collection::new(self, ASSIGNMENTS)
    }

    pub fn attendance(&self) -> Collection<'_, T, A, AttendanceRecord> {
        Collection::new(self, ATTENDANCE)
    }

    pub fn grades(&self) -> Collection<'_, T, A, GradeRecord> {
        Collection::new(self, GRADES)
    }

    pub fn reports(&self) -> Reports<'_, T, A> {
        Reports { client: self }
    }
}
