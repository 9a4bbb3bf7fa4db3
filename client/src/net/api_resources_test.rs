use futures::executor::block_on;

use super::*;
use crate::net::transport::ApiRequest;
use crate::test_support::{FixedAuthority, ScriptedTransport};

fn client() -> (ApiClient<ScriptedTransport, FixedAuthority>, ScriptedTransport) {
    let transport = ScriptedTransport::default();
    let authority = FixedAuthority { token: Some("t".to_owned()), ..FixedAuthority::default() };
    (ApiClient::new("http://api.test/api", transport.clone(), authority), transport)
}

fn sent(transport: &ScriptedTransport) -> ApiRequest {
    transport.last_request()
}

fn document(content_type: Option<&str>, body: &[u8]) -> ApiResponse {
    ApiResponse { status: 200, content_type: content_type.map(str::to_owned), body: body.to_vec() }
}

// =============================================================
// CRUD shape
// =============================================================

#[test]
fn crud_verbs_and_paths() {
    let (client, transport) = client();
    let users = client.users();

    transport.reply(200, serde_json::json!([]));
    block_on(users.list(&Query::new())).unwrap();
    assert_eq!((sent(&transport).method, sent(&transport).url), (Method::Get, "http://api.test/api/usuarios".into()));

    transport.reply(200, serde_json::json!({ "id": 4, "nombre": "B", "email": "b@x", "rol": "docente" }));
    let user = block_on(users.get(4)).unwrap();
    assert_eq!(user.role, crate::net::types::Role::Teacher);
    assert_eq!(sent(&transport).url, "http://api.test/api/usuarios/4");

    transport.reply(200, serde_json::json!({}));
    block_on(users.update(4, &serde_json::json!({ "nombre": "C" }))).unwrap();
    assert_eq!(sent(&transport).method, Method::Put);

    transport.reply(204, serde_json::json!(null));
    block_on(users.delete(4)).unwrap();
    assert_eq!((sent(&transport).method, sent(&transport).url), (Method::Delete, "http://api.test/api/usuarios/4".into()));
}

#[test]
fn change_password_patches_password_subresource() {
    let (client, transport) = client();
    transport.reply(200, serde_json::json!({}));

    block_on(client.users().change_password(7, &PasswordChange { password: "n".to_owned() })).unwrap();

    let request = sent(&transport);
    assert_eq!(request.method, Method::Patch);
    assert_eq!(request.url, "http://api.test/api/usuarios/7/password");
    assert_eq!(request.body.as_deref(), Some(r#"{"password":"n"}"#));
}

#[test]
fn filtered_lookups_use_backend_parameter_names() {
    let (client, transport) = client();

    transport.reply(200, serde_json::json!([]));
    block_on(client.students().by_course(2)).unwrap();
    assert_eq!(sent(&transport).url, "http://api.test/api/estudiantes?curso_id=2");

    transport.reply(200, serde_json::json!([]));
    block_on(client.assignments().for_teacher_in_course(9, 2)).unwrap();
    assert_eq!(sent(&transport).url, "http://api.test/api/asignaciones?curso_id=2&docente_id=9");

    transport.reply(200, serde_json::json!([]));
    block_on(client.attendance().for_subject_on(3, "2024-05-02")).unwrap();
    assert_eq!(sent(&transport).url, "http://api.test/api/asistencias?materia_id=3&fecha=2024-05-02");

    transport.reply(200, serde_json::json!([]));
    block_on(client.grades().by_student(11)).unwrap();
    assert_eq!(sent(&transport).url, "http://api.test/api/calificaciones?estudiante_id=11");
}

#[test]
fn bulk_create_forwards_array_unchanged() {
    let (client, transport) = client();
    transport.reply(201, serde_json::json!({}));
    let records = vec![
        AttendanceRecord { id: None, student_id: 1, subject_id: 3, date: "2024-05-02".to_owned(), present: true },
        AttendanceRecord { id: None, student_id: 2, subject_id: 3, date: "2024-05-02".to_owned(), present: false },
    ];

    block_on(client.attendance().bulk_create(&records)).unwrap();

    let request = sent(&transport);
    assert_eq!(request.url, "http://api.test/api/asistencias/bulk");
    let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        serde_json::json!([
            { "estudiante_id": 1, "materia_id": 3, "fecha": "2024-05-02", "presente": true },
            { "estudiante_id": 2, "materia_id": 3, "fecha": "2024-05-02", "presente": false },
        ])
    );
}

#[test]
fn grade_bulk_targets_grades_resource() {
    let (client, transport) = client();
    transport.reply(201, serde_json::json!({}));
    let grades = [GradeRecord { id: None, student_id: 1, subject_id: 3, trimester: 2, grade: 87.5 }];

    block_on(client.grades().bulk_create(&grades)).unwrap();

    assert_eq!(sent(&transport).url, "http://api.test/api/calificaciones/bulk");
}

#[test]
fn login_and_me_paths() {
    let (client, transport) = client();
    transport.reply(200, serde_json::json!({ "id": 1, "nombre": "Ana", "email": "a@x.com", "rol": "admin" }));

    let me = block_on(client.me()).unwrap();

    assert_eq!(me.display_name, "Ana");
    assert_eq!(sent(&transport).url, "http://api.test/api/usuarios/me");
}

// =============================================================
// Reports
// =============================================================

#[test]
fn report_paths_per_target() {
    assert_eq!(report_path(ReportTarget::Course(4), ReportKind::Grades), "reportes/curso/4/notas");
    assert_eq!(report_path(ReportTarget::Student(8), ReportKind::Attendance), "reportes/estudiante/8/asistencias");
    assert_eq!(
        report_path(
            ReportTarget::TeacherSubjectCourse { teacher_id: 1, subject_id: 2, course_id: 3 },
            ReportKind::Grades
        ),
        "reportes/docente/1/materia/2/curso/3/notas"
    );
}

#[test]
fn report_request_carries_format_and_filters() {
    let (client, transport) = client();
    transport.reply_raw(document(Some("application/pdf"), b"%PDF"));
    let query = ReportQuery { format: ReportFormat::Pdf, trimester: Some(2), subject_id: Some(5), teacher_id: None };

    block_on(client.reports().course_grades(4, &query)).unwrap();

    assert_eq!(
        sent(&transport).url,
        "http://api.test/api/reportes/curso/4/notas?format=pdf&trimestre=2&materia_id=5"
    );
}

#[test]
fn pdf_is_always_a_document() {
    let payload = report_payload(ReportFormat::Pdf, document(Some("application/pdf"), b"%PDF-1.4")).unwrap();
    assert_eq!(
        payload,
        ReportPayload::Document { bytes: b"%PDF-1.4".to_vec(), content_type: Some("application/pdf".to_owned()) }
    );
}

#[test]
fn excel_json_is_structured_data() {
    let payload = report_payload(ReportFormat::Excel, document(Some("application/json; charset=utf-8"), br#"[{"a":1}]"#))
        .unwrap();
    assert_eq!(payload, ReportPayload::Data(serde_json::json!([{ "a": 1 }])));
}

#[test]
fn excel_binary_is_a_document() {
    let xlsx = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
    let payload = report_payload(ReportFormat::Excel, document(Some(xlsx), b"PK\x03\x04")).unwrap();
    assert!(matches!(payload, ReportPayload::Document { .. }));
}

#[test]
fn excel_with_broken_json_is_decode_error() {
    let result = report_payload(ReportFormat::Excel, document(Some("application/json"), b"{oops"));
    assert!(matches!(result, Err(ApiError::Decode(_))));
}
