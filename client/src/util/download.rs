//! Save report documents to the user's machine.
//!
//! The browser path wraps the bytes in a `Blob`, points a temporary anchor
//! at an object URL, and clicks it. Native builds report the download as
//! unavailable.

#[cfg(test)]
#[path = "download_test.rs"]
mod download_test;

use crate::net::api_resources::{ReportKind, ReportTarget};
use crate::net::types::ReportFormat;

/// Suggested file name, e.g. `notas_curso_3.pdf`.
pub fn report_file_name(kind: ReportKind, target: ReportTarget, format: ReportFormat) -> String {
    let prefix = match kind {
        ReportKind::Grades => "notas",
        ReportKind::Attendance => "asistencias",
    };
    let scope = match target {
        ReportTarget::Course(id) => format!("curso_{id}"),
        ReportTarget::Student(id) => format!("estudiante_{id}"),
        ReportTarget::TeacherSubjectCourse { teacher_id, subject_id, course_id } => {
            format!("docente_{teacher_id}_materia_{subject_id}_curso_{course_id}")
        }
    };
    format!("{prefix}_{scope}.{}", format.extension())
}

/// A browser handle that must exist for the download to happen.
#[cfg_attr(not(feature = "csr"), allow(dead_code))]
fn present<T>(handle: Option<T>, what: &str) -> Result<T, String> {
    handle.ok_or_else(|| format!("no {what}"))
}

/// Trigger a browser download of `bytes` under `file_name`.
///
/// # Errors
///
/// Returns a description of the failing browser call.
pub fn save_bytes(bytes: &[u8], content_type: Option<&str>, file_name: &str) -> Result<(), String> {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;

        let window = present(web_sys::window(), "window")?;
        let document = present(window.document(), "document")?;
        let body = present(document.body(), "body")?;

        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(bytes));
        let options = web_sys::BlobPropertyBag::new();
        if let Some(content_type) = content_type {
            options.set_type(content_type);
        }
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| format!("blob: {e:?}"))?;
        let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(|e| format!("object url: {e:?}"))?;

        let anchor = document
            .create_element("a")
            .map_err(|e| format!("anchor: {e:?}"))?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| "anchor cast".to_owned())?;
        anchor.set_href(&url);
        anchor.set_download(file_name);
        body.append_child(&anchor).map_err(|e| format!("append anchor: {e:?}"))?;
        anchor.click();
        anchor.remove();
        let _ = web_sys::Url::revoke_object_url(&url);
        leptos::logging::log!("downloaded {file_name} ({} bytes)", bytes.len());
        Ok(())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (bytes, content_type, file_name);
        Err("downloads are only available in the browser".to_owned())
    }
}
