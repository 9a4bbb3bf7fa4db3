//! Derivations over a teacher's assignment rows.

#[cfg(test)]
#[path = "teaching_test.rs"]
mod teaching_test;

use crate::net::types::{Assignment, Id};

/// Distinct course ids, in first-seen order.
pub fn course_ids(assignments: &[Assignment]) -> Vec<Id> {
    distinct(assignments.iter().map(|a| a.course_id))
}

/// Distinct subject ids the teacher holds within `course_id`.
pub fn subject_ids_in_course(assignments: &[Assignment], course_id: Id) -> Vec<Id> {
    distinct(assignments.iter().filter(|a| a.course_id == course_id).map(|a| a.subject_id))
}

/// Distinct subject ids across every course.
pub fn subject_ids(assignments: &[Assignment]) -> Vec<Id> {
    distinct(assignments.iter().map(|a| a.subject_id))
}

fn distinct(ids: impl Iterator<Item = Id>) -> Vec<Id> {
    let mut out = Vec::new();
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// Display label for an id, falling back to `"{fallback} {id}"` when the
/// name is unknown.
pub fn label_for(id: Id, names: &[(Id, String)], fallback: &str) -> String {
    names
        .iter()
        .find(|(known, _)| *known == id)
        .map_or_else(|| format!("{fallback} {id}"), |(_, name)| name.clone())
}
