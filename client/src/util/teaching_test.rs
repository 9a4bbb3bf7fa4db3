use super::*;

fn assignment(id: Id, teacher_id: Id, subject_id: Id, course_id: Id) -> Assignment {
    Assignment { id, teacher_id, subject_id, course_id }
}

fn rows() -> Vec<Assignment> {
    vec![assignment(1, 7, 10, 2), assignment(2, 7, 11, 2), assignment(3, 7, 10, 5)]
}

#[test]
fn course_ids_are_unique_in_order() {
    assert_eq!(course_ids(&rows()), vec![2, 5]);
}

#[test]
fn subjects_filtered_by_course() {
    assert_eq!(subject_ids_in_course(&rows(), 2), vec![10, 11]);
    assert_eq!(subject_ids_in_course(&rows(), 5), vec![10]);
    assert!(subject_ids_in_course(&rows(), 9).is_empty());
}

#[test]
fn subject_ids_across_courses() {
    assert_eq!(subject_ids(&rows()), vec![10, 11]);
}

#[test]
fn label_prefers_known_name() {
    let names = vec![(2, "1° A".to_owned())];
    assert_eq!(label_for(2, &names, "Curso"), "1° A");
    assert_eq!(label_for(5, &names, "Curso"), "Curso 5");
}
