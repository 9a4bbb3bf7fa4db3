use super::*;

#[test]
fn rows_use_names_with_fallbacks() {
    let labels = AssignmentLabels {
        teachers: vec![(7, "Carlos".to_owned())],
        subjects: vec![(10, "Matemáticas".to_owned())],
        courses: vec![],
    };
    let rows = assignment_rows(&[Assignment { id: 1, teacher_id: 7, subject_id: 10, course_id: 2 }], &labels);
    assert_eq!(rows, vec![vec!["1".to_owned(), "Carlos".to_owned(), "Matemáticas".to_owned(), "Curso 2".to_owned()]]);
}
