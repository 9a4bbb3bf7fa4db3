use super::*;

#[test]
fn groups_subjects_under_each_course() {
    let assignments = vec![
        Assignment { id: 1, teacher_id: 7, subject_id: 10, course_id: 2 },
        Assignment { id: 2, teacher_id: 7, subject_id: 11, course_id: 2 },
        Assignment { id: 3, teacher_id: 7, subject_id: 10, course_id: 5 },
    ];
    let courses = vec![(2, "2° B".to_owned())];
    let subjects = vec![(10, "Lengua".to_owned()), (11, "Ciencias".to_owned())];

    let rows = my_course_rows(&assignments, &courses, &subjects);

    assert_eq!(
        rows,
        vec![
            vec!["2° B".to_owned(), "Lengua, Ciencias".to_owned()],
            vec!["Curso 5".to_owned(), "Lengua".to_owned()],
        ]
    );
}
