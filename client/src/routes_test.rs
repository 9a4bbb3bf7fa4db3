use super::*;

// =============================================================
// Table contents
// =============================================================

#[test]
fn public_routes() {
    assert_eq!(AppRoute::Login.access(), Access::Public);
    assert_eq!(AppRoute::Unauthorized.access(), Access::Public);
    assert!(!AppRoute::Login.is_protected());
}

#[test]
fn admin_only_routes_refuse_teachers() {
    for route in [AppRoute::Users, AppRoute::Courses, AppRoute::Subjects, AppRoute::Students, AppRoute::Assignments] {
        assert!(route.access().admits(Role::Admin), "{route:?}");
        assert!(!route.access().admits(Role::Teacher), "{route:?}");
    }
}

#[test]
fn teacher_only_routes_refuse_admins() {
    for route in [AppRoute::MyCourses, AppRoute::RecordAttendance, AppRoute::RecordGrades] {
        assert!(route.access().admits(Role::Teacher), "{route:?}");
        assert!(!route.access().admits(Role::Admin), "{route:?}");
    }
}

#[test]
fn shared_routes_admit_every_role() {
    for route in [AppRoute::Home, AppRoute::Dashboard, AppRoute::Reports] {
        for role in Role::ALL {
            assert!(route.access().admits(role), "{route:?} {role:?}");
        }
    }
    assert!(AppRoute::Dashboard.required_roles().is_empty());
}

#[test]
fn paths_are_unique() {
    let mut paths: Vec<_> = AppRoute::ALL.iter().map(|r| r.path()).collect();
    paths.sort_unstable();
    paths.dedup();
    assert_eq!(paths.len(), AppRoute::ALL.len());
}

#[test]
fn segment_strips_leading_slash() {
    assert_eq!(AppRoute::Users.segment(), "usuarios");
    assert_eq!(AppRoute::Home.segment(), "");
}

// =============================================================
// from_path
// =============================================================

#[test]
fn from_path_roundtrips_every_route() {
    for route in AppRoute::ALL {
        assert_eq!(AppRoute::from_path(route.path()), Some(route));
    }
}

#[test]
fn from_path_ignores_query_fragment_and_trailing_slash() {
    assert_eq!(AppRoute::from_path("/usuarios/"), Some(AppRoute::Users));
    assert_eq!(AppRoute::from_path("/reportes?format=pdf"), Some(AppRoute::Reports));
    assert_eq!(AppRoute::from_path("/cursos#top"), Some(AppRoute::Courses));
    assert_eq!(AppRoute::from_path(""), Some(AppRoute::Home));
}

#[test]
fn from_path_unknown_is_none() {
    assert_eq!(AppRoute::from_path("/nope"), None);
    assert_eq!(AppRoute::from_path("/usuarios/nuevo"), None);
}

// =============================================================
// Menu
// =============================================================

#[test]
fn admin_menu_matches_table() {
    assert_eq!(
        menu_for(Role::Admin),
        vec![
            AppRoute::Users,
            AppRoute::Courses,
            AppRoute::Subjects,
            AppRoute::Students,
            AppRoute::Assignments,
            AppRoute::Reports,
        ]
    );
}

#[test]
fn teacher_menu_matches_table() {
    assert_eq!(
        menu_for(Role::Teacher),
        vec![AppRoute::MyCourses, AppRoute::RecordAttendance, AppRoute::RecordGrades, AppRoute::Reports]
    );
}

#[test]
fn menu_never_lists_a_refused_route() {
    for role in Role::ALL {
        for route in menu_for(role) {
            assert!(route.access().admits(role));
        }
    }
}
