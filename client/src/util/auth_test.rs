use super::*;
use crate::net::types::Identity;

fn state(ready: bool, role: Option<Role>) -> SessionState {
    SessionState {
        identity: role.map(|role| Identity {
            id: 1,
            display_name: "Ana".to_owned(),
            email: "a@x.com".to_owned(),
            role,
        }),
        ready,
        busy: false,
    }
}

// =============================================================
// evaluate_access
// =============================================================

#[test]
fn loading_never_redirects() {
    for role in [None, Some(Role::Admin), Some(Role::Teacher)] {
        assert_eq!(evaluate_access(&state(false, role), &[Role::Admin], "/usuarios"), GuardDecision::Loading);
    }
}

#[test]
fn anonymous_goes_to_login_with_origin() {
    assert_eq!(
        evaluate_access(&state(true, None), &[], "/reportes"),
        GuardDecision::RedirectToLogin { from: "/reportes".to_owned() }
    );
}

#[test]
fn empty_role_set_admits_any_session() {
    for role in Role::ALL {
        assert_eq!(evaluate_access(&state(true, Some(role)), &[], "/dashboard"), GuardDecision::Render);
    }
}

#[test]
fn role_outside_set_is_unauthorized() {
    for role in Role::ALL {
        let others: Vec<Role> = Role::ALL.into_iter().filter(|r| *r != role).collect();
        assert_eq!(
            evaluate_access(&state(true, Some(role)), &others, "/x"),
            GuardDecision::RedirectToUnauthorized,
            "{role:?}"
        );
        assert_eq!(evaluate_access(&state(true, Some(role)), &[role], "/x"), GuardDecision::Render);
    }
}

#[test]
fn teacher_on_admin_route_is_unauthorized() {
    let decision = evaluate_access(&state(true, Some(Role::Teacher)), AppRoute::Users.required_roles(), "/usuarios");
    assert_eq!(decision, GuardDecision::RedirectToUnauthorized);
}

#[test]
fn guard_agrees_with_route_table() {
    for route in AppRoute::ALL.into_iter().filter(|route| route.is_protected()) {
        for role in Role::ALL {
            let decision = evaluate_access(&state(true, Some(role)), route.required_roles(), route.path());
            let expected = if route.access().admits(role) {
                GuardDecision::Render
            } else {
                GuardDecision::RedirectToUnauthorized
            };
            assert_eq!(decision, expected, "{route:?} {role:?}");
        }
    }
}

// =============================================================
// Return path
// =============================================================

#[test]
fn login_redirect_keeps_protected_origin() {
    assert_eq!(login_redirect_path("/registrar-notas"), "/login?from=%2Fregistrar-notas");
}

#[test]
fn login_redirect_drops_default_and_unknown_origins() {
    assert_eq!(login_redirect_path("/dashboard"), "/login");
    assert_eq!(login_redirect_path("/nowhere"), "/login");
    assert_eq!(login_redirect_path("https://evil.example/usuarios"), "/login");
}

#[test]
fn sanitize_rejects_public_and_foreign_targets() {
    assert_eq!(sanitize_return_to(None), None);
    assert_eq!(sanitize_return_to(Some("/login")), None);
    assert_eq!(sanitize_return_to(Some("//evil.example/usuarios")), None);
    assert_eq!(sanitize_return_to(Some("usuarios")), None);
    assert_eq!(sanitize_return_to(Some("/usuarios")), Some("/usuarios"));
    assert_eq!(sanitize_return_to(Some("/reportes?format=excel")), Some("/reportes?format=excel"));
}

#[test]
fn post_login_defaults_to_dashboard() {
    assert_eq!(post_login_destination(None), "/dashboard");
    assert_eq!(post_login_destination(Some("/unauthorized")), "/dashboard");
    assert_eq!(post_login_destination(Some("/mis-cursos")), "/mis-cursos");
}

#[test]
fn requested_location_keeps_query_string() {
    assert_eq!(requested_location("/reportes", ""), "/reportes");
    assert_eq!(requested_location("/reportes", "?"), "/reportes");
    assert_eq!(requested_location("/reportes", "?format=excel"), "/reportes?format=excel");
    assert_eq!(requested_location("/reportes", "format=excel"), "/reportes?format=excel");
}

#[test]
fn query_string_survives_login_round_trip() {
    let from = requested_location("/reportes", "?format=excel&trimestre=2");
    let login = login_redirect_path(&from);
    assert_eq!(login, "/login?from=%2Freportes%3Fformat%3Dexcel%26trimestre%3D2");
    assert_eq!(post_login_destination(Some(&from)), "/reportes?format=excel&trimestre=2");
}
