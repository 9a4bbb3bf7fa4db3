use futures::executor::block_on;

use super::*;
use crate::test_support::{MemoryStorage, identity, stored_identity, test_client, test_session};

fn credentials(password: &str) -> Credentials {
    Credentials { email: "a@x.com".to_owned(), password: password.to_owned() }
}

fn ana_grant() -> serde_json::Value {
    serde_json::json!({
        "token": "t1",
        "user": { "id": 1, "nombre": "Ana", "email": "a@x.com", "rol": "admin" }
    })
}

// =============================================================
// SessionState predicates
// =============================================================

#[test]
fn default_state_is_loading_and_anonymous() {
    let state = SessionState::default();
    assert_eq!(state.readiness(), SessionReadiness::Loading);
    assert!(state.identity.is_none());
    assert!(!state.busy);
}

#[test]
fn predicates_false_without_identity() {
    let state = SessionState { identity: None, ready: true, busy: false };
    assert!(!state.has_role(&Role::ALL));
    assert!(!state.is_admin());
    assert!(!state.is_teacher());
}

#[test]
fn predicates_agree_with_role_for_every_role() {
    for role in Role::ALL {
        let state = SessionState { identity: Some(identity(role)), ready: true, busy: false };
        assert_eq!(state.is_admin(), role == Role::Admin);
        assert_eq!(state.is_teacher(), role == Role::Teacher);
        assert!(state.has_role(&[role]));
        assert!(state.has_role(&Role::ALL));
        assert!(!state.has_role(&[]));
    }
}

// =============================================================
// bootstrap
// =============================================================

#[test]
fn bootstrap_without_mirror_is_ready_anonymous() {
    let (session, effects) = test_session(MemoryStorage::default());
    session.bootstrap();
    assert_eq!(session.readiness(), SessionReadiness::Anonymous);
    assert!(effects.navigations.borrow().is_empty());
}

#[test]
fn bootstrap_restores_identity_from_mirror() {
    let storage = MemoryStorage::with(&[(TOKEN_KEY, "t1"), (USER_KEY, &stored_identity(Role::Teacher))]);
    let (session, _) = test_session(storage);
    session.bootstrap();
    assert_eq!(session.readiness(), SessionReadiness::Authenticated);
    assert_eq!(session.identity(), Some(identity(Role::Teacher)));
    assert!(session.is_teacher());
}

#[test]
fn bootstrap_drops_partial_mirror() {
    let storage = MemoryStorage::with(&[(TOKEN_KEY, "t1")]);
    let (session, _) = test_session(storage.clone());
    session.bootstrap();
    assert_eq!(session.readiness(), SessionReadiness::Anonymous);
    assert!(storage.is_empty());
}

#[test]
fn bootstrap_drops_unreadable_user() {
    let storage = MemoryStorage::with(&[(TOKEN_KEY, "t1"), (USER_KEY, "{not json")]);
    let (session, _) = test_session(storage.clone());
    session.bootstrap();
    assert_eq!(session.readiness(), SessionReadiness::Anonymous);
    assert!(storage.is_empty());
}

// =============================================================
// login
// =============================================================

#[test]
fn login_success_persists_and_navigates_to_dashboard() {
    let storage = MemoryStorage::default();
    let (session, effects) = test_session(storage.clone());
    session.bootstrap();
    let (client, transport) = test_client(&session);
    transport.reply(200, ana_grant());

    let identity = block_on(session.login(&client, &credentials("good"), None)).unwrap();

    assert_eq!(identity.role, Role::Admin);
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("t1"));
    let stored: Identity = serde_json::from_str(&storage.get(USER_KEY).unwrap()).unwrap();
    assert_eq!(stored, identity);
    assert!(session.is_admin());
    assert!(!session.is_teacher());
    assert_eq!(effects.last_navigation().as_deref(), Some("/dashboard"));
    assert_eq!(effects.notice_kinds(), vec![NoticeKind::Success]);
    assert!(!session.snapshot().busy);
}

#[test]
fn login_posts_credentials_to_login_endpoint() {
    let (session, _) = test_session(MemoryStorage::default());
    let (client, transport) = test_client(&session);
    transport.reply(200, ana_grant());

    block_on(session.login(&client, &credentials("good"), None)).unwrap();

    let request = transport.last_request();
    assert_eq!(request.url, "http://api.test/api/usuarios/login");
    let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, serde_json::json!({ "email": "a@x.com", "password": "good" }));
}

#[test]
fn login_returns_to_requested_protected_route() {
    let (session, effects) = test_session(MemoryStorage::default());
    let (client, transport) = test_client(&session);
    transport.reply(200, ana_grant());

    block_on(session.login(&client, &credentials("good"), Some("/usuarios"))).unwrap();

    assert_eq!(effects.last_navigation().as_deref(), Some("/usuarios"));
}

#[test]
fn login_ignores_foreign_return_target() {
    let (session, effects) = test_session(MemoryStorage::default());
    let (client, transport) = test_client(&session);
    transport.reply(200, ana_grant());

    block_on(session.login(&client, &credentials("good"), Some("//evil.example/usuarios"))).unwrap();

    assert_eq!(effects.last_navigation().as_deref(), Some("/dashboard"));
}

#[test]
fn login_role_matches_backend_rol_for_every_role() {
    for role in Role::ALL {
        let (session, _) = test_session(MemoryStorage::default());
        let (client, transport) = test_client(&session);
        transport.reply(
            200,
            serde_json::json!({
                "token": "t",
                "user": { "id": 2, "nombre": "X", "email": "x@x.com", "rol": role.as_str() }
            }),
        );
        let identity = block_on(session.login(&client, &credentials("good"), None)).unwrap();
        assert_eq!(identity.role, role);
        assert_eq!(session.is_admin(), role == Role::Admin);
        assert_eq!(session.is_teacher(), role == Role::Teacher);
    }
}

#[test]
fn login_rejected_keeps_anonymous_and_notifies() {
    let storage = MemoryStorage::default();
    let (session, effects) = test_session(storage.clone());
    session.bootstrap();
    let (client, transport) = test_client(&session);
    transport.reply(401, serde_json::json!({ "message": "Credenciales inválidas" }));

    let result = block_on(session.login(&client, &credentials("bad"), None));

    assert_eq!(
        result,
        Err(SessionError::Authentication { message: "Credenciales inválidas".to_owned() })
    );
    assert!(session.identity().is_none());
    assert!(!session.snapshot().busy);
    assert!(storage.is_empty());
    assert_eq!(effects.notice_kinds(), vec![NoticeKind::Error]);
    let (_, title, description) = effects.notices.borrow()[0].clone();
    assert_eq!(title, "Error de autenticación");
    assert_eq!(description, "Credenciales inválidas");
}

#[test]
fn login_failure_without_message_uses_fallback() {
    let (session, effects) = test_session(MemoryStorage::default());
    let (client, transport) = test_client(&session);
    transport.fail("connection refused");

    let result = block_on(session.login(&client, &credentials("x"), None));

    assert_eq!(result, Err(SessionError::Authentication { message: "Error al iniciar sesión".to_owned() }));
    assert_eq!(effects.notices.borrow()[0].2, "Error al iniciar sesión");
    assert!(!session.snapshot().busy);
}

#[test]
fn login_with_unknown_role_fails() {
    let (session, _) = test_session(MemoryStorage::default());
    let (client, transport) = test_client(&session);
    transport.reply(
        200,
        serde_json::json!({ "token": "t", "user": { "id": 2, "nombre": "X", "email": "x", "rol": "estudiante" } }),
    );

    let result = block_on(session.login(&client, &credentials("good"), None));

    assert!(matches!(result, Err(SessionError::Authentication { .. })));
    assert!(session.identity().is_none());
}

#[test]
fn login_storage_failure_leaves_no_partial_mirror() {
    let storage = MemoryStorage::default();
    storage.fail_writes();
    let (session, _) = test_session(storage.clone());
    let (client, transport) = test_client(&session);
    transport.reply(200, ana_grant());

    let result = block_on(session.login(&client, &credentials("good"), None));

    assert!(matches!(result, Err(SessionError::Storage(_))));
    assert!(session.identity().is_none());
    assert!(storage.is_empty());
    assert!(!session.snapshot().busy);
}

#[test]
fn busy_is_raised_while_exchange_is_in_flight() {
    struct Probe<'a> {
        session: &'a crate::test_support::TestSession,
        saw_busy: std::cell::Cell<bool>,
    }
    impl Authenticator for Probe<'_> {
        async fn authenticate(&self, _: &Credentials) -> Result<crate::net::types::AuthGrant, ApiError> {
            self.saw_busy.set(self.session.snapshot().busy);
            Err(ApiError::Status { status: 500, message: None })
        }
    }

    let (session, _) = test_session(MemoryStorage::default());
    let probe = Probe { session: &session, saw_busy: std::cell::Cell::new(false) };
    let _ = block_on(session.login(&probe, &credentials("x"), None));
    assert!(probe.saw_busy.get());
    assert!(!session.snapshot().busy);
}

// =============================================================
// logout / invalidate
// =============================================================

#[test]
fn login_then_logout_clears_storage_fully() {
    let storage = MemoryStorage::default();
    let (session, effects) = test_session(storage.clone());
    let (client, transport) = test_client(&session);
    transport.reply(200, ana_grant());
    block_on(session.login(&client, &credentials("good"), None)).unwrap();

    session.logout();

    assert!(storage.get(TOKEN_KEY).is_none());
    assert!(storage.get(USER_KEY).is_none());
    assert!(session.identity().is_none());
    assert_eq!(effects.last_navigation().as_deref(), Some("/login"));
}

#[test]
fn logout_without_session_only_navigates_and_notifies() {
    let storage = MemoryStorage::default();
    let (session, effects) = test_session(storage.clone());
    session.bootstrap();

    session.logout();
    session.logout();

    assert!(storage.is_empty());
    assert_eq!(effects.navigations.borrow().len(), 2);
    assert_eq!(effects.notice_kinds(), vec![NoticeKind::Info, NoticeKind::Info]);
}

#[test]
fn invalidate_clears_memory_and_storage_together() {
    let storage = MemoryStorage::with(&[(TOKEN_KEY, "t1"), (USER_KEY, &stored_identity(Role::Admin))]);
    let (session, effects) = test_session(storage.clone());
    session.bootstrap();

    session.invalidate();

    assert!(storage.is_empty());
    assert!(session.identity().is_none());
    assert_eq!(session.readiness(), SessionReadiness::Anonymous);
    assert_eq!(effects.last_navigation().as_deref(), Some("/login"));
    assert_eq!(effects.notice_kinds(), vec![NoticeKind::Error]);
}

#[test]
fn invalidate_without_session_navigates_silently() {
    let (session, effects) = test_session(MemoryStorage::default());
    session.bootstrap();

    session.invalidate();

    assert_eq!(effects.last_navigation().as_deref(), Some("/login"));
    assert!(effects.notices.borrow().is_empty());
}

// =============================================================
// SessionAuthority
// =============================================================

#[test]
fn bearer_token_reads_durable_mirror() {
    let storage = MemoryStorage::with(&[(TOKEN_KEY, "t9"), (USER_KEY, &stored_identity(Role::Admin))]);
    let (session, _) = test_session(storage);
    assert_eq!(session.bearer_token().as_deref(), Some("t9"));
}

#[test]
fn bearer_token_absent_when_signed_out() {
    let (session, _) = test_session(MemoryStorage::default());
    assert_eq!(session.bearer_token(), None);
}
