use super::*;

#[test]
fn valid_form_trims_email() {
    let credentials = validate_login("  ana@escuela.edu ", "secret").unwrap();
    assert_eq!(credentials.email, "ana@escuela.edu");
    assert_eq!(credentials.password, "secret");
}

#[test]
fn missing_fields_are_rejected() {
    assert!(validate_login("", "x").is_err());
    assert!(validate_login("a@x.com", "").is_err());
    assert!(validate_login("   ", "x").is_err());
}

#[test]
fn email_without_at_is_rejected() {
    assert_eq!(validate_login("ana", "x"), Err("Ingresa un email válido."));
}

#[test]
fn password_is_not_trimmed() {
    assert_eq!(validate_login("a@x.com", " pw ").unwrap().password, " pw ");
}
