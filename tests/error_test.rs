use std::io;

use epitaph::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::UserNotFound("igor".to_string());
    assert_eq!(err.to_string(), "User not found: 'igor'.");

    let err = Error::StoreUnavailable("data/users.json: missing".to_string());
    assert_eq!(err.to_string(), "User store unavailable: data/users.json: missing.");
}

#[test]
fn test_template_error_conversion() {
    let env = minijinja::Environment::new();
    let err: Error = env.render_str("{{ 1 +", ()).unwrap_err().into();
    assert!(matches!(err, Error::TemplateError(_)));
}
