use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::dto::RegisterRequest;
use crate::error::FieldViolation;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_USERNAME_LEN: usize = 3;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Checks a registration payload against the field rules, collecting every
/// violation instead of bailing at the first one.
pub fn validate_registration(payload: &RegisterRequest) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if !is_valid_email(&payload.email) {
        violations.push(FieldViolation::new("email", "Invalid email address"));
    }

    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        violations.push(FieldViolation::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }

    if let Some(username) = payload.username.as_deref() {
        if username.chars().count() < MIN_USERNAME_LEN {
            violations.push(FieldViolation::new(
                "username",
                "Username must be at least 3 characters",
            ));
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(email: &str, password: &str, username: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
            name: None,
            username: username.map(Into::into),
        }
    }

    #[test]
    fn minimal_valid_payload_passes() {
        assert!(validate_registration(&payload("a@b.com", "secret1", None)).is_empty());
    }

    #[test]
    fn six_character_password_is_enough() {
        assert!(validate_registration(&payload("a@b.com", "123456", None)).is_empty());
    }

    #[test]
    fn short_password_names_the_password_field() {
        let violations = validate_registration(&payload("a@b.com", "12345", None));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "password");
    }

    #[test]
    fn short_username_names_the_username_field() {
        let violations = validate_registration(&payload("a@b.com", "secret1", Some("ab")));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "username");
    }

    #[test]
    fn three_character_username_is_enough() {
        assert!(validate_registration(&payload("a@b.com", "secret1", Some("ada"))).is_empty());
    }

    #[test]
    fn missing_username_is_not_validated() {
        assert!(validate_registration(&payload("a@b.com", "secret1", None)).is_empty());
    }

    #[test]
    fn bad_email_names_the_email_field() {
        for email in ["", "nope", "a@b", "two words@x.io", "a@@b.com"] {
            let violations = validate_registration(&payload(email, "secret1", None));
            assert_eq!(violations.len(), 1, "email {email:?} should be rejected");
            assert_eq!(violations[0].field, "email");
        }
    }

    #[test]
    fn all_violations_are_collected_together() {
        let violations = validate_registration(&payload("nope", "123", Some("x")));
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["email", "password", "username"]);
    }
}
