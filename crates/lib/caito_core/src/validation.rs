//! Contact-request validation.
//!
//! Field-format predicates plus the ordered rule chain that turns a raw
//! [`ContactSubmission`] into a [`ContactRequest`].

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::models::contact::{ContactRequest, ContactSubmission};
use crate::sanitize::sanitize;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("valid email regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{9,15}$").expect("valid phone regex"));

/// Validation failures, in the order the rules are checked.
///
/// The display strings are the user-facing messages returned to the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Имя и телефон обязательны")]
    MissingRequired,

    #[error("Некорректный email")]
    InvalidEmail,

    #[error("Некорректный номер телефона")]
    InvalidPhone,
}

/// `local-part@domain.tld`, where local part and domain allow word
/// characters, dots and hyphens.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Optional leading `+` followed by 9 to 15 decimal digits.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Sanitize every field of `submission`, then check presence, email format
/// (only when an email was given) and phone format. The first failing rule
/// wins.
pub fn validate_submission(
    submission: ContactSubmission,
) -> Result<ContactRequest, ValidationError> {
    let name = sanitize(submission.name.as_deref().unwrap_or_default());
    let phone = sanitize(submission.phone.as_deref().unwrap_or_default());
    let email = sanitize(submission.email.as_deref().unwrap_or_default());
    let message = sanitize(submission.message.as_deref().unwrap_or_default());

    if name.is_empty() || phone.is_empty() {
        return Err(ValidationError::MissingRequired);
    }
    if !email.is_empty() && !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_valid_phone(&phone) {
        return Err(ValidationError::InvalidPhone);
    }

    Ok(ContactRequest::new(name, phone, email, message))
}
