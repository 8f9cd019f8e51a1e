//! Contact-request models.

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, validate_submission};

/// Raw contact form as received from a client. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactSubmission {
    /// Sanitize and validate into a [`ContactRequest`].
    pub fn validate(self) -> Result<ContactRequest, ValidationError> {
        validate_submission(self)
    }
}

/// A sanitized, validated contact request.
///
/// Only obtainable through [`ContactSubmission::validate`], so a value of
/// this type always has a non-empty name, a well-formed phone and either an
/// empty or well-formed email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRequest {
    name: String,
    phone: String,
    email: String,
    message: String,
}

impl ContactRequest {
    pub(crate) fn new(name: String, phone: String, email: String, message: String) -> Self {
        Self {
            name,
            phone,
            email,
            message,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Empty when the client gave no email.
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Row of the local `requests` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StoredRequest {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub message: Option<String>,
}
