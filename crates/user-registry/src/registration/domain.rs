use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw value supplied for one registration field.
///
/// Callers outside Rust (JSON bodies, scripts) can hand over numbers, nulls or
/// objects where text is expected. Those values stay representable so the
/// text checks run at their fixed position in the pipeline instead of failing
/// deserialization up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Text(String),
    Other(Value),
}

impl FieldInput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldInput::Text(value) => Some(value),
            FieldInput::Other(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, FieldInput::Text(_))
    }
}

impl Default for FieldInput {
    fn default() -> Self {
        FieldInput::Other(Value::Null)
    }
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        FieldInput::Text(value.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(value: String) -> Self {
        FieldInput::Text(value)
    }
}

impl From<Value> for FieldInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => FieldInput::Text(text),
            other => FieldInput::Other(other),
        }
    }
}

/// The four raw fields of a registration attempt, prior to validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub name: FieldInput,
    #[serde(default, alias = "dob")]
    pub date_of_birth: FieldInput,
    #[serde(default)]
    pub email: FieldInput,
    #[serde(default)]
    pub password: FieldInput,
}

impl Candidate {
    pub fn new(
        name: impl Into<FieldInput>,
        date_of_birth: impl Into<FieldInput>,
        email: impl Into<FieldInput>,
        password: impl Into<FieldInput>,
    ) -> Self {
        Self {
            name: name.into(),
            date_of_birth: date_of_birth.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Display form of the name for logs and reports; non-text names render as JSON.
    pub fn display_name(&self) -> String {
        match &self.name {
            FieldInput::Text(name) => name.clone(),
            FieldInput::Other(value) => value.to_string(),
        }
    }
}

/// A validated registration as persisted by a [`UserStore`](super::store::UserStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(alias = "user_name")]
    pub name: String,
    #[serde(alias = "dob")]
    pub date_of_birth: String,
    pub email: String,
    pub password: String,
}

impl TryFrom<&Candidate> for UserRecord {
    type Error = RegistrationRejection;

    fn try_from(candidate: &Candidate) -> Result<Self, Self::Error> {
        let name = candidate
            .name
            .as_text()
            .ok_or(RegistrationRejection::NameInvalid)?;
        let date_of_birth = candidate
            .date_of_birth
            .as_text()
            .ok_or(RegistrationRejection::DateOfBirthInvalid)?;
        let email = candidate
            .email
            .as_text()
            .ok_or(RegistrationRejection::EmailInvalid)?;
        let password = candidate
            .password
            .as_text()
            .ok_or(RegistrationRejection::PasswordInvalid)?;

        Ok(Self {
            name: name.to_string(),
            date_of_birth: date_of_birth.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

/// Reasons a candidate is turned away before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationRejection {
    #[error("name must be text between 5 and 16 characters")]
    NameInvalid,
    #[error("a user with this name or email is already registered")]
    UserAlreadyExists,
    #[error("date of birth must be a valid date more than 18 years ago")]
    DateOfBirthInvalid,
    #[error("email must be text containing '@' and '.'")]
    EmailInvalid,
    #[error(
        "password must be text between 5 and 16 characters with an uppercase letter and two digits"
    )]
    PasswordInvalid,
}

/// Discriminated result of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
    Success,
    NameInvalid,
    UserAlreadyExists,
    DateOfBirthInvalid,
    EmailInvalid,
    PasswordInvalid,
    InternalError,
}

impl RegistrationOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RegistrationOutcome::Success => "success",
            RegistrationOutcome::NameInvalid => "name_invalid",
            RegistrationOutcome::UserAlreadyExists => "user_already_exists",
            RegistrationOutcome::DateOfBirthInvalid => "date_of_birth_invalid",
            RegistrationOutcome::EmailInvalid => "email_invalid",
            RegistrationOutcome::PasswordInvalid => "password_invalid",
            RegistrationOutcome::InternalError => "internal_error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            RegistrationOutcome::Success => "user registered".to_string(),
            RegistrationOutcome::InternalError => "something went wrong".to_string(),
            RegistrationOutcome::NameInvalid => RegistrationRejection::NameInvalid.to_string(),
            RegistrationOutcome::UserAlreadyExists => {
                RegistrationRejection::UserAlreadyExists.to_string()
            }
            RegistrationOutcome::DateOfBirthInvalid => {
                RegistrationRejection::DateOfBirthInvalid.to_string()
            }
            RegistrationOutcome::EmailInvalid => RegistrationRejection::EmailInvalid.to_string(),
            RegistrationOutcome::PasswordInvalid => {
                RegistrationRejection::PasswordInvalid.to_string()
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RegistrationOutcome::Success)
    }
}

impl From<RegistrationRejection> for RegistrationOutcome {
    fn from(rejection: RegistrationRejection) -> Self {
        match rejection {
            RegistrationRejection::NameInvalid => RegistrationOutcome::NameInvalid,
            RegistrationRejection::UserAlreadyExists => RegistrationOutcome::UserAlreadyExists,
            RegistrationRejection::DateOfBirthInvalid => RegistrationOutcome::DateOfBirthInvalid,
            RegistrationRejection::EmailInvalid => RegistrationOutcome::EmailInvalid,
            RegistrationRejection::PasswordInvalid => RegistrationOutcome::PasswordInvalid,
        }
    }
}
