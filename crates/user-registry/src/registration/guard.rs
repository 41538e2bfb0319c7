use chrono::NaiveDate;

use super::domain::{Candidate, RegistrationRejection, UserRecord};
use super::rules;

/// Everything a check may look at: the candidate, the current collection and the evaluation date.
pub struct CheckContext<'a> {
    pub candidate: &'a Candidate,
    pub existing: &'a [UserRecord],
    pub today: NaiveDate,
}

/// One entry of the ordered check table.
#[derive(Clone, Copy)]
pub struct RegistrationCheck {
    pub name: &'static str,
    pub rejection: RegistrationRejection,
    passes: fn(&CheckContext<'_>) -> bool,
}

impl RegistrationCheck {
    pub fn passes(&self, context: &CheckContext<'_>) -> bool {
        (self.passes)(context)
    }
}

impl std::fmt::Debug for RegistrationCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationCheck")
            .field("name", &self.name)
            .field("rejection", &self.rejection)
            .finish()
    }
}

fn name_shape(context: &CheckContext<'_>) -> bool {
    rules::name_valid(&context.candidate.name)
}

// A non-text name never reaches this check.
fn name_available(context: &CheckContext<'_>) -> bool {
    context
        .candidate
        .name
        .as_text()
        .map_or(true, |name| rules::name_unique(context.existing, name))
}

fn date_of_birth(context: &CheckContext<'_>) -> bool {
    context
        .candidate
        .date_of_birth
        .as_text()
        .is_some_and(|dob| rules::date_valid(dob) && rules::age_sufficient(dob, context.today))
}

fn email_shape(context: &CheckContext<'_>) -> bool {
    rules::email_is_text(&context.candidate.email)
        && context
            .candidate
            .email
            .as_text()
            .is_some_and(rules::email_format_valid)
}

fn email_available(context: &CheckContext<'_>) -> bool {
    context
        .candidate
        .email
        .as_text()
        .map_or(true, |email| rules::email_unique(context.existing, email))
}

fn password_shape(context: &CheckContext<'_>) -> bool {
    rules::password_is_text(&context.candidate.password)
        && context.candidate.password.as_text().is_some_and(|password| {
            rules::password_length_valid(password)
                && rules::password_has_uppercase(password)
                && rules::password_has_two_digits(password)
        })
}

/// Checks in the order callers observe them; the first failure wins.
pub const REGISTRATION_CHECKS: [RegistrationCheck; 6] = [
    RegistrationCheck {
        name: "name_valid",
        rejection: RegistrationRejection::NameInvalid,
        passes: name_shape,
    },
    RegistrationCheck {
        name: "name_unique",
        rejection: RegistrationRejection::UserAlreadyExists,
        passes: name_available,
    },
    RegistrationCheck {
        name: "date_of_birth_valid",
        rejection: RegistrationRejection::DateOfBirthInvalid,
        passes: date_of_birth,
    },
    RegistrationCheck {
        name: "email_valid",
        rejection: RegistrationRejection::EmailInvalid,
        passes: email_shape,
    },
    RegistrationCheck {
        name: "email_unique",
        rejection: RegistrationRejection::UserAlreadyExists,
        passes: email_available,
    },
    RegistrationCheck {
        name: "password_valid",
        rejection: RegistrationRejection::PasswordInvalid,
        passes: password_shape,
    },
];

/// Guard turning a raw candidate into a record fit for persistence.
#[derive(Debug, Clone)]
pub struct RegistrationGuard {
    checks: Vec<RegistrationCheck>,
}

impl Default for RegistrationGuard {
    fn default() -> Self {
        Self::with_checks(REGISTRATION_CHECKS.to_vec())
    }
}

impl RegistrationGuard {
    pub fn with_checks(checks: Vec<RegistrationCheck>) -> Self {
        Self { checks }
    }

    pub fn checks(&self) -> &[RegistrationCheck] {
        &self.checks
    }

    /// First check the candidate fails, if any.
    pub fn first_failure(&self, context: &CheckContext<'_>) -> Option<&RegistrationCheck> {
        self.checks.iter().find(|check| !check.passes(context))
    }

    /// Run every check in order and build the record to append.
    pub fn record_from_candidate(
        &self,
        candidate: &Candidate,
        existing: &[UserRecord],
        today: NaiveDate,
    ) -> Result<UserRecord, RegistrationRejection> {
        let context = CheckContext {
            candidate,
            existing,
            today,
        };

        if let Some(check) = self.first_failure(&context) {
            tracing::debug!(
                check = check.name,
                candidate = %candidate.display_name(),
                "registration check failed"
            );
            return Err(check.rejection);
        }

        UserRecord::try_from(candidate)
    }
}
