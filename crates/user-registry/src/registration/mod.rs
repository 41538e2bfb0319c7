//! User registration: field rules, the ordered check table, storage and the HTTP surface.

pub mod clock;
pub mod domain;
pub(crate) mod guard;
pub mod import;
pub mod router;
pub mod rules;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{Candidate, FieldInput, RegistrationOutcome, RegistrationRejection, UserRecord};
pub use guard::{CheckContext, RegistrationCheck, RegistrationGuard, REGISTRATION_CHECKS};
pub use import::{import_candidates, parse_candidates, ImportError, ImportReport, ImportRow};
pub use router::registration_router;
pub use service::RegistrationService;
pub use store::{InMemoryUserStore, JsonFileUserStore, StoreError, UserStore};
