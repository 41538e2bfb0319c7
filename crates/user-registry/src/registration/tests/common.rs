use std::sync::Arc;

use chrono::NaiveDate;

use crate::registration::domain::{Candidate, UserRecord};
use crate::registration::store::{InMemoryUserStore, StoreError, UserStore};
use crate::registration::{FixedClock, RegistrationService};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
}

pub(super) fn candidate() -> Candidate {
    Candidate::new("asokoIdris", "1/1/2000", "asoko@kundabox.com", "12ABCabc")
}

pub(super) fn record(name: &str, email: &str) -> UserRecord {
    UserRecord {
        name: name.to_string(),
        date_of_birth: "1/1/2000".to_string(),
        email: email.to_string(),
        password: "12ABCabc".to_string(),
    }
}

pub(super) fn build_service() -> (
    RegistrationService<InMemoryUserStore, FixedClock>,
    Arc<InMemoryUserStore>,
) {
    let store = Arc::new(InMemoryUserStore::default());
    let service = RegistrationService::new(store.clone(), Arc::new(FixedClock(today())));
    (service, store)
}

pub(super) fn seeded_service(
    records: Vec<UserRecord>,
) -> (
    RegistrationService<InMemoryUserStore, FixedClock>,
    Arc<InMemoryUserStore>,
) {
    let store = Arc::new(InMemoryUserStore::with_records(records));
    let service = RegistrationService::new(store.clone(), Arc::new(FixedClock(today())));
    (service, store)
}

pub(super) fn stored(store: &InMemoryUserStore) -> Vec<UserRecord> {
    store.records().expect("in-memory store readable")
}

pub(super) struct UnavailableStore;

impl UserStore for UnavailableStore {
    fn load_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        Err(StoreError::Unavailable("disk offline".to_string()))
    }

    fn append(&self, _record: UserRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk offline".to_string()))
    }
}

pub(super) struct ReadOnlyStore;

impl UserStore for ReadOnlyStore {
    fn load_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(Vec::new())
    }

    fn append(&self, _record: UserRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read only".to_string()))
    }
}
