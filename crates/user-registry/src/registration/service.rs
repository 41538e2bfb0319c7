use std::sync::Arc;

use tracing::{error, info};

use super::clock::{Clock, SystemClock};
use super::domain::{Candidate, RegistrationOutcome, UserRecord};
use super::guard::RegistrationGuard;
use super::store::{StoreError, UserStore};

/// Service composing the registration guard, the user store and a clock.
pub struct RegistrationService<S, C = SystemClock> {
    guard: RegistrationGuard,
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S> RegistrationService<S, SystemClock>
where
    S: UserStore + 'static,
{
    pub fn with_system_clock(store: Arc<S>) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }
}

impl<S, C> RegistrationService<S, C>
where
    S: UserStore + 'static,
    C: Clock + 'static,
{
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self::with_guard(RegistrationGuard::default(), store, clock)
    }

    pub fn with_guard(guard: RegistrationGuard, store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            guard,
            store,
            clock,
        }
    }

    /// Validate a candidate and append it to the store when every check passes.
    ///
    /// At most one load and one append happen per call, in that order. Any
    /// store failure is reported as [`RegistrationOutcome::InternalError`].
    pub fn register(&self, candidate: Candidate) -> RegistrationOutcome {
        let existing = match self.store.load_all() {
            Ok(records) => records,
            Err(err) => {
                error!(error = %err, "failed to load existing users");
                return RegistrationOutcome::InternalError;
            }
        };

        let record = match self.guard.record_from_candidate(
            &candidate,
            &existing,
            self.clock.today(),
        ) {
            Ok(record) => record,
            Err(rejection) => return rejection.into(),
        };

        let name = record.name.clone();
        match self.store.append(record) {
            Ok(()) => {
                info!(user = %name, "user registered");
                RegistrationOutcome::Success
            }
            Err(err) => {
                error!(user = %name, error = %err, "failed to persist user");
                RegistrationOutcome::InternalError
            }
        }
    }

    /// Register candidates one after another; later entries see earlier successes.
    pub fn register_all<I>(&self, candidates: I) -> Vec<RegistrationOutcome>
    where
        I: IntoIterator<Item = Candidate>,
    {
        candidates
            .into_iter()
            .map(|candidate| self.register(candidate))
            .collect()
    }

    /// Current user collection.
    pub fn users(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.store.load_all()
    }
}
