use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use user_registry::config::AppConfig;
use user_registry::registration::{
    Clock, FixedClock, JsonFileUserStore, RegistrationService, SystemClock,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Flat-file store at the configured path, or at `override_path` when given.
pub(crate) fn open_store(
    config: &AppConfig,
    override_path: Option<PathBuf>,
) -> Arc<JsonFileUserStore> {
    let path = override_path.unwrap_or_else(|| config.storage.user_data_path.clone());
    Arc::new(JsonFileUserStore::new(path))
}

/// Service for one-shot commands; age checks use `today` when supplied.
pub(crate) fn command_service(
    store: Arc<JsonFileUserStore>,
    today: Option<NaiveDate>,
) -> RegistrationService<JsonFileUserStore, FixedClock> {
    let today = today.unwrap_or_else(|| SystemClock.today());
    RegistrationService::new(store, Arc::new(FixedClock(today)))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
