use crate::cli::ServeArgs;
use crate::infra::{open_store, AppState};
use crate::routes::with_registration_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use user_registry::config::AppConfig;
use user_registry::error::AppError;
use user_registry::registration::{JsonFileUserStore, RegistrationService, UserStore};
use user_registry::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = open_store(&config, args.store.take());
    let users = store_size(&store)?;
    let registration_service = Arc::new(RegistrationService::with_system_clock(store.clone()));

    let app = with_registration_routes(registration_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        store = %store.path().display(),
        users,
        "user registry ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Load the collection once at startup so an unreadable data file fails fast.
fn store_size(store: &JsonFileUserStore) -> Result<usize, AppError> {
    Ok(store.load_all()?.len())
}
