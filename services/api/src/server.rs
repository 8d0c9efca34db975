use crate::cli::ServeArgs;
use crate::infra::{load_directory, AppState};
use crate::routes::with_account_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use crm_accounts::config::AppConfig;
use crm_accounts::error::AppError;
use crm_accounts::telemetry;
use crm_accounts::workflows::accounts::AccountIntakeService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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

    let (directory, summary) = load_directory(args.accounts_csv.as_deref())?;
    if let Some(summary) = summary {
        info!(
            imported = summary.imported,
            skipped = summary.skipped.len(),
            "accounts preloaded"
        );
    }

    let directory = Arc::new(directory);
    let intake_service = Arc::new(AccountIntakeService::new(
        directory.clone(),
        directory.clone(),
        directory,
    ));

    let app = with_account_routes(intake_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "account intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
