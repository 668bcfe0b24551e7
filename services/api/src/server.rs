use crate::cli::ServeArgs;
use crate::infra::{seed_demo, AppState};
use crate::routes::with_dorm_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use dormika::config::AppConfig;
use dormika::dorm::{
    Clock, Directory, DormPolicy, DormService, OfflineGateway, PaymentGateway, SystemClock,
};
use dormika::error::AppError;
use dormika::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(DormService::new(
        Directory::new(config.dorm.name.clone()),
        Arc::new(OfflineGateway),
        Arc::new(SystemClock),
        DormPolicy::from(&config.dorm),
    ));
    if config.dorm.seed_demo {
        let rooms = seed_demo(&service)?;
        info!(rooms = rooms.len(), "demo registry seeded");
    }

    let sweeper = spawn_hold_sweeper(
        service.clone(),
        Duration::from_secs(config.dorm.hold_sweep_secs),
    );

    let app = with_dorm_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, dorm = %config.dorm.name, "dormitory service ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    info!("dormitory service stopped");
    Ok(())
}

/// Periodically release room holds nobody confirmed in time. Lookups already expire
/// holds lazily; the sweep keeps rooms nobody asks about from staying reserved.
fn spawn_hold_sweeper<G, C>(service: Arc<DormService<G, C>>, every: Duration) -> JoinHandle<()>
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let released = service.sweep_expired_holds();
            if !released.is_empty() {
                info!(count = released.len(), rooms = ?released, "released lapsed room holds");
            }
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
