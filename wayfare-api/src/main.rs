use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfare_api::{
    app,
    state::{AppState, AuthConfig},
};
use wayfare_core::QrSigner;
use wayfare_planner::{PlannerClient, PlannerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfare_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = wayfare_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Wayfare API on port {}", config.server.port);

    // Postgres connection + migrations
    let db = wayfare_store::DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let booking_store = Arc::new(wayfare_store::PgBookingStore::new(db.pool.clone()));
    let share_store = Arc::new(wayfare_store::PgShareStore::new(db.pool.clone()));

    let qr = Arc::new(QrSigner::new(
        config.qr.signing_secret.as_bytes(),
        config.qr.allow_legacy,
    ));

    let planner = config.planner.as_ref().map(|gw| {
        Arc::new(PlannerClient::new(PlannerConfig {
            api_url: gw.api_url.clone(),
            api_key: gw.api_key.clone(),
            model: gw.model.clone(),
        }))
    });

    let app_state = AppState {
        bookings: booking_store,
        shares: share_store,
        qr,
        planner,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
        policy: config.business_rules.booking_policy(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
