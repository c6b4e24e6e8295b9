use sea_orm::Database;
use tracing::info;

use admissions_core::config::Config;
use admissions_core::tracing::init_tracing;
use admissions_portal::config::PortalConfig;
use admissions_portal::infra::sms::ArkeselOtpProvider;
use admissions_portal::infra::storage::LocalDocumentStorage;
use admissions_portal::router::build_router;
use admissions_portal::state::AppState;
use arkesel::ArkeselClient;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = PortalConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let arkesel =
        ArkeselClient::new(config.arkesel_options()).expect("failed to build Arkesel client");

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("failed to create upload directory");

    let state = AppState {
        db,
        sms: ArkeselOtpProvider { client: arkesel },
        storage: LocalDocumentStorage::new(config.upload_dir.clone()),
        phone_plan: config.phone_plan(),
        otp_authority: config.otp_authority,
        max_upload_bytes: config.max_upload_bytes,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.portal_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(
        otp_authority = ?config.otp_authority,
        upload_dir = %config.upload_dir.display(),
        "portal service listening on {addr}"
    );
    axum::serve(listener, router).await.expect("server error");
}
