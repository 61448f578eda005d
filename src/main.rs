use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use bookline::config::{AppConfig, TableBackend};
use bookline::db;
use bookline::handlers;
use bookline::services::appointments::AppointmentStore;
use bookline::services::booking::BookingService;
use bookline::services::mail::smtp::SmtpMailer;
use bookline::services::notification::{ConfirmationTemplate, NotificationSender};
use bookline::services::request_log::RequestLogger;
use bookline::services::tables::google::{ServiceAccountTokens, SheetsTable};
use bookline::services::tables::sqlite::SqliteTable;
use bookline::services::tables::Table;
use bookline::state::AppState;

fn build_tables(config: &AppConfig) -> anyhow::Result<(Box<dyn Table>, Box<dyn Table>)> {
    match config.table_backend {
        TableBackend::Sheets => {
            anyhow::ensure!(
                !config.google_sheet_id.is_empty(),
                "GOOGLE_SHEET_ID must be set when TABLE_BACKEND=sheets"
            );
            let client = reqwest::Client::builder()
                .timeout(config.outbound_timeout())
                .build()
                .context("failed to build HTTP client")?;
            let tokens = Arc::new(
                ServiceAccountTokens::from_file(&config.google_credentials_path, client.clone())
                    .context("failed to load Google service account")?,
            );
            tracing::info!(sheet_id = %config.google_sheet_id, "using Google Sheets tables");

            let table = |sheet: &str| -> Box<dyn Table> {
                Box::new(SheetsTable::new(
                    client.clone(),
                    config.google_sheets_api.clone(),
                    config.google_sheet_id.clone(),
                    sheet,
                    tokens.clone(),
                ))
            };
            Ok((table(&config.appointment_sheet), table(&config.log_sheet)))
        }
        TableBackend::Sqlite => {
            tracing::info!(path = %config.database_url, "using SQLite tables");
            let conn = Arc::new(Mutex::new(db::init_db(&config.database_url)?));
            Ok((
                Box::new(SqliteTable::new(conn.clone(), config.appointment_sheet.clone())),
                Box::new(SqliteTable::new(conn, config.log_sheet.clone())),
            ))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    let timeout = config.outbound_timeout();

    let (appointment_table, log_table) = build_tables(&config)?;

    if config.smtp_username.is_empty() {
        tracing::warn!("SMTP_USERNAME not set, confirmation emails will fail to authenticate");
    }
    let mailer = SmtpMailer::new(
        &config.smtp_host,
        config.smtp_port,
        config.smtp_username.clone(),
        config.smtp_password.clone(),
        config.mail_from.clone(),
        timeout,
    )
    .context("failed to configure SMTP relay")?;

    let notifier = NotificationSender::new(
        Box::new(mailer),
        ConfirmationTemplate {
            coordinator_name: config.coordinator_name.clone(),
            office_location: config.office_location.clone(),
            contact_number: config.contact_number.clone(),
        },
        timeout,
    );

    let state = Arc::new(AppState {
        bookings: BookingService::new(AppointmentStore::new(appointment_table, timeout), notifier),
        request_log: RequestLogger::new(log_table, timeout),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/checkappointmenttime",
            post(handlers::appointments::check_appointment_time),
        )
        .route("/makeappoint", post(handlers::appointments::make_appointment))
        .route("/logs", post(handlers::logs::log_event))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
