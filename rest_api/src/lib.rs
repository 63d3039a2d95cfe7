// rest_api/src/lib.rs

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error as AnyhowError};
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use lib::{CareDatabase, CareSyncConfig};
use security::SessionKeys;

pub mod errors;
pub mod handlers;
pub mod session;

pub use errors::{ApiResult, RestApiError};
pub use session::{ApiSession, Session};

use handlers::{api, auth, dashboards, hospitals, patients};

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<CareDatabase>,
    pub keys: SessionKeys,
    pub cookie_name: Arc<str>,
}

impl AppState {
    pub fn new(db: Arc<CareDatabase>, config: &CareSyncConfig) -> Self {
        AppState {
            db,
            keys: SessionKeys::new(config.session.secret.as_bytes(), config.session.ttl_hours),
            cookie_name: Arc::from(config.session.cookie_name.as_str()),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);

    Router::new()
        .route("/", get(auth::home))
        .route("/health", get(api::health))
        .route("/nursing-home/login", get(auth::clinic_login_page).post(auth::clinic_login))
        .route("/admin/login", get(auth::admin_login_page).post(auth::admin_login))
        .route("/nursing-home/logout", get(auth::logout))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/add-patient", get(patients::add_patient_page).post(patients::add_patient))
        .route("/patient/:patient_id", get(patients::patient_details))
        .route("/patient/:patient_id/request-ambulance", post(patients::request_ambulance))
        .route("/patient/:patient_id/assign-pro", post(patients::assign_pro))
        .route("/hospital/add", get(hospitals::add_hospital_page).post(hospitals::add_hospital))
        .route("/hospitals", get(hospitals::list_hospitals))
        .route(
            "/hospital/:hospital_id/edit",
            get(hospitals::edit_hospital_page).post(hospitals::edit_hospital),
        )
        .route("/hospital/:hospital_id/delete", post(hospitals::delete_hospital))
        .route("/nursing-home/dashboard", get(dashboards::nursing_home_dashboard))
        .route("/admin/dashboard", get(dashboards::admin_dashboard))
        .route("/about", get(dashboards::about))
        .route("/contact", get(dashboards::contact).post(dashboards::contact_message))
        .route("/ambulance-requests/:request_id/resolve", post(api::resolve_ambulance_request))
        .route("/counseling/add", post(dashboards::add_counseling_resource))
        .route("/api/patients", get(api::patients))
        .route("/api/hospitals", get(api::hospitals))
        .route("/api/ambulance-requests", get(api::ambulance_requests))
        .route("/api/pros", get(api::pros))
        .route("/api/counseling-resources", get(api::counseling_resources))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Binds the configured address and serves until `shutdown` resolves.
pub async fn start_server<F>(
    config: &CareSyncConfig,
    db: Arc<CareDatabase>,
    shutdown: F,
) -> Result<(), AnyhowError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;

    let app = build_router(AppState::new(db, config));

    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to address: {}", addr))?;
    info!("CareSync listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .context("REST API server failed")?;

    info!("CareSync server stopped");
    Ok(())
}
