// rest_api/src/handlers/auth.rs

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use models::{ClinicRegistration, Role};
use security::Identity;

use crate::errors::{ApiResult, RestApiError, LOGIN_PAGE};
use crate::session::{clear_cookie, session_cookie, Session};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ClinicLoginForm {
    pub clinic_id: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub registered: Option<String>,
}

fn dashboard_for(identity: &Identity) -> &'static str {
    match identity.role {
        Role::Admin => "/admin/dashboard",
        Role::NursingHome => "/nursing-home/dashboard",
    }
}

fn signed_in(state: &AppState, identity: &Identity) -> ApiResult<Response> {
    let token = state.keys.issue(identity).map_err(|e| RestApiError::Internal(e.to_string()))?;
    let cookie = session_cookie(state, &token)?;
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(dashboard_for(identity))).into_response())
}

pub async fn home(session: Option<Session>) -> Redirect {
    match session {
        Some(Session(identity)) => Redirect::to(dashboard_for(&identity)),
        None => Redirect::to(LOGIN_PAGE),
    }
}

pub async fn clinic_login_page(Query(query): Query<LoginPageQuery>) -> Json<Value> {
    let notice = query
        .registered
        .map(|id| format!("Registration successful! Your Clinic ID is {}", id));
    Json(json!({
        "page": "nursing_home_login",
        "fields": ["clinic_id", "password"],
        "notice": notice,
    }))
}

pub async fn clinic_login(
    State(state): State<AppState>,
    Form(form): Form<ClinicLoginForm>,
) -> ApiResult<Response> {
    let clinic_id = form.clinic_id.unwrap_or_default();
    let password = form.password.unwrap_or_default();
    let identity = state.db.login_clinic(&clinic_id, &password).await.map_err(|e| {
        warn!("Failed clinic login for '{}'", clinic_id.trim());
        RestApiError::from(e)
    })?;
    info!("Clinic {} signed in", identity.entity_id);
    signed_in(&state, &identity)
}

pub async fn admin_login_page() -> Json<Value> {
    Json(json!({
        "page": "admin_login",
        "fields": ["username", "password"],
    }))
}

pub async fn admin_login(
    State(state): State<AppState>,
    Form(form): Form<AdminLoginForm>,
) -> ApiResult<Response> {
    let username = form.username.unwrap_or_default();
    let password = form.password.unwrap_or_default();
    let identity = state.db.login_admin(&username, &password).await.map_err(|e| {
        warn!("Failed admin login for '{}'", username.trim());
        RestApiError::from(e)
    })?;
    info!("Administrator {} signed in", identity.username);
    signed_in(&state, &identity)
}

pub async fn logout(State(state): State<AppState>) -> ApiResult<Response> {
    let cookie = clear_cookie(&state)?;
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(LOGIN_PAGE)).into_response())
}

pub async fn signup_page() -> Json<Value> {
    Json(json!({
        "page": "signup",
        "fields": [
            "name", "location", "contact_person", "phone", "email",
            "password", "confirm_password"
        ],
    }))
}

pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<ClinicRegistration>,
) -> ApiResult<Redirect> {
    let clinic = state.db.register_clinic(form).await?;
    Ok(Redirect::to(&format!("{}?registered={}", LOGIN_PAGE, clinic.clinic_id)))
}
