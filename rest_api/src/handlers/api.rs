// rest_api/src/handlers/api.rs

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use models::{AmbulanceRequest, CounselingResource, Hospital, Patient, Pro};

use crate::errors::ApiResult;
use crate::session::ApiSession;
use crate::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Patients in the caller's scope.
pub async fn patients(
    State(state): State<AppState>,
    ApiSession(identity): ApiSession,
) -> ApiResult<Json<Vec<Patient>>> {
    Ok(Json(state.db.patients_for(&identity).await?))
}

pub async fn hospitals(State(state): State<AppState>, _session: ApiSession) -> Json<Vec<Hospital>> {
    Json(state.db.hospitals().await)
}

pub async fn ambulance_requests(
    State(state): State<AppState>,
    ApiSession(identity): ApiSession,
) -> ApiResult<Json<Vec<AmbulanceRequest>>> {
    Ok(Json(state.db.ambulance_requests_for(&identity).await?))
}

pub async fn pros(State(state): State<AppState>, _session: ApiSession) -> Json<Vec<Pro>> {
    Json(state.db.pros().await)
}

pub async fn counseling_resources(
    State(state): State<AppState>,
    _session: ApiSession,
) -> Json<Vec<CounselingResource>> {
    Json(state.db.counseling_resources().await)
}

pub async fn resolve_ambulance_request(
    State(state): State<AppState>,
    ApiSession(identity): ApiSession,
    Path(request_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let request = state.db.resolve_ambulance_request(&identity, &request_id).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Ambulance request resolved",
        "request": request,
    })))
}
