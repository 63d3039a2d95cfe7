// rest_api/src/handlers/patients.rs

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use lib::PatientDetails;
use models::{AmbulanceRequestDraft, PatientDraft, Role};
use security::require_role;

use crate::errors::{ApiResult, RestApiError};
use crate::session::{ApiSession, Session};
use crate::AppState;

const CARE_ROLES: &[Role] = &[Role::NursingHome, Role::Admin];

#[derive(Debug, Default, Deserialize)]
pub struct AssignProBody {
    pub pro_id: Option<String>,
}

pub async fn add_patient_page(
    State(state): State<AppState>,
    Session(identity): Session,
) -> ApiResult<Json<Value>> {
    require_role(&identity, CARE_ROLES)?;
    let hospitals: Vec<Value> = state
        .db
        .hospitals()
        .await
        .into_iter()
        .map(|h| json!({"hospital_id": h.hospital_id, "name": h.name}))
        .collect();
    let clinics = if identity.is_admin() {
        state.db.clinics(&identity).await?
    } else {
        Vec::new()
    };
    Ok(Json(json!({
        "page": "add_patient",
        "hospitals": hospitals,
        "clinics": clinics,
    })))
}

pub async fn add_patient(
    State(state): State<AppState>,
    Session(identity): Session,
    Form(draft): Form<PatientDraft>,
) -> ApiResult<Redirect> {
    let patient = state.db.add_patient(&identity, draft).await?;
    Ok(Redirect::to(&format!("/patient/{}", patient.patient_id)))
}

pub async fn patient_details(
    State(state): State<AppState>,
    Session(identity): Session,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<PatientDetails>> {
    Ok(Json(state.db.patient_details(&identity, &patient_id).await?))
}

pub async fn request_ambulance(
    State(state): State<AppState>,
    ApiSession(identity): ApiSession,
    Path(patient_id): Path<String>,
    body: Option<Json<AmbulanceRequestDraft>>,
) -> ApiResult<Json<Value>> {
    let Json(draft) = body.ok_or_else(|| RestApiError::BadRequest("Request body must be JSON".into()))?;
    let request = state
        .db
        .request_ambulance(&identity, &patient_id, draft)
        .await
        .map_err(|e| RestApiError::from(e).into_bad_request())?;
    Ok(Json(json!({
        "status": "success",
        "message": "Ambulance requested successfully",
        "request": request,
    })))
}

pub async fn assign_pro(
    State(state): State<AppState>,
    ApiSession(identity): ApiSession,
    Path(patient_id): Path<String>,
    body: Option<Json<AssignProBody>>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body.ok_or_else(|| RestApiError::BadRequest("Request body must be JSON".into()))?;
    let patient = state
        .db
        .assign_pro(&identity, &patient_id, body.pro_id)
        .await
        .map_err(|e| RestApiError::from(e).into_bad_request())?;
    Ok(Json(json!({
        "status": "success",
        "message": "PRO assigned successfully",
        "patient": patient,
    })))
}
