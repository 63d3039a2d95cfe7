// rest_api/src/handlers/hospitals.rs

use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};
use serde_json::{json, Value};

use models::{HospitalDraft, Role};
use security::require_role;

use crate::errors::ApiResult;
use crate::session::Session;
use crate::AppState;

const HOSPITALS_PAGE: &str = "/hospitals";

pub async fn add_hospital_page(Session(identity): Session) -> ApiResult<Json<Value>> {
    require_role(&identity, &[Role::Admin])?;
    Ok(Json(json!({
        "page": "add_hospital",
        "fields": [
            "name", "location", "contact_number", "total_beds", "available_beds",
            "icu_total", "icu_available", "specialties", "ambulance_services",
            "mental_health_support", "financial_assistance"
        ],
    })))
}

pub async fn add_hospital(
    State(state): State<AppState>,
    Session(identity): Session,
    Form(draft): Form<HospitalDraft>,
) -> ApiResult<Redirect> {
    state.db.add_hospital(&identity, draft).await?;
    Ok(Redirect::to(HOSPITALS_PAGE))
}

pub async fn list_hospitals(
    State(state): State<AppState>,
    Session(identity): Session,
) -> Json<Value> {
    Json(json!({
        "page": "hospitals",
        "hospitals": state.db.hospitals().await,
        "can_manage": identity.is_admin(),
    }))
}

pub async fn edit_hospital_page(
    State(state): State<AppState>,
    Session(identity): Session,
    Path(hospital_id): Path<String>,
) -> ApiResult<Json<Value>> {
    require_role(&identity, &[Role::Admin])?;
    let hospital = state.db.hospital(&hospital_id).await?;
    Ok(Json(json!({
        "page": "edit_hospital",
        "hospital": hospital,
    })))
}

pub async fn edit_hospital(
    State(state): State<AppState>,
    Session(identity): Session,
    Path(hospital_id): Path<String>,
    Form(draft): Form<HospitalDraft>,
) -> ApiResult<Redirect> {
    state.db.update_hospital(&identity, &hospital_id, draft).await?;
    Ok(Redirect::to(HOSPITALS_PAGE))
}

pub async fn delete_hospital(
    State(state): State<AppState>,
    Session(identity): Session,
    Path(hospital_id): Path<String>,
) -> ApiResult<Redirect> {
    state.db.delete_hospital(&identity, &hospital_id).await?;
    Ok(Redirect::to(HOSPITALS_PAGE))
}
