// rest_api/src/handlers/dashboards.rs

use axum::{extract::State, response::Redirect, Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use models::{CounselingDraft, Patient, ReferenceData, Role};
use security::require_role;

use crate::errors::ApiResult;
use crate::handlers::success;
use crate::session::Session;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// Dashboard row: the patient plus the name of its assigned hospital.
fn patient_row(reference: &ReferenceData, patient: &Patient) -> Value {
    json!({
        "patient": patient,
        "hospital_name": reference.hospital_name(patient.assigned_hospital_id.as_deref()),
    })
}

pub async fn nursing_home_dashboard(
    State(state): State<AppState>,
    Session(identity): Session,
) -> ApiResult<Json<Value>> {
    require_role(&identity, &[Role::NursingHome])?;
    let patients = state.db.patients_for(&identity).await?;
    let requests = state.db.ambulance_requests_for(&identity).await?;
    let reference = state.db.reference_snapshot().await;
    let rows: Vec<Value> = patients.iter().map(|p| patient_row(&reference, p)).collect();
    Ok(Json(json!({
        "page": "nursing_home_dashboard",
        "clinic_id": identity.entity_id,
        "clinic_name": identity.display_name,
        "patients": rows,
        "ambulance_requests": requests,
        "hospitals": reference.hospitals,
        "pros": reference.pros,
    })))
}

pub async fn admin_dashboard(
    State(state): State<AppState>,
    Session(identity): Session,
) -> ApiResult<Json<Value>> {
    require_role(&identity, &[Role::Admin])?;
    let patients = state.db.patients_for(&identity).await?;
    let clinics = state.db.clinics(&identity).await?;
    let requests = state.db.ambulance_requests_for(&identity).await?;
    let reference = state.db.reference_snapshot().await;
    let rows: Vec<Value> = patients.iter().map(|p| patient_row(&reference, p)).collect();
    Ok(Json(json!({
        "page": "admin_dashboard",
        "patients": rows,
        "hospitals": reference.hospitals,
        "nursing_homes": clinics,
        "ambulance_requests": requests,
        "pros": reference.pros,
    })))
}

pub async fn about(State(state): State<AppState>, Session(_identity): Session) -> Json<Value> {
    let reference = state.db.reference_snapshot().await;
    Json(json!({
        "page": "about",
        "hospitals": reference.hospitals,
        "nursing_homes": reference.nursing_homes,
    }))
}

pub async fn contact(State(state): State<AppState>, Session(_identity): Session) -> Json<Value> {
    let reference = state.db.reference_snapshot().await;
    Json(json!({
        "page": "contact",
        "hospitals": reference.hospitals,
        "counseling": reference.counseling_resources,
    }))
}

/// Contact messages are acknowledged and logged, not stored.
pub async fn contact_message(
    Session(identity): Session,
    Form(form): Form<ContactForm>,
) -> Json<Value> {
    info!(
        "Contact message from {} (name: {:?}, email: {:?}, {} chars)",
        identity.username,
        form.name,
        form.email,
        form.message.as_deref().map_or(0, str::len)
    );
    success("Thank you for your message!")
}

pub async fn add_counseling_resource(
    State(state): State<AppState>,
    Session(identity): Session,
    Form(draft): Form<CounselingDraft>,
) -> ApiResult<Redirect> {
    state.db.add_counseling_resource(&identity, draft).await?;
    Ok(Redirect::to("/contact"))
}
