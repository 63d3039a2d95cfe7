// rest_api/src/handlers/mod.rs
//
// Page routes answer with the JSON view model a template would render;
// form posts redirect with `303 See Other` on success.

pub mod api;
pub mod auth;
pub mod dashboards;
pub mod hospitals;
pub mod patients;

use axum::Json;
use serde_json::{json, Value};

pub(crate) fn success(message: impl Into<String>) -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": message.into(),
    }))
}
