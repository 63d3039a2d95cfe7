// rest_api/tests/routes.rs

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use lib::config::AdminConfig;
use lib::storage_engine::SledHospitalTable;
use lib::{CareDatabase, CareSyncConfig, ReferenceStore};
use models::Role;
use rest_api::{build_router, AppState};
use security::Identity;

const SEED: &str = r#"{
    "nursing_homes": [
        {"clinic_id": "NH001", "name": "Green Meadows"},
        {"clinic_id": "NH002", "name": "Silver Oaks"}
    ],
    "multispeciality_hospitals": [
        {"hospital_id": "H001", "name": "City General", "location": "Downtown",
         "contact_number": "555-0100", "total_beds": 100, "available_beds": 20,
         "icu_beds": {"total": 10, "available": 2}, "specialties": ["Cardiology"],
         "ambulance_services": true, "mental_health_support": false,
         "financial_assistance": true}
    ],
    "pros": [{"pro_id": "PRO1", "name": "Sam Carter"}],
    "counseling_resources": [{"name": "Helpline", "contact": "555-0999"}]
}"#;

struct TestApp {
    router: Router,
    state: AppState,
    _dir: tempfile::TempDir,
}

async fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("caresync_seed_data.json");
    std::fs::write(&path, SEED).unwrap();
    let db = sled::Config::new().temporary(true).open().unwrap();
    let table = Arc::new(SledHospitalTable::new(&db).unwrap());
    let care = CareDatabase::with_parts(db, ReferenceStore::open(&path).unwrap(), table).unwrap();
    care.bootstrap(&AdminConfig {
        password: Some("admin-pass".into()),
        ..AdminConfig::default()
    })
    .await
    .unwrap();

    let mut config = CareSyncConfig::default();
    config.session.secret = "route-test-secret-route-test-secret".into();
    let state = AppState::new(Arc::new(care), &config);
    TestApp {
        router: build_router(state.clone()),
        state,
        _dir: dir,
    }
}

fn identity(role: Role, entity_id: &str) -> Identity {
    Identity {
        account_id: format!("acc-{}", entity_id),
        username: entity_id.to_lowercase(),
        role,
        entity_id: entity_id.to_string(),
        display_name: None,
    }
}

impl TestApp {
    fn cookie_for(&self, role: Role, entity_id: &str) -> String {
        let token = self.state.keys.issue(&identity(role, entity_id)).unwrap();
        format!("caresync_session={}", token)
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post_form(&self, uri: &str, cookie: Option<&str>, form: &str) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap()).await
    }

    async fn post_json(&self, uri: &str, cookie: &str, body: Value) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, cookie)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

const PATIENT_FORM: &str = "name=Rosa+Diaz&age=67&gender=Female&contact_number=555-0111\
    &address=12+Pine+Rd&medical_history=copd%2C+asthma&assigned_hospital_id=H001";

async fn add_patient(app: &TestApp, cookie: &str) -> String {
    let response = app.post_form("/add-patient", Some(cookie), PATIENT_FORM).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    location(&response)
        .strip_prefix("/patient/")
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_and_home_are_public() {
    let app = test_app().await;
    let response = app.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");

    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/nursing-home/login");

    let admin = app.cookie_for(Role::Admin, "admin");
    let response = app.get("/", Some(&admin)).await;
    assert_eq!(location(&response), "/admin/dashboard");
}

#[tokio::test]
async fn unauthenticated_pages_redirect_and_api_returns_401() {
    let app = test_app().await;
    for uri in ["/nursing-home/dashboard", "/hospitals", "/patient/abc12345", "/about"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(location(&response), "/nursing-home/login");
    }
    let response = app.get("/api/patients", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["status"], "error");

    let response = app.get("/api/patients", Some("caresync_session=not-a-token")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn clinic_login_sets_session_cookie() {
    let app = test_app().await;
    let response = app
        .post_form("/nursing-home/login", None, "clinic_id=NH001&password=wrong")
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["message"], "Invalid clinic ID or password");

    let response = app
        .post_form("/nursing-home/login", None, "clinic_id=NH001&password=NH001123")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/nursing-home/dashboard");
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(set_cookie.contains("HttpOnly"));
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let response = app.get("/nursing-home/dashboard", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["clinic_id"], "NH001");
    assert_eq!(body["clinic_name"], "Green Meadows");

    let response = app.get("/nursing-home/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));
}

#[tokio::test]
async fn clinics_cannot_see_each_others_patients() {
    let app = test_app().await;
    let nh1 = app.cookie_for(Role::NursingHome, "NH001");
    let nh2 = app.cookie_for(Role::NursingHome, "NH002");
    let admin = app.cookie_for(Role::Admin, "admin");
    let patient_id = add_patient(&app, &nh1).await;
    let uri = format!("/patient/{}", patient_id);

    let response = app.get(&uri, Some(&nh1)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["patient"]["medical_history"], serde_json::json!(["copd", "asthma"]));
    assert_eq!(body["hospital"]["name"], "City General");

    let response = app.get(&uri, Some(&nh2)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert!(body.get("patient").is_none());

    let body = json_body(app.get("/api/patients", Some(&nh2)).await).await;
    assert_eq!(body, serde_json::json!([]));
    let body = json_body(app.get("/api/patients", Some(&admin)).await).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let response = app
        .post_json(
            &format!("/patient/{}/assign-pro", patient_id),
            &nh2,
            serde_json::json!({"pro_id": "PRO1"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json_body(app.get("/admin/dashboard", Some(&admin)).await).await;
    assert_eq!(body["patients"][0]["hospital_name"], "City General");
    assert_eq!(app.get("/admin/dashboard", Some(&nh1)).await.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn add_patient_rejects_bad_age() {
    let app = test_app().await;
    let nh1 = app.cookie_for(Role::NursingHome, "NH001");
    let form = PATIENT_FORM.replace("age=67", "age=150");
    let response = app.post_form("/add-patient", Some(&nh1), &form).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["message"], "Age must be between 0 and 120");
}

#[tokio::test]
async fn hospital_management_is_admin_only_and_validated() {
    let app = test_app().await;
    let admin = app.cookie_for(Role::Admin, "admin");
    let nh1 = app.cookie_for(Role::NursingHome, "NH001");
    let form = "name=Lakeside&location=Harbor&contact_number=555&total_beds=10\
        &available_beds=4&icu_total=2&icu_available=1&specialties=Neurology&ambulance_services=on";

    let response = app.post_form("/hospital/add", Some(&nh1), form).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let bad = form.replace("available_beds=4", "available_beds=40");
    let response = app.post_form("/hospital/add", Some(&admin), &bad).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json_body(response).await["message"],
        "Available beds cannot exceed total beds"
    );

    let response = app.post_form("/hospital/add", Some(&admin), form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/hospitals");

    let hospitals = json_body(app.get("/api/hospitals", Some(&nh1)).await).await;
    assert_eq!(hospitals.as_array().unwrap().len(), 2);
    let new_id = hospitals[1]["hospital_id"].as_str().unwrap().to_string();
    assert_eq!(hospitals[1]["icu_beds"]["available"], 1);

    let response = app
        .post_form(&format!("/hospital/{}/delete", new_id), Some(&admin), "")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let response = app.get(&format!("/hospital/{}/edit", new_id), Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ambulance_request_flow() {
    let app = test_app().await;
    let nh1 = app.cookie_for(Role::NursingHome, "NH001");
    let admin = app.cookie_for(Role::Admin, "admin");
    let patient_id = add_patient(&app, &nh1).await;
    let uri = format!("/patient/{}/request-ambulance", patient_id);

    let response = app
        .post_json(&uri, &nh1, serde_json::json!({"pickup_location": "Green Meadows"}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json(
            &uri,
            &nh1,
            serde_json::json!({"pickup_location": "Green Meadows", "drop_location": "City General"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "success");
    let request_id = body["request"]["request_id"].as_str().unwrap().to_string();

    let patient = json_body(app.get(&format!("/patient/{}", patient_id), Some(&nh1)).await).await;
    assert_eq!(patient["patient"]["current_status"], "In Transit");

    let requests = json_body(app.get("/api/ambulance-requests", Some(&nh1)).await).await;
    assert_eq!(requests.as_array().unwrap().len(), 1);
    let nh2 = app.cookie_for(Role::NursingHome, "NH002");
    let requests = json_body(app.get("/api/ambulance-requests", Some(&nh2)).await).await;
    assert!(requests.as_array().unwrap().is_empty());

    let resolve = format!("/ambulance-requests/{}/resolve", request_id);
    let response = app.post_json(&resolve, &nh1, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = app.post_json(&resolve, &admin, serde_json::json!({})).await;
    assert_eq!(json_body(response).await["request"]["status"], "Resolved");
}

#[tokio::test]
async fn assigning_pro_twice_keeps_one_entry() {
    let app = test_app().await;
    let nh1 = app.cookie_for(Role::NursingHome, "NH001");
    let patient_id = add_patient(&app, &nh1).await;
    let uri = format!("/patient/{}/assign-pro", patient_id);

    for _ in 0..2 {
        let response = app.post_json(&uri, &nh1, serde_json::json!({"pro_id": "PRO1"})).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let pros = json_body(app.get("/api/pros", Some(&nh1)).await).await;
    assert_eq!(pros[0]["patients_assigned"], serde_json::json!([patient_id]));

    let response = app.post_json(&uri, &nh1, serde_json::json!({"pro_id": "PRO404"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bearer_token_is_accepted_for_api_routes() {
    let app = test_app().await;
    let token = app.state.keys.issue(&identity(Role::Admin, "admin")).unwrap();
    let request = Request::builder()
        .uri("/api/counseling-resources")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body[0]["name"], "Helpline");
    assert!(body[0]["resource_id"].as_str().unwrap().starts_with("CR"));
}
