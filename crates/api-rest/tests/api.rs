//! End-to-end tests driving the router directly, one request at a time.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Local};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use api_rest::{app, AppState};
use hospital_core::db;

async fn test_app() -> Router {
    let pool = db::memory_pool().await.expect("in-memory pool should open");
    app(AppState::new(pool))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

fn send(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("body should serialize")))
        .expect("request should build")
}

fn bare(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

fn tomorrow_at(hour: u32) -> String {
    let date = (Local::now() + Duration::days(1)).date_naive();
    format!("{date}T{hour:02}:00:00")
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let response = app.oneshot(get("/health")).await.expect("request should succeed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_full_clinical_flow() {
    let app = test_app().await;

    // Register the specialty.
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/especialidades",
            &json!({"name": "Cardiology", "description": "Heart and circulatory system"}),
        ))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(header::LOCATION)
        .expect("Location header should be set")
        .to_str()
        .expect("Location should be a string")
        .to_owned();
    let specialty = body_json(response).await;
    let specialty_id = specialty["id"].as_i64().expect("id should be assigned");
    assert_eq!(location, format!("/api/v1/especialidades/{specialty_id}"));

    // Register the doctor holding it.
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/medicos",
            &json!({
                "name": "Dr. Ana Lima",
                "crm": "12345",
                "email": "ana@example.com",
                "phone": "1133224455",
                "specialtyIds": [specialty_id]
            }),
        ))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::CREATED);
    let doctor = body_json(response).await;
    let doctor_id = doctor["id"].as_i64().expect("id should be assigned");
    assert_eq!(doctor["specialtyIds"], json!([specialty_id]));

    // Register the patient.
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/pacientes",
            &json!({
                "name": "Carlos Pereira",
                "cpf": "12345678901",
                "birthDate": "1990-01-15",
                "email": "carlos@example.com",
                "phone": "11998877665",
                "address": "Rua das Flores, 123"
            }),
        ))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::CREATED);
    let patient = body_json(response).await;
    let patient_id = patient["id"].as_i64().expect("id should be assigned");

    // Schedule the appointment for tomorrow.
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/consultas",
            &json!({
                "dateTime": tomorrow_at(10),
                "doctorId": doctor_id,
                "patientId": patient_id
            }),
        ))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::CREATED);
    let appointment = body_json(response).await;
    let appointment_id = appointment["id"].as_i64().expect("id should be assigned");
    assert_eq!(appointment["status"], "AGENDADA");

    // Complete it.
    let response = app
        .clone()
        .oneshot(bare("PUT", &format!("/api/v1/consultas/{appointment_id}/realizar")))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::OK);
    let completed = body_json(response).await;
    assert_eq!(completed["status"], "REALIZADA");

    // Issue a prescription against the completed appointment.
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/receitas",
            &json!({
                "appointmentId": appointment_id,
                "medication": "Aspirin",
                "dosage": "one 100mg tablet every 8 hours",
                "validUntil": tomorrow_at(23)
            }),
        ))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::CREATED);
    let prescription = body_json(response).await;
    assert!(prescription["issuedAt"].is_string());

    // The appointment can no longer be deleted.
    let response = app
        .clone()
        .oneshot(bare("DELETE", &format!("/api/v1/consultas/{appointment_id}")))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["status"], 400);
    assert_eq!(body["path"], format!("/api/v1/consultas/{appointment_id}"));
}

#[tokio::test]
async fn test_not_found_error_body_shape() {
    let app = test_app().await;

    let response = app
        .oneshot(get("/api/v1/medicos/999"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["path"], "/api/v1/medicos/999");
    assert!(body["timestamp"].is_string());
    assert!(body["message"].as_str().expect("message should be set").contains("not found"));
    assert_eq!(body["errors"], json!([]));
}

#[tokio::test]
async fn test_validation_errors_are_listed_per_field() {
    let app = test_app().await;

    let response = app
        .oneshot(send(
            "POST",
            "/api/v1/medicos",
            &json!({
                "name": "Jo",
                "crm": "12",
                "email": "not-an-email",
                "phone": "123"
            }),
        ))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "validation failed");
    assert_eq!(body["errors"].as_array().expect("errors should be a list").len(), 4);
}

#[tokio::test]
async fn test_unknown_status_segment_is_rejected() {
    let app = test_app().await;

    let response = app
        .oneshot(get("/api/v1/consultas/status/WRONG"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_period_bound_is_rejected() {
    let app = test_app().await;

    let response = app
        .oneshot(get("/api/v1/consultas/periodo?inicio=yesterday&fim=2030-01-01T00:00:00"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["errors"],
        json!(["inicio: must be an ISO-8601 date-time"])
    );
}

#[tokio::test]
async fn test_overlapping_appointment_is_rejected_over_http() {
    let app = test_app().await;

    let doctor = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/medicos",
            &json!({
                "name": "Dr. Ana Lima",
                "crm": "12345",
                "email": "ana@example.com",
                "phone": "1133224455"
            }),
        ))
        .await
        .expect("request should succeed");
    let doctor_id = body_json(doctor).await["id"].as_i64().expect("id");

    let patient = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/pacientes",
            &json!({
                "name": "Carlos Pereira",
                "cpf": "12345678901",
                "birthDate": "1990-01-15",
                "email": "carlos@example.com",
                "phone": "11998877665",
                "address": "Rua das Flores, 123"
            }),
        ))
        .await
        .expect("request should succeed");
    let patient_id = body_json(patient).await["id"].as_i64().expect("id");

    let first = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/consultas",
            &json!({"dateTime": tomorrow_at(10), "doctorId": doctor_id, "patientId": patient_id}),
        ))
        .await
        .expect("request should succeed");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/consultas",
            &json!({"dateTime": tomorrow_at(10), "doctorId": doctor_id, "patientId": patient_id}),
        ))
        .await
        .expect("request should succeed");
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body = body_json(second).await;
    assert!(body["message"]
        .as_str()
        .expect("message should be set")
        .contains("time slot"));
}

#[tokio::test]
async fn test_exam_result_via_query_param() {
    let app = test_app().await;

    // Build the chain up to a completed appointment.
    let doctor = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/medicos",
            &json!({
                "name": "Dr. Ana Lima",
                "crm": "12345",
                "email": "ana@example.com",
                "phone": "1133224455"
            }),
        ))
        .await
        .expect("request should succeed");
    let doctor_id = body_json(doctor).await["id"].as_i64().expect("id");

    let patient = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/pacientes",
            &json!({
                "name": "Carlos Pereira",
                "cpf": "12345678901",
                "birthDate": "1990-01-15",
                "email": "carlos@example.com",
                "phone": "11998877665",
                "address": "Rua das Flores, 123"
            }),
        ))
        .await
        .expect("request should succeed");
    let patient_id = body_json(patient).await["id"].as_i64().expect("id");

    let appointment = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/consultas",
            &json!({"dateTime": tomorrow_at(9), "doctorId": doctor_id, "patientId": patient_id}),
        ))
        .await
        .expect("request should succeed");
    let appointment_id = body_json(appointment).await["id"].as_i64().expect("id");

    app.clone()
        .oneshot(bare("PUT", &format!("/api/v1/consultas/{appointment_id}/realizar")))
        .await
        .expect("request should succeed");

    let exam = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/v1/exames",
            &json!({
                "appointmentId": appointment_id,
                "name": "Hemograma completo",
                "examType": "LABORATORIAL"
            }),
        ))
        .await
        .expect("request should succeed");
    assert_eq!(exam.status(), StatusCode::CREATED);
    let exam_body = body_json(exam).await;
    let exam_id = exam_body["id"].as_i64().expect("id");
    assert!(exam_body["result"].is_null());

    // Pending until the result lands.
    let pending = app
        .clone()
        .oneshot(get("/api/v1/exames/pendentes"))
        .await
        .expect("request should succeed");
    assert_eq!(body_json(pending).await.as_array().expect("list").len(), 1);

    let resulted = app
        .clone()
        .oneshot(bare(
            "PUT",
            &format!("/api/v1/exames/{exam_id}/resultado?resultado=normal"),
        ))
        .await
        .expect("request should succeed");
    assert_eq!(resulted.status(), StatusCode::OK);
    let resulted_body = body_json(resulted).await;
    assert_eq!(resulted_body["result"], "normal");
    assert!(resulted_body["resultAt"].is_string());

    let pending = app
        .oneshot(get("/api/v1/exames/pendentes"))
        .await
        .expect("request should succeed");
    assert!(body_json(pending).await.as_array().expect("list").is_empty());
}
