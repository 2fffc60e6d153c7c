use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use fever_triage::create_router;

use crate::utils::{ADMIN_PASSWORD, ADMIN_USERNAME, test_state};

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn registration(username: &str, contact: &str) -> Value {
    json!({
        "name": "Dr. Sari",
        "username": username,
        "emailOrPhone": contact,
        "birthPlace": "Yogyakarta",
        "institution": "RSUD Sleman",
        "dateOfBirth": "1988-11-30",
        "gender": "female",
        "password": "pw-123",
        "confirmPassword": "pw-123"
    })
}

fn assessment(submission_id: &str) -> Value {
    json!({
        "submissionId": submission_id,
        "name": "Adi",
        "gender": "Male",
        "dateOfBirth": "2016-02-10",
        "pulseWeak": false,
        "consciousnessPoor": false,
        "oxygenSaturation": "97",
        "vomiting": true,
        "leukocyteCount": 12000,
        "neutrophilCount": "8000",
        "lymphocyteCount": "2000",
        "crpLevel": "",
        "feverDuration": "6"
    })
}

async fn sign_up_and_login(app: &Router, username: &str, contact: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/register",
        None,
        Some(registration(username, contact)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["ok"], true);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "identifier": contact, "password": "pw-123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = create_router(test_state());
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_requests_without_session_redirect_to_login() {
    let app = create_router(test_state());
    let (status, body) = send(&app, Method::GET, "/api/patients", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");
    assert_eq!(body["redirect"], "/login");

    let (status, _) = send(&app, Method::GET, "/api/patients", Some("forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_registration_errors() {
    let app = create_router(test_state());
    sign_up_and_login(&app, "sari", "sari@rsud.id").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(registration("sari", "other@rsud.id")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username, email, or phone already in use");

    let mut mismatch = registration("budi", "budi@rsud.id");
    mismatch["confirmPassword"] = json!("different");
    let (status, body) = send(&app, Method::POST, "/api/register", None, Some(mismatch)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Passwords do not match");
    assert_eq!(body["field"], "confirmPassword");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "identifier": "sari", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_record_lifecycle() {
    let app = create_router(test_state());
    let token = sign_up_and_login(&app, "sari", "sari@rsud.id").await;
    let token = Some(token.as_str());

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/patients",
        token,
        Some(assessment("sub-1")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["diagnosis"], "Bacterial Infection");
    assert_eq!(created["nlcrResult"], 4.0);
    assert!(created["age"].as_u64().unwrap() >= 9);
    assert_eq!(created["crpLevel"], Value::Null);
    assert_eq!(created["referralReasons"], json!(["Vomiting (Muntah)"]));
    let id = created["id"].as_u64().unwrap();

    // same submission id: no duplicate
    let (status, again) = send(
        &app,
        Method::POST,
        "/api/patients",
        token,
        Some(assessment("sub-1")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(again["id"], created["id"]);

    let (status, list) = send(&app, Method::GET, "/api/patients", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let uri = format!("/api/patients/{id}");
    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        token,
        Some(json!({ "leukocyteCount": "7000", "neutrophilCount": 3000, "vomiting": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["diagnosis"], "Viral Infection");
    assert_eq!(updated["sensitivity"], 96.6);
    assert_eq!(updated["referralReasons"], json!([]));

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        token,
        Some(json!({ "diagnosis": "Viral Infection" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, stats) = send(&app, Method::GET, "/api/dashboard-stats", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["patientCount"], 1);
    assert_eq!(
        stats["diagnosisCounts"],
        json!([{ "diagnosis": "Viral Infection", "count": 1 }])
    );

    let (status, _) = send(&app, Method::DELETE, &uri, token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/api/patients/abc", token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_preview_does_not_store() {
    let app = create_router(test_state());
    let token = sign_up_and_login(&app, "sari", "08111222333").await;
    let token = Some(token.as_str());

    let mut form = assessment("unused");
    form["pulseWeak"] = json!(true);
    let (status, result) = send(&app, Method::POST, "/api/assess", token, Some(form)).await;
    assert_eq!(status, StatusCode::OK, "{result}");
    assert_eq!(result["diagnosis"], "Emergency Referral");
    assert_eq!(result["referralOverridesDiagnosis"], true);
    assert_eq!(result["sensitivity"], Value::Null);

    let (_, list) = send(&app, Method::GET, "/api/patients", token, None).await;
    assert!(list.as_array().unwrap().is_empty());

    let mut invalid = assessment("x");
    invalid["gender"] = json!("");
    let (status, body) = send(&app, Method::POST, "/api/assess", token, Some(invalid)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Gender is required");
}

#[tokio::test]
async fn test_roles_and_logout() {
    let app = create_router(test_state());
    let sari = sign_up_and_login(&app, "sari", "sari@rsud.id").await;
    let budi = sign_up_and_login(&app, "budi", "budi@rsud.id").await;

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/patients",
        Some(&sari),
        Some(assessment("s1")),
    )
    .await;
    let uri = format!("/api/patients/{}", created["id"]);

    let (status, _) = send(&app, Method::GET, &uri, Some(&budi), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "identifier": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "administrator");
    let admin = body["token"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/patients",
        Some(&admin),
        Some(assessment("a1")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, stats) = send(&app, Method::GET, "/api/dashboard-stats", Some(&admin), None).await;
    assert_eq!(stats["patientCount"], 1);

    let (status, _) = send(&app, Method::POST, "/api/logout", Some(&sari), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, "/api/patients", Some(&sari), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
