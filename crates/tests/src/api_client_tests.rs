use axum::http::{Method, StatusCode};
use client::storage::keys;
use client::{ClinicApi, HttpClinicApi, KeyValueStore, MemoryStore};
use pretty_assertions::assert_eq;
use serde_json::json;
use shared_types::{
    AppErrorKind, AppointmentStatus, ClinicConfig, CreateAppointmentRequest, LoginRequest,
    RegisterRequest, Role, UpdateAppointmentRequest, UpdateStatusRequest,
};

use crate::common::{self, StubBackend};

fn token_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.set(keys::JWT_TOKEN, "token-123");
    store
}

#[tokio::test]
async fn test_authenticate_posts_credentials_to_role_path() {
    let backend = StubBackend::start(vec![(
        Method::POST,
        "/api/login/doctor",
        StatusCode::OK,
        json!({ "token": "jwt-abc", "user_id": 7 }),
    )])
    .await;
    let api = backend.client(MemoryStore::new());

    let credentials = LoginRequest {
        email: "luis@example.com".into(),
        password: "secreto".into(),
    };
    let response = api.authenticate(Role::Doctor, &credentials).await.unwrap();

    assert_eq!(response.token, "jwt-abc");
    assert_eq!(response.user_id, Some(7));
    let received = backend.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].body, json!({ "email": "luis@example.com", "password": "secreto" }));
    assert_eq!(received[0].bearer, None);
}

#[tokio::test]
async fn test_bad_credentials_are_an_auth_error_with_backend_message() {
    let backend = StubBackend::start(vec![(
        Method::POST,
        "/api/login/patient",
        StatusCode::UNAUTHORIZED,
        json!({ "msg": "Bad username or password" }),
    )])
    .await;
    let api = backend.client(MemoryStore::new());

    let credentials = LoginRequest {
        email: "ana@example.com".into(),
        password: "incorrecta".into(),
    };
    let err = api.authenticate(Role::Patient, &credentials).await.unwrap_err();

    assert_eq!(err.kind, AppErrorKind::Unauthorized);
    assert_eq!(err.message, "Bad username or password");
    assert!(err.is_auth());
}

#[tokio::test]
async fn test_server_error_is_reported_as_backend_failure() {
    let backend = StubBackend::start(vec![(
        Method::GET,
        "/api/centers",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "Base de datos caída" }),
    )])
    .await;
    let api = backend.client(MemoryStore::new());

    let err = api.list_centers().await.unwrap_err();

    assert_eq!(err.kind, AppErrorKind::Backend);
    assert_eq!(err.status, Some(500));
    assert_eq!(err.message, "Base de datos caída");
    assert!(!err.is_auth());
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    let api = HttpClinicApi::new(common::closed_port_url().await, MemoryStore::new());

    let err = api.list_doctors().await.unwrap_err();

    assert_eq!(err.kind, AppErrorKind::Network);
    assert!(!err.is_auth());
}

#[tokio::test]
async fn test_reference_data_is_normalized() {
    let backend = StubBackend::start(vec![
        (
            Method::GET,
            "/api/centers",
            StatusCode::OK,
            json!([
                { "id": 1, "name": "Centro A", "address": "Calle Mayor 1" },
                { "id": 2, "name": "Centro B", "address": null }
            ]),
        ),
        (
            Method::GET,
            "/api/doctors",
            StatusCode::OK,
            json!([
                { "id": 7, "last_name": "Pérez", "specialty": "Cardiología", "center_id": 1 },
                { "id": 8, "last_name": "Gil", "specialty": "", "center_id": 2 }
            ]),
        ),
    ])
    .await;
    let api = backend.client(MemoryStore::new());

    let centers = api.list_centers().await.unwrap();
    let doctors = api.list_doctors().await.unwrap();

    assert_eq!(centers[1].address, "Dirección no disponible");
    assert_eq!(doctors[0].name, "Pérez");
    assert_eq!(doctors[0].center_id, Some(1));
    assert_eq!(doctors[1].specialty, "Especialidad no definida");
}

#[tokio::test]
async fn test_protected_calls_send_the_stored_bearer_token() {
    let backend = StubBackend::start(vec![(
        Method::GET,
        "/api/protected/patient",
        StatusCode::OK,
        json!({ "id": 42, "first_name": "Ana", "last_name": "Ruiz" }),
    )])
    .await;
    let api = backend.client(token_store());

    let profile = api.fetch_session_profile(Role::Patient).await.unwrap();

    assert_eq!(profile.full_name(), "Ana Ruiz");
    assert_eq!(backend.received()[0].bearer.as_deref(), Some("token-123"));
}

#[tokio::test]
async fn test_expired_token_on_protected_call_is_an_auth_error() {
    let backend = StubBackend::start(vec![(
        Method::GET,
        "/api/doctor/appointments",
        StatusCode::UNAUTHORIZED,
        json!({}),
    )])
    .await;
    let api = backend.client(token_store());

    let err = api.list_appointments_for_doctor().await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(err.message, "Tu sesión ha expirado. Inicia sesión de nuevo.");
}

#[tokio::test]
async fn test_missing_token_skips_the_request() {
    let backend = StubBackend::start(vec![]).await;
    let api = backend.client(MemoryStore::new());

    let err = api.cancel_appointment(5).await.unwrap_err();

    assert!(err.is_auth());
    assert!(backend.received().is_empty());
}

#[tokio::test]
async fn test_create_appointment_posts_day_month_year_date() {
    let backend = StubBackend::start(vec![(
        Method::POST,
        "/api/appointment",
        StatusCode::CREATED,
        json!({
            "id": 31,
            "doctor_id": 7,
            "patient_id": 42,
            "center_id": 1,
            "appointment_date": "Mon, 20 Oct 2025 09:00:00 GMT",
            "status": "pending"
        }),
    )])
    .await;
    let api = backend.client(token_store());

    let payload = CreateAppointmentRequest {
        doctor_id: 7,
        patient_id: Some(42),
        center_id: 1,
        appointment_date: shared_types::api_date_string(common::monday(), common::slot("09:00")),
    };
    let record = api.create_appointment(&payload).await.unwrap();

    assert_eq!(record.id, Some(31));
    assert_eq!(
        backend.received()[0].body,
        json!({
            "doctor_id": 7,
            "patient_id": 42,
            "center_id": 1,
            "appointment_date": "20-10-2025 09:00"
        })
    );
}

#[tokio::test]
async fn test_modify_cancel_and_status_use_put_routes() {
    let backend = StubBackend::start(vec![
        (Method::PUT, "/api/appointment/31", StatusCode::OK, json!({ "id": 31 })),
        (Method::PUT, "/api/appointment/31/cancel", StatusCode::OK, json!({ "message": "ok" })),
    ])
    .await;
    let api = backend.client(token_store());

    api.update_appointment(
        31,
        &UpdateAppointmentRequest {
            appointment_date: "21-10-2025 10:30".into(),
            doctor_id: Some(7),
            center_id: None,
        },
    )
    .await
    .unwrap();
    api.update_appointment_status(
        31,
        &UpdateStatusRequest {
            status: AppointmentStatus::Finished,
            appointment_date: "21-10-2025 10:30".into(),
        },
    )
    .await
    .unwrap();
    api.cancel_appointment(31).await.unwrap();

    let received = backend.received();
    let routes: Vec<(Method, &str)> = received
        .iter()
        .map(|r| (r.method.clone(), r.path.as_str()))
        .collect();
    assert_eq!(
        routes,
        vec![
            (Method::PUT, "/api/appointment/31"),
            (Method::PUT, "/api/appointment/31"),
            (Method::PUT, "/api/appointment/31/cancel"),
        ]
    );
    assert_eq!(received[0].body, json!({ "appointment_date": "21-10-2025 10:30", "doctor_id": 7 }));
    assert_eq!(
        received[1].body,
        json!({ "status": "Finalizada", "appointment_date": "21-10-2025 10:30" })
    );
}

#[tokio::test]
async fn test_set_doctor_center_sends_center_id() {
    let backend = StubBackend::start(vec![(
        Method::PUT,
        "/api/doctor/center",
        StatusCode::OK,
        json!({ "message": "Centro actualizado" }),
    )])
    .await;
    let api = backend.client(token_store());

    api.set_doctor_center(3).await.unwrap();

    assert_eq!(backend.received()[0].body, json!({ "center_id": 3 }));
}

#[tokio::test]
async fn test_seed_forwards_configured_source_url() {
    let backend = StubBackend::start(vec![(
        Method::POST,
        "/api/centers/seed/navarra",
        StatusCode::OK,
        json!({ "inserted": 12, "items": [] }),
    )])
    .await;
    let mut config = ClinicConfig::default();
    config.api.base_url = backend.base_url.clone();
    config.api.seed_source_url = Some("https://datos.example/centros.json".into());
    let api = HttpClinicApi::from_config(&config, MemoryStore::new());

    let response = api.seed_centers().await.unwrap();

    assert_eq!(response.inserted, 12);
    assert_eq!(
        backend.received()[0].body,
        json!({ "url": "https://datos.example/centros.json" })
    );
}

#[tokio::test]
async fn test_register_patient_omits_doctor_fields_and_confirmation() {
    let backend = StubBackend::start(vec![(
        Method::POST,
        "/api/register/patient",
        StatusCode::CREATED,
        json!({ "msg": "Paciente registrado" }),
    )])
    .await;
    let api = backend.client(MemoryStore::new());

    let request = RegisterRequest {
        role: Some(Role::Patient),
        first_name: "Ana".into(),
        last_name: "Ruiz".into(),
        birth_date: "1990-04-02".into(),
        email: "ana@example.com".into(),
        phone_number: "600112233".into(),
        password: "secreto".into(),
        confirm_password: "secreto".into(),
        license_number: Some("123456789".into()),
        specialty: Some("Cardiología".into()),
    };
    api.register(Role::Patient, &request).await.unwrap();

    let body = &backend.received()[0].body;
    assert_eq!(body["phoneNumber"], "600112233");
    assert!(body.get("confirm_password").is_none());
    assert!(body.get("licenseNumber").is_none());
    assert!(body.get("specialty").is_none());
}
