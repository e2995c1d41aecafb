use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    Json, Router,
};
use chrono::NaiveDate;
use client::storage::keys;
use client::{ClinicApi, KeyValueStore, MemoryStore};
use serde_json::Value;
use shared_types::{
    ApiResult, AppError, AppointmentRecord, ClinicConfig, CreateAppointmentRequest, Doctor,
    HealthCenter, LoginRequest, LoginResponse, RegisterRequest, Role, SeedCentersResponse,
    UpdateAppointmentRequest, UpdateStatusRequest, UserProfile,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

// ── Stub HTTP backend ──────────────────────────────────────────

/// A request as the stub backend received it.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
struct StubState {
    replies: Arc<HashMap<(Method, String), (StatusCode, Value)>>,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

/// Canned-response backend on an ephemeral port. Every request is recorded;
/// unknown routes answer 404.
pub struct StubBackend {
    pub base_url: String,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl StubBackend {
    pub async fn start(replies: Vec<(Method, &str, StatusCode, Value)>) -> Self {
        let state = StubState {
            replies: Arc::new(
                replies
                    .into_iter()
                    .map(|(m, p, s, v)| ((m, p.to_string()), (s, v)))
                    .collect(),
            ),
            received: Arc::default(),
        };
        let received = state.received.clone();
        let app = Router::new().fallback(reply).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub backend crashed");
        });

        Self {
            base_url: format!("http://{}", addr),
            received,
        }
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }

    /// Client over this backend with `store` as its token source.
    pub fn client(&self, store: MemoryStore) -> client::HttpClinicApi<MemoryStore> {
        client::HttpClinicApi::new(self.base_url.clone(), store)
    }
}

async fn reply(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    let path = uri.path().to_string();
    state.received.lock().unwrap().push(ReceivedRequest {
        method: method.clone(),
        path: path.clone(),
        bearer,
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    match state.replies.get(&(method, path)) {
        Some((status, value)) => (*status, Json(value.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "message": "Ruta no encontrada" })),
        ),
    }
}

/// An address nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

// ── Recording mock API ─────────────────────────────────────────

/// One call made through [`MockApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Authenticate(Role),
    Register(Role),
    FetchProfile(Role),
    ListCenters,
    ListDoctors,
    SeedCenters,
    ListDoctorAppointments,
    Create(CreateAppointmentRequest),
    Update(i64, UpdateAppointmentRequest),
    Cancel(i64),
    UpdateStatus(i64, UpdateStatusRequest),
    SetDoctorCenter(i64),
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<Call>,
    centers: Vec<HealthCenter>,
    doctors: Vec<Doctor>,
    doctor_appointments: Vec<AppointmentRecord>,
    profile: Option<UserProfile>,
    next_id: i64,
    omit_created_id: bool,
    failures: HashMap<&'static str, AppError>,
}

/// In-memory [`ClinicApi`] that records every call and answers from fixtures.
/// Clones share state, so a test keeps a handle after moving one into a
/// controller.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    state: Rc<RefCell<MockState>>,
}

impl MockApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.state.borrow_mut().next_id = 100;
        api
    }

    pub fn with_centers(self, centers: Vec<HealthCenter>) -> Self {
        self.state.borrow_mut().centers = centers;
        self
    }

    pub fn with_doctors(self, doctors: Vec<Doctor>) -> Self {
        self.state.borrow_mut().doctors = doctors;
        self
    }

    pub fn with_doctor_appointments(self, records: Vec<AppointmentRecord>) -> Self {
        self.state.borrow_mut().doctor_appointments = records;
        self
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.state.borrow_mut().profile = Some(profile);
        self
    }

    /// Make the create endpoint acknowledge without returning an id.
    pub fn omitting_created_id(self) -> Self {
        self.state.borrow_mut().omit_created_id = true;
        self
    }

    /// Make `operation` fail with `err` from now on.
    pub fn fail(&self, operation: &'static str, err: AppError) {
        self.state.borrow_mut().failures.insert(operation, err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Calls that are not reference-data reads.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::ListCenters | Call::ListDoctors | Call::ListDoctorAppointments))
            .collect()
    }

    fn record(&self, call: Call, operation: &'static str) -> ApiResult<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        match state.failures.get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl ClinicApi for MockApi {
    async fn authenticate(&self, role: Role, _credentials: &LoginRequest) -> ApiResult<LoginResponse> {
        self.record(Call::Authenticate(role), "authenticate")?;
        Ok(LoginResponse {
            token: "token-123".into(),
            user_id: Some(42),
        })
    }

    async fn register(&self, role: Role, _payload: &RegisterRequest) -> ApiResult<()> {
        self.record(Call::Register(role), "register")
    }

    async fn fetch_session_profile(&self, role: Role) -> ApiResult<UserProfile> {
        self.record(Call::FetchProfile(role), "fetch_session_profile")?;
        Ok(self.state.borrow().profile.clone().unwrap_or_default())
    }

    async fn list_centers(&self) -> ApiResult<Vec<HealthCenter>> {
        self.record(Call::ListCenters, "list_centers")?;
        Ok(self.state.borrow().centers.clone())
    }

    async fn list_doctors(&self) -> ApiResult<Vec<Doctor>> {
        self.record(Call::ListDoctors, "list_doctors")?;
        Ok(self.state.borrow().doctors.clone())
    }

    async fn seed_centers(&self) -> ApiResult<SeedCentersResponse> {
        self.record(Call::SeedCenters, "seed_centers")?;
        Ok(SeedCentersResponse {
            inserted: 3,
            message: None,
        })
    }

    async fn list_appointments_for_doctor(&self) -> ApiResult<Vec<AppointmentRecord>> {
        self.record(Call::ListDoctorAppointments, "list_appointments_for_doctor")?;
        Ok(self.state.borrow().doctor_appointments.clone())
    }

    async fn create_appointment(
        &self,
        payload: &CreateAppointmentRequest,
    ) -> ApiResult<AppointmentRecord> {
        self.record(Call::Create(payload.clone()), "create_appointment")?;
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let mut created = agenda_record(id, &payload.appointment_date, "Pendiente");
        created.doctor_id = Some(payload.doctor_id);
        created.center_id = Some(payload.center_id);
        created.patient_id = payload.patient_id;
        if state.omit_created_id {
            created.id = None;
        }
        Ok(created)
    }

    async fn update_appointment(&self, id: i64, payload: &UpdateAppointmentRequest) -> ApiResult<()> {
        self.record(Call::Update(id, payload.clone()), "update_appointment")
    }

    async fn cancel_appointment(&self, id: i64) -> ApiResult<()> {
        self.record(Call::Cancel(id), "cancel_appointment")
    }

    async fn update_appointment_status(&self, id: i64, payload: &UpdateStatusRequest) -> ApiResult<()> {
        self.record(Call::UpdateStatus(id, payload.clone()), "update_appointment_status")
    }

    async fn set_doctor_center(&self, center_id: i64) -> ApiResult<()> {
        self.record(Call::SetDoctorCenter(center_id), "set_doctor_center")
    }
}

// ── Fixtures ───────────────────────────────────────────────────

pub fn centro_a() -> HealthCenter {
    HealthCenter {
        id: 1,
        name: "Centro A".into(),
        address: "Calle Mayor 1".into(),
    }
}

pub fn centro_b() -> HealthCenter {
    HealthCenter {
        id: 2,
        name: "Centro B".into(),
        address: "Avenida Baja 5".into(),
    }
}

fn doctor(id: i64, name: &str, specialty: &str, center_id: i64) -> Doctor {
    Doctor {
        id,
        name: name.into(),
        specialty: specialty.into(),
        center_id: Some(center_id),
    }
}

pub fn dr_x() -> Doctor {
    doctor(7, "Dr. X", "Cardiología", 1)
}

pub fn dra_y() -> Doctor {
    doctor(8, "Dra. Y", "Dermatología", 1)
}

pub fn dr_z() -> Doctor {
    doctor(9, "Dr. Z", "Pediatría", 2)
}

/// Backend row for the doctor agenda.
pub fn agenda_record(id: i64, date: &str, status: &str) -> AppointmentRecord {
    AppointmentRecord {
        id: Some(id),
        doctor_id: Some(7),
        patient_id: Some(42),
        center_id: Some(1),
        appointment_date: Some(date.into()),
        status: Some(status.into()),
        patient_name: Some("Ana Ruiz".into()),
        patient: None,
        doctor_name: Some("Dr. X".into()),
        specialty: Some("Cardiología".into()),
        center_name: Some("Centro A".into()),
        center_address: Some("Calle Mayor 1".into()),
        reason: None,
    }
}

pub fn patient_profile() -> UserProfile {
    UserProfile {
        id: Some(42),
        first_name: Some("Ana".into()),
        last_name: Some("Ruiz".into()),
        ..Default::default()
    }
}

pub fn doctor_profile() -> UserProfile {
    UserProfile {
        id: Some(7),
        first_name: Some("Luis".into()),
        last_name: Some("Pérez".into()),
        specialty: Some("Cardiología".into()),
        ..Default::default()
    }
}

/// Store holding a signed-in session for `role` with `profile` cached.
pub fn signed_in_store(role: Role, profile: &UserProfile) -> MemoryStore {
    let store = MemoryStore::new();
    store.set(keys::JWT_TOKEN, "token-123");
    store.set(keys::USER_ROLE, role.as_str());
    store.set(
        keys::CURRENT_USER,
        &serde_json::to_string(profile).expect("profile serializes"),
    );
    store
}

pub fn config() -> ClinicConfig {
    ClinicConfig::default()
}

/// Wednesday 15 October 2025.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 15).unwrap()
}

/// Monday 20 October 2025.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 20).unwrap()
}

pub fn slot(hhmm: &str) -> shared_types::Slot {
    hhmm.parse().expect("valid slot")
}
