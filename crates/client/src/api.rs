//! REST client for the clinic backend.
//!
//! [`ClinicApi`] is the seam the dashboard controllers depend on; tests swap
//! in a recording mock, the app uses [`HttpClinicApi`]. Each operation is a
//! single HTTP call. Nothing is retried.

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared_types::{
    ApiResult, AppError, AppointmentRecord, ClinicConfig, CreateAppointmentRequest, Doctor,
    HealthCenter, LoginRequest, LoginResponse, RegisterRequest, Role, SeedCentersRequest,
    SeedCentersResponse, SetDoctorCenterRequest, UpdateAppointmentRequest, UpdateStatusRequest,
    UserProfile,
};

use crate::storage::{keys, KeyValueStore};

pub const MISSING_TOKEN: &str = "No estás autenticado. Falta token.";
const SESSION_EXPIRED: &str = "Tu sesión ha expirado. Inicia sesión de nuevo.";

#[allow(async_fn_in_trait)]
pub trait ClinicApi {
    /// `POST /api/login/{role}`
    async fn authenticate(&self, role: Role, credentials: &LoginRequest) -> ApiResult<LoginResponse>;
    /// `POST /api/register/{role}`
    async fn register(&self, role: Role, payload: &RegisterRequest) -> ApiResult<()>;
    /// `GET /api/protected/{role}`
    async fn fetch_session_profile(&self, role: Role) -> ApiResult<UserProfile>;
    async fn list_centers(&self) -> ApiResult<Vec<HealthCenter>>;
    async fn list_doctors(&self) -> ApiResult<Vec<Doctor>>;
    async fn seed_centers(&self) -> ApiResult<SeedCentersResponse>;
    async fn list_appointments_for_doctor(&self) -> ApiResult<Vec<AppointmentRecord>>;
    async fn create_appointment(
        &self,
        payload: &CreateAppointmentRequest,
    ) -> ApiResult<AppointmentRecord>;
    async fn update_appointment(&self, id: i64, payload: &UpdateAppointmentRequest)
        -> ApiResult<()>;
    async fn cancel_appointment(&self, id: i64) -> ApiResult<()>;
    async fn update_appointment_status(
        &self,
        id: i64,
        payload: &UpdateStatusRequest,
    ) -> ApiResult<()>;
    async fn set_doctor_center(&self, center_id: i64) -> ApiResult<()>;
}

/// [`ClinicApi`] over HTTP. The bearer token is read from `store` on every
/// protected call, so a logout elsewhere takes effect immediately.
#[derive(Debug, Clone)]
pub struct HttpClinicApi<S> {
    base_url: String,
    seed_source_url: Option<String>,
    http: reqwest::Client,
    store: S,
}

impl<S: KeyValueStore> HttpClinicApi<S> {
    pub fn new(base_url: impl Into<String>, store: S) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            seed_source_url: None,
            http: reqwest::Client::new(),
            store,
        }
    }

    pub fn from_config(config: &ClinicConfig, store: S) -> Self {
        Self {
            seed_source_url: config.api.seed_source_url.clone(),
            ..Self::new(config.api.base_url.clone(), store)
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn token(&self) -> ApiResult<String> {
        self.store
            .get(keys::JWT_TOKEN)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::unauthorized(MISSING_TOKEN))
    }

    fn authed(&self, builder: RequestBuilder) -> ApiResult<RequestBuilder> {
        Ok(builder.bearer_auth(self.token()?))
    }

    /// Send and return the raw body of a 2xx response.
    async fn execute(&self, builder: RequestBuilder, operation: &'static str) -> ApiResult<String> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Request failed");
            AppError::network(format!("No se pudo conectar con el servidor: {}", e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Failed to read response body");
            AppError::network(format!("Respuesta incompleta del servidor: {}", e))
        })?;

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(operation, "Backend rejected credentials");
            return Err(AppError::unauthorized(
                AppError::backend_message(&body).unwrap_or_else(|| SESSION_EXPIRED.to_string()),
            ));
        }

        if !status.is_success() {
            let message = AppError::backend_message(&body)
                .unwrap_or_else(|| format!("Error del servidor ({})", status.as_u16()));
            tracing::error!(operation, status = status.as_u16(), message = %message, "Backend error");
            return Err(AppError::backend(status.as_u16(), message));
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        operation: &'static str,
    ) -> ApiResult<T> {
        let body = self.execute(builder, operation).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(operation, error = %e, "Unexpected response shape");
            AppError::internal(format!("Respuesta inesperada del servidor: {}", e))
        })
    }
}

impl<S: KeyValueStore> ClinicApi for HttpClinicApi<S> {
    #[tracing::instrument(skip(self, credentials, role), fields(role = role.as_str()))]
    async fn authenticate(&self, role: Role, credentials: &LoginRequest) -> ApiResult<LoginResponse> {
        let req = self
            .http
            .post(self.url(&format!("login/{}", role.as_str())))
            .json(credentials);
        self.send_json(req, "authenticate").await
    }

    #[tracing::instrument(skip(self, payload, role), fields(role = role.as_str()))]
    async fn register(&self, role: Role, payload: &RegisterRequest) -> ApiResult<()> {
        let req = self
            .http
            .post(self.url(&format!("register/{}", role.as_str())))
            .json(&payload.payload());
        self.execute(req, "register").await?;
        tracing::info!("Registration accepted");
        Ok(())
    }

    #[tracing::instrument(skip(self, role), fields(role = role.as_str()))]
    async fn fetch_session_profile(&self, role: Role) -> ApiResult<UserProfile> {
        let req = self.authed(
            self.http
                .get(self.url(&format!("protected/{}", role.as_str()))),
        )?;
        self.send_json(req, "fetch_session_profile").await
    }

    #[tracing::instrument(skip(self))]
    async fn list_centers(&self) -> ApiResult<Vec<HealthCenter>> {
        let req = self.http.get(self.url("centers"));
        self.send_json(req, "list_centers").await
    }

    #[tracing::instrument(skip(self))]
    async fn list_doctors(&self) -> ApiResult<Vec<Doctor>> {
        let req = self.http.get(self.url("doctors"));
        self.send_json(req, "list_doctors").await
    }

    #[tracing::instrument(skip(self))]
    async fn seed_centers(&self) -> ApiResult<SeedCentersResponse> {
        let body = SeedCentersRequest {
            url: self.seed_source_url.clone(),
        };
        let req = self
            .http
            .post(self.url("centers/seed/navarra"))
            .json(&body);
        let response: SeedCentersResponse = self.send_json(req, "seed_centers").await?;
        tracing::info!(inserted = response.inserted, "Center seed finished");
        Ok(response)
    }

    #[tracing::instrument(skip(self))]
    async fn list_appointments_for_doctor(&self) -> ApiResult<Vec<AppointmentRecord>> {
        let req = self.authed(self.http.get(self.url("doctor/appointments")))?;
        self.send_json(req, "list_appointments_for_doctor").await
    }

    #[tracing::instrument(skip(self, payload), fields(doctor_id = payload.doctor_id, center_id = payload.center_id))]
    async fn create_appointment(
        &self,
        payload: &CreateAppointmentRequest,
    ) -> ApiResult<AppointmentRecord> {
        let req = self.authed(self.http.post(self.url("appointment")).json(payload))?;
        let record: AppointmentRecord = self.send_json(req, "create_appointment").await?;
        tracing::info!(appointment_id = ?record.id, "Appointment created");
        Ok(record)
    }

    #[tracing::instrument(skip(self, payload))]
    async fn update_appointment(
        &self,
        id: i64,
        payload: &UpdateAppointmentRequest,
    ) -> ApiResult<()> {
        let req = self.authed(
            self.http
                .put(self.url(&format!("appointment/{}", id)))
                .json(payload),
        )?;
        self.execute(req, "update_appointment").await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_appointment(&self, id: i64) -> ApiResult<()> {
        let req = self.authed(self.http.put(self.url(&format!("appointment/{}/cancel", id))))?;
        self.execute(req, "cancel_appointment").await?;
        tracing::info!(appointment_id = id, "Appointment cancelled");
        Ok(())
    }

    #[tracing::instrument(skip(self, payload), fields(status = %payload.status))]
    async fn update_appointment_status(
        &self,
        id: i64,
        payload: &UpdateStatusRequest,
    ) -> ApiResult<()> {
        let req = self.authed(
            self.http
                .put(self.url(&format!("appointment/{}", id)))
                .json(payload),
        )?;
        self.execute(req, "update_appointment_status").await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn set_doctor_center(&self, center_id: i64) -> ApiResult<()> {
        let body = SetDoctorCenterRequest { center_id };
        let req = self.authed(self.http.put(self.url("doctor/center")).json(&body))?;
        self.execute(req, "set_doctor_center").await?;
        Ok(())
    }
}
