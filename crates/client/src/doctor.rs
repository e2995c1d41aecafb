//! Doctor dashboard state and operations.

use chrono::NaiveDate;
use futures::future::join;
use shared_types::{
    day_key, is_weekend, month_grid, ApiResult, AppError, Appointment, AppointmentRecord,
    AppointmentStatus, ClinicConfig, HealthCenter, MonthGrid, StatusConfirmation,
    UpdateStatusRequest, UserProfile, YearMonth,
};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::api::ClinicApi;
use crate::auth;
use crate::navigation::DoctorView;
use crate::storage::{keys, read_json, write_json, KeyValueStore};

#[derive(Debug, Clone)]
pub struct DoctorDashboard<A, S> {
    api: A,
    store: S,
    confirmation: StatusConfirmation,
    today: NaiveDate,
    profile: UserProfile,
    centers: Vec<HealthCenter>,
    work_center: Option<HealthCenter>,
    appointments: Vec<Appointment>,
    visible_month: YearMonth,
    selected_day: Option<NaiveDate>,
    loading: bool,
    api_error: Option<String>,
    view: DoctorView,
}

impl<A: ClinicApi, S: KeyValueStore> DoctorDashboard<A, S> {
    /// Requires a cached profile; without one the caller should send the
    /// user to the login page.
    pub fn new(api: A, store: S, config: &ClinicConfig, today: NaiveDate) -> ApiResult<Self> {
        let profile: UserProfile = read_json(&store, keys::CURRENT_USER)
            .ok_or_else(|| AppError::unauthorized("Inicia sesión para ver tu agenda."))?;
        let work_center = profile
            .work_center()
            .or_else(|| read_json(&store, keys::DOCTOR_CENTER));

        Ok(Self {
            confirmation: config.doctor.status_confirmation,
            today,
            profile,
            centers: Vec::new(),
            work_center,
            appointments: Vec::new(),
            visible_month: YearMonth::of(today),
            selected_day: (!is_weekend(today)).then_some(today),
            loading: true,
            api_error: None,
            view: DoctorView::Agenda,
            api,
            store,
        })
    }

    /// `"Dr. Luis Pérez"`
    pub fn display_name(&self) -> String {
        format!("{} {}", self.profile.title(), self.profile.full_name())
    }

    pub fn specialty(&self) -> String {
        self.profile.specialty()
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn centers(&self) -> &[HealthCenter] {
        &self.centers
    }

    pub fn work_center(&self) -> Option<&HealthCenter> {
        self.work_center.as_ref()
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn api_error(&self) -> Option<&str> {
        self.api_error.as_deref()
    }

    pub fn confirmation(&self) -> StatusConfirmation {
        self.confirmation
    }

    pub fn view(&self) -> &DoctorView {
        &self.view
    }

    pub fn open_path(&mut self, path: &str) {
        self.view = DoctorView::from_path(path);
    }

    /// Fetch centers and this doctor's appointments together.
    #[tracing::instrument(skip(self))]
    pub async fn load(&mut self) -> ApiResult<()> {
        self.loading = true;
        self.api_error = None;
        let fetched = self.fetch_agenda().await;
        self.apply_agenda(fetched)
    }

    /// The network half of [`Self::load`]; the dashboard is not modified.
    pub async fn fetch_agenda(&self) -> ApiResult<(Vec<HealthCenter>, Vec<AppointmentRecord>)> {
        let (centers, records) = join(
            self.api.list_centers(),
            self.api.list_appointments_for_doctor(),
        )
        .await;
        Ok((centers?, records?))
    }

    /// Store a fetched agenda. The open view, day and work center are kept.
    pub fn apply_agenda(
        &mut self,
        fetched: ApiResult<(Vec<HealthCenter>, Vec<AppointmentRecord>)>,
    ) -> ApiResult<()> {
        self.loading = false;
        let (centers, records) = match fetched {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load doctor dashboard");
                self.api_error = Some(e.message.clone());
                return Err(e);
            }
        };

        let total = records.len();
        self.appointments = records
            .into_iter()
            .filter_map(|r| r.into_appointment())
            .collect();
        if self.appointments.len() < total {
            tracing::warn!(
                skipped = total - self.appointments.len(),
                "Ignored appointments with unreadable dates"
            );
        }
        self.api_error = None;
        self.centers = centers;
        tracing::info!(appointments = self.appointments.len(), "Agenda loaded");
        Ok(())
    }

    /// Record the work center with the backend, then locally.
    #[tracing::instrument(skip(self))]
    pub async fn select_center(&mut self, center_id: i64) -> ApiResult<()> {
        let center = self
            .centers
            .iter()
            .find(|c| c.id == center_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Centro no encontrado."))?;
        self.api.set_doctor_center(center_id).await?;
        write_json(&self.store, keys::DOCTOR_CENTER, Some(&center));
        self.work_center = Some(center);
        tracing::info!(center_id, "Work center set");
        Ok(())
    }

    pub fn clear_center(&mut self) {
        self.work_center = None;
        self.store.remove(keys::DOCTOR_CENTER);
    }

    // --- calendar ---

    pub fn visible_month(&self) -> YearMonth {
        self.visible_month
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.selected_day
    }

    pub fn prev_month(&mut self) {
        self.visible_month = self.visible_month.prev();
        self.selected_day = None;
    }

    pub fn next_month(&mut self) {
        self.visible_month = self.visible_month.next();
        self.selected_day = None;
    }

    pub fn select_day(&mut self, date: NaiveDate) -> ApiResult<()> {
        if is_weekend(date) {
            return Err(AppError::invalid("No hay consultas en fin de semana."));
        }
        self.selected_day = Some(date);
        if !self.visible_month.contains(date) {
            self.visible_month = YearMonth::of(date);
        }
        Ok(())
    }

    /// Appointments on `date`, earliest first.
    pub fn appointments_for_day(&self, date: NaiveDate) -> Vec<Appointment> {
        let key = day_key(date);
        let mut day: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|a| a.day_key() == key)
            .cloned()
            .collect();
        day.sort_by_key(|a| a.slot);
        day
    }

    pub fn days_with_appointments(&self) -> BTreeSet<NaiveDate> {
        self.appointments
            .iter()
            .filter(|a| self.visible_month.contains(a.date))
            .map(|a| a.date)
            .collect()
    }

    pub fn month_grid(&self) -> MonthGrid {
        month_grid(
            self.visible_month,
            self.today,
            self.selected_day,
            &self.days_with_appointments(),
            |_| false,
        )
    }

    // --- status workflow ---

    /// Move an appointment to `status`.
    ///
    /// Whether the backend must confirm first depends on the configured
    /// policy. When it must and the call fails, the local status is kept.
    #[tracing::instrument(skip(self))]
    pub async fn change_status(&mut self, local_id: Uuid, status: AppointmentStatus) -> ApiResult<()> {
        let index = self
            .appointments
            .iter()
            .position(|a| a.local_id == local_id)
            .ok_or_else(|| AppError::not_found("Cita no encontrada."))?;

        if self.confirmation.requires_backend(status) {
            let appt = &self.appointments[index];
            let remote_id = appt.remote_id.ok_or_else(|| {
                AppError::integrity("No se puede actualizar una cita sin ID de la API.")
            })?;
            let payload = UpdateStatusRequest {
                status,
                appointment_date: appt.api_date_string(),
            };
            self.api.update_appointment_status(remote_id, &payload).await?;
        }

        let appt = &mut self.appointments[index];
        tracing::info!(from = %appt.status, to = %status, "Appointment status changed");
        appt.status = status;
        Ok(())
    }

    /// One step along Pendiente → En consulta → Finalizada.
    pub async fn advance_status(&mut self, local_id: Uuid) -> ApiResult<Option<AppointmentStatus>> {
        let current = self
            .appointments
            .iter()
            .find(|a| a.local_id == local_id)
            .map(|a| a.status)
            .ok_or_else(|| AppError::not_found("Cita no encontrada."))?;
        let Some(next) = current.next() else {
            return Ok(None);
        };
        self.change_status(local_id, next).await?;
        Ok(Some(next))
    }

    /// End the session and forget the work center chosen on this device.
    pub fn logout(&mut self) {
        auth::logout(&self.store);
        self.store.remove(keys::DOCTOR_CENTER);
        self.work_center = None;
    }
}
