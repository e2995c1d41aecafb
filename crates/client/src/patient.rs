//! Patient dashboard state and operations.

use chrono::NaiveDate;
use futures::future::join;
use shared_types::{
    available_hours, is_weekend, month_grid, sort_chronologically, ApiResult, AppError,
    Appointment, AppointmentStatus, CenterInfo, ClinicConfig, CreateAppointmentRequest, Doctor,
    HealthCenter, MonthBounds, MonthGrid, Slot, UpdateAppointmentRequest, UserProfile,
    WorkingHours, YearMonth,
};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::api::ClinicApi;
use crate::auth;
use crate::navigation::{PatientNavigation, View};
use crate::storage::{keys, read_json, write_json, KeyValueStore};

/// What the welcome panel should tell the patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WelcomeNotice {
    ApiError(String),
    Loading,
    CenterRequired,
    DoctorRequired,
    Ready,
}

#[derive(Debug, Clone)]
pub struct PatientDashboard<A, S> {
    api: A,
    store: S,
    hours: WorkingHours,
    bounds: MonthBounds,
    today: NaiveDate,
    profile: UserProfile,
    centers: Vec<HealthCenter>,
    doctors: Vec<Doctor>,
    loading: bool,
    api_error: Option<String>,
    selected_center: Option<HealthCenter>,
    selected_doctor: Option<Doctor>,
    selected_specialty: Option<String>,
    appointments: Vec<Appointment>,
    nav: PatientNavigation,
    visible_month: YearMonth,
    selected_date: Option<NaiveDate>,
    selected_slot: Option<Slot>,
    last_confirmed: Option<Appointment>,
}

impl<A: ClinicApi, S: KeyValueStore> PatientDashboard<A, S> {
    /// Build from the cached profile and the persisted center/doctor choice.
    pub fn new(api: A, store: S, config: &ClinicConfig, today: NaiveDate) -> Self {
        let profile: UserProfile = read_json(&store, keys::CURRENT_USER).unwrap_or_default();
        let selected_center = read_json(&store, keys::SELECTED_CENTER);
        let selected_doctor = read_json(&store, keys::SELECTED_DOCTOR);
        Self {
            hours: config.schedule.working_hours(),
            bounds: MonthBounds::patient(today, config.schedule.last_bookable_year),
            today,
            profile,
            centers: Vec::new(),
            doctors: Vec::new(),
            loading: true,
            api_error: None,
            selected_center,
            selected_doctor,
            selected_specialty: None,
            appointments: Vec::new(),
            nav: PatientNavigation::new(config.navigation.max_depth),
            visible_month: YearMonth::of(today),
            selected_date: None,
            selected_slot: None,
            last_confirmed: None,
            api,
            store,
        }
    }

    // --- accessors ---

    pub fn patient_name(&self) -> String {
        self.profile.full_name()
    }

    pub fn patient_id(&self) -> Option<i64> {
        self.profile.user_id()
    }

    pub fn centers(&self) -> &[HealthCenter] {
        &self.centers
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn api_error(&self) -> Option<&str> {
        self.api_error.as_deref()
    }

    pub fn selected_center(&self) -> Option<&HealthCenter> {
        self.selected_center.as_ref()
    }

    pub fn selected_doctor(&self) -> Option<&Doctor> {
        self.selected_doctor.as_ref()
    }

    pub fn selected_specialty(&self) -> Option<&str> {
        self.selected_specialty.as_deref()
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn current_view(&self) -> &View {
        self.nav.current()
    }

    pub fn navigation(&self) -> &PatientNavigation {
        &self.nav
    }

    pub fn rescheduling(&self) -> Option<&Appointment> {
        let id = self.nav.rescheduling()?;
        self.appointments.iter().find(|a| a.local_id == id)
    }

    pub fn visible_month(&self) -> YearMonth {
        self.visible_month
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn selected_slot(&self) -> Option<Slot> {
        self.selected_slot
    }

    /// The appointment confirmed by the last successful booking, until the
    /// patient picks another day or slot.
    pub fn last_confirmed(&self) -> Option<&Appointment> {
        self.last_confirmed.as_ref()
    }

    // --- reference data ---

    /// Fetch centers and doctors together. A persisted center that no longer
    /// exists is dropped along with the doctor.
    #[tracing::instrument(skip(self))]
    pub async fn load_reference_data(&mut self) -> ApiResult<()> {
        self.loading = true;
        self.api_error = None;
        let fetched = self.fetch_reference_data().await;
        self.apply_reference_data(fetched)
    }

    /// The network half of [`Self::load_reference_data`]. Leaves the
    /// dashboard untouched so the UI can keep reacting while it runs.
    pub async fn fetch_reference_data(&self) -> ApiResult<(Vec<HealthCenter>, Vec<Doctor>)> {
        let (centers, doctors) = join(self.api.list_centers(), self.api.list_doctors()).await;
        Ok((centers?, doctors?))
    }

    /// Store fetched reference data without touching navigation or the
    /// current day and slot choice.
    pub fn apply_reference_data(
        &mut self,
        fetched: ApiResult<(Vec<HealthCenter>, Vec<Doctor>)>,
    ) -> ApiResult<()> {
        self.loading = false;
        let (centers, doctors) = match fetched {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load centers and doctors");
                self.api_error = Some(e.message.clone());
                return Err(e);
            }
        };

        tracing::info!(centers = centers.len(), doctors = doctors.len(), "Reference data loaded");
        self.api_error = None;
        self.centers = centers;
        self.doctors = doctors;

        if let Some(selected) = &self.selected_center {
            if !self.centers.iter().any(|c| c.id == selected.id) {
                tracing::warn!(center_id = selected.id, "Stored center no longer exists");
                self.set_center(None);
                self.set_doctor(None);
            }
        }
        Ok(())
    }

    fn set_center(&mut self, center: Option<HealthCenter>) {
        write_json(&self.store, keys::SELECTED_CENTER, center.as_ref());
        self.selected_center = center;
    }

    fn set_doctor(&mut self, doctor: Option<Doctor>) {
        write_json(&self.store, keys::SELECTED_DOCTOR, doctor.as_ref());
        self.selected_doctor = doctor;
    }

    pub fn welcome_notice(&self) -> WelcomeNotice {
        if let Some(e) = &self.api_error {
            return WelcomeNotice::ApiError(e.clone());
        }
        if self.loading {
            return WelcomeNotice::Loading;
        }
        if self.selected_center.is_none() {
            return WelcomeNotice::CenterRequired;
        }
        if self.selected_doctor.is_none() {
            return WelcomeNotice::DoctorRequired;
        }
        WelcomeNotice::Ready
    }

    // --- selection ---

    pub fn select_center(&mut self, center_id: i64) -> ApiResult<()> {
        let center = self
            .centers
            .iter()
            .find(|c| c.id == center_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Centro no encontrado."))?;
        tracing::info!(center_id, "Center selected");
        self.set_center(Some(center));
        self.set_doctor(None);
        self.selected_specialty = None;
        self.navigate(View::SelectDoctor);
        Ok(())
    }

    pub fn doctors_for_selected_center(&self) -> Vec<&Doctor> {
        let Some(center) = &self.selected_center else {
            return Vec::new();
        };
        self.doctors
            .iter()
            .filter(|d| d.center_id == Some(center.id))
            .collect()
    }

    /// Unique specialties offered at the selected center, sorted.
    pub fn specialties_for_selected_center(&self) -> Vec<String> {
        self.doctors_for_selected_center()
            .into_iter()
            .map(|d| d.specialty.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn doctor_for_specialty(&self, specialty: &str) -> Option<&Doctor> {
        self.doctors_for_selected_center()
            .into_iter()
            .find(|d| d.specialty == specialty)
    }

    /// Pick a specialty and provisionally take its first doctor. Returns the
    /// doctor, if the center has one for it.
    pub fn choose_specialty(&mut self, specialty: &str) -> Option<Doctor> {
        self.selected_specialty = Some(specialty.to_string()).filter(|s| !s.is_empty());
        let doctor = self.doctor_for_specialty(specialty).cloned();
        self.set_doctor(doctor.clone());
        doctor
    }

    pub fn select_doctor(&mut self, doctor_id: i64) -> ApiResult<()> {
        let doctor = self
            .doctors
            .iter()
            .find(|d| d.id == doctor_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Médico no encontrado."))?;
        tracing::info!(doctor_id, "Doctor selected");
        self.selected_specialty = Some(doctor.specialty.clone());
        self.set_doctor(Some(doctor));
        self.navigate(View::BookAppointment);
        Ok(())
    }

    // --- navigation ---

    pub fn navigate(&mut self, requested: View) -> &View {
        self.nav.navigate(
            requested,
            self.selected_center.is_some(),
            self.selected_doctor.is_some(),
        )
    }

    pub fn navigate_path(&mut self, path: &str) -> &View {
        self.navigate(View::from_path(path))
    }

    pub fn go_back(&mut self) -> &View {
        self.nav.go_back()
    }

    // --- calendar ---

    pub fn can_go_prev_month(&self) -> bool {
        self.bounds.can_go_prev(self.visible_month)
    }

    pub fn can_go_next_month(&self) -> bool {
        self.bounds.can_go_next(self.visible_month)
    }

    pub fn prev_month(&mut self) -> bool {
        if !self.can_go_prev_month() {
            return false;
        }
        self.visible_month = self.visible_month.prev();
        self.clear_day();
        true
    }

    pub fn next_month(&mut self) -> bool {
        if !self.can_go_next_month() {
            return false;
        }
        self.visible_month = self.visible_month.next();
        self.clear_day();
        true
    }

    fn clear_day(&mut self) {
        self.selected_date = None;
        self.selected_slot = None;
        self.last_confirmed = None;
    }

    /// Weekends and past days are rejected and clear the current choice.
    pub fn select_date(&mut self, date: NaiveDate) -> ApiResult<()> {
        self.clear_day();
        if is_weekend(date) {
            return Err(AppError::invalid("Los fines de semana no hay consultas."));
        }
        if date < self.today {
            return Err(AppError::invalid("No se pueden reservar días pasados."));
        }
        self.selected_date = Some(date);
        Ok(())
    }

    pub fn select_slot(&mut self, slot: Slot) -> ApiResult<()> {
        if !self.available_hours().contains(&slot) {
            return Err(AppError::invalid("Esa hora ya no está disponible."));
        }
        self.selected_slot = Some(slot);
        self.last_confirmed = None;
        Ok(())
    }

    /// Free slots for the selected date at the selected center.
    pub fn available_hours(&self) -> Vec<Slot> {
        let center = self
            .selected_center
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("");
        available_hours(self.selected_date, center, &self.active_appointments(), &self.hours)
    }

    fn active_appointments(&self) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|a| a.is_active())
            .cloned()
            .collect()
    }

    pub fn month_grid(&self) -> MonthGrid {
        let booked: BTreeSet<NaiveDate> = self
            .appointments
            .iter()
            .filter(|a| a.is_active())
            .map(|a| a.date)
            .collect();
        let center = self
            .selected_center
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let active = self.active_appointments();
        month_grid(
            self.visible_month,
            self.today,
            self.selected_date,
            &booked,
            |d| !available_hours(Some(d), &center, &active, &self.hours).is_empty(),
        )
    }

    // --- booking ---

    /// Create the appointment, or move the one being rescheduled.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_booking(&mut self) -> ApiResult<Appointment> {
        let date = self
            .selected_date
            .ok_or_else(|| AppError::invalid("Selecciona un día para la cita."))?;
        if is_weekend(date) {
            return Err(AppError::invalid("Los fines de semana no hay consultas."));
        }
        let slot = self
            .selected_slot
            .ok_or_else(|| AppError::invalid("Selecciona una hora para la cita."))?;
        let center = self
            .selected_center
            .clone()
            .ok_or_else(|| AppError::invalid("Selecciona un centro de salud."))?;
        let doctor = self
            .selected_doctor
            .clone()
            .ok_or_else(|| AppError::invalid("Selecciona un médico."))?;
        if !self.available_hours().contains(&slot) {
            return Err(AppError::invalid("Esa hora ya no está disponible."));
        }

        let appointment_date = shared_types::api_date_string(date, slot);

        let confirmed = match self.nav.rescheduling() {
            Some(local_id) => {
                let index = self
                    .appointments
                    .iter()
                    .position(|a| a.local_id == local_id)
                    .ok_or_else(|| AppError::integrity("La cita a reagendar ya no existe."))?;
                let remote_id = self.appointments[index].remote_id.ok_or_else(|| {
                    AppError::integrity(
                        "No se puede modificar una cita que no tiene un ID de la API.",
                    )
                })?;
                let payload = UpdateAppointmentRequest {
                    appointment_date,
                    doctor_id: Some(doctor.id),
                    center_id: None,
                };
                self.api.update_appointment(remote_id, &payload).await?;

                let appt = &mut self.appointments[index];
                appt.date = date;
                appt.slot = slot;
                self.nav.set_rescheduling(None);
                tracing::info!(appointment_id = remote_id, "Appointment rescheduled");
                appt.clone()
            }
            None => {
                let payload = CreateAppointmentRequest {
                    doctor_id: doctor.id,
                    patient_id: self.patient_id(),
                    center_id: center.id,
                    appointment_date,
                };
                let record = self.api.create_appointment(&payload).await?;
                let appt = Appointment {
                    local_id: Uuid::new_v4(),
                    remote_id: record.id,
                    patient: self.patient_name(),
                    center: CenterInfo::from(&center),
                    doctor: doctor.name.clone(),
                    doctor_id: Some(doctor.id),
                    specialty: doctor.specialty.clone(),
                    date,
                    slot,
                    status: AppointmentStatus::Pending,
                    reason: None,
                };
                self.appointments.push(appt.clone());
                match record.id {
                    Some(id) => tracing::info!(appointment_id = id, "Appointment booked"),
                    None => tracing::warn!("Appointment booked without a backend id"),
                }
                appt
            }
        };

        self.selected_slot = None;
        self.last_confirmed = Some(confirmed.clone());
        Ok(confirmed)
    }

    /// Enter reschedule mode for `local_id` and jump to the booking view with
    /// the original center and doctor selected.
    pub fn start_reschedule(&mut self, local_id: Uuid) -> ApiResult<()> {
        let original = self
            .appointments
            .iter()
            .find(|a| a.local_id == local_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Cita no encontrada."))?;

        let center = self
            .centers
            .iter()
            .find(|c| c.name == original.center.name)
            .cloned();
        let doctor = self
            .doctors
            .iter()
            .find(|d| d.name == original.doctor && d.specialty == original.specialty)
            .cloned();

        let (Some(center), Some(doctor)) = (center, doctor) else {
            self.nav.set_rescheduling(None);
            return Err(AppError::not_found(
                "No se pudo encontrar el doctor o centro original para reagendar.",
            ));
        };

        self.set_center(Some(center));
        self.selected_specialty = Some(doctor.specialty.clone());
        self.set_doctor(Some(doctor));
        self.clear_day();
        self.visible_month = YearMonth::of(original.date.max(self.today));
        self.navigate(View::BookAppointment);
        self.nav.set_rescheduling(Some(local_id));
        Ok(())
    }

    pub fn cancel_reschedule(&mut self) {
        self.nav.set_rescheduling(None);
    }

    #[tracing::instrument(skip(self))]
    pub async fn cancel(&mut self, local_id: Uuid) -> ApiResult<()> {
        let index = self
            .appointments
            .iter()
            .position(|a| a.local_id == local_id)
            .ok_or_else(|| AppError::not_found("Cita no encontrada."))?;
        let remote_id = self.appointments[index].remote_id.ok_or_else(|| {
            AppError::integrity("No se puede cancelar esta cita (falta ID de API).")
        })?;

        self.api.cancel_appointment(remote_id).await?;
        self.appointments.remove(index);
        self.nav.show(View::ManageAppointments);
        tracing::info!(appointment_id = remote_id, "Appointment removed from list");
        Ok(())
    }

    pub fn sorted_appointments(&self) -> Vec<Appointment> {
        sort_chronologically(&self.appointments)
    }

    /// End the session and forget the center/doctor choice.
    pub fn logout(&mut self) {
        auth::logout(&self.store);
        self.store.remove(keys::SELECTED_CENTER);
        self.store.remove(keys::SELECTED_DOCTOR);
        self.selected_center = None;
        self.selected_doctor = None;
    }
}
