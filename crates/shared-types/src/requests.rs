use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[cfg(feature = "validation")]
use validator::Validate;

use crate::models::{Appointment, AppointmentStatus, CenterInfo, Role, Slot};

/// Credentials posted to `/api/login/{role}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct LoginRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 3, message = "Por favor, introduce credenciales válidas."))
    )]
    pub email: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))
    )]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Registration form, posted to `/api/register/{role}`.
///
/// Field-level rules live in the `Validate` derive. The rules that depend on
/// the chosen role are in [`RegisterRequest::check_role_fields`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct RegisterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Todos los campos básicos son obligatorios."))
    )]
    pub first_name: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Todos los campos básicos son obligatorios."))
    )]
    pub last_name: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Todos los campos básicos son obligatorios."))
    )]
    pub birth_date: String,
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Por favor, introduce un correo electrónico válido."))
    )]
    pub email: String,
    #[serde(rename = "phoneNumber")]
    #[cfg_attr(feature = "validation", validate(custom(function = "validate_phone")))]
    pub phone_number: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))
    )]
    pub password: String,
    #[serde(skip_serializing, default)]
    #[cfg_attr(
        feature = "validation",
        validate(must_match(
            other = "password",
            message = "Las contraseñas no coinciden. Por favor, revísalas."
        ))
    )]
    pub confirm_password: String,
    #[serde(rename = "licenseNumber", skip_serializing_if = "Option::is_none", default)]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub specialty: Option<String>,
}

impl RegisterRequest {
    /// Role selection and the doctor-only fields.
    ///
    /// Returns the message to show, or `None` when the form is consistent.
    pub fn check_role_fields(&self) -> Option<&'static str> {
        match self.role {
            None => Some("Debes seleccionar si eres Médico o Paciente."),
            Some(Role::Doctor) => {
                let license_ok = self
                    .license_number
                    .as_deref()
                    .is_some_and(|l| l.len() == 9 && l.chars().all(|c| c.is_ascii_digit()));
                if !license_ok {
                    return Some("El Número de Matrícula debe tener exactamente 9 dígitos.");
                }
                if self.specialty.as_deref().map(str::trim).unwrap_or("").chars().count() < 3 {
                    return Some("Por favor, introduce la especialidad médica.");
                }
                None
            }
            Some(Role::Patient) => None,
        }
    }

    /// Copy sent over the wire: doctor fields are dropped for patients.
    pub fn payload(&self) -> RegisterRequest {
        let mut out = self.clone();
        if out.role != Some(Role::Doctor) {
            out.license_number = None;
            out.specialty = None;
        }
        out
    }
}

#[cfg(feature = "validation")]
fn validate_phone(phone: &str) -> Result<(), validator::ValidationError> {
    if phone.len() >= 9 && phone.chars().all(|c| c.is_ascii_digit()) {
        return Ok(());
    }
    let mut err = validator::ValidationError::new("phone");
    err.message = Some("Por favor, introduce un número de teléfono válido (mín. 9 dígitos).".into());
    Err(err)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateAppointmentRequest {
    pub doctor_id: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub patient_id: Option<i64>,
    pub center_id: i64,
    /// `day-month-year hour:minute`
    pub appointment_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateAppointmentRequest {
    pub appointment_date: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub doctor_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub center_id: Option<i64>,
}

/// Status change. The backend re-parses `appointment_date` on every update,
/// so the current value is always sent along.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
    pub appointment_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetDoctorCenterRequest {
    pub center_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SeedCentersRequest {
    /// Source dataset; the backend uses its own default when absent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SeedCentersResponse {
    #[serde(default)]
    pub inserted: usize,
    #[serde(default)]
    pub message: Option<String>,
}

/// An appointment row as the backend returns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentRecord {
    /// Absent when the backend acknowledged a create without echoing the row.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub center_id: Option<i64>,
    #[serde(default)]
    pub appointment_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub patient: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub center_name: Option<String>,
    #[serde(default)]
    pub center_address: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl AppointmentRecord {
    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        self.appointment_date.as_deref().and_then(parse_backend_datetime)
    }

    /// Convert into the dashboard model. `None` when the date is unreadable.
    pub fn into_appointment(self) -> Option<Appointment> {
        let at = self.scheduled_at()?;
        Some(Appointment {
            local_id: uuid::Uuid::new_v4(),
            remote_id: self.id,
            patient: self
                .patient_name
                .or(self.patient)
                .unwrap_or_else(|| "Paciente".to_string()),
            center: CenterInfo {
                id: self.center_id,
                name: self.center_name.unwrap_or_default(),
                address: self.center_address.unwrap_or_default(),
            },
            doctor: self.doctor_name.unwrap_or_default(),
            doctor_id: self.doctor_id,
            specialty: self.specialty.unwrap_or_default(),
            date: at.date(),
            slot: Slot::from_time(at.time()),
            status: self
                .status
                .as_deref()
                .map(AppointmentStatus::from_str_or_default)
                .unwrap_or_default(),
            reason: self.reason,
        })
    }
}

/// Parse the date formats the backend has been seen to emit.
pub fn parse_backend_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ["%d-%m-%Y %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| raw.parse::<NaiveDateTime>().ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.naive_local()))
        .or_else(|| DateTime::parse_from_rfc2822(raw).ok().map(|d| d.naive_local()))
}
