use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::calendar::month_name_es;

/// Which dashboard a user belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Patient,
}

impl Role {
    /// Parse a role label. Accepts the Spanish `paciente` as well.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "doctor" | "medico" | "médico" => Some(Role::Doctor),
            "patient" | "paciente" => Some(Role::Patient),
            _ => None,
        }
    }

    /// Lowercase form used in API paths and persisted storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Patient => "patient",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Doctor => "Médico",
            Role::Patient => "Paciente",
        }
    }
}

/// Lifecycle of an appointment as shown on both dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppointmentStatus {
    #[default]
    Pending,
    InConsultation,
    Finished,
    NoShow,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Pending,
        AppointmentStatus::InConsultation,
        AppointmentStatus::Finished,
        AppointmentStatus::NoShow,
        AppointmentStatus::Cancelled,
    ];

    /// Display label, also the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pendiente",
            AppointmentStatus::InConsultation => "En consulta",
            AppointmentStatus::Finished => "Finalizada",
            AppointmentStatus::NoShow => "Ausente",
            AppointmentStatus::Cancelled => "Cancelada",
        }
    }

    /// Parse a Spanish label or an English backend value. Unknown values
    /// default to `Pending`.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "en consulta" | "in_progress" | "in progress" => AppointmentStatus::InConsultation,
            "finalizada" | "completed" | "finished" | "done" => AppointmentStatus::Finished,
            "ausente" | "no_show" | "no-show" | "absent" => AppointmentStatus::NoShow,
            "cancelada" | "cancelled" | "canceled" => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Pending,
        }
    }

    /// Next step of the consultation progression offered as a one-click action.
    pub fn next(&self) -> Option<Self> {
        match self {
            AppointmentStatus::Pending => Some(AppointmentStatus::InConsultation),
            AppointmentStatus::InConsultation => Some(AppointmentStatus::Finished),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }

    /// CSS modifier for status pills.
    pub fn css_class(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "status-pending",
            AppointmentStatus::InConsultation => "status-in-progress",
            AppointmentStatus::Finished => "status-completed",
            AppointmentStatus::NoShow => "status-no-show",
            AppointmentStatus::Cancelled => "status-cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AppointmentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AppointmentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(AppointmentStatus::from_str_or_default(&raw))
    }
}

const NO_ADDRESS: &str = "Dirección no disponible";
const NO_SPECIALTY: &str = "Especialidad no definida";

/// A health facility. Reference data, fetched once per session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "CenterRecord")]
pub struct HealthCenter {
    pub id: i64,
    pub name: String,
    pub address: String,
}

/// Backend shape of a center; `address` may be missing or null.
#[derive(Deserialize)]
struct CenterRecord {
    id: i64,
    name: String,
    #[serde(default)]
    address: Option<String>,
}

impl From<CenterRecord> for HealthCenter {
    fn from(c: CenterRecord) -> Self {
        Self {
            id: c.id,
            name: c.name,
            address: c
                .address
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| NO_ADDRESS.to_string()),
        }
    }
}

/// A doctor working at a center. Reference data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "DoctorRecord")]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub center_id: Option<i64>,
}

/// Backend shape of a doctor. The backend only sends `last_name`; the
/// normalized form persisted in storage uses `name`.
#[derive(Deserialize)]
struct DoctorRecord {
    id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    specialty: Option<String>,
    #[serde(default)]
    center_id: Option<i64>,
    #[serde(default, rename = "centerId")]
    center_id_camel: Option<i64>,
}

impl From<DoctorRecord> for Doctor {
    fn from(d: DoctorRecord) -> Self {
        Self {
            id: d.id,
            name: d.name.or(d.last_name).unwrap_or_default(),
            specialty: d
                .specialty
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| NO_SPECIALTY.to_string()),
            center_id: d.center_id.or(d.center_id_camel),
        }
    }
}

/// Cached profile of the logged-in user (`current_user` in storage).
///
/// The protected endpoints return the fields at the top level, older cached
/// copies nest them under `user`. Accessors look in `user` first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Box<UserProfile>>,
}

impl UserProfile {
    fn pick<T>(&self, f: impl Fn(&UserProfile) -> Option<T>) -> Option<T> {
        self.user.as_deref().and_then(&f).or_else(|| f(self))
    }

    pub fn user_id(&self) -> Option<i64> {
        self.pick(|p| p.id)
    }

    pub fn first_name(&self) -> String {
        self.pick(|p| p.first_name.clone().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| "Usuario".to_string())
    }

    pub fn last_name(&self) -> String {
        self.pick(|p| p.last_name.clone().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| "Invitado".to_string())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name(), self.last_name())
    }

    pub fn title(&self) -> String {
        self.pick(|p| p.title.clone()).unwrap_or_else(|| "Dr.".to_string())
    }

    pub fn specialty(&self) -> String {
        self.pick(|p| p.specialty.clone())
            .unwrap_or_else(|| "Especialidad".to_string())
    }

    /// The doctor's work center, when the backend included it in the profile.
    pub fn work_center(&self) -> Option<HealthCenter> {
        let id = self.pick(|p| p.center_id)?;
        let name = self.pick(|p| p.center_name.clone())?;
        Some(HealthCenter {
            id,
            name,
            address: self
                .pick(|p| p.center_address.clone())
                .unwrap_or_else(|| NO_ADDRESS.to_string()),
        })
    }
}

/// A half-hour slot start time, written `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(NaiveTime);

impl Slot {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Slot)
    }

    pub fn from_time(time: NaiveTime) -> Self {
        Slot(time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time))
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    pub fn minutes_from_midnight(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for Slot {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M").map(Slot)
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Center data copied into an appointment at booking time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CenterInfo {
    pub id: Option<i64>,
    pub name: String,
    pub address: String,
}

impl From<&HealthCenter> for CenterInfo {
    fn from(c: &HealthCenter) -> Self {
        Self {
            id: Some(c.id),
            name: c.name.clone(),
            address: c.address.clone(),
        }
    }
}

/// An appointment held in a dashboard controller's in-memory list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub local_id: Uuid,
    /// Identifier assigned by the backend. Modify and cancel need it.
    pub remote_id: Option<i64>,
    pub patient: String,
    pub center: CenterInfo,
    pub doctor: String,
    pub doctor_id: Option<i64>,
    pub specialty: String,
    pub date: NaiveDate,
    pub slot: Slot,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
}

impl Appointment {
    pub fn date_time(&self) -> NaiveDateTime {
        self.date.and_time(self.slot.time())
    }

    /// `"20 de octubre de 2025 a las 09:00 hrs"`
    pub fn formatted(&self) -> String {
        format_long_date_time(self.date, self.slot)
    }

    /// `"20/10/2025"`, the key the doctor calendar groups by.
    pub fn day_key(&self) -> String {
        day_key(self.date)
    }

    /// Date-time in the backend's `day-month-year hour:minute` form.
    pub fn api_date_string(&self) -> String {
        api_date_string(self.date, self.slot)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

pub fn day_key(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn api_date_string(date: NaiveDate, slot: Slot) -> String {
    format!("{} {}", date.format("%d-%m-%Y"), slot)
}

pub fn format_long_date(date: NaiveDate) -> String {
    use chrono::Datelike;
    format!(
        "{:02} de {} de {}",
        date.day(),
        month_name_es(date.month()).to_lowercase(),
        date.year()
    )
}

pub fn format_long_date_time(date: NaiveDate, slot: Slot) -> String {
    format!("{} a las {} hrs", format_long_date(date), slot)
}

/// Authenticated session restored from storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub profile: Option<UserProfile>,
}
