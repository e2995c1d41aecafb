use serde::{Deserialize, Serialize};

use crate::models::Slot;
use crate::schedule::WorkingHours;

/// How the doctor dashboard confirms status changes with the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusConfirmation {
    /// Every transition is sent to the backend before the local update.
    #[default]
    All,
    /// Only `Finalizada` is sent; other transitions update locally at once.
    FinalizedOnly,
}

impl StatusConfirmation {
    pub fn requires_backend(&self, status: crate::models::AppointmentStatus) -> bool {
        match self {
            StatusConfirmation::All => true,
            StatusConfirmation::FinalizedOnly => {
                status == crate::models::AppointmentStatus::Finished
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Forwarded to the backend seed endpoint when set.
    #[serde(default)]
    pub seed_source_url: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            seed_source_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleConfig {
    #[serde(default = "default_start")]
    pub start: Slot,
    #[serde(default = "default_end")]
    pub end: Slot,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    #[serde(default = "default_last_year")]
    pub last_bookable_year: i32,
}

fn default_start() -> Slot {
    WorkingHours::default().start
}

fn default_end() -> Slot {
    WorkingHours::default().end
}

fn default_slot_minutes() -> u32 {
    30
}

fn default_last_year() -> i32 {
    2030
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            end: default_end(),
            slot_minutes: default_slot_minutes(),
            last_bookable_year: default_last_year(),
        }
    }
}

impl ScheduleConfig {
    pub fn working_hours(&self) -> WorkingHours {
        WorkingHours {
            start: self.start,
            end: self.end,
            slot_minutes: self.slot_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavigationConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    10
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DoctorConfig {
    #[serde(default)]
    pub status_confirmation: StatusConfirmation,
}

/// Top-level structure of `config.toml`.
///
/// Every section and field is defaulted so a missing or partial file still
/// yields a usable configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ClinicConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub doctor: DoctorConfig,
}
