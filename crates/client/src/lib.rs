pub mod api;
pub mod auth;
pub mod config;
pub mod navigation;
pub mod storage;

// Dashboard controllers
pub mod doctor;
pub mod patient;

pub use api::{ClinicApi, HttpClinicApi};
pub use doctor::DoctorDashboard;
pub use navigation::{DoctorView, MenuLink, MenuSection, PatientNavigation, View, ViewStack};
pub use patient::{PatientDashboard, WelcomeNotice};
pub use storage::{DefaultStore, KeyValueStore, MemoryStore};
