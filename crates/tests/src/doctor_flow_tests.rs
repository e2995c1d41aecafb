use client::storage::keys;
use client::{DoctorDashboard, DoctorView, KeyValueStore, MemoryStore};
use pretty_assertions::assert_eq;
use shared_types::{
    AppError, AppErrorKind, AppointmentStatus, ClinicConfig, HealthCenter, Role,
    StatusConfirmation, UpdateStatusRequest, UserProfile,
};

use crate::common::{self, Call, MockApi};

type Dashboard = DoctorDashboard<MockApi, MemoryStore>;

fn api() -> MockApi {
    MockApi::new()
        .with_centers(vec![common::centro_a(), common::centro_b()])
        .with_doctor_appointments(vec![
            common::agenda_record(11, "20-10-2025 10:30", "Pendiente"),
            common::agenda_record(12, "20-10-2025 09:00", "En consulta"),
            common::agenda_record(13, "2025-10-22 12:00:00", "completed"),
            common::agenda_record(14, "pronto", "Pendiente"),
            common::agenda_record(15, "03-11-2025 09:30", "Pendiente"),
        ])
}

fn doctor_store() -> MemoryStore {
    common::signed_in_store(Role::Doctor, &common::doctor_profile())
}

async fn loaded_with(api: MockApi, config: &ClinicConfig) -> Dashboard {
    let mut dashboard =
        DoctorDashboard::new(api, doctor_store(), config, common::today()).unwrap();
    dashboard.load().await.unwrap();
    dashboard
}

async fn loaded(api: MockApi) -> Dashboard {
    loaded_with(api, &common::config()).await
}

fn finalized_only() -> ClinicConfig {
    let mut config = common::config();
    config.doctor.status_confirmation = StatusConfirmation::FinalizedOnly;
    config
}

fn local_id_of(dashboard: &Dashboard, remote_id: i64) -> uuid::Uuid {
    dashboard
        .appointments()
        .iter()
        .find(|a| a.remote_id == Some(remote_id))
        .map(|a| a.local_id)
        .unwrap()
}

fn status_of(dashboard: &Dashboard, remote_id: i64) -> AppointmentStatus {
    dashboard
        .appointments()
        .iter()
        .find(|a| a.remote_id == Some(remote_id))
        .map(|a| a.status)
        .unwrap()
}

#[tokio::test]
async fn test_dashboard_needs_cached_profile() {
    let err = DoctorDashboard::new(MockApi::new(), MemoryStore::new(), &common::config(), common::today())
        .unwrap_err();

    assert!(err.is_auth());
}

#[tokio::test]
async fn test_load_skips_unreadable_dates() {
    let dashboard = loaded(api()).await;

    assert_eq!(dashboard.appointments().len(), 4);
    assert!(!dashboard.is_loading());
    assert_eq!(dashboard.centers().len(), 2);
    assert_eq!(dashboard.display_name(), "Dr. Luis Pérez");
    assert_eq!(dashboard.specialty(), "Cardiología");
    assert_eq!(status_of(&dashboard, 13), AppointmentStatus::Finished);
}

#[tokio::test]
async fn test_load_failure_sets_error() {
    let api = api();
    api.fail("list_appointments_for_doctor", AppError::network("Sin conexión con el servidor"));
    let mut dashboard =
        DoctorDashboard::new(api, doctor_store(), &common::config(), common::today()).unwrap();

    assert!(dashboard.load().await.is_err());
    assert_eq!(dashboard.api_error(), Some("Sin conexión con el servidor"));
    assert!(dashboard.appointments().is_empty());
}

#[tokio::test]
async fn test_day_list_is_sorted_by_slot() {
    let dashboard = loaded(api()).await;

    let day = dashboard.appointments_for_day(common::monday());

    let ids: Vec<_> = day.iter().map(|a| a.remote_id).collect();
    assert_eq!(ids, vec![Some(12), Some(11)]);
    assert!(dashboard.appointments_for_day(common::today()).is_empty());
}

#[tokio::test]
async fn test_calendar_marks_days_in_visible_month() {
    let mut dashboard = loaded(api()).await;
    let wednesday = chrono::NaiveDate::from_ymd_opt(2025, 10, 22).unwrap();

    let days: Vec<_> = dashboard.days_with_appointments().into_iter().collect();
    assert_eq!(days, vec![common::monday(), wednesday]);

    dashboard.next_month();
    assert_eq!(dashboard.days_with_appointments().len(), 1);
    assert_eq!(dashboard.selected_day(), None);
}

#[tokio::test]
async fn test_select_day_rejects_weekends() {
    let mut dashboard = loaded(api()).await;
    assert_eq!(dashboard.selected_day(), Some(common::today()));
    let sunday = chrono::NaiveDate::from_ymd_opt(2025, 10, 19).unwrap();

    let err = dashboard.select_day(sunday).unwrap_err();

    assert_eq!(err.kind, AppErrorKind::ValidationError);
    assert_eq!(dashboard.selected_day(), Some(common::today()));
}

#[tokio::test]
async fn test_select_day_in_other_month_moves_calendar() {
    let mut dashboard = loaded(api()).await;
    let november = chrono::NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();

    dashboard.select_day(november).unwrap();

    assert_eq!(dashboard.month_grid().title, "Noviembre 2025");
}

#[tokio::test]
async fn test_work_center_saved_after_backend_accepts() {
    let api = api();
    let store = doctor_store();
    let mut dashboard =
        DoctorDashboard::new(api.clone(), store.clone(), &common::config(), common::today()).unwrap();
    dashboard.load().await.unwrap();
    assert!(dashboard.work_center().is_none());

    dashboard.select_center(2).await.unwrap();

    assert_eq!(api.mutations(), vec![Call::SetDoctorCenter(2)]);
    assert_eq!(dashboard.work_center().map(|c| c.id), Some(2));
    let saved: HealthCenter =
        serde_json::from_str(&store.get(keys::DOCTOR_CENTER).unwrap()).unwrap();
    assert_eq!(saved, common::centro_b());

    dashboard.clear_center();
    assert!(dashboard.work_center().is_none());
    assert_eq!(store.get(keys::DOCTOR_CENTER), None);
}

#[tokio::test]
async fn test_work_center_not_saved_when_backend_fails() {
    let api = api();
    let store = doctor_store();
    api.fail("set_doctor_center", AppError::backend(500, "Error al asignar centro"));
    let mut dashboard =
        DoctorDashboard::new(api, store.clone(), &common::config(), common::today()).unwrap();
    dashboard.load().await.unwrap();

    assert!(dashboard.select_center(1).await.is_err());

    assert!(dashboard.work_center().is_none());
    assert_eq!(store.get(keys::DOCTOR_CENTER), None);
}

#[tokio::test]
async fn test_status_change_is_confirmed_by_backend() {
    let api = api();
    let mut dashboard = loaded(api.clone()).await;
    let id = local_id_of(&dashboard, 11);

    dashboard
        .change_status(id, AppointmentStatus::NoShow)
        .await
        .unwrap();

    assert_eq!(status_of(&dashboard, 11), AppointmentStatus::NoShow);
    assert_eq!(
        api.mutations(),
        vec![Call::UpdateStatus(
            11,
            UpdateStatusRequest {
                status: AppointmentStatus::NoShow,
                appointment_date: "20-10-2025 10:30".into(),
            }
        )]
    );
}

#[tokio::test]
async fn test_failed_finalize_keeps_status() {
    let api = api();
    let mut dashboard = loaded(api.clone()).await;
    let id = local_id_of(&dashboard, 12);
    api.fail("update_appointment_status", AppError::backend(500, "Error interno"));

    let err = dashboard
        .change_status(id, AppointmentStatus::Finished)
        .await
        .unwrap_err();

    assert_eq!(err.kind, AppErrorKind::Backend);
    assert_eq!(status_of(&dashboard, 12), AppointmentStatus::InConsultation);
}

#[tokio::test]
async fn test_finalized_only_updates_other_statuses_locally() {
    let api = api();
    let mut dashboard = loaded_with(api.clone(), &finalized_only()).await;
    let id = local_id_of(&dashboard, 11);

    dashboard
        .change_status(id, AppointmentStatus::InConsultation)
        .await
        .unwrap();

    assert_eq!(status_of(&dashboard, 11), AppointmentStatus::InConsultation);
    assert!(api.mutations().is_empty());

    api.fail("update_appointment_status", AppError::backend(500, "Error interno"));
    assert!(dashboard
        .change_status(id, AppointmentStatus::Finished)
        .await
        .is_err());
    assert_eq!(status_of(&dashboard, 11), AppointmentStatus::InConsultation);
}

#[tokio::test]
async fn test_advance_walks_consultation_progression() {
    let api = api();
    let mut dashboard = loaded(api.clone()).await;
    let id = local_id_of(&dashboard, 11);

    assert_eq!(
        dashboard.advance_status(id).await.unwrap(),
        Some(AppointmentStatus::InConsultation)
    );
    assert_eq!(
        dashboard.advance_status(id).await.unwrap(),
        Some(AppointmentStatus::Finished)
    );
    assert_eq!(dashboard.advance_status(id).await.unwrap(), None);
    assert_eq!(api.mutations().len(), 2);
}

#[tokio::test]
async fn test_status_change_without_backend_id() {
    let mut record = common::agenda_record(0, "21-10-2025 11:00", "Pendiente");
    record.id = None;
    let api = MockApi::new().with_doctor_appointments(vec![record]);
    let mut dashboard = loaded(api.clone()).await;
    let id = dashboard.appointments()[0].local_id;

    let err = dashboard
        .change_status(id, AppointmentStatus::Finished)
        .await
        .unwrap_err();

    assert_eq!(err.kind, AppErrorKind::Integrity);
    assert!(api.mutations().is_empty());
    assert_eq!(dashboard.appointments()[0].status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn test_menu_paths_outside_agenda_show_placeholder() {
    let mut dashboard = loaded(api()).await;

    dashboard.open_path("/medico/notas");
    assert_eq!(dashboard.view(), &DoctorView::UnderConstruction("notas".into()));

    dashboard.open_path("/medico/citas-hoy");
    assert_eq!(dashboard.view(), &DoctorView::Agenda);
}

#[tokio::test]
async fn test_logout_clears_session_and_work_center() {
    let store = doctor_store();
    let mut dashboard =
        DoctorDashboard::new(api(), store.clone(), &common::config(), common::today()).unwrap();
    dashboard.load().await.unwrap();
    dashboard.select_center(2).await.unwrap();

    dashboard.logout();

    assert_eq!(store.get(keys::JWT_TOKEN), None);
    assert_eq!(store.get(keys::CURRENT_USER), None);
    assert_eq!(store.get(keys::DOCTOR_CENTER), None);
    assert!(dashboard.work_center().is_none());

    // Next doctor on the same device has no center in their profile
    let next = UserProfile {
        id: Some(8),
        first_name: Some("Marta".into()),
        last_name: Some("Gil".into()),
        ..Default::default()
    };
    store.set(keys::CURRENT_USER, &serde_json::to_string(&next).unwrap());
    let dashboard =
        DoctorDashboard::new(api(), store, &common::config(), common::today()).unwrap();
    assert!(dashboard.work_center().is_none());
}

#[tokio::test]
async fn test_agenda_fetch_keeps_view_opened_meanwhile() {
    let api = api();
    let mut dashboard =
        DoctorDashboard::new(api, doctor_store(), &common::config(), common::today()).unwrap();
    assert!(dashboard.is_loading());

    let fetched = dashboard.fetch_agenda().await;
    dashboard.open_path("/medico/notas");
    dashboard.apply_agenda(fetched).unwrap();

    assert_eq!(dashboard.view(), &DoctorView::UnderConstruction("notas".into()));
    assert_eq!(dashboard.appointments().len(), 4);
    assert!(!dashboard.is_loading());
}
