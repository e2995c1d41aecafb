use client::navigation::doctor_menu;
use client::{DefaultStore, DoctorDashboard, DoctorView};
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{LdCalendar, LdLogOut};
use dioxus_free_icons::Icon;
use shared_types::{format_long_date, AppError, AppointmentStatus, StatusConfirmation};
use shared_ui::{
    Button, ButtonVariant, Card, CardContent, CardDescription, CardFooter, CardHeader, CardTitle,
    MonthCalendar, Notice, NoticeKind, StatusBadge,
};
use uuid::Uuid;

use crate::auth::{use_auth, AuthState};
use crate::components::{Flash, FlashNotice, SideMenu, UnderConstruction};
use crate::routes::Route;
use crate::{today, Api, Services};

pub type DoctorController = DoctorDashboard<Api, DefaultStore>;

/// State shared by the doctor dashboard sections.
#[derive(Clone, Copy)]
struct DoctorPage {
    dashboard: Signal<DoctorController>,
    flash: Signal<Option<Flash>>,
    auth: AuthState,
}

impl DoctorPage {
    fn report(mut self, err: AppError) {
        if err.is_auth() {
            tracing::warn!(error = %err, "Session expired");
            self.end_session();
            return;
        }
        self.flash.set(Some(Flash::error(&err)));
    }

    fn end_session(mut self) {
        self.dashboard.write().logout();
        self.auth.clear_auth();
        navigator().replace(Route::Login {});
    }

    async fn change_status(mut self, local_id: Uuid, status: AppointmentStatus) {
        self.flash.set(None);
        let mut ctl = self.dashboard.peek().clone();
        let result = ctl.change_status(local_id, status).await;
        self.dashboard.set(ctl);
        if let Err(e) = result {
            self.report(e);
        }
    }

    async fn advance_status(mut self, local_id: Uuid) {
        self.flash.set(None);
        let mut ctl = self.dashboard.peek().clone();
        let result = ctl.advance_status(local_id).await;
        self.dashboard.set(ctl);
        if let Err(e) = result {
            self.report(e);
        }
    }
}

/// Doctor dashboard. Without a cached profile the session is closed and
/// the user goes back to the login page.
#[component]
pub fn DoctorHome() -> Element {
    let services: Services = use_context();
    let mut auth = use_auth();
    let created = use_hook(|| {
        DoctorDashboard::new(
            services.api.clone(),
            services.store.clone(),
            services.config,
            today(),
        )
    });

    let missing_profile = created.is_err();
    let store = services.store.clone();
    use_effect(move || {
        if missing_profile {
            tracing::warn!("Doctor dashboard without profile");
            client::auth::logout(&store);
            auth.clear_auth();
            navigator().replace(Route::Login {});
        }
    });

    match created {
        Ok(ctl) => rsx! { DoctorAgenda { controller: ctl } },
        Err(e) => rsx! {
            div { class: "auth-guard-loading",
                p { "{e.message}" }
            }
        },
    }
}

#[derive(Props, Clone)]
struct DoctorAgendaProps {
    controller: DoctorController,
}

impl PartialEq for DoctorAgendaProps {
    fn eq(&self, _other: &Self) -> bool {
        // Built once per mount. The signal below holds the live copy.
        true
    }
}

#[component]
fn DoctorAgenda(props: DoctorAgendaProps) -> Element {
    let auth = use_auth();
    let mut dashboard = use_signal(|| props.controller.clone());
    let flash = use_signal(|| Option::<Flash>::None);
    let page = use_context_provider(|| DoctorPage {
        dashboard,
        flash,
        auth,
    });

    use_future(move || async move {
        let ctl = dashboard.peek().clone();
        let fetched = ctl.fetch_agenda().await;
        let result = dashboard.write().apply_agenda(fetched);
        if let Err(e) = result {
            page.report(e);
        }
    });

    let (name, specialty, view, loading, api_error) = {
        let ctl = dashboard.read();
        (
            ctl.display_name(),
            ctl.specialty(),
            ctl.view().clone(),
            ctl.is_loading(),
            ctl.api_error().map(str::to_string),
        )
    };

    rsx! {
        div { class: "dashboard doctor-dashboard",
            aside { class: "dashboard-sidebar",
                div { class: "sidebar-brand", "Citas médicas" }
                SideMenu {
                    sections: doctor_menu(),
                    on_open: move |path: String| dashboard.write().open_path(&path),
                }
            }

            main { class: "dashboard-main",
                header { class: "dashboard-header",
                    div { class: "dashboard-header-left",
                        h1 { class: "dashboard-title", "{name}" }
                        span { class: "dashboard-subtitle", "{specialty}" }
                    }
                    div { class: "dashboard-header-right",
                        Button {
                            variant: ButtonVariant::Link,
                            onclick: move |_| page.end_session(),
                            Icon { icon: LdLogOut, width: 16, height: 16 }
                            "Cerrar sesión"
                        }
                    }
                }

                FlashNotice { flash }

                div { class: "dashboard-content",
                    if let Some(message) = api_error {
                        Notice { kind: NoticeKind::Error, title: "No se pudo cargar la agenda".to_string(),
                            "{message}"
                        }
                    } else if loading {
                        Notice { kind: NoticeKind::Info, "Cargando agenda..." }
                    }

                    match view {
                        DoctorView::Agenda => rsx! {
                            WorkCenter {}
                            AgendaCalendar {}
                            DayAppointments {}
                        },
                        DoctorView::UnderConstruction(slug) => rsx! {
                            UnderConstruction { section: slug }
                        },
                    }
                }
            }
        }
    }
}

/// Current work center, or a picker when none is set.
#[component]
fn WorkCenter() -> Element {
    let page: DoctorPage = use_context();
    let mut dashboard = page.dashboard;
    let mut choice = use_signal(|| Option::<i64>::None);
    let mut saving = use_signal(|| false);

    let (current, centers) = {
        let ctl = dashboard.read();
        (ctl.work_center().cloned(), ctl.centers().to_vec())
    };

    let save = move |_: MouseEvent| async move {
        let Some(center_id) = choice() else {
            return;
        };
        saving.set(true);
        let mut ctl = dashboard.peek().clone();
        let result = ctl.select_center(center_id).await;
        dashboard.set(ctl);
        saving.set(false);
        if let Err(e) = result {
            page.report(e);
        }
    };

    rsx! {
        Card { class: "work-center",
            CardHeader {
                CardTitle { "Centro de trabajo" }
                if let Some(center) = current.as_ref() {
                    CardDescription { "{center.name} · {center.address}" }
                } else {
                    CardDescription { "Indica en qué centro pasas consulta." }
                }
            }
            CardContent {
                if current.is_none() {
                    select {
                        class: "center-select",
                        onchange: move |e: FormEvent| choice.set(e.value().parse().ok()),
                        option { value: "", "Selecciona un centro" }
                        for center in centers {
                            option { key: "{center.id}", value: "{center.id}", "{center.name}" }
                        }
                    }
                }
            }
            CardFooter {
                if current.is_some() {
                    Button {
                        variant: ButtonVariant::Secondary,
                        onclick: move |_| dashboard.write().clear_center(),
                        "Cambiar centro"
                    }
                } else {
                    Button {
                        disabled: choice().is_none(),
                        busy: saving(),
                        onclick: save,
                        "Guardar centro"
                    }
                }
            }
        }
    }
}

/// Month view with a dot on days that have consultations.
#[component]
fn AgendaCalendar() -> Element {
    let page: DoctorPage = use_context();
    let mut dashboard = page.dashboard;
    let grid = dashboard.read().month_grid();

    rsx! {
        Card { class: "agenda-calendar",
            CardHeader {
                CardTitle {
                    Icon { icon: LdCalendar, width: 18, height: 18 }
                    " Agenda"
                }
            }
            CardContent {
                MonthCalendar {
                    grid,
                    allow_past: true,
                    on_prev: move |_| dashboard.write().prev_month(),
                    on_next: move |_| dashboard.write().next_month(),
                    on_select: move |date| {
                        let result = dashboard.write().select_day(date);
                        if let Err(e) = result {
                            page.report(e);
                        }
                    },
                }
            }
        }
    }
}

/// Consultations of the selected day with the status controls.
#[component]
fn DayAppointments() -> Element {
    let page: DoctorPage = use_context();
    let (day, appointments, confirmation) = {
        let ctl = page.dashboard.read();
        let day = ctl.selected_day();
        let list = day.map(|d| ctl.appointments_for_day(d)).unwrap_or_default();
        (day, list, ctl.confirmation())
    };

    let Some(day) = day else {
        return rsx! {
            p { class: "agenda-hint", "Selecciona un día laborable del calendario." }
        };
    };
    let heading = format_long_date(day);

    rsx! {
        Card { class: "day-appointments",
            CardHeader {
                CardTitle { "Citas del {heading}" }
                if confirmation == StatusConfirmation::FinalizedOnly {
                    CardDescription { "Solo la finalización se confirma con el servidor." }
                }
            }
            CardContent {
                if appointments.is_empty() {
                    p { class: "agenda-empty", "No hay citas para este día." }
                }
                ul { class: "agenda-list",
                    for appt in appointments {
                        li { key: "{appt.local_id}", class: "agenda-item",
                            span { class: "agenda-time", "{appt.slot}" }
                            div { class: "agenda-patient",
                                strong { "{appt.patient}" }
                                if let Some(reason) = appt.reason.as_ref() {
                                    span { class: "agenda-reason", "{reason}" }
                                }
                            }
                            StatusBadge { status: appt.status }
                            if let Some(next) = appt.status.next() {
                                Button {
                                    onclick: move |_| page.advance_status(appt.local_id),
                                    "{next}"
                                }
                            }
                            select {
                                class: "status-select",
                                "aria-label": "Cambiar estado",
                                value: appt.status.as_str(),
                                onchange: move |e: FormEvent| {
                                    let status = AppointmentStatus::from_str_or_default(&e.value());
                                    page.change_status(appt.local_id, status)
                                },
                                for status in AppointmentStatus::ALL {
                                    option { key: "{status}", value: status.as_str(), "{status}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
