mod booking;
mod manage;
mod select_center;
mod select_doctor;
mod welcome;

use client::navigation::patient_menu;
use client::{DefaultStore, PatientDashboard, View};
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{LdArrowLeft, LdLogOut};
use dioxus_free_icons::Icon;
use shared_types::AppError;
use shared_ui::{Button, ButtonVariant};

use crate::auth::{use_auth, AuthState};
use crate::components::{Flash, FlashNotice, SideMenu, UnderConstruction};
use crate::routes::Route;
use crate::{today, Api, Services};

pub type PatientController = PatientDashboard<Api, DefaultStore>;

/// State shared by the patient views.
#[derive(Clone, Copy)]
pub struct PatientPage {
    pub dashboard: Signal<PatientController>,
    pub flash: Signal<Option<Flash>>,
    auth: AuthState,
}

impl PatientPage {
    /// A rejected token ends the session; anything else is shown inline.
    pub fn report(mut self, err: AppError) {
        if err.is_auth() {
            tracing::warn!(error = %err, "Session expired");
            self.end_session();
            return;
        }
        self.flash.set(Some(Flash::error(&err)));
    }

    pub fn clear_flash(mut self) {
        self.flash.set(None);
    }

    pub fn navigate(mut self, view: View) {
        self.clear_flash();
        self.dashboard.write().navigate(view);
    }

    fn end_session(mut self) {
        self.dashboard.write().logout();
        self.auth.clear_auth();
        navigator().replace(Route::Login {});
    }
}

/// Patient dashboard: side menu, header and the current view.
#[component]
pub fn PatientHome() -> Element {
    let services: Services = use_context();
    let auth = use_auth();
    let mut dashboard = use_signal(|| {
        PatientDashboard::new(
            services.api.clone(),
            services.store.clone(),
            services.config,
            today(),
        )
    });
    let flash = use_signal(|| Option::<Flash>::None);
    let page = use_context_provider(|| PatientPage {
        dashboard,
        flash,
        auth,
    });

    use_future(move || async move {
        let ctl = dashboard.peek().clone();
        let fetched = ctl.fetch_reference_data().await;
        // Only the loaded data is written back; choices made meanwhile stay.
        let result = dashboard.write().apply_reference_data(fetched);
        if let Err(e) = result {
            page.report(e);
        }
    });

    let (view, name, depth) = {
        let ctl = dashboard.read();
        (
            ctl.current_view().clone(),
            ctl.patient_name(),
            ctl.navigation().stack().depth(),
        )
    };
    let active = format!("/paciente/{}", view.slug());
    let title = view.title().to_string();

    rsx! {
        div { class: "dashboard patient-dashboard",
            aside { class: "dashboard-sidebar",
                div { class: "sidebar-brand", "Citas médicas" }
                SideMenu {
                    sections: patient_menu(),
                    active: Some(active),
                    on_open: move |path: String| {
                        page.clear_flash();
                        dashboard.write().navigate_path(&path);
                    },
                }
            }

            main { class: "dashboard-main",
                header { class: "dashboard-header",
                    div { class: "dashboard-header-left",
                        Button {
                            variant: ButtonVariant::Secondary,
                            disabled: depth <= 1,
                            onclick: move |_| {
                                page.clear_flash();
                                dashboard.write().go_back();
                            },
                            Icon { icon: LdArrowLeft, width: 16, height: 16 }
                            "Volver"
                        }
                        h1 { class: "dashboard-title", "{title}" }
                    }
                    div { class: "dashboard-header-right",
                        span { class: "dashboard-user", "Hola, {name}" }
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
                    match view {
                        View::Welcome => rsx! { welcome::Welcome {} },
                        View::SelectCenter => rsx! { select_center::SelectCenter {} },
                        View::SelectDoctor => rsx! { select_doctor::SelectDoctor {} },
                        View::BookAppointment => rsx! { booking::BookAppointment {} },
                        View::ManageAppointments => rsx! { manage::ManageAppointments {} },
                        View::UnderConstruction(slug) => rsx! { UnderConstruction { section: slug } },
                    }
                }
            }
        }
    }
}
