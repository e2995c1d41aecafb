use client::View;
use dioxus::prelude::*;
use shared_ui::{
    Button, ButtonVariant, Card, CardContent, CardDescription, CardFooter, CardHeader, CardTitle,
    Notice, NoticeKind, StatusBadge,
};
use uuid::Uuid;

use super::PatientPage;
use crate::components::Flash;

/// Booked appointments in chronological order with reschedule and cancel
/// actions. Cancelling asks for a second click.
#[component]
pub fn ManageAppointments() -> Element {
    let page: PatientPage = use_context();
    let mut dashboard = page.dashboard;
    let mut flash = page.flash;
    let mut confirming = use_signal(|| Option::<Uuid>::None);

    let appointments = dashboard.read().sorted_appointments();

    let cancel = move |local_id: Uuid| async move {
        confirming.set(None);
        flash.set(None);
        let mut ctl = dashboard.peek().clone();
        let result = ctl.cancel(local_id).await;
        dashboard.set(ctl);
        match result {
            Ok(()) => flash.set(Some(Flash::success("La cita ha sido cancelada."))),
            Err(e) => page.report(e),
        }
    };

    if appointments.is_empty() {
        return rsx! {
            Notice { kind: NoticeKind::Info, "No tienes citas agendadas." }
            Button { onclick: move |_| page.navigate(View::BookAppointment), "Agendar cita" }
        };
    }

    rsx! {
        div { class: "appointment-list",
            for appt in appointments {
                Card { key: "{appt.local_id}", class: "appointment-card",
                    CardHeader {
                        CardTitle { "{appt.formatted()}" }
                        CardDescription { "{appt.doctor} · {appt.specialty}" }
                    }
                    CardContent {
                        p { class: "appointment-center", "{appt.center.name} · {appt.center.address}" }
                        StatusBadge { status: appt.status }
                    }
                    CardFooter {
                        if confirming() == Some(appt.local_id) {
                            span { class: "confirm-question", "¿Cancelar esta cita?" }
                            Button {
                                variant: ButtonVariant::Danger,
                                onclick: move |_| cancel(appt.local_id),
                                "Sí, cancelar"
                            }
                            Button {
                                variant: ButtonVariant::Secondary,
                                onclick: move |_| confirming.set(None),
                                "No"
                            }
                        } else {
                            Button {
                                variant: ButtonVariant::Secondary,
                                onclick: move |_| {
                                    page.clear_flash();
                                    let result = dashboard.write().start_reschedule(appt.local_id);
                                    if let Err(e) = result {
                                        page.report(e);
                                    }
                                },
                                "Reagendar"
                            }
                            Button {
                                variant: ButtonVariant::Danger,
                                onclick: move |_| confirming.set(Some(appt.local_id)),
                                "Cancelar"
                            }
                        }
                    }
                }
            }
        }
    }
}
