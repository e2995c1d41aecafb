use dioxus::prelude::*;
use shared_types::{format_long_date, format_long_date_time};
use shared_ui::{
    Button, Card, CardContent, CardDescription, CardFooter, CardHeader, CardTitle, MonthCalendar,
    Notice, NoticeKind, SlotPicker,
};

use super::PatientPage;
use crate::components::Flash;

/// Calendar and free hours for the selected doctor, plus the confirmation
/// button. Doubles as the reschedule screen.
#[component]
pub fn BookAppointment() -> Element {
    let page: PatientPage = use_context();
    let mut dashboard = page.dashboard;
    let mut flash = page.flash;
    let mut submitting = use_signal(|| false);

    let ctl = dashboard.read();
    let center = ctl.selected_center().cloned();
    let doctor = ctl.selected_doctor().cloned();
    let rescheduling = ctl.rescheduling().map(|a| a.formatted());
    let grid = ctl.month_grid();
    let can_prev = ctl.can_go_prev_month();
    let can_next = ctl.can_go_next_month();
    let date_label = ctl.selected_date().map(format_long_date);
    let selected_slot = ctl.selected_slot();
    let slots = ctl.available_hours();
    drop(ctl);

    let (Some(center), Some(doctor)) = (center, doctor) else {
        return rsx! {
            Notice { kind: NoticeKind::Warning, "Selecciona un centro y un médico antes de agendar." }
        };
    };

    let confirm = move |_: MouseEvent| async move {
        submitting.set(true);
        flash.set(None);
        let mut ctl = dashboard.peek().clone();
        let result = ctl.confirm_booking().await;
        dashboard.set(ctl);
        submitting.set(false);
        match result {
            Ok(appt) => flash.set(Some(Flash::success(format!(
                "Cita confirmada para el {} con {}.",
                format_long_date_time(appt.date, appt.slot),
                appt.doctor
            )))),
            Err(e) => page.report(e),
        }
    };

    rsx! {
        if let Some(original) = rescheduling {
            Notice {
                kind: NoticeKind::Info,
                title: "Reagendando cita".to_string(),
                on_dismiss: move |_| dashboard.write().cancel_reschedule(),
                "Elige un nuevo día y hora para tu cita del {original}."
            }
        }

        Card {
            CardHeader {
                CardTitle { "{doctor.name}" }
                CardDescription { "{doctor.specialty} · {center.name}" }
            }
            CardContent {
                div { class: "booking-layout",
                    MonthCalendar {
                        grid,
                        can_prev,
                        can_next,
                        on_prev: move |_| {
                            dashboard.write().prev_month();
                        },
                        on_next: move |_| {
                            dashboard.write().next_month();
                        },
                        on_select: move |date| {
                            flash.set(None);
                            let result = dashboard.write().select_date(date);
                            if let Err(e) = result {
                                page.report(e);
                            }
                        },
                    }

                    div { class: "booking-hours",
                        if let Some(label) = date_label {
                            h3 { "Horas disponibles el {label}" }
                            SlotPicker {
                                slots,
                                selected: selected_slot,
                                on_select: move |slot| {
                                    let result = dashboard.write().select_slot(slot);
                                    if let Err(e) = result {
                                        page.report(e);
                                    }
                                },
                            }
                        } else {
                            p { class: "booking-hint", "Selecciona un día del calendario." }
                        }
                    }
                }
            }
            CardFooter {
                Button {
                    disabled: selected_slot.is_none(),
                    busy: submitting(),
                    onclick: confirm,
                    if submitting() { "Confirmando..." } else { "Confirmar cita" }
                }
            }
        }
    }
}
