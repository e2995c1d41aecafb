use client::{View, WelcomeNotice};
use dioxus::prelude::*;
use shared_types::format_long_date_time;
use shared_ui::{
    Button, Card, CardContent, CardDescription, CardHeader, CardTitle, Notice, NoticeKind,
};

use super::PatientPage;

/// Greeting panel telling the patient what to do next.
#[component]
pub fn Welcome() -> Element {
    let page: PatientPage = use_context();
    let ctl = page.dashboard.read();
    let notice = ctl.welcome_notice();
    let name = ctl.patient_name();
    let center = ctl.selected_center().cloned();
    let doctor = ctl.selected_doctor().cloned();
    let confirmed = ctl
        .last_confirmed()
        .map(|a| format!("{} con {}", format_long_date_time(a.date, a.slot), a.doctor));
    drop(ctl);

    rsx! {
        Card {
            CardHeader {
                CardTitle { "Bienvenido, {name}" }
                CardDescription { "Desde aquí puedes reservar y gestionar tus citas médicas." }
            }
            CardContent {
                match notice {
                    WelcomeNotice::ApiError(message) => rsx! {
                        Notice { kind: NoticeKind::Error, title: "No se pudo conectar con el servidor".to_string(),
                            "{message}"
                        }
                    },
                    WelcomeNotice::Loading => rsx! {
                        Notice { kind: NoticeKind::Info, "Cargando centros y médicos..." }
                    },
                    WelcomeNotice::CenterRequired => rsx! {
                        Notice { kind: NoticeKind::Warning, "Primero selecciona tu centro de salud." }
                        Button { onclick: move |_| page.navigate(View::SelectCenter), "Elegir centro" }
                    },
                    WelcomeNotice::DoctorRequired => rsx! {
                        Notice { kind: NoticeKind::Warning, "Elige la especialidad y el médico que te atenderá." }
                        Button { onclick: move |_| page.navigate(View::SelectDoctor), "Elegir especialidad" }
                    },
                    WelcomeNotice::Ready => rsx! {
                        Notice { kind: NoticeKind::Success, "Todo listo para agendar tu cita." }
                        Button { onclick: move |_| page.navigate(View::BookAppointment), "Agendar cita" }
                    },
                }

                dl { class: "selection-summary",
                    dt { "Centro" }
                    dd {
                        if let Some(center) = center {
                            "{center.name} · {center.address}"
                        } else {
                            "Sin seleccionar"
                        }
                    }
                    dt { "Médico" }
                    dd {
                        if let Some(doctor) = doctor {
                            "{doctor.name} ({doctor.specialty})"
                        } else {
                            "Sin seleccionar"
                        }
                    }
                }

                if let Some(text) = confirmed {
                    p { class: "last-confirmed", "Tu última cita: {text}." }
                }
            }
        }
    }
}
