use dioxus::prelude::*;
use shared_ui::{
    Button, Card, CardContent, CardDescription, CardFooter, CardHeader, CardTitle, Notice,
    NoticeKind,
};

use super::PatientPage;

fn specialty_class(active: bool) -> &'static str {
    if active {
        "specialty-option selected"
    } else {
        "specialty-option"
    }
}

/// Specialty picker for the selected center. Choosing a specialty proposes
/// its first doctor, who is confirmed with "Continuar".
#[component]
pub fn SelectDoctor() -> Element {
    let page: PatientPage = use_context();
    let mut dashboard = page.dashboard;
    let ctl = dashboard.read();
    let center = ctl.selected_center().map(|c| c.name.clone()).unwrap_or_default();
    let specialties = ctl.specialties_for_selected_center();
    let chosen = ctl.selected_specialty().map(str::to_string);
    let doctor = ctl.selected_doctor().cloned();
    drop(ctl);
    let doctor_id = doctor.as_ref().map(|d| d.id);

    if specialties.is_empty() {
        return rsx! {
            Notice { kind: NoticeKind::Warning, "{center} no tiene médicos registrados todavía." }
        };
    }

    rsx! {
        Card {
            CardHeader {
                CardTitle { "¿Qué especialidad necesitas?" }
                CardDescription { "Especialidades disponibles en {center}." }
            }
            CardContent {
                div { class: "specialty-list", role: "radiogroup",
                    for specialty in specialties {
                        button {
                            key: "{specialty}",
                            r#type: "button",
                            class: specialty_class(chosen.as_deref() == Some(specialty.as_str())),
                            onclick: {
                                let specialty = specialty.clone();
                                move |_| {
                                    page.clear_flash();
                                    dashboard.write().choose_specialty(&specialty);
                                }
                            },
                            "{specialty}"
                        }
                    }
                }

                if let Some(doctor) = doctor {
                    p { class: "doctor-proposal",
                        "Te atenderá "
                        strong { "{doctor.name}" }
                        " ({doctor.specialty})."
                    }
                }
            }
            CardFooter {
                Button {
                    disabled: doctor_id.is_none(),
                    onclick: move |_| {
                        let Some(id) = doctor_id else {
                            return;
                        };
                        let result = dashboard.write().select_doctor(id);
                        if let Err(e) = result {
                            page.report(e);
                        }
                    },
                    "Continuar"
                }
            }
        }
    }
}
