use dioxus::prelude::*;
use shared_ui::{
    Button, Card, CardContent, CardDescription, CardFooter, CardHeader, CardTitle, CardTone,
    Notice, NoticeKind,
};

use super::PatientPage;

/// Grid of health centers to choose from.
#[component]
pub fn SelectCenter() -> Element {
    let page: PatientPage = use_context();
    let mut dashboard = page.dashboard;
    let ctl = dashboard.read();
    let centers = ctl.centers().to_vec();
    let selected = ctl.selected_center().map(|c| c.id);
    let loading = ctl.is_loading();
    drop(ctl);

    if loading {
        return rsx! {
            Notice { kind: NoticeKind::Info, "Cargando centros de salud..." }
        };
    }

    if centers.is_empty() {
        return rsx! {
            Notice { kind: NoticeKind::Warning, "No hay centros de salud disponibles." }
        };
    }

    rsx! {
        div { class: "card-grid",
            for center in centers {
                Card {
                    key: "{center.id}",
                    tone: if selected == Some(center.id) { CardTone::Highlighted } else { CardTone::Plain },
                    CardHeader {
                        CardTitle { "{center.name}" }
                        CardDescription { "{center.address}" }
                    }
                    CardContent {
                        if selected == Some(center.id) {
                            p { class: "card-note", "Centro actual" }
                        }
                    }
                    CardFooter {
                        Button {
                            onclick: move |_| {
                                page.clear_flash();
                                let result = dashboard.write().select_center(center.id);
                                if let Err(e) = result {
                                    page.report(e);
                                }
                            },
                            "Seleccionar"
                        }
                    }
                }
            }
        }
    }
}
