use dioxus::prelude::*;
use shared_ui::{Card, CardContent, CardDescription, CardHeader, CardTitle, CardTone};

/// Placeholder for menu entries without a screen yet.
#[component]
pub fn UnderConstruction(section: String) -> Element {
    rsx! {
        Card { tone: CardTone::Muted, class: "under-construction",
            CardHeader {
                CardTitle { "Sección en construcción" }
                CardDescription { "«{section}» estará disponible próximamente." }
            }
            CardContent {
                p { "Mientras tanto puedes usar el resto de opciones del menú." }
            }
        }
    }
}
