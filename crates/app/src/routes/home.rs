use dioxus::prelude::*;
use shared_ui::{Card, CardContent, CardDescription, CardHeader, CardTitle};

use crate::auth::use_auth;
use crate::routes::Route;
use crate::Services;

/// Landing page. Triggers the one-time center import and sends a signed-in
/// user straight to their dashboard.
#[component]
pub fn Home() -> Element {
    let auth = use_auth();
    let services: Services = use_context();

    use_future(move || {
        let services = services.clone();
        async move {
            match client::auth::ensure_centers_seeded(&services.api, &services.store).await {
                Ok(true) => tracing::info!("Health centers imported"),
                Ok(false) => {}
                Err(e) => tracing::error!(error = %e, "Center import failed"),
            }
        }
    });

    if let Some(role) = auth.role() {
        navigator().replace(Route::dashboard(role));
    }

    rsx! {
        div { class: "home-page",
            Card { class: "home-card",
                CardHeader {
                    CardTitle { "Citas médicas" }
                    CardDescription { "Reserva y gestiona tus citas en los centros de salud de tu zona." }
                }
                CardContent {
                    div { class: "home-actions",
                        Link { to: Route::Login {}, class: "link-button primary", "Iniciar sesión" }
                        Link { to: Route::Register {}, class: "link-button secondary", "Crear cuenta" }
                    }
                }
            }
        }
    }
}
