use dioxus::prelude::*;
use shared_types::Role;
use shared_ui::{Button, Card, CardContent, CardDescription, CardFooter, CardHeader, CardTitle};
use std::collections::HashMap;

use crate::auth::use_auth;
use crate::routes::Route;
use crate::Services;

/// Email/password sign-in for either role.
#[component]
pub fn Login() -> Element {
    let mut auth = use_auth();
    let services: Services = use_context();
    let mut role = use_signal(|| Role::Patient);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut loading = use_signal(|| false);

    // Redirect to the dashboard if already authenticated
    if let Some(current) = auth.role() {
        navigator().replace(Route::dashboard(current));
    }

    let handle_login = move |evt: FormEvent| {
        let services = services.clone();
        async move {
            evt.prevent_default();
            loading.set(true);
            error_msg.set(None);
            field_errors.set(HashMap::new());

            let chosen = role();
            match client::auth::login(&services.api, &services.store, chosen, &email(), &password())
                .await
            {
                Ok(session) => {
                    auth.set_session(session);
                    navigator().push(Route::dashboard(chosen));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Login rejected");
                    field_errors.set(e.field_errors.clone());
                    error_msg.set(Some(e.message));
                }
            }
            loading.set(false);
        }
    };

    rsx! {
        div { class: "auth-page",
            Card { class: "auth-card",
                CardHeader {
                    CardTitle { "Iniciar sesión" }
                    CardDescription { "Accede con tu correo y contraseña." }
                }

                CardContent {
                    if let Some(err) = error_msg() {
                        div { class: "auth-error", role: "alert", "{err}" }
                    }

                    form { class: "auth-form", onsubmit: handle_login,
                        div { class: "auth-field",
                            label { r#for: "role", "Soy" }
                            select {
                                id: "role",
                                value: role().as_str(),
                                onchange: move |e: FormEvent| {
                                    if let Some(r) = Role::parse(&e.value()) {
                                        role.set(r);
                                    }
                                },
                                option { value: "patient", "Paciente" }
                                option { value: "doctor", "Médico" }
                            }
                        }

                        div { class: "auth-field",
                            label { r#for: "email", "Correo electrónico" }
                            input {
                                id: "email",
                                r#type: "email",
                                placeholder: "tu@correo.com",
                                value: email(),
                                oninput: move |e: FormEvent| email.set(e.value()),
                            }
                            if let Some(msg) = field_errors().get("email") {
                                span { class: "field-error", "{msg}" }
                            }
                        }

                        div { class: "auth-field",
                            label { r#for: "password", "Contraseña" }
                            input {
                                id: "password",
                                r#type: "password",
                                value: password(),
                                oninput: move |e: FormEvent| password.set(e.value()),
                            }
                            if let Some(msg) = field_errors().get("password") {
                                span { class: "field-error", "{msg}" }
                            }
                        }

                        Button { submit: true, busy: loading(),
                            if loading() { "Entrando..." } else { "Entrar" }
                        }
                    }
                }

                CardFooter {
                    p { class: "auth-footer-text",
                        "¿No tienes cuenta? "
                        Link { to: Route::Register {}, "Regístrate" }
                    }
                }
            }
        }
    }
}
