use dioxus::prelude::*;
use shared_types::{RegisterRequest, Role};
use shared_ui::{Button, Card, CardContent, CardDescription, CardFooter, CardHeader, CardTitle};

use crate::routes::Route;
use crate::Services;

/// Input bound to one string signal.
#[component]
fn TextField(
    id: &'static str,
    label: &'static str,
    #[props(default = "text")] kind: &'static str,
    mut value: Signal<String>,
) -> Element {
    rsx! {
        div { class: "auth-field",
            label { r#for: id, "{label}" }
            input {
                id,
                r#type: kind,
                value: value(),
                oninput: move |e: FormEvent| value.set(e.value()),
            }
        }
    }
}

/// Account registration. Doctors also provide a license number and specialty.
#[component]
pub fn Register() -> Element {
    let services: Services = use_context();
    let mut role = use_signal(|| Option::<Role>::None);
    let first_name = use_signal(String::new);
    let last_name = use_signal(String::new);
    let birth_date = use_signal(String::new);
    let email = use_signal(String::new);
    let phone_number = use_signal(String::new);
    let password = use_signal(String::new);
    let confirm_password = use_signal(String::new);
    let license_number = use_signal(String::new);
    let specialty = use_signal(String::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_register = move |evt: FormEvent| {
        let services = services.clone();
        async move {
            evt.prevent_default();
            error_msg.set(None);

            let is_doctor = role() == Some(Role::Doctor);
            let request = RegisterRequest {
                role: role(),
                first_name: first_name().trim().to_string(),
                last_name: last_name().trim().to_string(),
                birth_date: birth_date(),
                email: email().trim().to_string(),
                phone_number: phone_number().trim().to_string(),
                password: password(),
                confirm_password: confirm_password(),
                license_number: is_doctor.then(|| license_number().trim().to_string()),
                specialty: is_doctor.then(|| specialty().trim().to_string()),
            };

            loading.set(true);
            match client::auth::register(&services.api, &request).await {
                Ok(_) => {
                    navigator().push(Route::Login {});
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Registration rejected");
                    error_msg.set(Some(e.message));
                }
            }
            loading.set(false);
        }
    };

    rsx! {
        div { class: "auth-page",
            Card { class: "auth-card wide",
                CardHeader {
                    CardTitle { "Crear cuenta" }
                    CardDescription { "Regístrate como paciente o como médico." }
                }

                CardContent {
                    if let Some(err) = error_msg() {
                        div { class: "auth-error", role: "alert", "{err}" }
                    }

                    form { class: "auth-form", onsubmit: handle_register,
                        fieldset { class: "role-choice",
                            legend { "Tipo de cuenta" }
                            for choice in [Role::Patient, Role::Doctor] {
                                label { key: "{choice.as_str()}",
                                    input {
                                        r#type: "radio",
                                        name: "role",
                                        value: choice.as_str(),
                                        checked: role() == Some(choice),
                                        onchange: move |_| role.set(Some(choice)),
                                    }
                                    "{choice.label()}"
                                }
                            }
                        }

                        TextField { id: "first_name", label: "Nombre", value: first_name }
                        TextField { id: "last_name", label: "Apellidos", value: last_name }
                        TextField { id: "birth_date", label: "Fecha de nacimiento", kind: "date", value: birth_date }
                        TextField { id: "email", label: "Correo electrónico", kind: "email", value: email }
                        TextField { id: "phone", label: "Teléfono", kind: "tel", value: phone_number }
                        TextField { id: "password", label: "Contraseña", kind: "password", value: password }
                        TextField {
                            id: "confirm_password",
                            label: "Repite la contraseña",
                            kind: "password",
                            value: confirm_password,
                        }

                        if role() == Some(Role::Doctor) {
                            TextField { id: "license", label: "Número de colegiado", value: license_number }
                            TextField { id: "specialty", label: "Especialidad", value: specialty }
                        }

                        Button { submit: true, busy: loading(),
                            if loading() { "Registrando..." } else { "Registrarme" }
                        }
                    }
                }

                CardFooter {
                    p { class: "auth-footer-text",
                        "¿Ya tienes cuenta? "
                        Link { to: Route::Login {}, "Inicia sesión" }
                    }
                }
            }
        }
    }
}
