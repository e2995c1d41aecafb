pub mod doctor;
pub mod home;
pub mod login;
pub mod not_found;
pub mod patient;
pub mod register;

use crate::auth::use_auth;
use dioxus::prelude::*;
use shared_types::Role;

use doctor::DoctorHome;
use home::Home;
use login::Login;
use not_found::NotFound;
use patient::PatientHome;
use register::Register;

/// Application routes.
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
    #[layout(AuthGuard)]
    #[route("/doctor")]
    DoctorHome {},
    #[route("/patient")]
    PatientHome {},
    #[end_layout]
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

impl Route {
    /// Dashboard for a signed-in role.
    pub fn dashboard(role: Role) -> Self {
        match role {
            Role::Doctor => Route::DoctorHome {},
            Role::Patient => Route::PatientHome {},
        }
    }
}

/// Sends anonymous visitors to the login page and each role to its own
/// dashboard.
#[component]
fn AuthGuard() -> Element {
    let auth = use_auth();
    let route: Route = use_route();

    let Some(role) = auth.role() else {
        navigator().replace(Route::Login {});
        return rsx! {
            div { class: "auth-guard-loading",
                p { "Redirigiendo al inicio de sesión..." }
            }
        };
    };

    let home = Route::dashboard(role);
    if route != home {
        tracing::warn!(role = role.as_str(), "Dashboard of another role requested");
        navigator().replace(home);
        return rsx! {
            div { class: "auth-guard-loading",
                p { "Cargando..." }
            }
        };
    }

    rsx! { Outlet::<Route> {} }
}
