use chrono::NaiveDate;
use client::{DefaultStore, HttpClinicApi};
use dioxus::prelude::*;
use shared_types::ClinicConfig;

mod auth;
mod components;
mod routes;
use auth::AuthState;
use routes::Route;

/// REST client used by every page.
pub type Api = HttpClinicApi<DefaultStore>;

/// Backend client, persisted store and configuration, provided once at the root.
#[derive(Clone)]
pub struct Services {
    pub api: Api,
    pub store: DefaultStore,
    pub config: &'static ClinicConfig,
}

impl Services {
    fn new() -> Self {
        let config = client::config::load();
        let store = DefaultStore::default();
        Self {
            api: HttpClinicApi::from_config(config, store.clone()),
            store,
            config,
        }
    }
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

/// Local calendar date used for past/future checks.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[component]
fn App() -> Element {
    let services = use_context_provider(Services::new);

    // Restore a session left in storage by a previous visit
    use_context_provider(|| AuthState::restore(&services.store));

    rsx! {
        document::Stylesheet { href: MAIN_CSS }
        Router::<Route> {}
    }
}
