use shared_types::ClinicConfig;
use std::sync::OnceLock;

static CONFIG: OnceLock<ClinicConfig> = OnceLock::new();

/// Path to the config file, relative to the project root.
#[cfg(not(target_arch = "wasm32"))]
const CONFIG_PATH: &str = "config.toml";

/// Parse a config document, falling back to defaults on error.
pub fn parse(contents: &str) -> ClinicConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to parse config.toml, using defaults");
        ClinicConfig::default()
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn read_config() -> ClinicConfig {
    match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => parse(&contents),
        Err(e) => {
            tracing::warn!(path = CONFIG_PATH, error = %e, "Config file not found, using defaults");
            ClinicConfig::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn read_config() -> ClinicConfig {
    parse(include_str!("../../../config.toml"))
}

/// Load the configuration once and return it. Later calls reuse the first
/// result.
pub fn load() -> &'static ClinicConfig {
    CONFIG.get_or_init(|| {
        let config = read_config();
        tracing::info!(
            base_url = %config.api.base_url,
            status_confirmation = ?config.doctor.status_confirmation,
            "Configuration loaded"
        );
        config
    })
}
