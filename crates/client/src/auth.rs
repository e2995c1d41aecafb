//! Login, registration and the persisted session.

use shared_types::{ApiResult, AppError, LoginRequest, RegisterRequest, Role, Session, UserProfile};
use std::collections::HashMap;
use validator::Validate;

use crate::api::ClinicApi;
use crate::storage::{keys, read_json, write_json, KeyValueStore};

const BASIC_FIELDS_REQUIRED: &str = "Todos los campos básicos son obligatorios.";

/// Authenticate, persist the token and role, then cache the profile.
///
/// A 401 while fetching the profile undoes the login. Any other profile
/// failure still yields a session, just without a cached profile.
#[tracing::instrument(skip(api, store, email, password, role), fields(role = role.as_str()))]
pub async fn login<A: ClinicApi, S: KeyValueStore>(
    api: &A,
    store: &S,
    role: Role,
    email: &str,
    password: &str,
) -> ApiResult<Session> {
    let request = LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    if let Err(errors) = request.validate() {
        let err = AppError::from(errors);
        let message = err
            .field_errors
            .get("email")
            .or_else(|| err.field_errors.get("password"))
            .cloned()
            .unwrap_or_else(|| err.message.clone());
        return Err(AppError::validation(message, err.field_errors));
    }

    let response = api.authenticate(role, &request).await?;
    store.set(keys::JWT_TOKEN, &response.token);
    store.set(keys::USER_ROLE, role.as_str());

    let profile = match api.fetch_session_profile(role).await {
        Ok(profile) => {
            write_json(store, keys::CURRENT_USER, Some(&profile));
            Some(profile)
        }
        Err(e) if e.is_auth() => {
            store.remove(keys::JWT_TOKEN);
            store.remove(keys::USER_ROLE);
            return Err(e);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Logged in without a cached profile");
            None
        }
    };

    tracing::info!(user_id = ?response.user_id, "Login succeeded");
    Ok(Session {
        token: response.token,
        role,
        profile,
    })
}

/// Check a registration form and return the chosen role.
///
/// Messages come out in the order the form presents them: required fields,
/// role, doctor fields, email, phone, password, confirmation.
pub fn validate_registration(request: &RegisterRequest) -> ApiResult<Role> {
    let field_errors: HashMap<String, String> = match request.validate() {
        Ok(()) => HashMap::new(),
        Err(errors) => AppError::from(errors).field_errors,
    };

    let required = [
        &request.first_name,
        &request.last_name,
        &request.birth_date,
        &request.email,
        &request.password,
        &request.confirm_password,
    ];
    if required.iter().any(|f| f.trim().is_empty()) {
        return Err(AppError::validation(BASIC_FIELDS_REQUIRED, field_errors));
    }

    if let Some(message) = request.check_role_fields() {
        return Err(AppError::validation(message, field_errors));
    }

    for field in ["email", "phone_number", "password", "confirm_password"] {
        if let Some(message) = field_errors.get(field) {
            return Err(AppError::validation(message.clone(), field_errors.clone()));
        }
    }

    request
        .role
        .ok_or_else(|| AppError::invalid("Rol no válido o no definido."))
}

#[tracing::instrument(skip(api, request))]
pub async fn register<A: ClinicApi>(api: &A, request: &RegisterRequest) -> ApiResult<Role> {
    let role = validate_registration(request)?;
    api.register(role, request).await?;
    tracing::info!(role = role.as_str(), "Account registered");
    Ok(role)
}

pub fn logout<S: KeyValueStore>(store: &S) {
    store.remove(keys::JWT_TOKEN);
    store.remove(keys::USER_ROLE);
    store.remove(keys::CURRENT_USER);
    tracing::info!("Session closed");
}

/// Rebuild the session from storage. `None` without both a token and a
/// recognizable role.
pub fn restore_session<S: KeyValueStore>(store: &S) -> Option<Session> {
    let token = store.get(keys::JWT_TOKEN).filter(|t| !t.trim().is_empty())?;
    let role = store.get(keys::USER_ROLE).and_then(|r| Role::parse(&r))?;
    let profile: Option<UserProfile> = read_json(store, keys::CURRENT_USER);
    Some(Session {
        token,
        role,
        profile,
    })
}

/// Ask the backend to import the center list, once per browser.
///
/// Returns `Ok(true)` when the seed ran now, `Ok(false)` when it had already
/// been done.
pub async fn ensure_centers_seeded<A: ClinicApi, S: KeyValueStore>(
    api: &A,
    store: &S,
) -> ApiResult<bool> {
    if store.get(keys::CENTERS_LOADED).as_deref() == Some("true") {
        tracing::debug!("Centers already seeded");
        return Ok(false);
    }
    api.seed_centers().await?;
    store.set(keys::CENTERS_LOADED, "true");
    Ok(true)
}
