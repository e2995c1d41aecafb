use dioxus::prelude::*;
use shared_types::{Role, Session};

use client::KeyValueStore;

/// Global authentication state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuthState {
    pub session: Signal<Option<Session>>,
}

impl AuthState {
    pub fn restore(store: &impl KeyValueStore) -> Self {
        Self {
            session: Signal::new(client::auth::restore_session(store)),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.read().as_ref().map(|s| s.role)
    }

    pub fn set_session(&mut self, session: Session) {
        self.session.set(Some(session));
    }

    pub fn clear_auth(&mut self) {
        self.session.set(None);
    }
}

/// Hook to access auth state.
pub fn use_auth() -> AuthState {
    use_context::<AuthState>()
}
